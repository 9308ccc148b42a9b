mod command;
mod line;
mod session;


use embedded_storage::Storage;

pub use command::{parse_command, ProvisioningCommand};
pub use line::{LineEditor, LineEvent};
pub(crate) use session::printable;
pub use session::{
    ConsoleRead, ProvisioningConsole, ProvisioningSession, Reply, SessionInput, SessionPhase, REPLY_CAPACITY,
};

use crate::config::ProvisioningPolicy;
use crate::credentials::{CredentialRecord, CredentialStore};
use crate::indicator::StatusIndicator;

/// Runs one provisioning session seeded with `pending`, holding the indicator
/// on for its duration.
pub async fn run_provisioning<S, C, I>(
    store: &mut CredentialStore<S>,
    console: &mut C,
    indicator: &mut I,
    pending: CredentialRecord,
    policy: ProvisioningPolicy,
) -> bool
where
    S: Storage,
    C: ProvisioningConsole,
    I: StatusIndicator,
{
    log::info!("provisioning: session started");
    indicator.set(true);
    let committed = ProvisioningSession::new(store, pending)
        .run(console, policy)
        .await;
    indicator.set(false);
    log::info!("provisioning: session finished committed={}", committed);
    committed
}
