#![no_std]
#![allow(async_fn_in_trait)]

#[cfg(test)]
extern crate std;

pub mod config;
pub mod connectivity;
pub mod credentials;
pub mod cycle;
pub mod indicator;
pub mod power;
pub mod provisioning;

#[cfg(test)]
mod fakes;

pub use config::LifecyclePolicy;
pub use connectivity::{ConnectOutcome, ConnectivityManager, LinkDriver, LinkStatus};
pub use credentials::{CredentialRecord, CredentialStore, StoreError};
pub use cycle::{
    Board, CycleReport, NodeContext, NodeParts, NoSupplyMonitor, PairedSample, SensorSource,
    SupplyMonitor, TelemetrySink,
};
pub use indicator::StatusIndicator;
pub use power::{
    DeepSleepTransition, LightSleepTransition, LowPowerTransition, PowerController, PowerDecision,
    PowerError, SleepDriver, SleepMode,
};
pub use provisioning::{ConsoleRead, ProvisioningConsole, ProvisioningSession};
