mod record;
mod store;

pub use record::CredentialRecord;
pub use store::{CredentialStore, StoreError};
