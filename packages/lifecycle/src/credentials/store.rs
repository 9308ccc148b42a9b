use embedded_storage::{ReadStorage, Storage};

use super::CredentialRecord;
use crate::config::CREDENTIAL_RECORD_LEN;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreError {
    CommitFailed,
}

impl StoreError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CommitFailed => "commit failed",
        }
    }
}

/// Credential record kept at a fixed offset of a non-volatile medium.
pub struct CredentialStore<S> {
    storage: S,
    offset: u32,
}

impl<S: Storage> CredentialStore<S> {
    pub fn new(storage: S, offset: u32) -> Self {
        Self { storage, offset }
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }

    /// Reads the stored record. Unreadable or never-written storage yields a
    /// zeroed record; callers tell the cases apart only through the header.
    pub fn load(&mut self) -> CredentialRecord {
        match self.load_record() {
            Some(raw) => CredentialRecord::from_record(&raw),
            None => CredentialRecord::unprovisioned(),
        }
    }

    /// Writes the whole record in one call and reads it back.
    ///
    /// An identical stored record is left untouched.
    pub fn save(&mut self, record: &CredentialRecord) -> Result<(), StoreError> {
        let raw = record.record_bytes();
        if self.load_record() == Some(raw) {
            return Ok(());
        }
        self.storage
            .write(self.offset, &raw)
            .map_err(|_| StoreError::CommitFailed)?;
        match self.load_record() {
            Some(written) if written == raw => Ok(()),
            _ => Err(StoreError::CommitFailed),
        }
    }

    fn load_record(&mut self) -> Option<[u8; CREDENTIAL_RECORD_LEN]> {
        let mut raw = [0u8; CREDENTIAL_RECORD_LEN];
        self.storage.read(self.offset, &mut raw).ok()?;
        Some(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CREDENTIAL_MAGIC;
    use crate::fakes::MemoryFlash;

    #[test]
    fn cold_start_loads_unprovisioned() {
        let mut store = CredentialStore::new(MemoryFlash::erased(), 0);
        let record = store.load();
        assert!(!record.is_valid());
        assert_eq!(record, CredentialRecord::unprovisioned());
    }

    #[test]
    fn read_failure_loads_unprovisioned() {
        let mut flash = MemoryFlash::erased();
        flash.fail_reads = true;
        let mut store = CredentialStore::new(flash, 0);
        assert_eq!(store.load(), CredentialRecord::unprovisioned());
    }

    #[test]
    fn saved_record_loads_back() {
        let mut store = CredentialStore::new(MemoryFlash::erased(), 128);
        let record = CredentialRecord::provisioned(b"X", b"Y");
        assert!(store.save(&record).is_ok());
        let loaded = store.load();
        assert_eq!(loaded.header(), CREDENTIAL_MAGIC);
        assert_eq!(loaded.ssid(), b"X");
        assert_eq!(loaded.password(), b"Y");
        assert_eq!(store.storage().writes, 1);
        assert_eq!(store.storage().last_write_len, CREDENTIAL_RECORD_LEN);
    }

    #[test]
    fn rejected_write_reports_commit_failed_and_keeps_old_record() {
        let mut store = CredentialStore::new(MemoryFlash::erased(), 0);
        let first = CredentialRecord::provisioned(b"old", b"old-pw");
        assert!(store.save(&first).is_ok());

        let mut flash = store.into_inner();
        flash.fail_writes = true;
        let mut store = CredentialStore::new(flash, 0);
        let result = store.save(&CredentialRecord::provisioned(b"new", b"new-pw"));
        assert!(matches!(result, Err(StoreError::CommitFailed)));
        assert_eq!(store.load(), first);
    }

    #[test]
    fn unverified_write_reports_commit_failed() {
        let mut flash = MemoryFlash::erased();
        flash.corrupt_writes = true;
        let mut store = CredentialStore::new(flash, 0);
        let result = store.save(&CredentialRecord::provisioned(b"a", b"b"));
        assert!(matches!(result, Err(StoreError::CommitFailed)));
    }

    #[test]
    fn repeated_save_is_idempotent() {
        let mut store = CredentialStore::new(MemoryFlash::erased(), 0);
        let record = CredentialRecord::provisioned(b"net", b"pw");
        assert!(store.save(&record).is_ok());
        let first = store.load().record_bytes();
        assert!(store.save(&record).is_ok());
        assert_eq!(store.load().record_bytes(), first);
        assert_eq!(store.storage().writes, 1);
    }
}
