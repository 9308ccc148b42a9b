use crate::config::{
    CREDENTIAL_FIELD_CAPACITY, CREDENTIAL_FIELD_MAX_CHARS, CREDENTIAL_HEADER_LEN,
    CREDENTIAL_MAGIC, CREDENTIAL_RECORD_LEN,
};

const SSID_OFFSET: usize = CREDENTIAL_HEADER_LEN;
const PASSWORD_OFFSET: usize = SSID_OFFSET + CREDENTIAL_FIELD_CAPACITY;

/// WiFi credentials as persisted: a little-endian `i32` header followed by two
/// NUL-terminated 40-byte fields.
///
/// Only a header equal to [`CREDENTIAL_MAGIC`] marks the record as provisioned;
/// field contents are never consulted for validity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialRecord {
    header: i32,
    ssid: [u8; CREDENTIAL_FIELD_CAPACITY],
    password: [u8; CREDENTIAL_FIELD_CAPACITY],
}

impl CredentialRecord {
    pub const fn unprovisioned() -> Self {
        Self {
            header: 0,
            ssid: [0; CREDENTIAL_FIELD_CAPACITY],
            password: [0; CREDENTIAL_FIELD_CAPACITY],
        }
    }

    pub fn provisioned(ssid: &[u8], password: &[u8]) -> Self {
        let mut record = Self::unprovisioned();
        record.set_ssid(ssid);
        record.set_password(password);
        record
    }

    pub const fn header(&self) -> i32 {
        self.header
    }

    pub const fn is_valid(&self) -> bool {
        self.header == CREDENTIAL_MAGIC
    }

    pub fn ssid(&self) -> &[u8] {
        field_value(&self.ssid)
    }

    pub fn password(&self) -> &[u8] {
        field_value(&self.password)
    }

    /// Stores at most 39 bytes of `value` and marks the record provisioned.
    pub fn set_ssid(&mut self, value: &[u8]) {
        write_field(&mut self.ssid, value);
        self.header = CREDENTIAL_MAGIC;
    }

    pub fn set_password(&mut self, value: &[u8]) {
        write_field(&mut self.password, value);
        self.header = CREDENTIAL_MAGIC;
    }

    pub fn record_bytes(&self) -> [u8; CREDENTIAL_RECORD_LEN] {
        let mut record = [0u8; CREDENTIAL_RECORD_LEN];
        record[..SSID_OFFSET].copy_from_slice(&self.header.to_le_bytes());
        record[SSID_OFFSET..PASSWORD_OFFSET].copy_from_slice(&self.ssid);
        record[PASSWORD_OFFSET..].copy_from_slice(&self.password);
        record
    }

    /// Decodes a raw record. Erased flash (all `0xFF`) decodes as unprovisioned.
    pub fn from_record(record: &[u8; CREDENTIAL_RECORD_LEN]) -> Self {
        if record.iter().all(|&byte| byte == 0xFF) {
            return Self::unprovisioned();
        }
        let mut decoded = Self::unprovisioned();
        decoded.header = i32::from_le_bytes([record[0], record[1], record[2], record[3]]);
        decoded
            .ssid
            .copy_from_slice(&record[SSID_OFFSET..PASSWORD_OFFSET]);
        decoded.password.copy_from_slice(&record[PASSWORD_OFFSET..]);
        decoded
    }
}

impl Default for CredentialRecord {
    fn default() -> Self {
        Self::unprovisioned()
    }
}

fn write_field(field: &mut [u8; CREDENTIAL_FIELD_CAPACITY], value: &[u8]) {
    let len = value.len().min(CREDENTIAL_FIELD_MAX_CHARS);
    field.fill(0);
    field[..len].copy_from_slice(&value[..len]);
}

// The last byte is always treated as the terminator, even for foreign records.
fn field_value(field: &[u8; CREDENTIAL_FIELD_CAPACITY]) -> &[u8] {
    let bounded = &field[..CREDENTIAL_FIELD_MAX_CHARS];
    let len = bounded
        .iter()
        .position(|&byte| byte == 0)
        .unwrap_or(bounded.len());
    &bounded[..len]
}
