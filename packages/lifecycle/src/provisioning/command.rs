const SAVE: &[u8] = b"save";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProvisioningCommand<'a> {
    SetSsid(&'a [u8]),
    SetPassword(&'a [u8]),
    Save,
    Empty,
    Ignored,
}

impl ProvisioningCommand<'_> {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SetSsid(_) => "ssid",
            Self::SetPassword(_) => "pwd",
            Self::Save => "save",
            Self::Empty => "empty",
            Self::Ignored => "ignored",
        }
    }
}

/// Interprets one completed line.
///
/// `key=value` splits on the first `=`, keys compare case-insensitively and
/// values are kept verbatim apart from one trailing `\r`. Any line starting
/// with `save`, in any case, commits.
pub fn parse_command(line: &[u8]) -> ProvisioningCommand<'_> {
    if line.is_empty() {
        return ProvisioningCommand::Empty;
    }
    if let Some(split) = line.iter().position(|&byte| byte == b'=') {
        if split > 0 {
            let key = &line[..split];
            let value = strip_trailing_cr(&line[split + 1..]);
            if key.eq_ignore_ascii_case(b"ssid") {
                return ProvisioningCommand::SetSsid(value);
            }
            if key.eq_ignore_ascii_case(b"pwd") {
                return ProvisioningCommand::SetPassword(value);
            }
        }
    }
    if line.len() >= SAVE.len() && line[..SAVE.len()].eq_ignore_ascii_case(SAVE) {
        return ProvisioningCommand::Save;
    }
    ProvisioningCommand::Ignored
}

fn strip_trailing_cr(value: &[u8]) -> &[u8] {
    value.strip_suffix(b"\r").unwrap_or(value)
}
