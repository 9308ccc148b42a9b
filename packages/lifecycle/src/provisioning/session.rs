use embedded_storage::Storage;
use heapless::Vec;

use super::command::{parse_command, ProvisioningCommand};
use super::line::{LineEditor, LineEvent};
use crate::config::{ProvisioningPolicy, PROVISIONING_LINE_MAX};
use crate::credentials::{CredentialRecord, CredentialStore};

pub const REPLY_CAPACITY: usize = 160;
pub type Reply = Vec<u8, REPLY_CAPACITY>;

const BANNER: &[u8] = b"\r\n==Provisioning Mode==\r\n\
Commands (one per line):\r\n \
ssid=<WIFI SSID>\r\n \
pwd=<WIFI PASSWORD>\r\n \
save   Save WiFi configuration.\r\n";

/// Result of one console read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleRead {
    Byte(u8),
    /// The whole window elapsed without input.
    Idle,
    /// The line reported an error (framing, overflow, glitch) after `waited_ms`.
    LineError { waited_ms: u32 },
}

/// Byte-oriented operator channel used while provisioning.
pub trait ProvisioningConsole {
    /// Waits up to `timeout_ms` for the next byte.
    async fn read_byte(&mut self, timeout_ms: u32) -> ConsoleRead;
    async fn write_all(&mut self, bytes: &[u8]);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionInput {
    Byte(u8),
    IdleTimeout,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    AwaitingLine,
    AccumulatingLine,
    Done,
    Aborted,
}

impl SessionPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AwaitingLine => "awaiting",
            Self::AccumulatingLine => "accumulating",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }
}

/// Interactive credential editor. Edits stay in `pending` until `save`
/// commits them to the store.
pub struct ProvisioningSession<'s, S> {
    store: &'s mut CredentialStore<S>,
    pending: CredentialRecord,
    editor: LineEditor,
    phase: SessionPhase,
}

impl<'s, S: Storage> ProvisioningSession<'s, S> {
    pub fn new(store: &'s mut CredentialStore<S>, pending: CredentialRecord) -> Self {
        Self {
            store,
            pending,
            editor: LineEditor::new(),
            phase: SessionPhase::AwaitingLine,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn pending(&self) -> &CredentialRecord {
        &self.pending
    }

    /// Consumes one input event and appends everything owed to the operator to
    /// `reply`. Finished sessions ignore further input.
    pub fn handle(&mut self, input: SessionInput, reply: &mut Reply) -> SessionPhase {
        if self.phase.is_finished() {
            return self.phase;
        }
        let byte = match input {
            SessionInput::Byte(byte) => byte,
            SessionInput::IdleTimeout => {
                log::info!("provisioning: idle timeout, leaving");
                self.editor.clear();
                self.phase = SessionPhase::Aborted;
                return self.phase;
            }
        };

        push(reply, &[byte]);
        let mut line = [0u8; PROVISIONING_LINE_MAX];
        let line_len = match self.editor.push_byte(byte) {
            LineEvent::Pending => {
                self.phase = if self.editor.is_idle() {
                    SessionPhase::AwaitingLine
                } else {
                    SessionPhase::AccumulatingLine
                };
                return self.phase;
            }
            LineEvent::Overflow => {
                log::warn!("provisioning: line exceeds {} bytes", PROVISIONING_LINE_MAX);
                push(reply, b"\r\n");
                push_line(reply, b"ERROR line too long");
                self.phase = SessionPhase::AccumulatingLine;
                return self.phase;
            }
            LineEvent::Complete(bytes) => {
                line[..bytes.len()].copy_from_slice(bytes);
                bytes.len()
            }
        };

        self.phase = self.dispatch(&line[..line_len], reply);
        self.phase
    }

    /// Prints the banner and serves the operator until the session finishes.
    /// Returns whether a record was committed.
    pub async fn run<C>(mut self, console: &mut C, policy: ProvisioningPolicy) -> bool
    where
        C: ProvisioningConsole,
    {
        console.write_all(BANNER).await;
        let mut window_ms = policy.idle_timeout_ms;
        loop {
            let input = match console.read_byte(window_ms).await {
                ConsoleRead::Byte(byte) => {
                    window_ms = policy.idle_timeout_ms;
                    SessionInput::Byte(byte)
                }
                ConsoleRead::Idle => SessionInput::IdleTimeout,
                // Noise does not reset the idle window.
                ConsoleRead::LineError { waited_ms } => {
                    window_ms = window_ms.saturating_sub(waited_ms);
                    log::warn!("provisioning: serial line error, idle_left_ms={}", window_ms);
                    if window_ms > 0 {
                        continue;
                    }
                    SessionInput::IdleTimeout
                }
            };
            let mut reply = Reply::new();
            let phase = self.handle(input, &mut reply);
            if !reply.is_empty() {
                console.write_all(&reply).await;
            }
            match phase {
                SessionPhase::Done => return true,
                SessionPhase::Aborted => return false,
                SessionPhase::AwaitingLine | SessionPhase::AccumulatingLine => {}
            }
        }
    }

    fn dispatch(&mut self, line: &[u8], reply: &mut Reply) -> SessionPhase {
        let command = parse_command(line);
        log::debug!("provisioning: command={}", command.as_str());
        match command {
            ProvisioningCommand::Empty => {
                log::info!("provisioning: empty line, leaving");
                SessionPhase::Aborted
            }
            ProvisioningCommand::SetSsid(value) => {
                self.pending.set_ssid(value);
                push_line(reply, b"OK");
                SessionPhase::AwaitingLine
            }
            ProvisioningCommand::SetPassword(value) => {
                self.pending.set_password(value);
                push_line(reply, b"OK");
                SessionPhase::AwaitingLine
            }
            ProvisioningCommand::Save => match self.store.save(&self.pending) {
                Ok(()) => {
                    log::info!(
                        "provisioning: credentials saved ssid={}",
                        printable(self.pending.ssid())
                    );
                    push_line(reply, b"OK");
                    push(reply, b"ssid=");
                    push_line(reply, self.pending.ssid());
                    push(reply, b"pwd=");
                    push_line(reply, self.pending.password());
                    SessionPhase::Done
                }
                Err(err) => {
                    log::error!("provisioning: save failed err={}", err.as_str());
                    push_line(reply, b"ERROR");
                    SessionPhase::AwaitingLine
                }
            },
            ProvisioningCommand::Ignored => SessionPhase::AwaitingLine,
        }
    }
}

pub(crate) fn printable(bytes: &[u8]) -> &str {
    core::str::from_utf8(bytes).unwrap_or("<non-utf8>")
}

fn push(reply: &mut Reply, bytes: &[u8]) {
    let _ = reply.extend_from_slice(bytes);
}

fn push_line(reply: &mut Reply, bytes: &[u8]) {
    push(reply, bytes);
    push(reply, b"\r\n");
}
