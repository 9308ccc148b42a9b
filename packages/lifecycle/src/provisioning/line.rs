use crate::config::PROVISIONING_LINE_MAX;

const BACKSPACE: u8 = 0x08;

pub enum LineEvent<'a> {
    Pending,
    Complete(&'a [u8]),
    Overflow,
}

/// Accumulates operator input one byte at a time.
///
/// `\n` completes a line (possibly empty), `\r` is dropped and backspace removes
/// the last accumulated byte. A line that outgrows the buffer is reported once
/// and discarded up to its terminator.
pub struct LineEditor {
    line_buf: [u8; PROVISIONING_LINE_MAX],
    line_len: usize,
    overflowed: bool,
}

impl LineEditor {
    pub const fn new() -> Self {
        Self {
            line_buf: [0; PROVISIONING_LINE_MAX],
            line_len: 0,
            overflowed: false,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.line_len == 0 && !self.overflowed
    }

    pub fn clear(&mut self) {
        self.line_len = 0;
        self.overflowed = false;
    }

    pub fn push_byte(&mut self, byte: u8) -> LineEvent<'_> {
        match byte {
            b'\n' => {
                if self.overflowed {
                    self.overflowed = false;
                    return LineEvent::Pending;
                }
                let complete_len = self.line_len;
                self.line_len = 0;
                LineEvent::Complete(&self.line_buf[..complete_len])
            }
            b'\r' => LineEvent::Pending,
            BACKSPACE => {
                if !self.overflowed {
                    self.line_len = self.line_len.saturating_sub(1);
                }
                LineEvent::Pending
            }
            _ if self.overflowed => LineEvent::Pending,
            _ if self.line_len < self.line_buf.len() => {
                self.line_buf[self.line_len] = byte;
                self.line_len += 1;
                LineEvent::Pending
            }
            _ => {
                self.line_len = 0;
                self.overflowed = true;
                LineEvent::Overflow
            }
        }
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}
