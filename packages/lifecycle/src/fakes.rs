use core::cell::RefCell;
use core::time::Duration;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;
use embedded_storage::{ReadStorage, Storage};

use crate::connectivity::{LinkDriver, LinkError, LinkStatus};
use crate::cycle::{Board, SensorSource, SupplyMonitor, TelemetrySink};
use crate::indicator::StatusIndicator;
use crate::power::{DeepSleepTransition, LightSleepTransition, SleepDriver};
use crate::provisioning::{ConsoleRead, ProvisioningConsole};

/// Shared, ordered record of side effects across fakes.
#[derive(Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<&'static str>>>);

impl Journal {
    pub(crate) fn note(&self, entry: &'static str) {
        self.0.borrow_mut().push(entry);
    }

    pub(crate) fn entries(&self) -> Vec<&'static str> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self, entry: &str) -> usize {
        self.0.borrow().iter().filter(|seen| **seen == entry).count()
    }
}

pub(crate) const FLASH_LEN: usize = 4096;

#[derive(Debug)]
pub(crate) struct FlashFault;

pub(crate) struct MemoryFlash {
    pub(crate) bytes: Vec<u8>,
    pub(crate) fail_reads: bool,
    pub(crate) fail_writes: bool,
    pub(crate) corrupt_writes: bool,
    pub(crate) writes: usize,
    pub(crate) last_write_len: usize,
}

impl MemoryFlash {
    pub(crate) fn erased() -> Self {
        Self {
            bytes: std::vec![0xFF; FLASH_LEN],
            fail_reads: false,
            fail_writes: false,
            corrupt_writes: false,
            writes: 0,
            last_write_len: 0,
        }
    }

    fn range(&self, offset: u32, len: usize) -> Result<core::ops::Range<usize>, FlashFault> {
        let start = offset as usize;
        let end = start.checked_add(len).ok_or(FlashFault)?;
        if end > self.bytes.len() {
            return Err(FlashFault);
        }
        Ok(start..end)
    }
}

impl ReadStorage for MemoryFlash {
    type Error = FlashFault;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        if self.fail_reads {
            return Err(FlashFault);
        }
        let range = self.range(offset, bytes.len())?;
        bytes.copy_from_slice(&self.bytes[range]);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl Storage for MemoryFlash {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        if self.fail_writes {
            return Err(FlashFault);
        }
        let range = self.range(offset, bytes.len())?;
        let start = range.start;
        self.bytes[range].copy_from_slice(bytes);
        if self.corrupt_writes {
            self.bytes[start] ^= 0x5A;
        }
        self.writes += 1;
        self.last_write_len = bytes.len();
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct VirtualDelay {
    pub(crate) elapsed_ms: u64,
}

impl DelayNs for VirtualDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ms += u64::from(ns / 1_000_000);
    }

    async fn delay_us(&mut self, us: u32) {
        self.elapsed_ms += u64::from(us / 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.elapsed_ms += u64::from(ms);
    }
}

#[derive(Default)]
pub(crate) struct RecordingIndicator {
    pub(crate) on: bool,
    pub(crate) toggles: usize,
    pub(crate) levels: Vec<bool>,
}

impl StatusIndicator for RecordingIndicator {
    fn set(&mut self, on: bool) {
        self.on = on;
        self.levels.push(on);
    }

    fn toggle(&mut self) {
        self.on = !self.on;
        self.toggles += 1;
    }
}

pub(crate) enum ConsoleStep {
    Byte(u8),
    Silence,
    LineError(u32),
}

/// Operator stand-in: replays typed bytes, then stays silent forever.
#[derive(Default)]
pub(crate) struct ScriptedConsole {
    script: VecDeque<ConsoleStep>,
    pub(crate) output: Vec<u8>,
    pub(crate) timeouts: Vec<u32>,
}

impl ScriptedConsole {
    pub(crate) fn typing(text: &[u8]) -> Self {
        Self::default().then_type(text)
    }

    pub(crate) fn then_type(mut self, text: &[u8]) -> Self {
        self.script
            .extend(text.iter().map(|&byte| ConsoleStep::Byte(byte)));
        self
    }

    pub(crate) fn then_silence(mut self) -> Self {
        self.script.push_back(ConsoleStep::Silence);
        self
    }

    pub(crate) fn then_line_error(mut self, waited_ms: u32) -> Self {
        self.script.push_back(ConsoleStep::LineError(waited_ms));
        self
    }

    pub(crate) fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ProvisioningConsole for ScriptedConsole {
    async fn read_byte(&mut self, timeout_ms: u32) -> ConsoleRead {
        match self.script.pop_front() {
            Some(ConsoleStep::Byte(byte)) => ConsoleRead::Byte(byte),
            Some(ConsoleStep::LineError(waited_ms)) => {
                self.timeouts.push(timeout_ms);
                ConsoleRead::LineError {
                    waited_ms: waited_ms.min(timeout_ms),
                }
            }
            Some(ConsoleStep::Silence) | None => {
                self.timeouts.push(timeout_ms);
                ConsoleRead::Idle
            }
        }
    }

    async fn write_all(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
    }
}

pub(crate) struct ScriptedLink {
    connect_after_polls: Option<u32>,
    accepted_ssid: Option<Vec<u8>>,
    polls_since_begin: u32,
    active: bool,
    pub(crate) refuse_radio_off: bool,
    pub(crate) begins: Vec<(Vec<u8>, Vec<u8>)>,
    pub(crate) polls: u32,
    pub(crate) disconnects: u32,
    pub(crate) radio_off_calls: u32,
    journal: Journal,
}

impl ScriptedLink {
    /// Reports `Connected` on the `polls`-th poll after each begin (0 = first).
    pub(crate) fn connecting_after(polls: u32) -> Self {
        Self {
            connect_after_polls: Some(polls),
            accepted_ssid: None,
            polls_since_begin: 0,
            active: false,
            refuse_radio_off: false,
            begins: Vec::new(),
            polls: 0,
            disconnects: 0,
            radio_off_calls: 0,
            journal: Journal::default(),
        }
    }

    pub(crate) fn never_connects() -> Self {
        Self {
            connect_after_polls: None,
            ..Self::connecting_after(0)
        }
    }

    pub(crate) fn accepting_only(mut self, ssid: &[u8]) -> Self {
        self.accepted_ssid = Some(ssid.to_vec());
        self
    }

    pub(crate) fn with_journal(mut self, journal: &Journal) -> Self {
        self.journal = journal.clone();
        self
    }
}

impl LinkDriver for ScriptedLink {
    async fn begin_connection(&mut self, ssid: &[u8], password: &[u8]) -> Result<(), LinkError> {
        self.journal.note("link:begin");
        self.begins.push((ssid.to_vec(), password.to_vec()));
        self.polls_since_begin = 0;
        self.active = true;
        Ok(())
    }

    async fn poll_status(&mut self) -> LinkStatus {
        self.polls += 1;
        if !self.active {
            return LinkStatus::Disconnected;
        }
        let seen = self.polls_since_begin;
        self.polls_since_begin += 1;
        let ssid_ok = match (&self.accepted_ssid, self.begins.last()) {
            (Some(accepted), Some((ssid, _))) => accepted == ssid,
            _ => true,
        };
        match self.connect_after_polls {
            Some(after) if ssid_ok && seen >= after => LinkStatus::Connected,
            _ => LinkStatus::Connecting,
        }
    }

    async fn disconnect(&mut self) {
        self.journal.note("link:disconnect");
        self.disconnects += 1;
        self.active = false;
    }

    async fn set_radio_off(&mut self) -> bool {
        self.journal.note("link:radio-off");
        self.radio_off_calls += 1;
        if self.refuse_radio_off {
            return false;
        }
        self.active = false;
        true
    }
}

#[derive(Default)]
pub(crate) struct RecordingSleep {
    pub(crate) deep: Vec<Duration>,
    pub(crate) light: Vec<Duration>,
    pub(crate) halts: u32,
    journal: Journal,
}

impl RecordingSleep {
    pub(crate) fn with_journal(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            ..Self::default()
        }
    }

    pub(crate) fn transitions(&self) -> usize {
        self.deep.len() + self.light.len()
    }
}

impl SleepDriver for RecordingSleep {
    fn sleep_deep(&mut self, duration: Duration) {
        self.journal.note("sleep:deep");
        self.deep.push(duration);
    }

    fn sleep_light(&mut self, duration: Duration) {
        self.journal.note("sleep:light");
        self.light.push(duration);
    }

    fn halt(&mut self) {
        self.journal.note("halt");
        self.halts += 1;
    }
}

pub(crate) struct FixedSensors {
    pub(crate) temperature: f32,
    pub(crate) humidity: f32,
}

impl SensorSource for FixedSensors {
    async fn read_temperature(&mut self) -> f32 {
        self.temperature
    }

    async fn read_humidity(&mut self) -> f32 {
        self.humidity
    }
}

pub(crate) struct FixedSupply(pub(crate) f32);

impl SupplyMonitor for FixedSupply {
    async fn read_supply_voltage(&mut self) -> f32 {
        self.0
    }
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) uploads: Vec<(&'static str, f32)>,
    pub(crate) failing: Vec<&'static str>,
    pub(crate) attempts: usize,
}

impl TelemetrySink for RecordingSink {
    async fn upload_metric(&mut self, feed: &str, value: f32) -> bool {
        self.attempts += 1;
        let Some(known) = ["temperature", "humidity", "voltage"]
            .into_iter()
            .find(|known| *known == feed)
        else {
            return false;
        };
        if self.failing.contains(&known) {
            return false;
        }
        self.uploads.push((known, value));
        true
    }

    fn status_description(&self) -> &str {
        "fake sink connected"
    }
}

pub(crate) struct DeepBoard;

impl Board for DeepBoard {
    type Link = ScriptedLink;
    type Storage = MemoryFlash;
    type Console = ScriptedConsole;
    type Indicator = RecordingIndicator;
    type Delay = VirtualDelay;
    type Sensors = FixedSensors;
    type Supply = FixedSupply;
    type Sink = RecordingSink;
    type Transition = DeepSleepTransition<RecordingSleep>;
}

pub(crate) struct LightBoard;

impl Board for LightBoard {
    type Link = ScriptedLink;
    type Storage = MemoryFlash;
    type Console = ScriptedConsole;
    type Indicator = RecordingIndicator;
    type Delay = VirtualDelay;
    type Sensors = FixedSensors;
    type Supply = FixedSupply;
    type Sink = RecordingSink;
    type Transition = LightSleepTransition<RecordingSleep>;
}
