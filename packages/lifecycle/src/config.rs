use core::time::Duration;

/// Sentinel stored in the record header once credentials have been provisioned.
pub const CREDENTIAL_MAGIC: i32 = 248_726;
/// Bytes reserved per credential field, terminator included.
pub const CREDENTIAL_FIELD_CAPACITY: usize = 40;
pub const CREDENTIAL_FIELD_MAX_CHARS: usize = CREDENTIAL_FIELD_CAPACITY - 1;
pub const CREDENTIAL_HEADER_LEN: usize = 4;
pub const CREDENTIAL_RECORD_LEN: usize = CREDENTIAL_HEADER_LEN + 2 * CREDENTIAL_FIELD_CAPACITY;

pub const PROVISIONING_LINE_MAX: usize = 96;
pub const PROVISIONING_IDLE_TIMEOUT_MS: u32 = 50_000;
pub const PROVISIONING_IDLE_TIMEOUT_MIN_MS: u32 = 5_000;
pub const PROVISIONING_IDLE_TIMEOUT_MAX_MS: u32 = 600_000;

pub const LINK_POLL_INTERVAL_MS: u32 = 500;
pub const LINK_CONNECT_BUDGET_MS: u32 = 10_000;

pub const SLEEP_PERIOD_SECS: u32 = 600;

pub const FAILURE_BLINK_COUNT: u8 = 5;
pub const FAILURE_BLINK_INTERVAL_MS: u32 = 200;

pub const FEED_TEMPERATURE: &str = "temperature";
pub const FEED_HUMIDITY: &str = "humidity";
pub const FEED_VOLTAGE: &str = "voltage";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkPolicy {
    pub poll_interval_ms: u32,
    pub connect_budget_ms: u32,
}

impl LinkPolicy {
    pub const fn defaults() -> Self {
        Self {
            poll_interval_ms: LINK_POLL_INTERVAL_MS,
            connect_budget_ms: LINK_CONNECT_BUDGET_MS,
        }
    }

    pub const fn sanitized(self) -> Self {
        let poll_interval_ms = clamp_u32(self.poll_interval_ms, 50, 5_000);
        let mut connect_budget_ms = clamp_u32(self.connect_budget_ms, 1_000, 120_000);
        if connect_budget_ms < poll_interval_ms {
            connect_budget_ms = poll_interval_ms;
        }
        Self {
            poll_interval_ms,
            connect_budget_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProvisioningPolicy {
    pub idle_timeout_ms: u32,
}

impl ProvisioningPolicy {
    pub const fn defaults() -> Self {
        Self {
            idle_timeout_ms: PROVISIONING_IDLE_TIMEOUT_MS,
        }
    }

    pub const fn sanitized(self) -> Self {
        Self {
            idle_timeout_ms: clamp_u32(
                self.idle_timeout_ms,
                PROVISIONING_IDLE_TIMEOUT_MIN_MS,
                PROVISIONING_IDLE_TIMEOUT_MAX_MS,
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SleepPolicy {
    pub period_secs: u32,
}

impl SleepPolicy {
    pub const fn defaults() -> Self {
        Self {
            period_secs: SLEEP_PERIOD_SECS,
        }
    }

    pub const fn sanitized(self) -> Self {
        Self {
            period_secs: clamp_u32(self.period_secs, 10, 86_400),
        }
    }

    pub const fn period(self) -> Duration {
        Duration::from_secs(self.period_secs as u64)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndicatorPolicy {
    pub failure_blink_count: u8,
    pub failure_blink_interval_ms: u32,
}

impl IndicatorPolicy {
    pub const fn defaults() -> Self {
        Self {
            failure_blink_count: FAILURE_BLINK_COUNT,
            failure_blink_interval_ms: FAILURE_BLINK_INTERVAL_MS,
        }
    }

    pub const fn sanitized(self) -> Self {
        Self {
            failure_blink_count: clamp_u8(self.failure_blink_count, 1, 20),
            failure_blink_interval_ms: clamp_u32(self.failure_blink_interval_ms, 20, 2_000),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecyclePolicy {
    pub link: LinkPolicy,
    pub provisioning: ProvisioningPolicy,
    pub sleep: SleepPolicy,
    pub indicator: IndicatorPolicy,
}

impl LifecyclePolicy {
    pub const fn defaults() -> Self {
        Self {
            link: LinkPolicy::defaults(),
            provisioning: ProvisioningPolicy::defaults(),
            sleep: SleepPolicy::defaults(),
            indicator: IndicatorPolicy::defaults(),
        }
    }

    pub const fn sanitized(self) -> Self {
        Self {
            link: self.link.sanitized(),
            provisioning: self.provisioning.sanitized(),
            sleep: self.sleep.sanitized(),
            indicator: self.indicator.sanitized(),
        }
    }
}

const fn clamp_u32(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

const fn clamp_u8(value: u8, min: u8, max: u8) -> u8 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}
