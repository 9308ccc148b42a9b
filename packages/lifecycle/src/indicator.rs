use embedded_hal_async::delay::DelayNs;

use crate::config::IndicatorPolicy;

/// A single visible status output, typically an LED.
pub trait StatusIndicator {
    fn set(&mut self, on: bool);
    fn toggle(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indication {
    None,
    MomentaryToggle,
    FailureBurst,
}

impl Indication {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::MomentaryToggle => "toggle",
            Self::FailureBurst => "burst",
        }
    }
}

pub async fn show<I, D>(
    indicator: &mut I,
    delay: &mut D,
    policy: IndicatorPolicy,
    indication: Indication,
) where
    I: StatusIndicator,
    D: DelayNs,
{
    match indication {
        Indication::None => {}
        Indication::MomentaryToggle => {
            indicator.toggle();
            delay.delay_ms(policy.failure_blink_interval_ms).await;
            indicator.toggle();
        }
        Indication::FailureBurst => {
            for _ in 0..policy.failure_blink_count {
                indicator.toggle();
                delay.delay_ms(policy.failure_blink_interval_ms).await;
            }
        }
    }
}
