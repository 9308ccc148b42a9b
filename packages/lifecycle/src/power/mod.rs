mod transition;


use core::time::Duration;

pub use transition::{DeepSleepTransition, LightSleepTransition, LowPowerTransition};

use crate::config::SleepPolicy;
use crate::connectivity::{ConnectivityManager, LinkDriver};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SleepMode {
    DeepSleep,
    LightSleep,
}

impl SleepMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeepSleep => "deep",
            Self::LightSleep => "light",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PowerDecision {
    pub mode: SleepMode,
    pub duration: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerError {
    RadioRejected,
}

impl PowerError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RadioRejected => "radio shutdown rejected",
        }
    }
}

/// Hardware sleep entry points.
///
/// On a device `sleep_deep` and `halt` do not return; `sleep_light` returns on
/// wake with memory intact.
pub trait SleepDriver {
    fn sleep_deep(&mut self, duration: Duration);
    fn sleep_light(&mut self, duration: Duration);
    fn halt(&mut self);
}

/// Picks and enacts the low-power state that closes every wake cycle.
pub struct PowerController<T> {
    transition: T,
    policy: SleepPolicy,
}

impl<T: LowPowerTransition> PowerController<T> {
    pub fn new(transition: T, policy: SleepPolicy) -> Self {
        Self { transition, policy }
    }

    pub fn transition(&self) -> &T {
        &self.transition
    }

    /// The mode is fixed per build; only the period comes from policy.
    pub fn decide(&self) -> PowerDecision {
        PowerDecision {
            mode: T::MODE,
            duration: self.policy.period(),
        }
    }

    pub fn dormant_decision(&self) -> PowerDecision {
        PowerDecision {
            mode: SleepMode::DeepSleep,
            duration: self.policy.period(),
        }
    }

    pub async fn enter<L: LinkDriver>(
        &mut self,
        decision: PowerDecision,
        connectivity: &mut ConnectivityManager<L>,
    ) -> Result<(), PowerError> {
        log::info!(
            "power: entering {} sleep for {} s",
            decision.mode.as_str(),
            decision.duration.as_secs()
        );
        self.transition.enter(decision.duration, connectivity).await
    }

    /// Lowest-power state after an abandoned provisioning session.
    pub async fn enter_dormant<L: LinkDriver>(
        &mut self,
        connectivity: &mut ConnectivityManager<L>,
    ) {
        let decision = self.dormant_decision();
        log::info!(
            "power: dormant, deep sleep for {} s",
            decision.duration.as_secs()
        );
        self.transition
            .enter_dormant(decision.duration, connectivity)
            .await;
    }
}
