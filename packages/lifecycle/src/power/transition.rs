use core::time::Duration;

use super::{PowerError, SleepDriver, SleepMode};
use crate::connectivity::{ConnectivityManager, LinkDriver};

/// One way of leaving a wake cycle. Implementations are picked per build.
pub trait LowPowerTransition {
    const MODE: SleepMode;

    async fn enter<L: LinkDriver>(
        &mut self,
        duration: Duration,
        connectivity: &mut ConnectivityManager<L>,
    ) -> Result<(), PowerError>;

    async fn enter_dormant<L: LinkDriver>(
        &mut self,
        duration: Duration,
        connectivity: &mut ConnectivityManager<L>,
    );
}

/// Drops the link and sleeps with RAM discarded; wake is a cold boot.
pub struct DeepSleepTransition<Z> {
    driver: Z,
}

impl<Z: SleepDriver> DeepSleepTransition<Z> {
    pub fn new(driver: Z) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &Z {
        &self.driver
    }
}

impl<Z: SleepDriver> LowPowerTransition for DeepSleepTransition<Z> {
    const MODE: SleepMode = SleepMode::DeepSleep;

    async fn enter<L: LinkDriver>(
        &mut self,
        duration: Duration,
        connectivity: &mut ConnectivityManager<L>,
    ) -> Result<(), PowerError> {
        connectivity.disconnect().await;
        self.driver.sleep_deep(duration);
        Ok(())
    }

    async fn enter_dormant<L: LinkDriver>(
        &mut self,
        duration: Duration,
        connectivity: &mut ConnectivityManager<L>,
    ) {
        connectivity.disconnect().await;
        self.driver.sleep_deep(duration);
    }
}

/// Powers the radio down and waits with RAM retained. A refused radio
/// shutdown halts the device.
pub struct LightSleepTransition<Z> {
    driver: Z,
}

impl<Z: SleepDriver> LightSleepTransition<Z> {
    pub fn new(driver: Z) -> Self {
        Self { driver }
    }

    pub fn driver(&self) -> &Z {
        &self.driver
    }
}

impl<Z: SleepDriver> LowPowerTransition for LightSleepTransition<Z> {
    const MODE: SleepMode = SleepMode::LightSleep;

    async fn enter<L: LinkDriver>(
        &mut self,
        duration: Duration,
        connectivity: &mut ConnectivityManager<L>,
    ) -> Result<(), PowerError> {
        if !connectivity.shutdown_radio().await {
            log::error!("power: {}, halting", PowerError::RadioRejected.as_str());
            self.driver.halt();
            return Err(PowerError::RadioRejected);
        }
        self.driver.sleep_light(duration);
        connectivity.mark_needs_reconnect();
        log::info!("power: resumed from light sleep");
        Ok(())
    }

    async fn enter_dormant<L: LinkDriver>(
        &mut self,
        duration: Duration,
        connectivity: &mut ConnectivityManager<L>,
    ) {
        connectivity.disconnect().await;
        self.driver.sleep_deep(duration);
        connectivity.mark_needs_reconnect();
    }
}
