mod report;
mod sources;


use embedded_hal_async::delay::DelayNs;
use embedded_storage::Storage;
use heapless::Vec;

pub use report::{CycleOutcome, CycleReport, MetricOutcome, MetricReport, MAX_METRICS};
pub use sources::{NoSupplyMonitor, PairedSample, SensorSource, SupplyMonitor, TelemetrySink};

use crate::config::{
    IndicatorPolicy, LifecyclePolicy, FEED_HUMIDITY, FEED_TEMPERATURE, FEED_VOLTAGE,
};
use crate::connectivity::{ConnectOutcome, ConnectivityManager, LinkDriver};
use crate::credentials::CredentialStore;
use crate::indicator::{self, StatusIndicator};
use crate::power::{LowPowerTransition, PowerController, PowerError};
use crate::provisioning::ProvisioningConsole;

/// Binds the collaborator types of one hardware target.
pub trait Board {
    type Link: LinkDriver;
    type Storage: Storage;
    type Console: ProvisioningConsole;
    type Indicator: StatusIndicator;
    type Delay: DelayNs;
    type Sensors: SensorSource;
    type Supply: SupplyMonitor;
    type Sink: TelemetrySink;
    type Transition: LowPowerTransition;
}

pub struct NodeParts<B: Board> {
    pub link: B::Link,
    pub store: CredentialStore<B::Storage>,
    pub console: B::Console,
    pub indicator: B::Indicator,
    pub delay: B::Delay,
    pub sensors: B::Sensors,
    pub supply: Option<B::Supply>,
    pub sink: B::Sink,
    pub transition: B::Transition,
}

/// Everything one wake cycle touches, owned in one place.
pub struct NodeContext<B: Board> {
    pub connectivity: ConnectivityManager<B::Link>,
    pub power: PowerController<B::Transition>,
    pub store: CredentialStore<B::Storage>,
    pub console: B::Console,
    pub indicator: B::Indicator,
    pub delay: B::Delay,
    pub sensors: B::Sensors,
    pub supply: Option<B::Supply>,
    pub sink: B::Sink,
    indicator_policy: IndicatorPolicy,
}

impl<B: Board> NodeContext<B> {
    pub fn new(parts: NodeParts<B>, policy: LifecyclePolicy) -> Self {
        let policy = policy.sanitized();
        Self {
            connectivity: ConnectivityManager::new(parts.link, policy.link, policy.provisioning),
            power: PowerController::new(parts.transition, policy.sleep),
            store: parts.store,
            console: parts.console,
            indicator: parts.indicator,
            delay: parts.delay,
            sensors: parts.sensors,
            supply: parts.supply,
            sink: parts.sink,
            indicator_policy: policy.indicator,
        }
    }

    /// One wake cycle: connect, publish, indicate, then exactly one power
    /// transition.
    pub async fn run_once(&mut self) -> CycleReport {
        let connected = self
            .connectivity
            .ensure_connected(
                &mut self.store,
                &mut self.console,
                &mut self.indicator,
                &mut self.delay,
            )
            .await;
        if connected == ConnectOutcome::Dormant {
            let decision = self.power.dormant_decision();
            self.power.enter_dormant(&mut self.connectivity).await;
            return CycleReport {
                metrics: Vec::new(),
                outcome: CycleOutcome::Dormant,
                indication: CycleOutcome::Dormant.indication(),
                decision,
                power: Ok(()),
            };
        }
        log::info!("cycle: {}", self.sink.status_description());

        let mut metrics: Vec<MetricReport, MAX_METRICS> = Vec::new();
        let temperature = self.sensors.read_temperature().await;
        let _ = metrics.push(self.publish(FEED_TEMPERATURE, temperature).await);
        let humidity = self.sensors.read_humidity().await;
        let _ = metrics.push(self.publish(FEED_HUMIDITY, humidity).await);
        let voltage = match self.supply.as_mut() {
            Some(supply) => Some(supply.read_supply_voltage().await),
            None => None,
        };
        if let Some(voltage) = voltage {
            let _ = metrics.push(self.publish(FEED_VOLTAGE, voltage).await);
        }

        let outcome = CycleOutcome::from_metrics(&metrics);
        let indication = outcome.indication();
        log::info!(
            "cycle: outcome={} indication={}",
            outcome.as_str(),
            indication.as_str()
        );
        indicator::show(
            &mut self.indicator,
            &mut self.delay,
            self.indicator_policy,
            indication,
        )
        .await;

        let decision = self.power.decide();
        let power = self.power.enter(decision, &mut self.connectivity).await;
        CycleReport {
            metrics,
            outcome,
            indication,
            decision,
            power,
        }
    }

    /// Resident loop for builds that keep RAM across sleeps. Only a fatal power
    /// error ends it.
    pub async fn run_resident(&mut self) -> PowerError {
        loop {
            if let Err(err) = self.run_once().await.power {
                return err;
            }
        }
    }

    async fn publish(&mut self, feed: &'static str, value: f32) -> MetricReport {
        let outcome = if value.is_nan() {
            log::warn!("cycle: error reading {}", feed);
            MetricOutcome::ReadFailed
        } else if self.sink.upload_metric(feed, value).await {
            log::info!("cycle: {}={}", feed, value);
            MetricOutcome::Uploaded
        } else {
            log::warn!("cycle: upload of {} failed", feed);
            MetricOutcome::UploadFailed
        };
        MetricReport { feed, outcome }
    }
}
