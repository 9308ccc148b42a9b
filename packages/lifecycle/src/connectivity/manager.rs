use embedded_hal_async::delay::DelayNs;
use embedded_storage::Storage;

use super::engine::ConnectivityEngine;
use super::types::{
    ConnectOutcome, ConnectivityDirective, ConnectivityEvent, ConnectivityPhase,
    ConnectivityState, LinkError, LinkStatus,
};
use crate::config::{LinkPolicy, ProvisioningPolicy};
use crate::credentials::CredentialStore;
use crate::indicator::StatusIndicator;
use crate::provisioning::{printable, run_provisioning, ProvisioningConsole};

/// Radio-facing half of the link. Implementations must tolerate
/// `disconnect` and `begin_connection` in any link state.
pub trait LinkDriver {
    async fn begin_connection(&mut self, ssid: &[u8], password: &[u8]) -> Result<(), LinkError>;
    async fn poll_status(&mut self) -> LinkStatus;
    async fn disconnect(&mut self);
    /// Powers the radio down. `false` means the driver refused.
    async fn set_radio_off(&mut self) -> bool;
}

/// Sole owner of the radio and of [`ConnectivityState`].
pub struct ConnectivityManager<L> {
    link: L,
    engine: ConnectivityEngine,
    link_policy: LinkPolicy,
    provisioning_policy: ProvisioningPolicy,
}

impl<L: LinkDriver> ConnectivityManager<L> {
    pub fn new(link: L, link_policy: LinkPolicy, provisioning_policy: ProvisioningPolicy) -> Self {
        Self {
            link,
            engine: ConnectivityEngine::new(link_policy),
            link_policy,
            provisioning_policy,
        }
    }

    pub fn state(&self) -> ConnectivityState {
        self.engine.state()
    }

    pub fn phase(&self) -> ConnectivityPhase {
        self.engine.phase()
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Brings the link up with stored credentials, provisioning first when none
    /// are stored and again whenever an attempt runs out of budget.
    ///
    /// Returns [`ConnectOutcome::Dormant`] once the operator abandons a
    /// provisioning session; the caller is expected to power down.
    pub async fn ensure_connected<S, C, I, D>(
        &mut self,
        store: &mut CredentialStore<S>,
        console: &mut C,
        indicator: &mut I,
        delay: &mut D,
    ) -> ConnectOutcome
    where
        S: Storage,
        C: ProvisioningConsole,
        I: StatusIndicator,
        D: DelayNs,
    {
        match self.engine.phase() {
            ConnectivityPhase::Idle => {}
            ConnectivityPhase::Connected => {
                let status = self.link.poll_status().await;
                let step = self.engine.apply(ConnectivityEvent::Polled {
                    status,
                    elapsed_ms: 0,
                });
                if step.directive == ConnectivityDirective::Proceed {
                    return ConnectOutcome::Connected;
                }
                log::warn!("connectivity: link lost status={}", status.as_str());
            }
            _ => {
                self.engine.apply(ConnectivityEvent::Reset);
            }
        }

        let mut record = store.load();
        let mut directive = self
            .engine
            .apply(ConnectivityEvent::Begin {
                provisioned: record.is_valid(),
            })
            .directive;

        loop {
            directive = match directive {
                ConnectivityDirective::Provision => {
                    if !record.is_valid() {
                        log::info!("connectivity: no stored credentials");
                    }
                    let committed = run_provisioning(
                        store,
                        console,
                        indicator,
                        record,
                        self.provisioning_policy,
                    )
                    .await;
                    record = store.load();
                    self.engine
                        .apply(ConnectivityEvent::ProvisioningFinished {
                            committed,
                            provisioned: record.is_valid(),
                        })
                        .directive
                }
                ConnectivityDirective::BeginAttempt => {
                    log::info!("connectivity: joining ssid={}", printable(record.ssid()));
                    if let Err(err) = self
                        .link
                        .begin_connection(record.ssid(), record.password())
                        .await
                    {
                        log::warn!("connectivity: begin failed err={}", err.as_str());
                    }
                    let status = self.link.poll_status().await;
                    self.engine
                        .apply(ConnectivityEvent::Polled {
                            status,
                            elapsed_ms: 0,
                        })
                        .directive
                }
                ConnectivityDirective::KeepPolling => {
                    delay.delay_ms(self.link_policy.poll_interval_ms).await;
                    let status = self.link.poll_status().await;
                    let step = self.engine.apply(ConnectivityEvent::Polled {
                        status,
                        elapsed_ms: self.link_policy.poll_interval_ms,
                    });
                    log::debug!(
                        "connectivity: poll status={} budget_ms={}",
                        status.as_str(),
                        self.engine.state().retry_budget_ms
                    );
                    if step.directive == ConnectivityDirective::Provision {
                        log::warn!(
                            "connectivity: no link within {} ms",
                            self.link_policy.connect_budget_ms
                        );
                        self.link.disconnect().await;
                    }
                    step.directive
                }
                ConnectivityDirective::Proceed => {
                    log::info!("connectivity: connected");
                    return ConnectOutcome::Connected;
                }
                ConnectivityDirective::EnterDormant => {
                    log::warn!("connectivity: provisioning abandoned");
                    return ConnectOutcome::Dormant;
                }
                ConnectivityDirective::Hold => {
                    log::error!(
                        "connectivity: stalled in phase={}",
                        self.engine.phase().as_str()
                    );
                    self.engine.apply(ConnectivityEvent::Reset);
                    self.engine
                        .apply(ConnectivityEvent::Begin {
                            provisioned: record.is_valid(),
                        })
                        .directive
                }
            };
        }
    }

    pub async fn disconnect(&mut self) {
        self.link.disconnect().await;
        self.engine.apply(ConnectivityEvent::LinkReleased);
    }

    /// Turns the radio off. The link counts as released either way.
    pub async fn shutdown_radio(&mut self) -> bool {
        let accepted = self.link.set_radio_off().await;
        self.engine.apply(ConnectivityEvent::LinkReleased);
        accepted
    }

    pub fn mark_needs_reconnect(&mut self) {
        self.engine.apply(ConnectivityEvent::Reset);
    }
}
