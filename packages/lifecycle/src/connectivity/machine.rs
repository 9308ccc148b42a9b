use statig::prelude::*;

use super::types::{
    ConnectivityDirective, ConnectivityEvent, ConnectivityPhase, ConnectivityState, LinkStage,
    LinkStatus,
};
use crate::config::LinkPolicy;

#[derive(Clone, Copy, Debug)]
pub(super) struct ConnectivityMachine {
    pub(super) state: ConnectivityState,
    pub(super) phase: ConnectivityPhase,
    policy: LinkPolicy,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) directive: ConnectivityDirective,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            directive: ConnectivityDirective::Hold,
        }
    }
}

impl ConnectivityMachine {
    pub(super) fn new(policy: LinkPolicy) -> Self {
        Self {
            state: ConnectivityState::disconnected(),
            phase: ConnectivityPhase::Idle,
            policy,
        }
    }

    fn start_attempt(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        self.phase = ConnectivityPhase::Connecting;
        self.state = ConnectivityState {
            stage: LinkStage::Connecting,
            retry_budget_ms: self.policy.connect_budget_ms,
        };
        context.directive = ConnectivityDirective::BeginAttempt;
        Transition(State::connecting())
    }

    fn request_provisioning(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        self.phase = ConnectivityPhase::NeedsProvisioning;
        self.state = ConnectivityState::disconnected();
        context.directive = ConnectivityDirective::Provision;
        Transition(State::needs_provisioning())
    }

    fn go_dormant(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        self.phase = ConnectivityPhase::Dormant;
        self.state = ConnectivityState::disconnected();
        context.directive = ConnectivityDirective::EnterDormant;
        Transition(State::dormant())
    }

    fn go_idle(&mut self, context: &mut DispatchContext) -> Outcome<State> {
        self.phase = ConnectivityPhase::Idle;
        self.state = ConnectivityState::disconnected();
        context.directive = ConnectivityDirective::Hold;
        Transition(State::idle())
    }
}

#[state_machine(initial = "State::idle()")]
impl ConnectivityMachine {
    #[state]
    fn idle(&mut self, context: &mut DispatchContext, event: &ConnectivityEvent) -> Outcome<State> {
        match event {
            ConnectivityEvent::Begin { provisioned: true } => self.start_attempt(context),
            ConnectivityEvent::Begin { provisioned: false } => self.request_provisioning(context),
            _ => Handled,
        }
    }

    #[state]
    fn needs_provisioning(
        &mut self,
        context: &mut DispatchContext,
        event: &ConnectivityEvent,
    ) -> Outcome<State> {
        match event {
            ConnectivityEvent::ProvisioningFinished {
                committed: true,
                provisioned: true,
            } => self.start_attempt(context),
            ConnectivityEvent::ProvisioningFinished {
                committed: true,
                provisioned: false,
            } => {
                context.directive = ConnectivityDirective::Provision;
                Handled
            }
            ConnectivityEvent::ProvisioningFinished {
                committed: false, ..
            } => self.go_dormant(context),
            ConnectivityEvent::Reset => self.go_idle(context),
            _ => Handled,
        }
    }

    #[state]
    fn connecting(
        &mut self,
        context: &mut DispatchContext,
        event: &ConnectivityEvent,
    ) -> Outcome<State> {
        match event {
            ConnectivityEvent::Polled {
                status: LinkStatus::Connected,
                elapsed_ms,
            } => {
                // The successful poll still spent its interval.
                self.state.retry_budget_ms = self.state.retry_budget_ms.saturating_sub(*elapsed_ms);
                self.phase = ConnectivityPhase::Connected;
                self.state.stage = LinkStage::Connected;
                context.directive = ConnectivityDirective::Proceed;
                Transition(State::connected())
            }
            ConnectivityEvent::Polled { elapsed_ms, .. } => {
                self.state.retry_budget_ms = self.state.retry_budget_ms.saturating_sub(*elapsed_ms);
                if self.state.retry_budget_ms == 0 {
                    return self.request_provisioning(context);
                }
                context.directive = ConnectivityDirective::KeepPolling;
                Handled
            }
            ConnectivityEvent::LinkReleased | ConnectivityEvent::Reset => self.go_idle(context),
            _ => Handled,
        }
    }

    #[state]
    fn connected(
        &mut self,
        context: &mut DispatchContext,
        event: &ConnectivityEvent,
    ) -> Outcome<State> {
        match event {
            ConnectivityEvent::Polled {
                status: LinkStatus::Connected,
                ..
            } => {
                context.directive = ConnectivityDirective::Proceed;
                Handled
            }
            ConnectivityEvent::Polled { .. }
            | ConnectivityEvent::LinkReleased
            | ConnectivityEvent::Reset => self.go_idle(context),
            _ => Handled,
        }
    }

    #[state]
    fn dormant(&mut self, context: &mut DispatchContext, event: &ConnectivityEvent) -> Outcome<State> {
        match event {
            ConnectivityEvent::Reset => self.go_idle(context),
            _ => Handled,
        }
    }
}
