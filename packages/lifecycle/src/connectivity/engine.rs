use statig::blocking::IntoStateMachineExt as _;

use super::machine::{ConnectivityMachine, DispatchContext};
use super::types::{
    ConnectivityDirective, ConnectivityEvent, ConnectivityPhase, ConnectivityState,
};
use crate::config::LinkPolicy;

#[derive(Clone, Copy, Debug)]
pub struct ConnectivityStep {
    pub before: ConnectivityPhase,
    pub after: ConnectivityPhase,
    pub directive: ConnectivityDirective,
}

impl ConnectivityStep {
    pub fn changed(self) -> bool {
        self.before != self.after
    }
}

pub struct ConnectivityEngine {
    machine: statig::blocking::StateMachine<ConnectivityMachine>,
}

impl ConnectivityEngine {
    pub fn new(policy: LinkPolicy) -> Self {
        Self {
            machine: ConnectivityMachine::new(policy).state_machine(),
        }
    }

    pub fn phase(&self) -> ConnectivityPhase {
        self.machine.inner().phase
    }

    pub fn state(&self) -> ConnectivityState {
        self.machine.inner().state
    }

    pub fn apply(&mut self, event: ConnectivityEvent) -> ConnectivityStep {
        let before = self.phase();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let after = self.phase();
        if before != after {
            log::debug!(
                "connectivity: {} -> {} directive={}",
                before.as_str(),
                after.as_str(),
                context.directive.as_str()
            );
        }
        ConnectivityStep {
            before,
            after,
            directive: context.directive,
        }
    }
}
