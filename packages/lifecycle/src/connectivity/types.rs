/// Link state as reported by the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl LinkStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkError {
    InvalidCredentials,
    Driver,
}

impl LinkError {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid credentials",
            Self::Driver => "driver error",
        }
    }
}

/// Link stage as tracked by the connectivity manager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkStage {
    Disconnected,
    Connecting,
    Connected,
}

impl LinkStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectivityState {
    pub stage: LinkStage,
    pub retry_budget_ms: u32,
}

impl ConnectivityState {
    pub const fn disconnected() -> Self {
        Self {
            stage: LinkStage::Disconnected,
            retry_budget_ms: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectivityPhase {
    Idle,
    NeedsProvisioning,
    Connecting,
    Connected,
    Dormant,
}

impl ConnectivityPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::NeedsProvisioning => "needs-provisioning",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Dormant => "dormant",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Begin { provisioned: bool },
    ProvisioningFinished { committed: bool, provisioned: bool },
    Polled { status: LinkStatus, elapsed_ms: u32 },
    LinkReleased,
    Reset,
}

/// What the manager has to do next after feeding an event to the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectivityDirective {
    Hold,
    Provision,
    BeginAttempt,
    KeepPolling,
    Proceed,
    EnterDormant,
}

impl ConnectivityDirective {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hold => "hold",
            Self::Provision => "provision",
            Self::BeginAttempt => "begin",
            Self::KeepPolling => "poll",
            Self::Proceed => "proceed",
            Self::EnterDormant => "dormant",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected,
    Dormant,
}
