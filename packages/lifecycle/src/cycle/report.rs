use heapless::Vec;

use crate::indicator::Indication;
use crate::power::{PowerDecision, PowerError};

pub const MAX_METRICS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MetricOutcome {
    Uploaded,
    ReadFailed,
    UploadFailed,
}

impl MetricOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::ReadFailed => "read-failed",
            Self::UploadFailed => "upload-failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MetricReport {
    pub feed: &'static str,
    pub outcome: MetricOutcome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    AllUploaded,
    Partial,
    NoneUploaded,
    Dormant,
}

impl CycleOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AllUploaded => "all-uploaded",
            Self::Partial => "partial",
            Self::NoneUploaded => "none-uploaded",
            Self::Dormant => "dormant",
        }
    }

    pub fn from_metrics(metrics: &[MetricReport]) -> Self {
        let uploaded = metrics
            .iter()
            .filter(|metric| metric.outcome == MetricOutcome::Uploaded)
            .count();
        if uploaded == 0 {
            Self::NoneUploaded
        } else if uploaded == metrics.len() {
            Self::AllUploaded
        } else {
            Self::Partial
        }
    }

    pub const fn indication(self) -> Indication {
        match self {
            Self::AllUploaded | Self::Dormant => Indication::None,
            Self::Partial => Indication::MomentaryToggle,
            Self::NoneUploaded => Indication::FailureBurst,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleReport {
    pub metrics: Vec<MetricReport, MAX_METRICS>,
    pub outcome: CycleOutcome,
    pub indication: Indication,
    pub decision: PowerDecision,
    pub power: Result<(), PowerError>,
}

impl CycleReport {
    pub fn metric(&self, feed: &str) -> Option<MetricOutcome> {
        self.metrics
            .iter()
            .find(|metric| metric.feed == feed)
            .map(|metric| metric.outcome)
    }
}
