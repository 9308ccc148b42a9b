mod engine;
mod machine;
mod manager;
mod types;


pub use engine::{ConnectivityEngine, ConnectivityStep};
pub use manager::{ConnectivityManager, LinkDriver};
pub use types::{
    ConnectOutcome, ConnectivityDirective, ConnectivityEvent, ConnectivityPhase,
    ConnectivityState, LinkError, LinkStage, LinkStatus,
};
