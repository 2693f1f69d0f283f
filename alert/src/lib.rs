pub mod engine;
pub mod message;
pub mod notifier;
pub mod policy;
pub mod smtp;
pub mod state;
pub mod types;

pub use engine::AlertEngine;
pub use message::{Alert, Signal};
pub use notifier::{Notifier, NotifyError};
pub use policy::{Classification, ThresholdError, Thresholds, classify};
pub use types::{AlertPolicy, CycleOutcome};
