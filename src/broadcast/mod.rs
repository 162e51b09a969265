//! Broadcast delivery: copy one message to every user, backing off when
//! throttled and pruning users who can no longer be reached.

pub mod directory;
pub mod engine;
pub mod outcome;
pub mod progress;
pub mod telegram;

pub use directory::UserDirectory;
pub use engine::BroadcastEngine;
pub use outcome::{BroadcastTransport, DeliveryOutcome};
pub use progress::{BroadcastReport, ProgressReporter};
