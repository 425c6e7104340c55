//! Fixture notification engine: classify, decide, render.

pub mod classifier;
pub mod decision;
pub mod formatter;

pub use classifier::{classify, TemporalClassification};
pub use decision::{KickoffGuard, NotificationDecision, Trigger};
pub use formatter::{format, FormatContext};
