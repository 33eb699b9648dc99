//! Change notifications emitted by the alert store

mod alert_change;

pub use alert_change::{AlertChange, ChangeOp};
