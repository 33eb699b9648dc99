//! Value objects - immutable types that represent domain concepts

mod timestamp;

pub use timestamp::AlertTimestamp;
