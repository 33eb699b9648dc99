//! Model -> entity conversions

mod admin;
mod alert;
mod identity;
mod user;

pub use alert::timestamp_parts;
