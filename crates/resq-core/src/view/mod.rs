//! Pure view logic over alert lists
//!
//! Filtering, ordering and the derived display values shown on an alert card.
//! Nothing here performs I/O.

mod filter;
pub mod presentation;

pub use filter::{apply_view, display_name, AlertView, SortOrder, StatusFilter};
