//! Shared utilities for the indexed-log workspace.

pub mod clock;
pub mod ident;

pub use clock::{Clock, MockClock, SystemClock};
pub use ident::deterministic_file_id;
