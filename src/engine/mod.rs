//! Aggregate-consistency engine.
//!
//! Keeps a profile's summary fields (status, latest rating, last interaction
//! date, flag unions) in step with its journal entries. Everything here is
//! pure except `drift::apply_correction`, which writes through the store.

pub mod aggregate;
pub mod drift;
pub mod flags;
pub mod ordering;
pub mod submission;

pub use aggregate::{expected_derived, recompute, with_entries};
pub use drift::{apply_correction, detect_drift, Correction};
pub use ordering::{compare_entries, latest_entry, timeline};
