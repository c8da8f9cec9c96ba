//! Entry points driven by the binary.
//!
//! `check` runs the approval pipeline; `report` turns its result into the
//! status line and exit code seen by CI.

pub mod check;
pub mod report;

pub use check::check_approvals;
pub use report::Report;
