//! # Result Export
//!
//! Shapes consumed by the downstream collaborators. Both are built from a
//! [`CalculationResult`](crate::result::CalculationResult) and depend only on
//! its public accessors.
//!
//! - [`quote`] - generic `{ materials, summary }` quote request
//! - [`report`] - labelled rows + warnings for a printable document

pub mod quote;
pub mod report;

pub use quote::{MaterialLine, QuoteRequest, QuoteSource};
pub use report::{ReportDocument, ReportRow, Reportable};
