//! Shared infrastructure: spans, errors, diagnostic reporting

mod error;
mod span;

pub use error::{DiagnosticReporter, LowerError, LowerResult};
pub use span::Span;
