//! Cross-cutting diagnostics for the mq language service.
//!
//! Provides the error taxonomy shared by every crate in the workspace:
//! - `CommonError` for faults that are not specific to any one phase
//!   (cancellation, invariant violations, wrapped unknowns)
//! - `CancellationToken`, the cooperative-cancellation interface consumed
//!   at every production entry and inference recursion
//! - `ErrorCode` for searchable diagnostics
//! - `LocalizationTemplates`, the message dictionary parse errors format
//!   through

mod cancellation;
mod common_error;
mod error_code;
mod templates;

pub use cancellation::{CancellationFlag, CancellationToken, NeverCancelled};
pub use common_error::{CancellationError, CommonError, InvariantError};
pub use error_code::ErrorCode;
pub use templates::LocalizationTemplates;
