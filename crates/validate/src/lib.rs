//! Dataset validation.
//!
//! [`shallow_check`] is a cheap structural check against a [`Schema`]: it
//! never looks at data values. [`deep_check`] materializes missing-value
//! patterns and compares them across variables and time steps.
//! [`prediction_check`] validates a postprocessed model prediction against
//! the input dataset it was produced from.
//!
//! [`Schema`]: oemu_dataset::Schema

mod deep;
mod error;
mod prediction;
mod shallow;

pub use deep::deep_check;
pub use error::{ErrorCategory, ValidateError};
pub use prediction::prediction_check;
pub use shallow::shallow_check;
