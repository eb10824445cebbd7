pub mod errors;

pub use errors::{NormalizeError, RatesError};
