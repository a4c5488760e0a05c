mod driver_errors;
mod validation_errors;

pub use driver_errors::*;
pub use validation_errors::*;
