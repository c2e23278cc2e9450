pub mod errors;
pub mod motion;
#[cfg(feature = "python_wrap")]
pub mod python_wrapper;
pub mod utils;

pub use errors::Error;
