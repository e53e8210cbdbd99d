//! Domain error types.

mod image_error;
mod process_error;

pub use image_error::{FetchError, UploadError};
pub use process_error::ProcessError;
