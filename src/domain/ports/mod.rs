mod content_store_port;
mod failure_log_port;
mod image_fetch_port;
mod image_host_port;

pub use content_store_port::{ContentStorePort, StoreError, StoreResult};
pub use failure_log_port::{FailureLogPort, LogError, LogResult};
pub use image_fetch_port::{FetchedImage, ImageFetchPort, filename_from_url};
pub use image_host_port::{HOSTED_DOMAINS, ImageHostPort, is_hosted_url};

#[cfg(test)]
pub use image_fetch_port::MockImageFetchPort;
