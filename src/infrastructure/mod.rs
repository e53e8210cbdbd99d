//! Infrastructure layer with external service adapters.

/// Application configuration.
pub mod config;
/// Source image retrieval.
pub mod fetch;
/// Image host adapters.
pub mod hosts;
/// Durable failure log.
pub mod log;
/// Content store adapters.
pub mod store;

pub use config::{CliArgs, Command, ConfigError, LogLevel, StorageManager};
pub use fetch::HttpImageFetcher;
pub use hosts::{CloudinaryClient, FreeimageClient, ImgbbClient, build_image_host};
pub use log::FileFailureLog;
pub use store::{JsonContentStore, MemoryContentStore};
