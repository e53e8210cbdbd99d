//! IUR - Image URL Replacement.
//!
//! Rewrites image URLs embedded in posts and products to point at copies
//! hosted on a third-party image host (Freeimage.host, imgbb or Cloudinary),
//! keeping a durable per-post record of every replacement.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing adapters for external services.
pub mod infrastructure;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "iur";
