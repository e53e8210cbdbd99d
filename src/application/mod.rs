//! Application layer with use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Domain services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{BulkReport, FailurePayload, ProcessReport};
pub use services::UrlExtractor;
pub use use_cases::{BulkReplaceUseCase, ProcessPostUseCase};
