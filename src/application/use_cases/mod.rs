//! Use case implementations.

mod bulk_replace;
mod process_post;

#[cfg(test)]
mod process_post_test;

pub use bulk_replace::BulkReplaceUseCase;
pub use process_post::ProcessPostUseCase;
