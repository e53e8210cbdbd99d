//! Source image retrieval.

mod http_fetcher;

pub use http_fetcher::HttpImageFetcher;
