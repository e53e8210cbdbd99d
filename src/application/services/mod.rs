pub mod url_extractor;

pub use url_extractor::UrlExtractor;
