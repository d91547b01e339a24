// HTTP client for the npm package search API
pub mod npms;
pub mod retry;

// Re-export common types
pub use npms::{NpmsClient, NpmsError, NpmsLinks, NpmsPackage, NpmsScore, NpmsSearchResponse, NpmsSearchResult};
pub use retry::RetryConfig;
