pub mod agent;
#[cfg(feature = "browser")]
pub mod browser_fetcher;
pub mod fetcher;
pub mod summary;

pub use agent::OpenAiAgent;
#[cfg(feature = "browser")]
pub use browser_fetcher::BrowserFetcher;
pub use fetcher::ReqwestFetcher;
pub use summary::PageSummary;
