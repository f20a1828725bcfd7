//! Crawler module: frontier management, HTTP fetching, and the crawl loop

mod crawl;
mod fetcher;
mod frontier;

pub use crawl::{Crawler, PageRecord};
pub use fetcher::{build_http_client, fetch_asset, fetch_page, FetchOutcome, USER_AGENT};
pub use frontier::Frontier;
