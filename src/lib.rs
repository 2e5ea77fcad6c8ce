//! Client for the Japanese Wikipedia's MediaWiki API.
//!
//! Requests go to a single endpoint with `format=json`, `formatversion=2` and
//! `origin=*` added by default, are bounded by a per-attempt timeout, and are
//! retried with linear backoff (1s, 2s, 3s, ...) until the attempt budget is
//! spent.
//!
//! ```no_run
//! # async fn run() -> anyhow::Result<()> {
//! use wikiapi::{ApiOptions, Params, call_wikipedia_api, search_pages};
//!
//! let params = Params::new()
//!     .with("action", "query")
//!     .with("list", "random")
//!     .with("rnlimit", 3);
//! let random = call_wikipedia_api(&params, &ApiOptions::default()).await?;
//! println!("{}", random);
//!
//! let options = ApiOptions::new().max_retries(2).timeout_ms(15_000);
//! let found = search_pages("TypeScript", 5, &options).await?;
//! println!("{:?}", found.pointer("/query/search/0/title"));
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod http;
pub mod options;
pub mod params;
pub mod response;

pub use api::{
    DEFAULT_LIMIT, WIKIPEDIA_API_ENDPOINT, WikipediaApi, call_wikipedia_api,
    get_category_members, get_page, get_site_info, search_pages,
};
pub use options::{ApiOptions, ResolvedOptions};
pub use params::{ParamValue, Params};
pub use response::ApiResponse;
