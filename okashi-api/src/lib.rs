//! Client for the Toriko snack database search API.
//!
//! A search turns a caller-supplied keyword into a request URL
//! ([`query::QueryTemplate`]), performs a single GET through `okashi-http`,
//! decodes the loosely typed payload ([`types`]) and keeps only the records
//! that carry a name, a detail URL and an image URL ([`extract`]).
//!
//! ```no_run
//! # async fn demo() -> Result<(), okashi_api::SearchError> {
//! let api = okashi_api::OkashiApi::new(okashi_api::QueryTemplate::default())?;
//! if let Some(items) = api.search("ポッキー").await? {
//!     for item in items {
//!         println!("{} -> {}", item.name(), item.detail_url());
//!     }
//! }
//! # Ok(()) }
//! ```
pub mod client;
pub mod error;
pub mod extract;
pub mod item;
pub mod query;
pub mod types;

pub use client::OkashiApi;
pub use error::{SearchError, SearchErrorKind};
pub use item::{ResultItem, ResultList};
pub use query::{QueryTemplate, SearchKeyword};
