//! # rally-lookback
//!
//! A Rust client for Rally's Lookback API.
//!
//! The Lookback API serves historical "snapshot" records of Rally work
//! items. This crate issues snapshot queries against it: build a client,
//! configure a query, execute it, and page through the results.
//!
//! ```no_run
//! use rally_lookback::{LookbackApi, SortDirection};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), rally_lookback::LookbackError> {
//!     let api = LookbackApi::builder()
//!         .credentials("myRallyUsername", "myRallyPassword")
//!         .workspace("myRallyWorkspace")
//!         .build()?;
//!
//!     let query = api
//!         .new_snapshot_query()
//!         .find_clause("_TypeHierarchy", "HierarchicalRequirement")
//!         .fields(["ObjectID", "ScheduleState", "PlanEstimate"])
//!         .sort_by("_ValidFrom", SortDirection::Ascending);
//!
//!     let result = api.execute_query(&query).await?;
//!     for snapshot in &result.results {
//!         println!("{snapshot:?}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Each [`LookbackApi::execute_query`] call runs exactly one HTTP POST and
//! resolves once the complete response has been received and validated.
//! Failures are reported as distinct [`LookbackError`] kinds: transport
//! faults, rejected credentials, empty or malformed bodies, and results
//! inconsistent with their query all surface separately, and nothing is
//! retried internally.
#![deny(unsafe_code)]

pub mod builder;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod query;
mod response;
pub mod result;
pub mod transport;

pub use builder::LookbackApiBuilder;
pub use client::LookbackApi;
pub use config::{Credentials, DEFAULT_SERVER, DEFAULT_VERSION, LookbackConfig};
pub use error::{LookbackError, Result};
pub use query::{DEFAULT_PAGE_SIZE, LookbackQuery, SortDirection};
pub use result::LookbackResult;
pub use transport::{HttpTransport, OutboundRequest, RawResponse, ResponseBody, Transport};
