//! Deserialized snapshot query results.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{LookbackError, Result};
use crate::query::LookbackQuery;

/// Result of a snapshot query.
///
/// Snapshots are kept as raw JSON objects, so fields the server explicitly
/// set to `null` stay `null` instead of being dropped or defaulted.
///
/// A result is returned to the caller once per request; feed it back into
/// [`LookbackApi::query_for_next_page`](crate::client::LookbackApi::query_for_next_page)
/// to continue a paged session.
#[derive(Debug, Clone, Deserialize)]
pub struct LookbackResult {
    #[serde(rename = "_rallyAPIMajor", default)]
    pub rally_api_major: Option<String>,
    #[serde(rename = "_rallyAPIMinor", default)]
    pub rally_api_minor: Option<String>,
    /// Errors reported by the server inside a syntactically valid response.
    #[serde(rename = "Errors", default)]
    pub errors: Vec<String>,
    /// Non-fatal warnings reported by the server.
    #[serde(rename = "Warnings", default)]
    pub warnings: Vec<String>,
    /// The query as the server interpreted it.
    #[serde(rename = "GeneratedQuery", default)]
    pub generated_query: Option<Value>,
    #[serde(rename = "TotalResultCount", default)]
    pub total_result_count: u64,
    #[serde(rename = "StartIndex", default)]
    pub start_index: u64,
    #[serde(rename = "PageSize", default)]
    pub page_size: u64,
    /// Data currency timestamp of the analytics store.
    #[serde(rename = "ETLDate", default)]
    pub etl_date: Option<String>,
    /// Returned snapshots, one JSON object per historical record.
    #[serde(rename = "Results", default)]
    pub results: Vec<Map<String, Value>>,

    #[serde(skip)]
    query_context: Option<LookbackQuery>,
}

impl LookbackResult {
    /// Cross-check this result against the query that produced it.
    ///
    /// Accepts or rejects, never mutates. Fails with
    /// [`LookbackError::ResultValidation`] when the server reported errors,
    /// when the honored start index differs from the requested one, or when
    /// a required field is missing from a returned snapshot. Server
    /// warnings are logged and do not fail validation.
    pub fn validate(&self, query: &LookbackQuery) -> Result<()> {
        if !self.errors.is_empty() {
            return Err(LookbackError::ResultValidation(format!(
                "server reported errors: {}",
                self.errors.join("; ")
            )));
        }

        for warning in &self.warnings {
            warn!(%warning, "lookback server reported a warning");
        }

        if self.start_index != query.requested_start() {
            return Err(LookbackError::ResultValidation(format!(
                "server honored start index {} but {} was requested",
                self.start_index,
                query.requested_start()
            )));
        }

        for required in query.required_fields() {
            if self.results.iter().any(|r| !r.contains_key(required)) {
                return Err(LookbackError::ResultValidation(format!(
                    "required field `{required}` missing from a returned snapshot"
                )));
            }
        }

        Ok(())
    }

    /// Whether the server holds more snapshots beyond this page.
    pub fn has_more_pages(&self) -> bool {
        self.start_index + (self.results.len() as u64) < self.total_result_count
    }

    /// Start index for the page following this one.
    pub(crate) fn next_start(&self) -> u64 {
        self.start_index + self.results.len() as u64
    }

    pub(crate) fn attach_query_context(&mut self, query: LookbackQuery) {
        self.query_context = Some(query);
    }

    pub(crate) fn query_context(&self) -> Option<&LookbackQuery> {
        self.query_context.as_ref()
    }
}
