//! Endpoint URL composition.

use url::Url;

use crate::error::{LookbackError, Result};

/// Compose the snapshot query endpoint URL for a workspace.
///
/// The path template is a compatibility contract with the Lookback service
/// and is reproduced verbatim:
/// `{server}/analytics/v{major}.{minor}/service/rally/workspace/{workspace}/artifact/snapshot/query.js`
///
/// Version components are interpolated as given, without validating their
/// numeric form. Fails with [`LookbackError::Configuration`] when no
/// workspace is set.
pub fn snapshot_query_url(
    server: &Url,
    version_major: &str,
    version_minor: &str,
    workspace: Option<&str>,
) -> Result<Url> {
    let workspace = workspace.filter(|w| !w.is_empty()).ok_or_else(|| {
        LookbackError::Configuration("workspace is required to execute query".to_string())
    })?;

    let raw = format!(
        "{}/analytics/{}/service/rally/workspace/{}/artifact/snapshot/query.js",
        server.as_str().trim_end_matches('/'),
        api_version(version_major, version_minor),
        workspace
    );

    Url::parse(&raw)
        .map_err(|e| LookbackError::Configuration(format!("invalid endpoint url `{raw}`: {e}")))
}

fn api_version(major: &str, minor: &str) -> String {
    format!("v{major}.{minor}")
}
