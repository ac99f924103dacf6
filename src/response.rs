//! HTTP-boundary validation and result deserialization.

use crate::error::{LookbackError, Result};
use crate::result::LookbackResult;
use crate::transport::{RawResponse, ResponseBody};

const UNAUTHORIZED: u16 = 401;

/// Gate a raw response before any JSON parsing.
///
/// 401 means rejected credentials regardless of body content, and an absent
/// body means the server sent no data. Every other response passes its body
/// through to the deserializer, non-401 error statuses included, since the
/// service emits JSON-shaped error envelopes that the result validator then
/// rejects.
pub(crate) fn validate_response(response: RawResponse) -> Result<Box<dyn ResponseBody>> {
    if response.status == UNAUTHORIZED {
        return Err(LookbackError::Authorization);
    }
    response.body.ok_or(LookbackError::NoData)
}

/// Deserialize a response body into a [`LookbackResult`].
///
/// Consumes the body handle on every path, so the underlying stream is
/// released exactly once whether parsing succeeds or fails.
pub(crate) async fn parse_result(body: Box<dyn ResponseBody>) -> Result<LookbackResult> {
    let bytes = body.bytes().await?;
    serde_json::from_slice(&bytes).map_err(LookbackError::from)
}
