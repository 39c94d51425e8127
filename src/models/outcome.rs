use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Provider response for one multicast call. `responses` is ordered to
/// match the token order of the request that produced it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MulticastResponse {
    pub success_count: u32,
    pub failure_count: u32,
    pub responses: Vec<SendResponse>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    pub success: bool,

    #[serde(default)]
    pub message_id: Option<String>,

    #[serde(default)]
    pub error: Option<SendError>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SendError {
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Per-recipient result after a provider response has been mapped back onto
/// the batch that produced it.
#[derive(Debug, Clone)]
pub struct DeliveryOutcome {
    pub recipient: String,
    pub success: bool,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

/// Aggregate over all batches of one dispatch call.
///
/// `unknown` counts recipients in batches lost to a transport failure: the
/// provider never returned per-recipient results for them, so they are
/// neither successes nor failures. Invariant:
/// `succeeded + failed + unknown == attempted`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub unknown: usize,
    pub stale_recipients: HashSet<String>,
}
