use std::collections::{HashMap, HashSet};

use futures_util::{StreamExt, stream};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    clients::fcm::{DeliveryClient, MAX_BATCH_SIZE},
    config::Config,
    models::{
        outcome::{DeliveryOutcome, DispatchReport},
        payload::NotificationRequest,
        retry::RetryConfig,
        validation::is_valid_token,
    },
    utils::{redact_token, retry_with_backoff},
};

/// Splits recipients into contiguous batches of at most `max_size`,
/// preserving input order. The last batch may be short; empty input yields
/// no batches. Order preservation is load-bearing: provider responses map
/// back onto tokens by position.
pub fn split_batches(recipients: &[String], max_size: usize) -> impl Iterator<Item = &[String]> {
    debug_assert!(max_size > 0, "batch size must be positive");
    recipients.chunks(max_size)
}

/// Per-recipient classification folded out of one batch.
#[derive(Debug, Clone, Default)]
pub struct OutcomeSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub stale: HashSet<String>,
}

const UNREGISTERED_CODE: &str = "registration-token-not-registered";

/// Whether the provider has declared this recipient permanently invalid.
/// Deliberately conservative: only the explicit unregistered signal counts;
/// every other failure is assumed possibly transient.
fn is_unregistered(outcome: &DeliveryOutcome) -> bool {
    if let Some(code) = &outcome.error_code {
        // Admin-SDK style codes carry a "messaging/" prefix; accept both forms.
        if code == UNREGISTERED_CODE || code.strip_prefix("messaging/") == Some(UNREGISTERED_CODE) {
            return true;
        }
    }

    // Compat shim: some provider responses spell the condition only in the
    // message text. Not a guaranteed contract.
    outcome
        .error_message
        .as_deref()
        .is_some_and(|msg| msg.contains("Unregistered"))
}

/// Folds per-recipient outcomes into success/failure counts, flagging
/// recipients the provider will never again accept. Removal of flagged
/// records is the caller's responsibility.
pub fn analyze_outcomes(outcomes: &[DeliveryOutcome]) -> OutcomeSummary {
    let mut summary = OutcomeSummary::default();

    for outcome in outcomes {
        if outcome.success {
            summary.succeeded += 1;
            continue;
        }

        summary.failed += 1;

        warn!(
            token = %redact_token(&outcome.recipient),
            error_code = outcome.error_code.as_deref().unwrap_or("UNKNOWN_ERROR"),
            error_message = outcome
                .error_message
                .as_deref()
                .unwrap_or("No specific error message provided"),
            "Recipient delivery failed"
        );

        if is_unregistered(outcome) {
            warn!(
                token = %redact_token(&outcome.recipient),
                "Token is no longer registered and should be removed from the audience"
            );
            summary.stale.insert(outcome.recipient.clone());
        }
    }

    summary
}

/// Orchestrates one logical notification: filters the audience, chunks it
/// under the provider ceiling, sends batches with bounded concurrency, and
/// folds all outcomes into a single report.
pub struct Dispatcher<C: DeliveryClient> {
    client: C,
    concurrency: usize,
    retry_config: RetryConfig,
}

impl<C: DeliveryClient> Dispatcher<C> {
    pub fn new(client: C, config: &Config) -> Self {
        Self {
            client,
            concurrency: config.dispatch_concurrency.max(1),
            retry_config: config.retry_config(),
        }
    }

    /// Sends one notification to every valid recipient. Always returns a
    /// completed report: per-recipient failures and batch-level transport
    /// failures are folded into it rather than failing the call.
    pub async fn dispatch(
        &self,
        recipients: &[String],
        title: &str,
        body: &str,
        data: HashMap<String, String>,
    ) -> DispatchReport {
        let dispatch_id = Uuid::new_v4().to_string();

        let valid: Vec<String> = recipients
            .iter()
            .filter(|token| is_valid_token(token))
            .cloned()
            .collect();

        let skipped = recipients.len() - valid.len();
        if skipped > 0 {
            debug!(
                dispatch_id = %dispatch_id,
                skipped,
                "Filtered malformed recipient tokens"
            );
        }

        if valid.is_empty() {
            info!(
                dispatch_id = %dispatch_id,
                title,
                "No valid recipients, nothing to dispatch"
            );
            return DispatchReport::default();
        }

        info!(
            dispatch_id = %dispatch_id,
            title,
            recipient_count = valid.len(),
            "Dispatching notification"
        );

        let payload = NotificationRequest::build(title, body, data);

        let client = &self.client;
        let retry_config = &self.retry_config;
        let payload_ref = &payload;

        let sends = split_batches(&valid, MAX_BATCH_SIZE)
            .enumerate()
            .map(move |(index, batch)| async move {
                let result = retry_with_backoff(retry_config, || {
                    client.send_batch(batch, payload_ref)
                })
                .await;
                (index, batch.len(), result)
            });

        let batch_results: Vec<_> = stream::iter(sends)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // The stream is the only producer, so folding here needs no locks.
        let mut report = DispatchReport {
            attempted: valid.len(),
            ..DispatchReport::default()
        };

        for (index, batch_size, result) in batch_results {
            match result {
                Ok(outcomes) => {
                    let summary = analyze_outcomes(&outcomes);
                    info!(
                        dispatch_id = %dispatch_id,
                        batch = index,
                        succeeded = summary.succeeded,
                        failed = summary.failed,
                        "Batch delivered"
                    );
                    report.succeeded += summary.succeeded;
                    report.failed += summary.failed;
                    report.stale_recipients.extend(summary.stale);
                }
                Err(e) => {
                    warn!(
                        dispatch_id = %dispatch_id,
                        batch = index,
                        batch_size,
                        error = %e,
                        "Batch send failed before reaching recipients"
                    );
                    report.unknown += batch_size;
                }
            }
        }

        info!(
            dispatch_id = %dispatch_id,
            succeeded = report.succeeded,
            failed = report.failed,
            unknown = report.unknown,
            stale = report.stale_recipients.len(),
            "Dispatch complete"
        );

        report
    }
}
