use std::{sync::Arc, time::Duration};

use anyhow::{Error, Result, anyhow};
use async_trait::async_trait;
use gcp_auth::TokenProvider;
use reqwest::Client;
use tracing::{debug, info};

use crate::{
    config::Config,
    models::{
        outcome::{DeliveryOutcome, MulticastResponse},
        payload::{MulticastMessage, NotificationRequest},
    },
};

/// Provider ceiling on recipients per multicast call.
pub const MAX_BATCH_SIZE: usize = 500;

const MESSAGING_SCOPES: &[&str] = &["https://www.googleapis.com/auth/firebase.messaging"];

/// One multicast send per batch.
///
/// `Err` means the provider call itself could not be completed (network,
/// auth, quota) and no per-recipient results exist. Recipients the provider
/// rejected individually come back as unsuccessful outcomes, not as `Err`.
#[async_trait]
pub trait DeliveryClient: Send + Sync {
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &NotificationRequest,
    ) -> Result<Vec<DeliveryOutcome>, Error>;
}

pub struct FcmClient {
    http_client: Client,
    endpoint: String,
    project_id: String,
    token_provider: Arc<dyn TokenProvider>,
}

impl FcmClient {
    pub async fn new(config: &Config) -> Result<Self, Error> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|_| anyhow!("Failed to create HTTP client"))?;

        let token_provider = gcp_auth::provider().await?;

        info!(project_id = %config.fcm_project_id, "FCM client initialized");

        Ok(Self {
            http_client,
            endpoint: config.fcm_endpoint.clone(),
            project_id: config.fcm_project_id.clone(),
            token_provider,
        })
    }
}

#[async_trait]
impl DeliveryClient for FcmClient {
    async fn send_batch(
        &self,
        tokens: &[String],
        payload: &NotificationRequest,
    ) -> Result<Vec<DeliveryOutcome>, Error> {
        debug_assert!(
            tokens.len() <= MAX_BATCH_SIZE,
            "batch exceeds the provider recipient ceiling"
        );

        debug!(token_count = tokens.len(), "Sending multicast batch");

        let message = MulticastMessage::new(payload, tokens);

        let token = self.token_provider.token(MESSAGING_SCOPES).await?;

        let url = format!(
            "{}/v1/projects/{}/messages:sendMulticast",
            self.endpoint, self.project_id
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.as_str())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(anyhow!(
                "FCM multicast request failed ({}): {}",
                status,
                error_text
            ));
        }

        let multicast: MulticastResponse = response.json().await?;

        info!(
            success_count = multicast.success_count,
            failure_count = multicast.failure_count,
            "Multicast batch accepted"
        );

        map_outcomes(tokens, multicast)
    }
}

/// Maps the provider's ordered response array back onto the batch. Valid
/// only because batches preserve recipient order end to end.
pub fn map_outcomes(
    tokens: &[String],
    response: MulticastResponse,
) -> Result<Vec<DeliveryOutcome>, Error> {
    if response.responses.len() != tokens.len() {
        return Err(anyhow!(
            "Provider returned {} results for {} recipients",
            response.responses.len(),
            tokens.len()
        ));
    }

    let outcomes = tokens
        .iter()
        .zip(response.responses)
        .map(|(token, resp)| DeliveryOutcome {
            recipient: token.clone(),
            success: resp.success,
            error_code: resp.error.as_ref().and_then(|e| e.code.clone()),
            error_message: resp.error.and_then(|e| e.message),
        })
        .collect();

    Ok(outcomes)
}
