use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Provider-agnostic notification content plus the key/value payload
/// delivered alongside it.
///
/// Title and body are duplicated into `data` so clients that only receive
/// the data section (backgrounded or killed app states) can still render
/// the notification locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub data: HashMap<String, String>,
}

impl NotificationRequest {
    pub fn build(title: &str, body: &str, data: HashMap<String, String>) -> Self {
        let mut data = data;
        data.insert("title".to_string(), title.to_string());
        data.insert("body".to_string(), body.to_string());

        Self {
            title: title.to_string(),
            body: body.to_string(),
            data,
        }
    }
}

/// Wire shape for one multicast call: shared content plus the batch of
/// recipient tokens, addressed in request order.
#[derive(Debug, Clone, Serialize)]
pub struct MulticastMessage {
    pub notification: Notification,
    pub data: HashMap<String, String>,
    pub android: AndroidConfig,
    pub apns: ApnsConfig,
    pub tokens: Vec<String>,
}

impl MulticastMessage {
    pub fn new(request: &NotificationRequest, tokens: &[String]) -> Self {
        Self {
            notification: Notification {
                title: request.title.clone(),
                body: request.body.clone(),
            },
            data: request.data.clone(),
            android: AndroidConfig::default(),
            apns: ApnsConfig::default(),
            tokens: tokens.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Android delivery settings. Fixed configuration, not per-request state;
/// the channel id must match the one the client app registers.
#[derive(Debug, Clone, Serialize)]
pub struct AndroidConfig {
    pub priority: String,
    pub notification: AndroidNotification,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AndroidNotification {
    pub channel_id: String,
    pub click_action: String,
    pub sound: String,
}

impl Default for AndroidConfig {
    fn default() -> Self {
        Self {
            priority: "high".to_string(),
            notification: AndroidNotification {
                channel_id: "high_importance_channel".to_string(),
                click_action: "FLUTTER_NOTIFICATION_CLICK".to_string(),
                sound: "default".to_string(),
            },
        }
    }
}

/// APNs delivery settings. Priority 10 requests immediate delivery;
/// content-available wakes the app for silent processing.
#[derive(Debug, Clone, Serialize)]
pub struct ApnsConfig {
    pub headers: ApnsHeaders,
    pub payload: ApnsPayload,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApnsHeaders {
    #[serde(rename = "apns-priority")]
    pub priority: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ApnsPayload {
    pub aps: Aps,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Aps {
    pub sound: String,
    pub content_available: bool,
}

impl Default for ApnsConfig {
    fn default() -> Self {
        Self {
            headers: ApnsHeaders {
                priority: "10".to_string(),
            },
            payload: ApnsPayload {
                aps: Aps {
                    sound: "default".to_string(),
                    content_available: true,
                },
            },
        }
    }
}
