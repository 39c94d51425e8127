use std::collections::HashMap;

use anyhow::{Error, Result, anyhow};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::models::payload::NotificationRequest;

/// Typed projections of the document-store triggers that feed the
/// dispatcher. Each constructor validates the raw snapshot at the boundary;
/// dynamic field access never reaches the dispatch core.

/// A new item document was created.
#[derive(Debug, Clone)]
pub struct ItemReported {
    pub item_id: String,
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub location: Option<String>,
}

impl ItemReported {
    pub fn from_snapshot(item_id: &str, doc: &JsonValue) -> Result<Self, Error> {
        let doc = as_document(doc, "item")?;

        Ok(Self {
            item_id: item_id.to_string(),
            item_type: field_str(doc, "type"),
            title: field_str(doc, "title"),
            location: field_str(doc, "location"),
        })
    }

    pub fn notification(&self) -> NotificationRequest {
        let title = format!(
            "New {} reported",
            self.item_type.as_deref().unwrap_or("item")
        );
        let body = format!(
            "{} at {}",
            self.title.as_deref().unwrap_or("Untitled"),
            self.location.as_deref().unwrap_or("Unknown")
        );
        let data = HashMap::from([("itemId".to_string(), self.item_id.clone())]);

        NotificationRequest::build(&title, &body, data)
    }
}

/// A collection request document was created for a verified item.
#[derive(Debug, Clone)]
pub struct CollectionRequestCreated {
    pub request_id: String,
    pub item_id: String,
    pub office_id: String,
    pub item_title: Option<String>,
}

impl CollectionRequestCreated {
    pub fn from_snapshot(request_id: &str, doc: &JsonValue) -> Result<Self, Error> {
        let doc = as_document(doc, "collection request")?;

        let item_id = field_str(doc, "itemId")
            .ok_or_else(|| anyhow!("Collection request is missing itemId"))?;
        let office_id = field_str(doc, "verifiedOfficeId")
            .ok_or_else(|| anyhow!("Collection request is missing verifiedOfficeId"))?;

        Ok(Self {
            request_id: request_id.to_string(),
            item_id,
            office_id,
            item_title: None,
        })
    }

    /// Item documents live in a separate collection; the caller joins the
    /// title in after fetching it.
    pub fn with_item_title(mut self, title: String) -> Self {
        self.item_title = Some(title);
        self
    }

    pub fn notification(&self) -> NotificationRequest {
        let body = format!(
            "Request received for item: {}.",
            self.item_title.as_deref().unwrap_or(&self.item_id)
        );
        let data = HashMap::from([
            ("itemId".to_string(), self.item_id.clone()),
            ("reqId".to_string(), self.request_id.clone()),
        ]);

        NotificationRequest::build("New Collection Request", &body, data)
    }
}

/// A collection request transitioned into the scheduled state.
#[derive(Debug, Clone)]
pub struct PickupScheduled {
    pub request_id: String,
    pub item_id: String,
    pub requester_id: String,
    pub item_title: Option<String>,
    pub pickup_time: Option<DateTime<Utc>>,
}

/// True only when the status moved into `scheduled` from something else.
/// Updates that touch an already-scheduled request must not re-notify.
pub fn is_newly_scheduled(before_status: Option<&str>, after_status: Option<&str>) -> bool {
    before_status != Some("scheduled") && after_status == Some("scheduled")
}

impl PickupScheduled {
    pub fn from_snapshot(request_id: &str, after: &JsonValue) -> Result<Self, Error> {
        let doc = as_document(after, "collection request")?;

        let item_id = field_str(doc, "itemId")
            .ok_or_else(|| anyhow!("Scheduled request is missing itemId"))?;
        let requester_id = field_str(doc, "requesterId")
            .ok_or_else(|| anyhow!("Scheduled request is missing requesterId"))?;

        let pickup_time = field_str(doc, "pickupTime")
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|t| t.with_timezone(&Utc));

        Ok(Self {
            request_id: request_id.to_string(),
            item_id,
            requester_id,
            item_title: None,
            pickup_time,
        })
    }

    pub fn with_item_title(mut self, title: String) -> Self {
        self.item_title = Some(title);
        self
    }

    pub fn notification(&self) -> NotificationRequest {
        let pickup_time = self
            .pickup_time
            .map(|t| t.format("%b %-d, %Y, %-I:%M %p").to_string())
            .unwrap_or_else(|| "N/A".to_string());

        let body = format!(
            "Your item \"{}\" is scheduled for pickup at {}",
            self.item_title.as_deref().unwrap_or(&self.item_id),
            pickup_time
        );
        let data = HashMap::from([
            ("itemId".to_string(), self.item_id.clone()),
            ("reqId".to_string(), self.request_id.clone()),
        ]);

        NotificationRequest::build("Pickup Scheduled", &body, data)
    }
}

fn as_document<'a>(value: &'a JsonValue, kind: &str) -> Result<&'a Map<String, JsonValue>, Error> {
    value
        .as_object()
        .ok_or_else(|| anyhow!("{} snapshot is not a document", kind))
}

fn field_str(doc: &Map<String, JsonValue>, key: &str) -> Option<String> {
    doc.get(key)
        .and_then(JsonValue::as_str)
        .map(str::to_string)
}
