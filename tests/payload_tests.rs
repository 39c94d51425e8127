use std::collections::HashMap;

use dispatch_service::models::{
    payload::{MulticastMessage, NotificationRequest},
    validation::{collect_valid_tokens, is_valid_token},
};
use serde_json::json;

/// Test: the data section carries exactly title, body, and caller keys
#[test]
fn test_data_section_duplicates_title_and_body() {
    let request = NotificationRequest::build(
        "T",
        "B",
        HashMap::from([("itemId".to_string(), "42".to_string())]),
    );

    assert_eq!(request.title, "T");
    assert_eq!(request.body, "B");
    assert_eq!(request.data.len(), 3);
    assert_eq!(request.data.get("title").map(String::as_str), Some("T"));
    assert_eq!(request.data.get("body").map(String::as_str), Some("B"));
    assert_eq!(request.data.get("itemId").map(String::as_str), Some("42"));
}

/// Test: canonical title and body win over colliding caller keys
#[test]
fn test_reserved_keys_are_not_overridden_by_caller_data() {
    let request = NotificationRequest::build(
        "T",
        "B",
        HashMap::from([("title".to_string(), "spoofed".to_string())]),
    );

    assert_eq!(request.data.len(), 2);
    assert_eq!(request.data.get("title").map(String::as_str), Some("T"));
}

/// Test: the wire message pins the fixed platform delivery settings
#[test]
fn test_multicast_wire_shape() {
    let request = NotificationRequest::build(
        "Pickup Scheduled",
        "Item X is scheduled",
        HashMap::from([("itemId".to_string(), "42".to_string())]),
    );
    let tokens = vec!["tok-1".to_string(), "tok-2".to_string()];

    let wire = serde_json::to_value(MulticastMessage::new(&request, &tokens)).unwrap();

    assert_eq!(wire["notification"]["title"], "Pickup Scheduled");
    assert_eq!(wire["notification"]["body"], "Item X is scheduled");
    assert_eq!(wire["data"]["itemId"], "42");
    assert_eq!(wire["data"]["title"], "Pickup Scheduled");

    assert_eq!(wire["android"]["priority"], "high");
    assert_eq!(
        wire["android"]["notification"]["channelId"],
        "high_importance_channel"
    );
    assert_eq!(
        wire["android"]["notification"]["clickAction"],
        "FLUTTER_NOTIFICATION_CLICK"
    );
    assert_eq!(wire["android"]["notification"]["sound"], "default");

    assert_eq!(wire["apns"]["headers"]["apns-priority"], "10");
    assert_eq!(wire["apns"]["payload"]["aps"]["sound"], "default");
    assert_eq!(wire["apns"]["payload"]["aps"]["contentAvailable"], true);

    assert_eq!(wire["tokens"], json!(["tok-1", "tok-2"]));
}

/// Test: token validation rejects empty and malformed values
#[test]
fn test_token_validation() {
    assert!(is_valid_token("abc-123:DEF_456.x"));
    assert!(is_valid_token("a"));

    assert!(!is_valid_token(""));
    assert!(!is_valid_token("has space"));
    assert!(!is_valid_token("line\nbreak"));
    assert!(!is_valid_token(&"x".repeat(5000)));
}

/// Test: raw snapshot values are narrowed to usable tokens
#[test]
fn test_raw_audience_values_are_filtered() {
    let raw = vec![
        json!("tok-1"),
        json!(null),
        json!(42),
        json!(""),
        json!(["not", "a", "token"]),
        json!("tok-2"),
    ];

    let tokens = collect_valid_tokens(&raw);

    assert_eq!(tokens, vec!["tok-1".to_string(), "tok-2".to_string()]);
}
