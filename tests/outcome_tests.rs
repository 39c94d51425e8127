use anyhow::Result;
use tokio_test::assert_err;
use dispatch_service::{
    clients::fcm::map_outcomes,
    dispatch::analyze_outcomes,
    models::outcome::{DeliveryOutcome, MulticastResponse, SendError, SendResponse},
};

/// Test: the explicit unregistered error code marks a recipient stale
#[test]
fn test_unregistered_code_marks_recipient_stale() {
    let mut outcomes: Vec<DeliveryOutcome> = (0..7).map(|i| success(&format!("ok-{}", i))).collect();
    outcomes.push(failure(
        "gone-device",
        Some("messaging/registration-token-not-registered"),
        None,
    ));
    outcomes.push(failure("busy-device", Some("messaging/internal-error"), None));
    outcomes.push(failure("slow-device", Some("messaging/quota-exceeded"), None));

    let summary = analyze_outcomes(&outcomes);

    assert_eq!(summary.succeeded, 7);
    assert_eq!(summary.failed, 3);
    assert_eq!(summary.stale.len(), 1);
    assert!(summary.stale.contains("gone-device"));
}

/// Test: the bare code form without the messaging/ prefix is recognized
#[test]
fn test_bare_unregistered_code_form_is_recognized() {
    let outcomes = vec![failure(
        "gone-device",
        Some("registration-token-not-registered"),
        None,
    )];

    let summary = analyze_outcomes(&outcomes);

    assert!(summary.stale.contains("gone-device"));
}

/// Test: an Unregistered message substring flags staleness without a code
#[test]
fn test_unregistered_message_substring_flags_staleness() {
    let outcomes = vec![failure(
        "gone-device",
        None,
        Some("Requested entity was not found: Unregistered device"),
    )];

    let summary = analyze_outcomes(&outcomes);

    assert_eq!(summary.failed, 1);
    assert!(summary.stale.contains("gone-device"));
}

/// Test: failures without an unregistered signal stay transient
#[test]
fn test_unclassified_failures_are_not_stale() {
    let outcomes = vec![
        failure("busy-device", Some("messaging/internal-error"), None),
        failure("odd-device", None, Some("Backend timeout")),
        failure("mute-device", None, None),
    ];

    let summary = analyze_outcomes(&outcomes);

    assert_eq!(summary.succeeded, 0);
    assert_eq!(summary.failed, 3);
    assert!(
        summary.stale.is_empty(),
        "only the explicit unregistered signal may mark staleness"
    );
}

/// Test: provider responses map back onto recipients by position
#[test]
fn test_response_maps_onto_batch_by_position() -> Result<()> {
    let tokens = vec!["a".to_string(), "b".to_string(), "c".to_string()];
    let response = MulticastResponse {
        success_count: 2,
        failure_count: 1,
        responses: vec![
            sent("projects/demo/messages/1"),
            rejected("messaging/internal-error", "Internal error encountered"),
            sent("projects/demo/messages/2"),
        ],
    };

    let outcomes = map_outcomes(&tokens, response)?;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].success);
    assert_eq!(outcomes[1].recipient, "b");
    assert!(!outcomes[1].success);
    assert_eq!(
        outcomes[1].error_code.as_deref(),
        Some("messaging/internal-error")
    );
    assert_eq!(
        outcomes[1].error_message.as_deref(),
        Some("Internal error encountered")
    );
    assert!(outcomes[2].success);

    Ok(())
}

/// Test: a response that does not match the batch size is a transport error
#[test]
fn test_mismatched_response_length_is_rejected() {
    let tokens = vec!["a".to_string(), "b".to_string()];
    let response = MulticastResponse {
        success_count: 1,
        failure_count: 0,
        responses: vec![sent("projects/demo/messages/1")],
    };

    assert_err!(map_outcomes(&tokens, response));
}

fn success(recipient: &str) -> DeliveryOutcome {
    DeliveryOutcome {
        recipient: recipient.to_string(),
        success: true,
        error_code: None,
        error_message: None,
    }
}

fn failure(recipient: &str, code: Option<&str>, message: Option<&str>) -> DeliveryOutcome {
    DeliveryOutcome {
        recipient: recipient.to_string(),
        success: false,
        error_code: code.map(str::to_string),
        error_message: message.map(str::to_string),
    }
}

fn sent(message_id: &str) -> SendResponse {
    SendResponse {
        success: true,
        message_id: Some(message_id.to_string()),
        error: None,
    }
}

fn rejected(code: &str, message: &str) -> SendResponse {
    SendResponse {
        success: false,
        message_id: None,
        error: Some(SendError {
            code: Some(code.to_string()),
            message: Some(message.to_string()),
        }),
    }
}
