use std::collections::HashSet;

use ace_motivation::assessment::{extract_timestamp, generate_report_id, is_valid_report_id};
use chrono::Utc;

#[test]
fn generated_ids_validate_and_carry_their_creation_time() {
    let before = Utc::now().timestamp_millis();
    let ids: Vec<String> = (0..200).map(|_| generate_report_id()).collect();
    let after = Utc::now().timestamp_millis();

    for id in &ids {
        assert!(is_valid_report_id(id), "{id} should validate");
        assert!(id.starts_with("RPT-"));
        assert_eq!(id.to_uppercase(), *id);

        let timestamp = extract_timestamp(id).expect("timestamp present");
        assert!(
            (before..=after).contains(&timestamp),
            "{timestamp} outside [{before}, {after}]"
        );
    }

    let unique: HashSet<&String> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "random suffix should avoid collisions");
}

#[test]
fn malformed_ids_are_rejected() {
    for candidate in [
        "not-an-id",
        "",
        "RPT-",
        "RPT-LOYW3V28",
        "rpt-LOYW3V28-ABC123",
        "RPT-LOYW3V28-ABC12!",
        "RPT-LOYW3V28-ABC123-EXTRA",
    ] {
        assert!(!is_valid_report_id(candidate), "{candidate:?} should be rejected");
        assert_eq!(extract_timestamp(candidate), None, "{candidate:?}");
    }
}
