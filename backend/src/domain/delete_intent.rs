//! Classifies inbound events as removals rather than upserts.

use serde_json::Value;

use super::coercion::coerce_string;

const DELETE_TOPIC_MARKERS: [&str; 3] = ["deleted", "trash", "removed"];
const DELETE_STATUSES: [&str; 2] = ["trash", "deleted"];

/// Whether an event should delete the record instead of upserting it.
///
/// Either signal is sufficient: a topic mentioning deletion, trashing or
/// removal (case-insensitive), or a record `status` of `trash`/`deleted`.
pub fn is_delete_intent(topic: Option<&str>, record: &Value) -> bool {
    let topic_says_delete = topic.is_some_and(|topic| {
        let topic = topic.to_ascii_lowercase();
        DELETE_TOPIC_MARKERS
            .iter()
            .any(|marker| topic.contains(marker))
    });
    topic_says_delete || has_delete_status(record)
}

/// Whether the record's own status marks it as removed upstream.
pub fn has_delete_status(record: &Value) -> bool {
    coerce_string(record.get("status")).is_some_and(|status| {
        DELETE_STATUSES
            .iter()
            .any(|marker| status.eq_ignore_ascii_case(marker))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Some("order.updated"), json!({"id": 1, "status": "trash"}), true)]
    #[case(Some("booking.updated"), json!({"id": 1, "status": "Deleted"}), true)]
    #[case(Some("order.deleted"), json!({"id": 1, "status": "processing"}), true)]
    #[case(Some("Order.Trashed"), json!({"id": 1}), true)]
    #[case(Some("booking.removed"), json!({"id": 1}), true)]
    #[case(None, json!({"id": 1, "status": "trash"}), true)]
    #[case(Some("order.updated"), json!({"id": 1, "status": "completed"}), false)]
    #[case(Some("order.created"), json!({"id": 1}), false)]
    #[case(None, json!({"id": 1, "status": "trashed-by-admin"}), false)]
    fn classifies_delete_intent(
        #[case] topic: Option<&str>,
        #[case] record: Value,
        #[case] expected: bool,
    ) {
        assert_eq!(is_delete_intent(topic, &record), expected);
    }
}
