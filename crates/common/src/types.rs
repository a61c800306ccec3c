use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

/// An event produced by the host's event processors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// IDs of the streams the triggering messages were routed through.
    #[serde(default)]
    pub source_streams: Vec<String>,
}

/// The definition that produced an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDefinition {
    pub title: String,
    /// Host priority: 1 = low, 2 = normal, 3 = high.
    #[serde(default)]
    pub priority: i32,
    /// Search query of the underlying aggregation, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// A resolved stream reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRef {
    pub id: String,
    pub title: String,
}

/// Everything a notification needs to describe one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventNotificationContext {
    pub event: Event,
    /// Absent when the definition was deleted before the notification ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_definition: Option<EventDefinition>,
    /// Source streams resolved by the host.
    #[serde(default)]
    pub streams: Vec<StreamRef>,
}

impl EventNotificationContext {
    /// Source stream IDs of the event in a stable order.
    pub fn stream_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.event.source_streams.iter().map(String::as_str).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Streams sorted by ID.
    pub fn sorted_streams(&self) -> Vec<&StreamRef> {
        let mut streams: Vec<&StreamRef> = self.streams.iter().collect();
        streams.sort_by(|a, b| a.id.cmp(&b.id));
        streams
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_context() {
        let json = r#"{
            "event": {"message": "disk full", "timestamp": "2024-05-01T12:00:00Z"}
        }"#;
        let ctx: EventNotificationContext = serde_json::from_str(json).unwrap();
        assert_eq!(ctx.event.message, "disk full");
        assert!(ctx.event.source_streams.is_empty());
        assert!(ctx.event_definition.is_none());
        assert!(ctx.streams.is_empty());
    }

    #[test]
    fn source_stream_ids_are_sorted_and_unique() {
        let ctx = EventNotificationContext {
            event: Event {
                message: "m".into(),
                timestamp: DateTime::<Utc>::UNIX_EPOCH,
                source_streams: vec!["b".into(), "a".into(), "b".into()],
            },
            event_definition: None,
            streams: vec![
                StreamRef {
                    id: "b".into(),
                    title: "B".into(),
                },
                StreamRef {
                    id: "a".into(),
                    title: "A".into(),
                },
                StreamRef {
                    id: "b".into(),
                    title: "B again".into(),
                },
            ],
        };
        assert_eq!(ctx.stream_ids(), vec!["a", "b"]);
        assert_eq!(ctx.sorted_streams()[0].title, "A");
    }

    #[test]
    fn stream_ids_ignore_resolved_streams() {
        let ctx = EventNotificationContext {
            event: Event {
                message: "m".into(),
                timestamp: DateTime::<Utc>::UNIX_EPOCH,
                source_streams: vec!["0001".into()],
            },
            event_definition: None,
            streams: vec![],
        };
        assert_eq!(ctx.stream_ids(), vec!["0001"]);
        assert!(ctx.sorted_streams().is_empty());
    }
}
