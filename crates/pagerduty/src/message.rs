//! Events API v2 trigger messages built from an event notification context.

use {
    chrono::{DateTime, Utc},
    pdnotify_channels::schema::check_url,
    pdnotify_common::types::EventNotificationContext,
    serde::{Deserialize, Serialize},
};

use crate::config::NotificationConfig;

/// Title used when the event definition is gone.
const UNDEFINED_TITLE: &str = "Undefined";

/// Fixed attribution of the originating system inside the payload.
const SOURCE_NAME: &str = "Graylog";
const COMPONENT: &str = "GraylogAlerts";
const CLASS: &str = "alerts";

/// PagerDuty truncates longer summaries; do it ourselves so keys stay stable.
const MAX_SUMMARY_CHARS: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
    Info,
}

impl Severity {
    /// Map a host event priority (1 low, 2 normal, 3 high) to a severity.
    pub fn from_priority(priority: Option<i32>) -> Self {
        match priority {
            Some(3) => Self::Critical,
            Some(2) => Self::Warning,
            _ => Self::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    pub summary: String,
    pub severity: Severity,
    pub source: String,
    pub component: String,
    pub group: String,
    pub class: String,
    pub timestamp: DateTime<Utc>,
}

/// A PagerDuty Events API v2 event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagerDutyMessage {
    pub routing_key: String,
    pub event_action: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dedup_key: String,
    pub client: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub client_url: String,
    #[serde(default)]
    pub links: Vec<Link>,
    pub payload: Payload,
}

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("client URL {url:?} is malformed: {reason}")]
    InvalidClientUrl { url: String, reason: String },
}

/// Builds trigger messages for one notification config.
pub struct MessageFactory<'a> {
    config: &'a NotificationConfig,
}

impl<'a> MessageFactory<'a> {
    pub fn new(config: &'a NotificationConfig) -> Self {
        Self { config }
    }

    pub fn create_trigger_message(
        &self,
        ctx: &EventNotificationContext,
    ) -> Result<PagerDutyMessage, MessageError> {
        let definition = ctx.event_definition.as_ref();
        let title = definition.map_or(UNDEFINED_TITLE, |d| d.title.as_str());
        let streams = format!("[{}]", ctx.stream_ids().join(", "));

        let dedup_key = if self.config.custom_incident {
            let prefix = &self.config.key_prefix;
            let prefix = prefix.strip_suffix('/').unwrap_or(prefix);
            format!("{prefix}/{streams}/{title}")
        } else {
            String::new()
        };

        Ok(PagerDutyMessage {
            routing_key: self.config.routing_key.clone(),
            event_action: "trigger".into(),
            dedup_key,
            client: self.config.client_name.clone(),
            client_url: self.config.client_url.clone(),
            links: self.stream_links(ctx)?,
            payload: Payload {
                summary: ctx.event.message.chars().take(MAX_SUMMARY_CHARS).collect(),
                severity: Severity::from_priority(definition.map(|d| d.priority)),
                source: format!("{SOURCE_NAME}:{streams}"),
                component: COMPONENT.into(),
                group: streams,
                class: CLASS.into(),
                timestamp: ctx.event.timestamp,
            },
        })
    }

    /// One search link per source stream, rooted at the client URL.
    fn stream_links(&self, ctx: &EventNotificationContext) -> Result<Vec<Link>, MessageError> {
        let client_url = self.config.client_url.as_str();
        if client_url.is_empty() {
            return Ok(Vec::new());
        }
        let invalid = |reason: String| MessageError::InvalidClientUrl {
            url: client_url.to_string(),
            reason,
        };
        let base = check_url(client_url).map_err(invalid)?;
        let query = ctx
            .event_definition
            .as_ref()
            .and_then(|d| d.query.as_deref())
            .filter(|q| !q.is_empty());

        ctx.sorted_streams()
            .into_iter()
            .map(|stream| {
                let mut href = base.clone();
                href.path_segments_mut()
                    .map_err(|()| invalid("URL cannot be a base".into()))?
                    .pop_if_empty()
                    .extend(["streams", stream.id.as_str(), "search"]);
                if let Some(query) = query {
                    href.query_pairs_mut().append_pair("q", query);
                }
                Ok(Link {
                    href: href.into(),
                    text: stream.title.clone(),
                })
            })
            .collect()
    }
}
