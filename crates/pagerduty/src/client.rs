//! PagerDuty Events API v2 client.

use std::time::Duration;

use {
    pdnotify_config::{DEFAULT_EVENTS_API_URL, PagerDutyClientConfig},
    reqwest::Client,
    serde::{Deserialize, Serialize},
    tracing::{debug, trace, warn},
};

use crate::message::PagerDutyMessage;

/// Response body of the enqueue endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerDutyResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedup_key: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to send PagerDuty event: {0}")]
    Request(#[from] reqwest::Error),
    #[error("PagerDuty rejected the event ({status}): {message} {errors:?}")]
    Rejected {
        status: u16,
        message: String,
        errors: Vec<String>,
    },
    #[error("PagerDuty request failed: {status} - {body}")]
    Status { status: u16, body: String },
    #[error("failed to parse PagerDuty response: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Posts trigger messages to the Events API.
#[derive(Debug, Clone)]
pub struct PagerDutyClient {
    client: Client,
    api_url: String,
}

impl Default for PagerDutyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PagerDutyClient {
    /// Client for the public Events API endpoint.
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            api_url: DEFAULT_EVENTS_API_URL.into(),
        }
    }

    /// Client built from host config (endpoint override, timeout).
    pub fn from_config(config: &PagerDutyClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("pdnotify/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: config.api_url.clone(),
        })
    }

    /// Point at a different enqueue endpoint.
    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Enqueue a trigger event.
    ///
    /// Error statuses with a JSON body become [`ClientError::Rejected`];
    /// anything else unparseable becomes [`ClientError::Status`].
    pub async fn trigger(
        &self,
        message: &PagerDutyMessage,
    ) -> Result<PagerDutyResponse, ClientError> {
        debug!(
            url = %self.api_url,
            dedup_key = %message.dedup_key,
            severity = ?message.payload.severity,
            "triggering PagerDuty event"
        );
        if let Ok(payload) = serde_json::to_string(&message.payload) {
            trace!(payload = %payload, "request payload");
        }

        let response = self
            .client
            .post(&self.api_url)
            .json(message)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = serde_json::from_str::<PagerDutyResponse>(&body);

        if status.is_success() {
            let parsed = parsed.map_err(ClientError::Decode)?;
            debug!(status = %status, dedup_key = ?parsed.dedup_key, "PagerDuty accepted event");
            return Ok(parsed);
        }

        warn!(status = %status, "PagerDuty request failed");
        match parsed {
            Ok(parsed) => Err(ClientError::Rejected {
                status: status.as_u16(),
                message: parsed.message,
                errors: parsed.errors,
            }),
            Err(_) => Err(ClientError::Status {
                status: status.as_u16(),
                body,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            config::NotificationConfig,
            message::{MessageFactory, Payload, Severity},
        },
        chrono::{DateTime, Utc},
        serde_json::json,
        wiremock::{
            Mock, MockServer, ResponseTemplate,
            matchers::{body_partial_json, method, path},
        },
    };

    fn message() -> PagerDutyMessage {
        PagerDutyMessage {
            routing_key: "01234567890123456789012345678901".into(),
            event_action: "trigger".into(),
            dedup_key: "Graylog/[0001]/Disk".into(),
            client: "Graylog".into(),
            client_url: String::new(),
            links: Vec::new(),
            payload: Payload {
                summary: "disk full".into(),
                severity: Severity::Critical,
                source: "Graylog:[0001]".into(),
                component: "GraylogAlerts".into(),
                group: "[0001]".into(),
                class: "alerts".into(),
                timestamp: DateTime::<Utc>::UNIX_EPOCH,
            },
        }
    }

    #[test]
    fn test_from_config() {
        let client = PagerDutyClient::from_config(&PagerDutyClientConfig {
            api_url: "http://localhost:1/enqueue".into(),
            timeout_secs: 3,
        })
        .unwrap();
        assert_eq!(client.api_url(), "http://localhost:1/enqueue");
        assert_eq!(PagerDutyClient::default().api_url(), DEFAULT_EVENTS_API_URL);
    }

    #[tokio::test]
    async fn test_successful_trigger() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/enqueue"))
            .and(body_partial_json(json!({
                "routing_key": "01234567890123456789012345678901",
                "event_action": "trigger",
                "dedup_key": "Graylog/[0001]/Disk",
                "payload": {"severity": "critical", "summary": "disk full"}
            })))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "status": "success",
                "message": "Event processed",
                "dedup_key": "Graylog/[0001]/Disk"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PagerDutyClient::new().with_api_url(format!("{}/v2/enqueue", server.uri()));
        let response = client.trigger(&message()).await.unwrap();
        assert_eq!(response.status, "success");
        assert_eq!(response.dedup_key.as_deref(), Some("Graylog/[0001]/Disk"));
        assert!(response.errors.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "status": "invalid event",
                "message": "Event object is invalid",
                "errors": ["Length of 'routing_key' is incorrect (should be 32 characters)"]
            })))
            .mount(&server)
            .await;

        let client = PagerDutyClient::new().with_api_url(server.uri());
        let err = client.trigger(&message()).await.unwrap_err();
        match err {
            ClientError::Rejected {
                status,
                message,
                errors,
            } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Event object is invalid");
                assert_eq!(errors.len(), 1);
            },
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
            .mount(&server)
            .await;

        let client = PagerDutyClient::new().with_api_url(server.uri());
        let err = client.trigger(&message()).await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Status { status: 503, ref body } if body == "upstream unavailable"
        ));
    }

    #[tokio::test]
    async fn test_unparseable_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).set_body_string("ok"))
            .mount(&server)
            .await;

        let client = PagerDutyClient::new().with_api_url(server.uri());
        let err = client.trigger(&message()).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let client = PagerDutyClient::new().with_api_url("http://127.0.0.1:1/v2/enqueue");
        let err = client.trigger(&message()).await.unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
    }

    #[tokio::test]
    async fn test_factory_message_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "client_url": "https://logs.example.com",
                "links": [{"href": "https://logs.example.com/streams/s1/search", "text": "All"}]
            })))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "status": "success",
                "message": "Event processed"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = NotificationConfig {
            routing_key: "k".into(),
            client_url: "https://logs.example.com".into(),
            ..NotificationConfig::default()
        };
        let ctx: pdnotify_common::types::EventNotificationContext = serde_json::from_value(json!({
            "event": {"message": "m", "timestamp": "2024-05-01T12:00:00Z"},
            "streams": [{"id": "s1", "title": "All"}]
        }))
        .unwrap();
        let message = MessageFactory::new(&config).create_trigger_message(&ctx).unwrap();

        let client = PagerDutyClient::new().with_api_url(server.uri());
        let response = client.trigger(&message).await.unwrap();
        assert!(response.dedup_key.is_none());
    }
}
