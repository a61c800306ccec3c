//! PagerDuty notification config: schema, validation, normalization.
//!
//! Validation never mutates its input and reports every violation at once so
//! a form can highlight all offending fields. Normalization fills defaults
//! and trims strings; it is idempotent.

use {
    pdnotify_channels::schema::{self, FieldDefault, FieldKind, FieldSpec, ValidationError},
    serde::Serialize,
    serde_json::{Map, Value},
};

/// Immutable type tag of this notification type.
pub const TYPE_ID: &str = "pagerduty-notification-v1";

pub const ROUTING_KEY: FieldSpec = FieldSpec {
    name: "routing_key",
    label: "Routing Key",
    kind: FieldKind::String,
    required: true,
    default: FieldDefault::Str(""),
};

pub const CUSTOM_INCIDENT: FieldSpec = FieldSpec {
    name: "custom_incident",
    label: "Use Custom Incident Key",
    kind: FieldKind::Boolean,
    required: false,
    default: FieldDefault::Bool(true),
};

pub const KEY_PREFIX: FieldSpec = FieldSpec {
    name: "key_prefix",
    label: "Incident Key Prefix",
    kind: FieldKind::String,
    required: false,
    default: FieldDefault::Str("Graylog/"),
};

pub const CLIENT_NAME: FieldSpec = FieldSpec {
    name: "client_name",
    label: "Client Name",
    kind: FieldKind::String,
    required: false,
    default: FieldDefault::Str("Graylog"),
};

pub const CLIENT_URL: FieldSpec = FieldSpec {
    name: "client_url",
    label: "Client URL",
    kind: FieldKind::Url,
    required: false,
    default: FieldDefault::Str(""),
};

pub const SCHEMA: &[FieldSpec] = &[
    ROUTING_KEY,
    CUSTOM_INCIDENT,
    KEY_PREFIX,
    CLIENT_NAME,
    CLIENT_URL,
];

/// Canonical PagerDuty notification config.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "pagerduty-notification-v1")]
pub struct NotificationConfig {
    pub routing_key: String,
    pub custom_incident: bool,
    pub key_prefix: String,
    pub client_name: String,
    pub client_url: String,
}

impl std::fmt::Debug for NotificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationConfig")
            .field("routing_key", &"[REDACTED]")
            .field("custom_incident", &self.custom_incident)
            .field("key_prefix", &self.key_prefix)
            .field("client_name", &self.client_name)
            .field("client_url", &self.client_url)
            .finish()
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        normalize(&ValidatedConfig(Map::new()))
    }
}

/// A candidate config that passed [`validate`], kept exactly as submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig(Map<String, Value>);

impl ValidatedConfig {
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

impl From<&NotificationConfig> for ValidatedConfig {
    fn from(config: &NotificationConfig) -> Self {
        let mut map = Map::new();
        map.insert(schema::TYPE_FIELD.into(), Value::String(TYPE_ID.into()));
        map.insert(ROUTING_KEY.name.into(), config.routing_key.clone().into());
        map.insert(CUSTOM_INCIDENT.name.into(), config.custom_incident.into());
        map.insert(KEY_PREFIX.name.into(), config.key_prefix.clone().into());
        map.insert(CLIENT_NAME.name.into(), config.client_name.clone().into());
        map.insert(CLIENT_URL.name.into(), config.client_url.clone().into());
        Self(map)
    }
}

/// Validate an untrusted candidate, collecting every violation.
pub fn validate(candidate: &Map<String, Value>) -> Result<ValidatedConfig, Vec<ValidationError>> {
    let errors = schema::validate(SCHEMA, Some(TYPE_ID), candidate);
    if errors.is_empty() {
        Ok(ValidatedConfig(candidate.clone()))
    } else {
        Err(errors)
    }
}

/// Fill defaults for absent fields and trim every string field.
pub fn normalize(validated: &ValidatedConfig) -> NotificationConfig {
    let normalized = schema::normalize(SCHEMA, validated.as_map());
    let text = |spec: &FieldSpec| {
        normalized
            .get(spec.name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    NotificationConfig {
        routing_key: text(&ROUTING_KEY),
        custom_incident: normalized
            .get(CUSTOM_INCIDENT.name)
            .and_then(Value::as_bool)
            .unwrap_or_default(),
        key_prefix: text(&KEY_PREFIX),
        client_name: text(&CLIENT_NAME),
        client_url: text(&CLIENT_URL),
    }
}
