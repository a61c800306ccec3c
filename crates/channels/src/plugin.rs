use {
    anyhow::Result,
    async_trait::async_trait,
    pdnotify_common::types::EventNotificationContext,
    serde::Serialize,
    serde_json::{Map, Value},
};

use crate::schema::{self, FieldSpec, TYPE_FIELD, ValidationError};

/// Opaque reference to a UI component owned by the host (form or summary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComponentHandle(pub &'static str);

impl ComponentHandle {
    pub fn name(&self) -> &'static str {
        self.0
    }
}

/// Static metadata a host uses to list a notification type.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct NotificationDescriptor {
    /// Type identifier, e.g. "pagerduty-notification-v1". Never user-editable.
    #[serde(rename = "type")]
    pub type_id: &'static str,
    /// Human-readable name shown in the type picker.
    pub display_name: &'static str,
    pub form_component: ComponentHandle,
    pub summary_component: ComponentHandle,
    pub schema: &'static [FieldSpec],
}

impl NotificationDescriptor {
    /// Config a new notification of this type starts from, type tag included.
    pub fn default_config(&self) -> Value {
        let mut config = schema::defaults(self.schema);
        config.insert(TYPE_FIELD.into(), Value::String(self.type_id.into()));
        Value::Object(config)
    }
}

/// Core notification plugin trait. Each notification type implements this.
pub trait NotificationPlugin: Send + Sync {
    fn descriptor(&self) -> &NotificationDescriptor;

    /// Type identifier (e.g. "pagerduty-notification-v1").
    fn id(&self) -> &str {
        self.descriptor().type_id
    }

    /// Human-readable type name.
    fn display_name(&self) -> &str {
        self.descriptor().display_name
    }

    fn default_config(&self) -> Value {
        self.descriptor().default_config()
    }

    /// Check an untrusted candidate config, returning every violation.
    fn validate(&self, candidate: &Map<String, Value>) -> Result<(), Vec<ValidationError>>;

    /// Produce the canonical config for an already validated candidate.
    fn normalize(&self, candidate: &Map<String, Value>) -> Result<Value>;

    /// Get the sender used at dispatch time.
    fn sender(&self) -> Option<&dyn NotificationSender>;
}

/// Deliver an event notification using a canonical config.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn execute(&self, config: &Value, ctx: &EventNotificationContext) -> Result<()>;
}
