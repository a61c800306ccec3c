use {
    anyhow::Result,
    async_trait::async_trait,
    pdnotify_channels::{
        NotificationDescriptor, NotificationPlugin, NotificationSender, ValidationError,
    },
    pdnotify_common::types::EventNotificationContext,
    serde_json::{Map, Value},
    tracing::{info, warn},
};

use crate::{
    client::{ClientError, PagerDutyClient, PagerDutyResponse},
    config::{self, NotificationConfig},
    descriptor::DESCRIPTOR,
    message::{MessageError, MessageFactory},
};

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification config must be an object")]
    NotAnObject,
    #[error("invalid notification config: {0:?}")]
    InvalidConfig(Vec<ValidationError>),
    #[error(transparent)]
    Message(#[from] MessageError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("there was an error triggering the PagerDuty event, details: {0:?}")]
    Rejected(Vec<String>),
}

/// The PagerDuty notification type: descriptor, config handling, dispatch.
#[derive(Debug, Clone, Default)]
pub struct PagerDutyNotification {
    client: PagerDutyClient,
}

impl PagerDutyNotification {
    pub fn new(client: PagerDutyClient) -> Self {
        Self { client }
    }

    /// Run a stored config through validate + normalize.
    pub fn parse_config(value: &Value) -> Result<NotificationConfig, NotificationError> {
        let map = value.as_object().ok_or(NotificationError::NotAnObject)?;
        let validated = config::validate(map).map_err(NotificationError::InvalidConfig)?;
        Ok(config::normalize(&validated))
    }

    /// Build and send the trigger event for `ctx`.
    pub async fn notify(
        &self,
        config: &NotificationConfig,
        ctx: &EventNotificationContext,
    ) -> Result<PagerDutyResponse, NotificationError> {
        let message = MessageFactory::new(config).create_trigger_message(ctx)?;
        let response = self.client.trigger(&message).await?;
        if !response.errors.is_empty() {
            warn!(errors = ?response.errors, "PagerDuty reported errors");
            return Err(NotificationError::Rejected(response.errors));
        }
        info!(
            dedup_key = response.dedup_key.as_deref().unwrap_or_default(),
            "PagerDuty event triggered"
        );
        Ok(response)
    }
}

impl NotificationPlugin for PagerDutyNotification {
    fn descriptor(&self) -> &NotificationDescriptor {
        &DESCRIPTOR
    }

    fn validate(&self, candidate: &Map<String, Value>) -> Result<(), Vec<ValidationError>> {
        config::validate(candidate).map(|_| ())
    }

    fn normalize(&self, candidate: &Map<String, Value>) -> Result<Value> {
        let validated = config::validate(candidate).map_err(|errors| {
            anyhow::anyhow!("normalize called on an invalid config: {errors:?}")
        })?;
        Ok(serde_json::to_value(config::normalize(&validated))?)
    }

    fn sender(&self) -> Option<&dyn NotificationSender> {
        Some(self)
    }
}

#[async_trait]
impl NotificationSender for PagerDutyNotification {
    async fn execute(&self, config: &Value, ctx: &EventNotificationContext) -> Result<()> {
        let config = Self::parse_config(config)?;
        self.notify(&config, ctx).await?;
        Ok(())
    }
}
