use std::{collections::HashMap, sync::Arc};

use {
    pdnotify_common::types::EventNotificationContext,
    serde_json::{Map, Value},
    tracing::debug,
};

use crate::{
    plugin::{NotificationDescriptor, NotificationPlugin},
    schema::ValidationError,
};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("notification type already registered: {0}")]
    DuplicateType(String),
    #[error("unknown notification type: {0}")]
    UnknownType(String),
    #[error("notification type {0} has no sender")]
    NoSender(String),
    #[error("invalid notification config: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Host-side registry of notification types, keyed by type identifier.
#[derive(Default)]
pub struct NotificationTypeRegistry {
    plugins: HashMap<String, Arc<dyn NotificationPlugin>>,
}

impl NotificationTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin. Type identifiers must be unique.
    pub fn register(&mut self, plugin: Arc<dyn NotificationPlugin>) -> Result<(), RegistryError> {
        let id = plugin.id().to_string();
        if self.plugins.contains_key(&id) {
            return Err(RegistryError::DuplicateType(id));
        }
        debug!(type_id = %id, name = plugin.display_name(), "registered notification type");
        self.plugins.insert(id, plugin);
        Ok(())
    }

    pub fn get(&self, type_id: &str) -> Option<&Arc<dyn NotificationPlugin>> {
        self.plugins.get(type_id)
    }

    fn require(&self, type_id: &str) -> Result<&Arc<dyn NotificationPlugin>, RegistryError> {
        self.get(type_id)
            .ok_or_else(|| RegistryError::UnknownType(type_id.to_string()))
    }

    /// Descriptors of every registered type, sorted by type identifier.
    pub fn descriptors(&self) -> Vec<&NotificationDescriptor> {
        let mut descriptors: Vec<_> = self.plugins.values().map(|p| p.descriptor()).collect();
        descriptors.sort_by_key(|d| d.type_id);
        descriptors
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Validate then normalize a candidate config for `type_id`.
    pub fn prepare(
        &self,
        type_id: &str,
        candidate: &Map<String, Value>,
    ) -> Result<Value, RegistryError> {
        let plugin = self.require(type_id)?;
        plugin.validate(candidate).map_err(RegistryError::Invalid)?;
        let config = plugin.normalize(candidate)?;
        debug!(type_id, "prepared notification config");
        Ok(config)
    }

    /// Hand a canonical config and event context to the type's sender.
    pub async fn dispatch(
        &self,
        type_id: &str,
        config: &Value,
        ctx: &EventNotificationContext,
    ) -> Result<(), RegistryError> {
        let plugin = self.require(type_id)?;
        let sender = plugin
            .sender()
            .ok_or_else(|| RegistryError::NoSender(type_id.to_string()))?;
        debug!(type_id, "dispatching notification");
        sender.execute(config, ctx).await?;
        Ok(())
    }
}
