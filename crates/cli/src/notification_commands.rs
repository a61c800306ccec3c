use std::{io::Write, path::Path};

use {
    anyhow::{Context, Result, bail},
    pdnotify_channels::{NotificationTypeRegistry, RegistryError, schema::TYPE_FIELD},
    pdnotify_common::types::EventNotificationContext,
    pdnotify_config::{PdNotifyConfig, load_document},
    pdnotify_pagerduty::{MessageFactory, PagerDutyClient, PagerDutyNotification},
    serde_json::{Map, Value, json},
    tracing::debug,
};

/// Registry with every notification type this binary ships.
pub fn build_registry(config: &PdNotifyConfig) -> Result<NotificationTypeRegistry> {
    let client = PagerDutyClient::from_config(&config.pagerduty)?;
    let mut registry = NotificationTypeRegistry::new();
    pdnotify_pagerduty::register(&mut registry, client)?;
    Ok(registry)
}

fn write_json(out: &mut impl Write, value: &impl serde::Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn load_object(path: &Path) -> Result<Map<String, Value>> {
    match load_document(path)? {
        Value::Object(map) => Ok(map),
        _ => bail!("{} must contain an object", path.display()),
    }
}

fn load_context(path: &Path) -> Result<EventNotificationContext> {
    let value = load_document(path)?;
    serde_json::from_value(value).with_context(|| format!("invalid event in {}", path.display()))
}

pub fn types(registry: &NotificationTypeRegistry, out: &mut impl Write) -> Result<()> {
    let types: Vec<Value> = registry
        .descriptors()
        .into_iter()
        .map(|d| {
            json!({
                "type": d.type_id,
                "display_name": d.display_name,
                "form_component": d.form_component,
                "summary_component": d.summary_component,
                "default_config": d.default_config(),
            })
        })
        .collect();
    write_json(out, &types)
}

pub fn validate(
    registry: &NotificationTypeRegistry,
    path: &Path,
    type_id: Option<&str>,
    out: &mut impl Write,
) -> Result<()> {
    let candidate = load_object(path)?;
    let type_id = type_id
        .or_else(|| candidate.get(TYPE_FIELD).and_then(Value::as_str))
        .unwrap_or(pdnotify_pagerduty::TYPE_ID)
        .to_string();
    debug!(path = %path.display(), type_id = %type_id, "validating notification config");

    match registry.prepare(&type_id, &candidate) {
        Ok(config) => write_json(out, &config),
        Err(RegistryError::Invalid(errors)) => {
            write_json(out, &json!({ "errors": errors }))?;
            bail!("{} violation(s) in {}", errors.len(), path.display())
        },
        Err(e) => Err(e.into()),
    }
}

pub fn payload(config: &Path, event: &Path, out: &mut impl Write) -> Result<()> {
    let config = PagerDutyNotification::parse_config(&Value::Object(load_object(config)?))?;
    let ctx = load_context(event)?;
    let message = MessageFactory::new(&config).create_trigger_message(&ctx)?;
    write_json(out, &message)
}

pub async fn send(
    host: &PdNotifyConfig,
    config: &Path,
    event: &Path,
    out: &mut impl Write,
) -> Result<()> {
    let config = PagerDutyNotification::parse_config(&Value::Object(load_object(config)?))?;
    let ctx = load_context(event)?;
    let notification = PagerDutyNotification::new(PagerDutyClient::from_config(&host.pagerduty)?);
    let response = notification.notify(&config, &ctx).await?;
    write_json(out, &response)
}
