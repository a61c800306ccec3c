//! PagerDuty notification type.
//!
//! Declares the "pagerduty-notification-v1" type for a host's notification
//! registry: descriptor, config schema with validate/normalize, and the
//! dispatch path that turns an event into a PagerDuty Events API v2
//! trigger.

pub mod client;
pub mod config;
pub mod descriptor;
pub mod message;
pub mod notification;

use std::sync::Arc;

use pdnotify_channels::{NotificationTypeRegistry, RegistryError};

pub use {
    client::{ClientError, PagerDutyClient, PagerDutyResponse},
    config::{NotificationConfig, TYPE_ID, ValidatedConfig, normalize, validate},
    descriptor::DESCRIPTOR,
    message::{MessageError, MessageFactory, PagerDutyMessage, Severity},
    notification::{NotificationError, PagerDutyNotification},
};

/// Register the PagerDuty notification type with a host registry.
pub fn register(
    registry: &mut NotificationTypeRegistry,
    client: PagerDutyClient,
) -> Result<(), RegistryError> {
    registry.register(Arc::new(PagerDutyNotification::new(client)))
}
