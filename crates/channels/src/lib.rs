//! Notification channel plugin system.
//!
//! Each notification type (PagerDuty, and whatever else a host wires in)
//! implements the NotificationPlugin trait: a static descriptor, a config
//! schema with validate/normalize, and an optional sender used at dispatch
//! time. The registry is the host-side view over a set of plugins.

pub mod plugin;
pub mod registry;
pub mod schema;

pub use {
    plugin::{ComponentHandle, NotificationDescriptor, NotificationPlugin, NotificationSender},
    registry::{NotificationTypeRegistry, RegistryError},
    schema::{FieldDefault, FieldKind, FieldSpec, ValidationError},
};
