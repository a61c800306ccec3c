use pdnotify_channels::{ComponentHandle, NotificationDescriptor};

use crate::config::{SCHEMA, TYPE_ID};

/// How hosts list the PagerDuty notification type.
pub const DESCRIPTOR: NotificationDescriptor = NotificationDescriptor {
    type_id: TYPE_ID,
    display_name: "PagerDuty Notification",
    form_component: ComponentHandle("PagerDutyNotificationForm"),
    summary_component: ComponentHandle("PagerDutyNotificationSummary"),
    schema: SCHEMA,
};
