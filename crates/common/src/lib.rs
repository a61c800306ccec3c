//! Types shared between the notification host and channel implementations.

pub mod types;
