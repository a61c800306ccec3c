//! Host configuration: discovery, multi-format loading, `${VAR}` substitution.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{
        clear_config_dir, config_dir, discover_and_load, load_config, load_document, set_config_dir,
    },
    schema::{DEFAULT_EVENTS_API_URL, PagerDutyClientConfig, PdNotifyConfig},
};
