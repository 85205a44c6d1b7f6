// Template customization: config value type, preset tables, undo/redo history,
// persistence seam, and the controller that ties them together for the editor.

pub mod controller;
pub mod handlers;
pub mod history;
pub mod presets;
pub mod sessions;
pub mod store;
pub mod template_config;

use thiserror::Error;

pub use controller::{ConfigState, CustomizationController};
pub use sessions::EditorSessions;
pub use store::{ConfigStore, PersistenceError, PgConfigStore};
pub use template_config::{ConfigField, ConfigPatch, ConfigValue, TemplateConfig};

#[derive(Debug, Error)]
pub enum CustomizationError {
    #[error("Unknown config field '{0}'")]
    InvalidField(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("No template config loaded yet")]
    NotLoaded,

    #[error("A template config load is in progress")]
    LoadInProgress,

    #[error("No resume attached to this editor session")]
    NoResume,

    #[error("Persistence failure: {0}")]
    Persistence(#[from] PersistenceError),
}
