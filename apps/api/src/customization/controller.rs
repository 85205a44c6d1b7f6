//! The customization controller: the only entry point callers use to change a
//! resume's template config.
//!
//! Every user-visible mutation becomes exactly one history entry. Loading runs
//! in two phases (`begin_load` / `finish_load`) so a caller can release its lock
//! around the fetch; a load that was overtaken by a newer identifier change is
//! discarded when it finishes. While a load is pending, mutations and saves are
//! rejected with `LoadInProgress` and undo/redo do nothing, so no edit can be
//! recorded and then wiped by the load's reset.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::customization::history::ConfigHistory;
use crate::customization::presets::{default_config, SpacingPreset};
use crate::customization::store::{ConfigStore, PersistenceError};
use crate::customization::template_config::{
    ConfigField, ConfigPatch, ConfigValue, TemplateConfig,
};
use crate::customization::CustomizationError;

/// Identifies one in-flight load. Only the ticket from the most recent
/// `begin_load` is accepted by `finish_load`.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    generation: u64,
    template_id: String,
    resume_id: Option<Uuid>,
}

impl LoadTicket {
    /// Fetches the saved document this ticket is for. A ticket without a
    /// resume has nothing saved.
    pub async fn fetch(&self, store: &dyn ConfigStore) -> Result<Option<Value>, PersistenceError> {
        match self.resume_id {
            Some(resume_id) => store.fetch_config(resume_id).await,
            None => Ok(None),
        }
    }
}

/// Read-only view of the controller for callers and the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigState {
    pub template_id: String,
    pub resume_id: Option<Uuid>,
    pub config: Option<TemplateConfig>,
    pub cursor: usize,
    pub history_len: usize,
    pub can_undo: bool,
    pub can_redo: bool,
    pub loading: bool,
}

pub struct CustomizationController {
    template_id: String,
    resume_id: Option<Uuid>,
    history: ConfigHistory,
    store: Arc<dyn ConfigStore>,
    load_generation: u64,
    loading: bool,
}

impl CustomizationController {
    /// Creates an unloaded controller. Call `load` (or `begin_load` /
    /// `finish_load`) before mutating.
    pub fn new(store: Arc<dyn ConfigStore>, template_id: &str, resume_id: Option<Uuid>) -> Self {
        Self {
            template_id: template_id.to_string(),
            resume_id,
            history: ConfigHistory::default(),
            store,
            load_generation: 0,
            loading: false,
        }
    }

    pub fn store(&self) -> Arc<dyn ConfigStore> {
        Arc::clone(&self.store)
    }

    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn resume_id(&self) -> Option<Uuid> {
        self.resume_id
    }

    pub fn config(&self) -> Option<&TemplateConfig> {
        self.history.current()
    }

    pub fn can_undo(&self) -> bool {
        !self.loading && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        !self.loading && self.history.can_redo()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn state(&self) -> ConfigState {
        ConfigState {
            template_id: self.template_id.clone(),
            resume_id: self.resume_id,
            config: self.history.current().cloned(),
            cursor: self.history.cursor(),
            history_len: self.history.len(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            loading: self.loading,
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Mutations
    // ────────────────────────────────────────────────────────────────────────

    /// Changes one field and records the result.
    ///
    /// Setting `spacingPreset` to a known preset also rewrites the derived
    /// spacing fields; an unknown preset name is stored as-is.
    pub fn update_field(
        &mut self,
        field: ConfigField,
        value: ConfigValue,
    ) -> Result<&TemplateConfig, CustomizationError> {
        let current = self.loaded()?;
        let next = apply_change(current, field, &value)?;
        debug!("Template config field {} updated", field.key());
        Ok(self.history.record(next))
    }

    /// Applies several field changes as a single history entry. The patch is
    /// all-or-nothing and an empty patch records nothing.
    pub fn bulk_update(&mut self, patch: &ConfigPatch) -> Result<&TemplateConfig, CustomizationError> {
        if patch.is_empty() {
            return self.loaded();
        }
        let current = self.loaded()?;

        // Preset first so explicit spacing values in the same patch win.
        let mut next = match patch.get(ConfigField::SpacingPreset) {
            Some(preset) => apply_change(current, ConfigField::SpacingPreset, preset)?,
            None => current.clone(),
        };
        for (field, value) in patch.iter() {
            if field != ConfigField::SpacingPreset {
                next = next.with_value(field, value)?;
            }
        }

        debug!("Template config bulk update of {} fields", patch.len());
        Ok(self.history.record(next))
    }

    /// Records the active template's defaults. Undoable like any other edit.
    pub fn reset_to_defaults(&mut self) -> Result<&TemplateConfig, CustomizationError> {
        self.loaded()?;
        let defaults = default_config(&self.template_id);
        Ok(self.history.record(defaults))
    }

    /// Steps back one snapshot. No-op while a load is pending.
    pub fn undo(&mut self) -> Option<&TemplateConfig> {
        if self.loading {
            return self.history.current();
        }
        self.history.undo()
    }

    pub fn redo(&mut self) -> Option<&TemplateConfig> {
        if self.loading {
            return self.history.current();
        }
        self.history.redo()
    }

    // ────────────────────────────────────────────────────────────────────────
    // Persistence
    // ────────────────────────────────────────────────────────────────────────

    /// Writes the current snapshot. History is never touched, whether the
    /// write succeeds or not.
    pub async fn save(&self) -> Result<(), CustomizationError> {
        let resume_id = self.resume_id.ok_or(CustomizationError::NoResume)?;
        let config = self.loaded()?;
        self.store.store_config(resume_id, config).await?;
        info!("Template config saved for resume {resume_id}");
        Ok(())
    }

    /// Loads the saved config for `resume_id`, falling back to the template
    /// defaults when nothing is saved or the fetch fails.
    pub async fn load(&mut self, resume_id: Uuid) -> bool {
        self.resume_id = Some(resume_id);
        let ticket = self.begin_load();
        let result = ticket.fetch(self.store.as_ref()).await;
        self.finish_load(ticket, result)
    }

    /// Switches template and/or resume: history restarts at the new
    /// template's defaults right away, then the saved config is loaded.
    pub async fn on_identifier_changed(&mut self, template_id: &str, resume_id: Option<Uuid>) -> bool {
        let ticket = self.switch_identifiers(template_id, resume_id);
        let result = ticket.fetch(self.store.as_ref()).await;
        self.finish_load(ticket, result)
    }

    /// Synchronous half of `on_identifier_changed`.
    pub fn switch_identifiers(&mut self, template_id: &str, resume_id: Option<Uuid>) -> LoadTicket {
        self.template_id = template_id.to_string();
        self.resume_id = resume_id;
        self.history.reset(default_config(template_id));
        self.begin_load()
    }

    /// Starts a load for the current identifiers and supersedes any load
    /// still in flight.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.load_generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.load_generation,
            template_id: self.template_id.clone(),
            resume_id: self.resume_id,
        }
    }

    /// Applies a fetch result. Returns `false` if the ticket was superseded,
    /// in which case nothing changes.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<Value>, PersistenceError>,
    ) -> bool {
        if ticket.generation != self.load_generation {
            debug!(
                "Discarding superseded template config load (generation {} < {})",
                ticket.generation, self.load_generation
            );
            return false;
        }

        let defaults = default_config(&ticket.template_id);
        let initial = match result {
            Ok(Some(saved)) => defaults.merged_with(&saved),
            Ok(None) => defaults,
            Err(e) => {
                warn!(
                    "Failed to load template config for resume {:?}, using defaults: {e}",
                    ticket.resume_id
                );
                defaults
            }
        };
        self.history.reset(initial);
        self.loading = false;
        true
    }

    fn loaded(&self) -> Result<&TemplateConfig, CustomizationError> {
        if self.loading {
            return Err(CustomizationError::LoadInProgress);
        }
        self.history.current().ok_or(CustomizationError::NotLoaded)
    }
}

/// Single-field change with preset expansion.
fn apply_change(
    config: &TemplateConfig,
    field: ConfigField,
    value: &ConfigValue,
) -> Result<TemplateConfig, CustomizationError> {
    let next = config.with_value(field, value)?;
    if field != ConfigField::SpacingPreset {
        return Ok(next);
    }
    match SpacingPreset::from_name(&next.spacing_preset) {
        Some(preset) => Ok(preset.apply_to(&next)),
        None => {
            debug!("Unknown spacing preset '{}', spacing left as-is", next.spacing_preset);
            Ok(next)
        }
    }
}
