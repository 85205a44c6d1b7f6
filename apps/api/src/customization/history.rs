//! Linear undo/redo over configuration snapshots.

use crate::customization::template_config::TemplateConfig;

/// Ordered snapshots plus a cursor at the active one.
///
/// Empty only before the first load. Once populated, `cursor < snapshots.len()`
/// always holds. Recording while the cursor is behind the end drops the redo
/// branch before appending.
#[derive(Debug, Clone, Default)]
pub struct ConfigHistory {
    snapshots: Vec<TemplateConfig>,
    cursor: usize,
}

impl ConfigHistory {
    /// Replaces the whole history with `[initial]`.
    pub fn reset(&mut self, initial: TemplateConfig) {
        self.snapshots.clear();
        self.snapshots.push(initial);
        self.cursor = 0;
    }

    /// Appends `next` after the cursor, discarding any redo branch.
    pub fn record(&mut self, next: TemplateConfig) -> &TemplateConfig {
        if !self.snapshots.is_empty() {
            self.snapshots.truncate(self.cursor + 1);
        }
        self.snapshots.push(next);
        self.cursor = self.snapshots.len() - 1;
        &self.snapshots[self.cursor]
    }

    /// Steps back one snapshot. At the start this is a no-op that still
    /// returns the current snapshot.
    pub fn undo(&mut self) -> Option<&TemplateConfig> {
        if self.can_undo() {
            self.cursor -= 1;
        }
        self.current()
    }

    pub fn redo(&mut self) -> Option<&TemplateConfig> {
        if self.can_redo() {
            self.cursor += 1;
        }
        self.current()
    }

    pub fn current(&self) -> Option<&TemplateConfig> {
        self.snapshots.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
