//! Active-field tracking.
//!
//! At most one field is selected. The selection holds only an id; the live
//! field is resolved against the document on demand, so it can never point
//! at a stale copy.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use crate::doc::DocStore;
use crate::field::{Field, FieldId};

/// The currently selected field, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<FieldId>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn selected(&self) -> Option<FieldId> {
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, id: &FieldId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Select `id`. Returns true only if the selection changed; ids that are
    /// not in `doc` are ignored. Selecting a panel does not select its
    /// children.
    pub fn select(&mut self, id: FieldId, doc: &DocStore) -> bool {
        if !doc.contains(&id) || self.is_selected(&id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    /// Clear the selection. Returns true if something was selected.
    pub fn clear(&mut self) -> bool {
        self.selected.take().is_some()
    }

    /// Clear the selection if the selected field is gone from `doc`, e.g.
    /// after it or its panel was removed. Returns true if it was cleared.
    pub fn prune(&mut self, doc: &DocStore) -> bool {
        match self.selected {
            Some(id) if !doc.contains(&id) => self.clear(),
            _ => false,
        }
    }

    /// The live selected field.
    #[must_use]
    pub fn resolve<'a>(&self, doc: &'a DocStore) -> Option<&'a Field> {
        doc.get(self.selected.as_ref()?)
    }
}
