//! Document store: the ordered field tree and its id index.
//!
//! The document is a two-level tree. The top level is an ordered list of
//! fields; any panel among them holds its own ordered list of children, and
//! children are never panels. Every id lives in exactly one place.
//!
//! `DocStore` is the only owner of that tree. Lookups go through a flat index
//! from id to [`Location`], which is rebuilt for whichever container a
//! structural mutation touched. Moves always extract before they reinsert, so
//! no field is ever visible in two places.
//!
//! Operations that name something that does not exist are no-ops; they
//! report that through their return value and a `debug` log line, never
//! through an error.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::{HashMap, HashSet};

use crate::field::{Field, FieldBody, FieldId, FieldKind};
use crate::ids::{IdSource, RandomIds};
use crate::patch::FieldPatch;

/// Where a field lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Position in the top-level sequence.
    TopLevel(usize),
    /// Position among a panel's children.
    Nested { panel: FieldId, position: usize },
}

impl Location {
    /// The panel holding the field, if it is nested.
    #[must_use]
    pub fn panel(self) -> Option<FieldId> {
        match self {
            Self::TopLevel(_) => None,
            Self::Nested { panel, .. } => Some(panel),
        }
    }
}

/// A broken structural invariant, reported by [`DocStore::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("field id {0} appears more than once")]
    DuplicateId(FieldId),
    #[error("panel {child} is nested inside panel {panel}")]
    NestedPanel { panel: FieldId, child: FieldId },
    #[error("index entry for {0} does not match its position")]
    StaleIndex(FieldId),
    #[error("index holds {indexed} entries but the tree holds {actual} fields")]
    IndexSize { indexed: usize, actual: usize },
}

/// In-memory store of form fields.
pub struct DocStore {
    fields: Vec<Field>,
    index: HashMap<FieldId, Location>,
    ids: Box<dyn IdSource>,
}

impl DocStore {
    /// Create an empty store that mints random ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ids(RandomIds)
    }

    /// Create an empty store that mints ids from `ids`.
    #[must_use]
    pub fn with_ids(ids: impl IdSource + 'static) -> Self {
        Self { fields: Vec::new(), index: HashMap::new(), ids: Box::new(ids) }
    }

    // --- Queries ---

    /// Top-level fields in display order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Owned copy of the current tree.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Field> {
        self.fields.clone()
    }

    /// Look up a field anywhere in the document.
    #[must_use]
    pub fn get(&self, id: &FieldId) -> Option<&Field> {
        match *self.index.get(id)? {
            Location::TopLevel(i) => self.fields.get(i),
            Location::Nested { panel, position } => self.children(&panel)?.get(position),
        }
    }

    /// Where a field lives, if it exists.
    #[must_use]
    pub fn location(&self, id: &FieldId) -> Option<Location> {
        self.index.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &FieldId) -> bool {
        self.index.contains_key(id)
    }

    /// Children of the panel `panel_id`, or `None` if that is not a panel.
    #[must_use]
    pub fn children(&self, panel_id: &FieldId) -> Option<&[Field]> {
        let Some(Location::TopLevel(i)) = self.index.get(panel_id) else {
            return None;
        };
        match &self.fields.get(*i)?.body {
            FieldBody::Panel(panel) => Some(&panel.children),
            _ => None,
        }
    }

    /// Whether `id` names a panel.
    #[must_use]
    pub fn is_panel(&self, id: &FieldId) -> bool {
        self.children(id).is_some()
    }

    /// Number of top-level fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the document has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields at every level.
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.index.len()
    }

    // --- Mutations ---

    /// Append a fresh field of `kind` to the top level and return its id.
    pub fn add_field(&mut self, kind: FieldKind) -> FieldId {
        let id = self.ids.next_id();
        self.index.insert(id, Location::TopLevel(self.fields.len()));
        self.fields.push(Field::template(kind, id));
        tracing::debug!(%id, %kind, "field added");
        id
    }

    /// Append a fresh field of `kind` to a panel's children.
    ///
    /// Returns `None` without minting an id if `panel_id` is not a panel or
    /// `kind` is itself a panel.
    pub fn add_field_to_panel(&mut self, panel_id: &FieldId, kind: FieldKind) -> Option<FieldId> {
        if kind.is_panel() {
            tracing::debug!(panel = %panel_id, "refusing to nest a new panel");
            return None;
        }
        if !self.is_panel(panel_id) {
            tracing::debug!(panel = %panel_id, "add to panel: not a panel");
            return None;
        }
        let id = self.ids.next_id();
        if self.push_child(panel_id, Field::template(kind, id)).is_err() {
            return None;
        }
        tracing::debug!(%id, %kind, panel = %panel_id, "field added to panel");
        Some(id)
    }

    /// Relocate an existing field to the end of a panel's children.
    ///
    /// The field is taken out of wherever it lives first, so this also works
    /// for moving between panels and for re-appending within the same panel.
    /// Returns false if either id is unknown, the target is not a panel, or
    /// the field is a panel.
    pub fn move_into_panel(&mut self, panel_id: &FieldId, field_id: &FieldId) -> bool {
        if panel_id == field_id || !self.is_panel(panel_id) {
            tracing::debug!(panel = %panel_id, field = %field_id, "move into panel: bad target");
            return false;
        }
        match self.get(field_id) {
            Some(field) if !field.is_panel() => {}
            _ => {
                tracing::debug!(panel = %panel_id, field = %field_id, "move into panel: bad source");
                return false;
            }
        }
        let Some(field) = self.extract(field_id) else {
            return false;
        };
        if let Err(field) = self.push_child(panel_id, field) {
            // `panel_id` was checked above. Keep the field at the top level.
            self.index.insert(field.id, Location::TopLevel(self.fields.len()));
            self.fields.push(field);
            return false;
        }
        tracing::debug!(panel = %panel_id, field = %field_id, "field moved into panel");
        true
    }

    /// Take a nested field out of its panel and append it to the top level.
    /// Returns false if the field is unknown or already top-level.
    pub fn move_to_top_level(&mut self, field_id: &FieldId) -> bool {
        if !matches!(self.location(field_id), Some(Location::Nested { .. })) {
            tracing::debug!(field = %field_id, "move to top level: not nested");
            return false;
        }
        let Some(field) = self.extract(field_id) else {
            return false;
        };
        self.index.insert(field.id, Location::TopLevel(self.fields.len()));
        self.fields.push(field);
        tracing::debug!(field = %field_id, "field moved to top level");
        true
    }

    /// Move the top-level field at `drag_index` so it ends up at `hover_index`.
    /// Returns false for equal or out-of-range indices.
    pub fn move_field(&mut self, drag_index: usize, hover_index: usize) -> bool {
        let len = self.fields.len();
        if drag_index == hover_index || drag_index >= len || hover_index >= len {
            return false;
        }
        let moved = self.fields.remove(drag_index);
        self.fields.insert(hover_index, moved);
        self.reindex_top();
        tracing::debug!(from = drag_index, to = hover_index, "field reordered");
        true
    }

    /// Merge `patch` into the field `id`, wherever it lives.
    ///
    /// A `children` replacement that would nest a panel, duplicate an id, or
    /// pull in a field that lives elsewhere is dropped from the patch; the
    /// remaining keys still apply. Returns false if `id` is unknown.
    pub fn update_field(&mut self, id: &FieldId, patch: &FieldPatch) -> bool {
        if !self.contains(id) {
            tracing::debug!(%id, "update: unknown field");
            return false;
        }

        let mut replace_children = false;
        let mut rejected = None;
        if let Some(children) = &patch.children {
            if self.is_panel(id) {
                match self.validate_children(id, children) {
                    Ok(()) => replace_children = true,
                    Err(e) => rejected = Some(e),
                }
            }
        }

        let stripped;
        let patch = if let Some(e) = rejected {
            tracing::warn!(%id, error = %e, "rejected children replacement");
            stripped = FieldPatch { children: None, ..patch.clone() };
            &stripped
        } else {
            patch
        };

        let old_children: Vec<FieldId> = if replace_children {
            self.children(id).unwrap_or_default().iter().map(|c| c.id).collect()
        } else {
            Vec::new()
        };

        let Some(field) = self.get_mut(id) else {
            return false;
        };
        patch.apply_to(field);

        if replace_children {
            for child in &old_children {
                self.index.remove(child);
            }
            self.reindex_panel(*id);
        }
        tracing::debug!(%id, "field updated");
        true
    }

    /// Remove a field from wherever it lives. Removing a panel discards its
    /// children with it.
    pub fn remove_field(&mut self, id: &FieldId) -> Option<Field> {
        let removed = self.extract(id);
        match &removed {
            Some(field) => tracing::debug!(%id, children = field.children().len(), "field removed"),
            None => tracing::debug!(%id, "remove: unknown field"),
        }
        removed
    }

    /// Remove `field_id` only if it is a child of `panel_id`.
    pub fn remove_field_from_panel(&mut self, panel_id: &FieldId, field_id: &FieldId) -> Option<Field> {
        if self.location(field_id).and_then(Location::panel) != Some(*panel_id) {
            tracing::debug!(panel = %panel_id, field = %field_id, "remove from panel: not a child");
            return None;
        }
        self.remove_field(field_id)
    }

    /// Verify the tree and index agree and the tree is well formed.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.id) {
                return Err(InvariantError::DuplicateId(field.id));
            }
            for child in field.children() {
                if child.is_panel() {
                    return Err(InvariantError::NestedPanel { panel: field.id, child: child.id });
                }
                if !seen.insert(child.id) {
                    return Err(InvariantError::DuplicateId(child.id));
                }
            }
        }
        for (i, field) in self.fields.iter().enumerate() {
            if self.index.get(&field.id) != Some(&Location::TopLevel(i)) {
                return Err(InvariantError::StaleIndex(field.id));
            }
            for (position, child) in field.children().iter().enumerate() {
                if self.index.get(&child.id) != Some(&Location::Nested { panel: field.id, position }) {
                    return Err(InvariantError::StaleIndex(child.id));
                }
            }
        }
        if self.index.len() != seen.len() {
            return Err(InvariantError::IndexSize { indexed: self.index.len(), actual: seen.len() });
        }
        Ok(())
    }

    // --- Internals ---

    fn get_mut(&mut self, id: &FieldId) -> Option<&mut Field> {
        match *self.index.get(id)? {
            Location::TopLevel(i) => self.fields.get_mut(i),
            Location::Nested { panel, position } => self.children_mut(&panel)?.get_mut(position),
        }
    }

    fn children_mut(&mut self, panel_id: &FieldId) -> Option<&mut Vec<Field>> {
        let Some(Location::TopLevel(i)) = self.index.get(panel_id) else {
            return None;
        };
        match &mut self.fields.get_mut(*i)?.body {
            FieldBody::Panel(panel) => Some(&mut panel.children),
            _ => None,
        }
    }

    /// Append `field` to a panel and index it. Hands the field back if
    /// `panel_id` is not a panel.
    fn push_child(&mut self, panel_id: &FieldId, field: Field) -> Result<(), Field> {
        let id = field.id;
        let Some(children) = self.children_mut(panel_id) else {
            return Err(field);
        };
        let position = children.len();
        children.push(field);
        self.index.insert(id, Location::Nested { panel: *panel_id, position });
        Ok(())
    }

    /// Detach a field from its container and drop it (and any children) from
    /// the index.
    fn extract(&mut self, id: &FieldId) -> Option<Field> {
        let field = match *self.index.get(id)? {
            Location::TopLevel(i) => {
                if i >= self.fields.len() {
                    return None;
                }
                let field = self.fields.remove(i);
                self.reindex_top();
                field
            }
            Location::Nested { panel, position } => {
                let children = self.children_mut(&panel)?;
                if position >= children.len() {
                    return None;
                }
                let field = children.remove(position);
                self.reindex_panel(panel);
                field
            }
        };
        self.index.remove(&field.id);
        for child in field.children() {
            self.index.remove(&child.id);
        }
        Some(field)
    }

    fn reindex_top(&mut self) {
        for (i, field) in self.fields.iter().enumerate() {
            self.index.insert(field.id, Location::TopLevel(i));
        }
    }

    fn reindex_panel(&mut self, panel_id: FieldId) {
        let Some(Location::TopLevel(i)) = self.index.get(&panel_id).copied() else {
            return;
        };
        let Some(field) = self.fields.get(i) else {
            return;
        };
        for (position, child) in field.children().iter().enumerate() {
            self.index.insert(child.id, Location::Nested { panel: panel_id, position });
        }
    }

    fn validate_children(&self, panel_id: &FieldId, children: &[Field]) -> Result<(), InvariantError> {
        let mut seen = HashSet::new();
        for child in children {
            if child.is_panel() {
                return Err(InvariantError::NestedPanel { panel: *panel_id, child: child.id });
            }
            if !seen.insert(child.id) || child.id == *panel_id {
                return Err(InvariantError::DuplicateId(child.id));
            }
            match self.location(&child.id) {
                None => {}
                Some(Location::Nested { panel, .. }) if panel == *panel_id => {}
                Some(_) => return Err(InvariantError::DuplicateId(child.id)),
            }
        }
        Ok(())
    }
}

impl Default for DocStore {
    fn default() -> Self {
        Self::new()
    }
}
