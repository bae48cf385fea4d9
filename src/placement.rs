//! Drag model: drag sources, drop targets, and the gesture state machine.
//!
//! The host's drag-and-drop layer reports three things: what is being
//! dragged ([`DragSource`]), what is under the pointer ([`DropTarget`]), and
//! when the gesture ends. This module turns those into at most one
//! [`Placement`] per event. It never mutates the document itself; the engine
//! applies what comes back.
//!
//! Targets nest. A field inside a panel sits on the panel, which sits on the
//! canvas. Resolution walks that chain innermost first and the first target
//! that accepts the source owns the drop; outer targets never see it.

#[cfg(test)]
#[path = "placement_test.rs"]
mod placement_test;

use crate::doc::{DocStore, Location};
use crate::field::{FieldId, FieldKind};

/// An existing field being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldToken {
    /// Id of the dragged field.
    pub id: FieldId,
    /// Top-level index when the drag started or after the last hover reorder.
    /// `None` for nested fields.
    pub index: Option<usize>,
    /// Panel holding the field, if it is nested.
    pub nested_in: Option<FieldId>,
    /// Whether the dragged field is a panel.
    pub is_panel: bool,
}

impl FieldToken {
    /// Build a token for `id` from its current place in `doc`.
    #[must_use]
    pub fn for_field(doc: &DocStore, id: &FieldId) -> Option<Self> {
        let field = doc.get(id)?;
        let (index, nested_in) = match doc.location(id)? {
            Location::TopLevel(i) => (Some(i), None),
            Location::Nested { panel, .. } => (None, Some(panel)),
        };
        Some(Self { id: *id, index, nested_in, is_panel: field.is_panel() })
    }

    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.nested_in.is_some()
    }
}

/// What is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// A toolbox entry: drop creates a new field of this kind.
    Tool(FieldKind),
    /// An existing field: drop relocates it.
    Field(FieldToken),
}

/// What is under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    /// Empty canvas area.
    Canvas,
    /// A top-level, non-panel field.
    Field { id: FieldId, index: usize },
    /// A top-level panel, header or body.
    Panel { id: FieldId, index: usize },
    /// A field inside a panel.
    NestedField { panel_id: FieldId, id: FieldId },
}

/// A resolved document mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Create a field of this kind at the end of the top level.
    AppendField(FieldKind),
    /// Create a field of this kind at the end of a panel.
    AddToPanel { panel_id: FieldId, kind: FieldKind },
    /// Reorder the top level.
    Reorder { from: usize, to: usize },
    /// Relocate an existing field to the end of a panel.
    MoveIntoPanel { panel_id: FieldId, field_id: FieldId },
    /// Relocate a nested field to the end of the top level.
    MoveToTopLevel { field_id: FieldId },
}

/// The chain of targets under the pointer, innermost first.
fn chain(target: DropTarget, doc: &DocStore) -> Vec<DropTarget> {
    match target {
        DropTarget::Canvas => vec![DropTarget::Canvas],
        DropTarget::Field { .. } | DropTarget::Panel { .. } => vec![target, DropTarget::Canvas],
        DropTarget::NestedField { panel_id, .. } => {
            let mut out = vec![target];
            if let Some(Location::TopLevel(index)) = doc.location(&panel_id) {
                out.push(DropTarget::Panel { id: panel_id, index });
            }
            out.push(DropTarget::Canvas);
            out
        }
    }
}

/// Whether `target` by itself will take a drop of `source`.
///
/// Panels refuse panels, whether a panel tool or an existing panel. Nested
/// fields take nothing themselves; their panel does.
#[must_use]
pub fn can_drop(source: &DragSource, target: &DropTarget) -> bool {
    match (source, target) {
        (_, DropTarget::NestedField { .. }) => false,
        (DragSource::Tool(_), DropTarget::Canvas | DropTarget::Field { .. }) => true,
        (DragSource::Tool(kind), DropTarget::Panel { .. }) => !kind.is_panel(),
        (DragSource::Field(token), DropTarget::Panel { id, .. }) => !token.is_panel && token.id != *id,
        (DragSource::Field(token), DropTarget::Canvas) => token.is_nested(),
        (DragSource::Field(token), DropTarget::Field { id, .. }) => !token.is_panel && token.id != *id,
    }
}

/// Resolve a terminal drop.
///
/// Returns `None` when nothing accepts the drop, when the accepting target
/// has nothing left to do, or when a dragged field is no longer in `doc`.
#[must_use]
pub fn resolve_drop(source: &DragSource, target: DropTarget, doc: &DocStore) -> Option<Placement> {
    if let DragSource::Field(token) = source {
        if !doc.contains(&token.id) {
            return None;
        }
        // Panels never nest, so a panel dropped on a panel only reorders.
        if token.is_panel {
            let over = reorder_owner(token, target, doc)?;
            return reorder_to(token, &over, doc);
        }
    }
    let owner = chain(target, doc).into_iter().find(|t| can_drop(source, t))?;
    match (source, owner) {
        (DragSource::Tool(kind), DropTarget::Canvas | DropTarget::Field { .. }) => Some(Placement::AppendField(*kind)),
        (DragSource::Tool(kind), DropTarget::Panel { id, .. }) => {
            Some(Placement::AddToPanel { panel_id: id, kind: *kind })
        }
        (DragSource::Field(token), DropTarget::Panel { id, .. }) => {
            Some(Placement::MoveIntoPanel { panel_id: id, field_id: token.id })
        }
        (DragSource::Field(token), DropTarget::Canvas | DropTarget::Field { .. }) if token.is_nested() => {
            Some(Placement::MoveToTopLevel { field_id: token.id })
        }
        (DragSource::Field(token), DropTarget::Field { id, .. }) => reorder_to(token, &id, doc),
        _ => None,
    }
}

/// Resolve a hover. Only reorders happen on hover: a top-level field over
/// another top-level field, or a panel over another panel.
#[must_use]
pub fn resolve_hover(source: &DragSource, target: DropTarget, doc: &DocStore) -> Option<Placement> {
    let DragSource::Field(token) = source else {
        return None;
    };
    let over = reorder_owner(token, target, doc)?;
    reorder_to(token, &over, doc)
}

/// The top-level field whose slot `token` would take when held over
/// `target`, if that pairing reorders at all.
fn reorder_owner(token: &FieldToken, target: DropTarget, doc: &DocStore) -> Option<FieldId> {
    if token.is_nested() {
        return None;
    }
    chain(target, doc).into_iter().find_map(|t| match t {
        DropTarget::Field { id, .. } if !token.is_panel => Some(id),
        DropTarget::Panel { id, .. } if token.is_panel && id != token.id => Some(id),
        _ => None,
    })
}

/// Move `token` into the live top-level slot of `over`. The index carried
/// by the drop target is not trusted.
fn reorder_to(token: &FieldToken, over: &FieldId, doc: &DocStore) -> Option<Placement> {
    let Some(Location::TopLevel(from)) = doc.location(&token.id) else {
        return None;
    };
    let Some(Location::TopLevel(to)) = doc.location(over) else {
        return None;
    };
    (from != to).then_some(Placement::Reorder { from, to })
}

/// State of the drag gesture between start and drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragGesture {
    /// No drag in progress.
    #[default]
    Idle,
    /// A drag is in progress.
    Dragging {
        /// What is being dragged. A field token's index tracks hover reorders.
        source: DragSource,
        /// The target under the pointer at the last hover event.
        hover: Option<DropTarget>,
        /// The field the last hover reorder swapped with. Hovering or
        /// dropping over it again does nothing until the pointer leaves it.
        settled_on: Option<FieldId>,
    },
}

impl DragGesture {
    /// Start dragging `source`, abandoning any gesture already in progress.
    pub fn begin(&mut self, source: DragSource) {
        *self = Self::Dragging { source, hover: None, settled_on: None };
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// What is being dragged.
    #[must_use]
    pub fn source(&self) -> Option<DragSource> {
        match self {
            Self::Idle => None,
            Self::Dragging { source, .. } => Some(*source),
        }
    }

    /// Pointer moved over `target`. Returns a reorder once the pointer crosses
    /// onto another field's slot; the token then adopts that index, and
    /// further hovering over the same field is side-effect free.
    pub fn hover(&mut self, target: DropTarget, doc: &DocStore) -> Option<Placement> {
        let Self::Dragging { source, hover, settled_on } = self else {
            return None;
        };
        *hover = Some(target);
        let DragSource::Field(token) = source else {
            return None;
        };
        let over = reorder_owner(token, target, doc);
        if over.is_some() && over == *settled_on {
            return None;
        }
        *settled_on = None;
        let over = over?;
        let placement = reorder_to(token, &over, doc)?;
        if let Placement::Reorder { to, .. } = placement {
            token.index = Some(to);
        }
        *settled_on = Some(over);
        Some(placement)
    }

    /// Pointer released over `target`. Ends the gesture.
    pub fn drop(&mut self, target: DropTarget, doc: &DocStore) -> Option<Placement> {
        let Self::Dragging { source, settled_on, .. } = std::mem::take(self) else {
            return None;
        };
        if let DragSource::Field(token) = &source {
            if settled_on.is_some() && reorder_owner(token, target, doc) == settled_on {
                return None;
            }
        }
        resolve_drop(&source, target, doc)
    }

    /// Abandon the gesture without touching the document. Returns true if a
    /// drag was in progress.
    pub fn cancel(&mut self) -> bool {
        std::mem::take(self).is_active()
    }
}
