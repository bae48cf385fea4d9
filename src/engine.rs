use serde::Serialize;

use crate::consts::DEFAULT_FORM_TITLE;
use crate::doc::DocStore;
use crate::field::{Field, FieldId, FieldKind};
use crate::ids::IdSource;
use crate::patch::FieldPatch;
use crate::placement::{DragGesture, DragSource, DropTarget, FieldToken, Placement};
use crate::preview::Answers;
use crate::properties::{PropertyEdit, edit_to_patch};
use crate::render::{FieldView, InputChange, Mode, edit_patch, render_document};
use crate::selection::Selection;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from inbound calls for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "kebab-case")]
pub enum Action {
    FieldCreated(FieldId),
    FieldUpdated(FieldId),
    FieldMoved(FieldId),
    FieldRemoved(FieldId),
    SelectionChanged(Option<FieldId>),
    RenderNeeded,
}

/// Outbound view of the whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub title: String,
    pub fields: Vec<Field>,
    pub selected_id: Option<FieldId>,
}

/// Core engine state: the document plus everything layered on top of it.
///
/// Every inbound call runs to completion and returns the actions describing
/// what changed. An empty list means nothing did.
pub struct EngineCore {
    doc: DocStore,
    selection: Selection,
    drag: DragGesture,
    answers: Answers,
    title: String,
    mode: Mode,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::from_doc(DocStore::new())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose field ids come from `ids`.
    #[must_use]
    pub fn with_ids(ids: impl IdSource + 'static) -> Self {
        Self::from_doc(DocStore::with_ids(ids))
    }

    fn from_doc(doc: DocStore) -> Self {
        Self {
            doc,
            selection: Selection::new(),
            drag: DragGesture::Idle,
            answers: Answers::new(),
            title: DEFAULT_FORM_TITLE.to_owned(),
            mode: Mode::Edit,
        }
    }

    // --- Document mutations ---

    /// Append a new field and select it.
    pub fn add_field(&mut self, kind: FieldKind) -> Vec<Action> {
        let id = self.doc.add_field(kind);
        let mut actions = vec![Action::FieldCreated(id)];
        self.select_into(id, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Append a new field to a panel and select it.
    pub fn add_field_to_panel(&mut self, panel_id: &FieldId, kind: FieldKind) -> Vec<Action> {
        let Some(id) = self.doc.add_field_to_panel(panel_id, kind) else {
            return Vec::new();
        };
        let mut actions = vec![Action::FieldCreated(id)];
        self.select_into(id, &mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Reorder the top level.
    pub fn move_field(&mut self, drag_index: usize, hover_index: usize) -> Vec<Action> {
        let Some(id) = self.doc.fields().get(drag_index).map(|f| f.id) else {
            return Vec::new();
        };
        if !self.doc.move_field(drag_index, hover_index) {
            return Vec::new();
        }
        vec![Action::FieldMoved(id), Action::RenderNeeded]
    }

    /// Relocate an existing field to the end of a panel.
    pub fn move_into_panel(&mut self, panel_id: &FieldId, field_id: &FieldId) -> Vec<Action> {
        if !self.doc.move_into_panel(panel_id, field_id) {
            return Vec::new();
        }
        vec![Action::FieldMoved(*field_id), Action::RenderNeeded]
    }

    /// Relocate a nested field to the end of the top level.
    pub fn move_to_top_level(&mut self, field_id: &FieldId) -> Vec<Action> {
        if !self.doc.move_to_top_level(field_id) {
            return Vec::new();
        }
        vec![Action::FieldMoved(*field_id), Action::RenderNeeded]
    }

    /// Merge `patch` into a field. A `children` replacement can drop fields,
    /// so the selection and answers are pruned afterwards.
    pub fn update_field(&mut self, id: &FieldId, patch: &FieldPatch) -> Vec<Action> {
        if !self.doc.update_field(id, patch) {
            return Vec::new();
        }
        let mut actions = vec![Action::FieldUpdated(*id)];
        if patch.children.is_some() {
            self.prune_into(&mut actions);
        }
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn remove_field(&mut self, id: &FieldId) -> Vec<Action> {
        let Some(removed) = self.doc.remove_field(id) else {
            return Vec::new();
        };
        self.removed_into(removed)
    }

    pub fn remove_field_from_panel(&mut self, panel_id: &FieldId, field_id: &FieldId) -> Vec<Action> {
        let Some(removed) = self.doc.remove_field_from_panel(panel_id, field_id) else {
            return Vec::new();
        };
        self.removed_into(removed)
    }

    fn removed_into(&mut self, removed: Field) -> Vec<Action> {
        let mut actions = vec![Action::FieldRemoved(removed.id)];
        self.prune_into(&mut actions);
        actions.push(Action::RenderNeeded);
        actions
    }

    fn prune_into(&mut self, actions: &mut Vec<Action>) {
        if self.selection.prune(&self.doc) {
            actions.push(Action::SelectionChanged(None));
        }
        self.answers.retain_known(&self.doc);
    }

    // --- Selection ---

    pub fn select(&mut self, id: FieldId) -> Vec<Action> {
        let mut actions = Vec::new();
        self.select_into(id, &mut actions);
        if !actions.is_empty() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    fn select_into(&mut self, id: FieldId, actions: &mut Vec<Action>) {
        if self.selection.select(id, &self.doc) {
            actions.push(Action::SelectionChanged(Some(id)));
        }
    }

    pub fn clear_selection(&mut self) -> Vec<Action> {
        if self.selection.clear() {
            vec![Action::SelectionChanged(None), Action::RenderNeeded]
        } else {
            Vec::new()
        }
    }

    // --- Drag and drop ---

    /// Start dragging a toolbox entry.
    pub fn begin_tool_drag(&mut self, kind: FieldKind) {
        self.drag.begin(DragSource::Tool(kind));
    }

    /// Start dragging an existing field. Returns false if `id` is unknown.
    pub fn begin_field_drag(&mut self, id: &FieldId) -> bool {
        match FieldToken::for_field(&self.doc, id) {
            Some(token) => {
                self.drag.begin(DragSource::Field(token));
                true
            }
            None => {
                tracing::debug!(%id, "drag: unknown field");
                false
            }
        }
    }

    /// Start a drag from an already-built source.
    pub fn begin_drag(&mut self, source: DragSource) {
        self.drag.begin(source);
    }

    /// Pointer moved over `target` during a drag.
    pub fn hover(&mut self, target: DropTarget) -> Vec<Action> {
        match self.drag.hover(target, &self.doc) {
            Some(placement) => self.apply_placement(placement),
            None => Vec::new(),
        }
    }

    /// Pointer released over `target`. Ends the drag.
    pub fn drop(&mut self, target: DropTarget) -> Vec<Action> {
        match self.drag.drop(target, &self.doc) {
            Some(placement) => self.apply_placement(placement),
            None => Vec::new(),
        }
    }

    /// Abandon the drag. The document is untouched.
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    /// Apply a resolved placement to the document.
    pub fn apply_placement(&mut self, placement: Placement) -> Vec<Action> {
        tracing::debug!(?placement, "applying placement");
        match placement {
            Placement::AppendField(kind) => self.add_field(kind),
            Placement::AddToPanel { panel_id, kind } => self.add_field_to_panel(&panel_id, kind),
            Placement::Reorder { from, to } => self.move_field(from, to),
            Placement::MoveIntoPanel { panel_id, field_id } => self.move_into_panel(&panel_id, &field_id),
            Placement::MoveToTopLevel { field_id } => self.move_to_top_level(&field_id),
        }
    }

    // --- Controls and properties ---

    /// A rendered control reported a change. In edit mode it patches the
    /// document; in preview mode it updates the preview answers.
    pub fn input_change(&mut self, id: &FieldId, change: &InputChange) -> Vec<Action> {
        let Some(field) = self.doc.get(id) else {
            tracing::debug!(%id, "input: unknown field");
            return Vec::new();
        };
        match self.mode {
            Mode::Edit => match edit_patch(field, change) {
                Some(patch) => self.update_field(id, &patch),
                None => {
                    tracing::debug!(%id, ?change, "input change ignored");
                    Vec::new()
                }
            },
            Mode::Preview => {
                if self.answers.apply(field, change) {
                    vec![Action::RenderNeeded]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Apply a properties-panel edit to the selected field.
    pub fn apply_property(&mut self, edit: &PropertyEdit) -> Vec<Action> {
        let Some(field) = self.selection.resolve(&self.doc) else {
            tracing::debug!(?edit, "property edit with nothing selected");
            return Vec::new();
        };
        let id = field.id;
        match edit_to_patch(field, edit) {
            Some(patch) => self.update_field(&id, &patch),
            None => {
                tracing::debug!(%id, ?edit, "property edit blocked");
                Vec::new()
            }
        }
    }

    // --- Form ---

    pub fn set_title(&mut self, title: impl Into<String>) -> Vec<Action> {
        let title = title.into();
        if title == self.title {
            return Vec::new();
        }
        self.title = title;
        vec![Action::RenderNeeded]
    }

    /// Switch between edit and preview. Entering preview starts from empty
    /// answers.
    pub fn set_mode(&mut self, mode: Mode) -> Vec<Action> {
        if mode == self.mode {
            return Vec::new();
        }
        if mode == Mode::Preview {
            self.answers.clear();
        }
        self.drag.cancel();
        self.mode = mode;
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    #[must_use]
    pub fn doc(&self) -> &DocStore {
        &self.doc
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn selection(&self) -> Option<FieldId> {
        self.selection.selected()
    }

    /// The live selected field.
    #[must_use]
    pub fn selected_field(&self) -> Option<&Field> {
        self.selection.resolve(&self.doc)
    }

    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            title: self.title.clone(),
            fields: self.doc.snapshot(),
            selected_id: self.selection.selected(),
        }
    }

    /// View tree for the current mode.
    #[must_use]
    pub fn render(&self) -> Vec<FieldView> {
        let selected = self.selection.selected();
        render_document(&self.doc, self.mode, &self.answers, selected.as_ref())
    }

    /// Submit the preview answers.
    #[must_use]
    pub fn submit_preview(&self) -> serde_json::Value {
        self.answers.submit(&self.doc)
    }
}
