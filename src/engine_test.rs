use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::field::{Answer, FieldBody};
use crate::ids::SequentialIds;
use crate::properties::Direction;

// =============================================================
// Helpers
// =============================================================

fn engine() -> EngineCore {
    EngineCore::with_ids(SequentialIds::new())
}

fn id(n: u128) -> FieldId {
    Uuid::from_u128(n)
}

fn created(actions: &[Action]) -> FieldId {
    actions
        .iter()
        .find_map(|a| match a {
            Action::FieldCreated(id) => Some(*id),
            _ => None,
        })
        .unwrap()
}

fn top_ids(core: &EngineCore) -> Vec<FieldId> {
    core.doc().fields().iter().map(|f| f.id).collect()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_engine_is_empty_edit_mode() {
    let core = EngineCore::new();
    assert!(core.doc().is_empty());
    assert_eq!(core.title(), "My Drag & Drop Form");
    assert_eq!(core.mode(), Mode::Edit);
    assert_eq!(core.selection(), None);
    assert!(!core.is_dragging());
}

// =============================================================
// Mutations
// =============================================================

#[test]
fn add_field_selects_new_field() {
    let mut core = engine();
    let actions = core.add_field(FieldKind::Text);
    assert_eq!(
        actions,
        [Action::FieldCreated(id(1)), Action::SelectionChanged(Some(id(1))), Action::RenderNeeded]
    );
    assert_eq!(core.selected_field().map(|f| f.label.as_str()), Some("New text Field"));
}

#[test]
fn add_to_unknown_panel_is_noop() {
    let mut core = engine();
    let text = created(&core.add_field(FieldKind::Text));
    assert!(core.add_field_to_panel(&text, FieldKind::Date).is_empty());
    assert!(core.add_field_to_panel(&id(99), FieldKind::Date).is_empty());
    assert_eq!(core.doc().field_count(), 1);
}

#[test]
fn remove_selected_clears_selection() {
    let mut core = engine();
    let p = created(&core.add_field(FieldKind::Panel));
    let c = created(&core.add_field_to_panel(&p, FieldKind::Text));
    assert_eq!(core.selection(), Some(c));

    let actions = core.remove_field(&p);
    assert_eq!(actions, [Action::FieldRemoved(p), Action::SelectionChanged(None), Action::RenderNeeded]);
    assert_eq!(core.selection(), None);
    assert!(core.remove_field(&p).is_empty());
}

#[test]
fn remove_from_wrong_panel_is_noop() {
    let mut core = engine();
    let p = created(&core.add_field(FieldKind::Panel));
    let q = created(&core.add_field(FieldKind::Panel));
    let c = created(&core.add_field_to_panel(&p, FieldKind::Text));
    assert!(core.remove_field_from_panel(&q, &c).is_empty());
    assert_eq!(core.remove_field_from_panel(&p, &c)[0], Action::FieldRemoved(c));
}

#[test]
fn move_field_reports_moved_id() {
    let mut core = engine();
    let a = created(&core.add_field(FieldKind::Text));
    let b = created(&core.add_field(FieldKind::Text));
    assert_eq!(core.move_field(0, 1), [Action::FieldMoved(a), Action::RenderNeeded]);
    assert_eq!(top_ids(&core), [b, a]);
    assert!(core.move_field(1, 1).is_empty());
    assert!(core.move_field(5, 0).is_empty());
}

// =============================================================
// Drag and drop
// =============================================================

#[test]
fn tool_drop_on_canvas_appends() {
    let mut core = engine();
    core.begin_tool_drag(FieldKind::Signature);
    let actions = core.drop(DropTarget::Canvas);
    let new = created(&actions);
    assert_eq!(core.doc().get(&new).map(Field::kind), Some(FieldKind::Signature));
    assert!(!core.is_dragging());
}

#[test]
fn tool_drop_on_nested_field_has_single_owner() {
    let mut core = engine();
    let p = created(&core.add_field(FieldKind::Panel));
    let c = created(&core.add_field_to_panel(&p, FieldKind::Text));

    core.begin_tool_drag(FieldKind::Radio);
    core.drop(DropTarget::NestedField { panel_id: p, id: c });

    assert_eq!(core.doc().len(), 1);
    assert_eq!(core.doc().children(&p).map(<[Field]>::len), Some(2));
}

#[test]
fn hover_reorders_once_then_drop_settles() {
    let mut core = engine();
    let a = created(&core.add_field(FieldKind::Text));
    let b = created(&core.add_field(FieldKind::Text));
    let c = created(&core.add_field(FieldKind::Text));

    assert!(core.begin_field_drag(&a));
    assert_eq!(core.hover(DropTarget::Field { id: c, index: 2 }), [Action::FieldMoved(a), Action::RenderNeeded]);
    assert_eq!(top_ids(&core), [b, c, a]);
    assert!(core.hover(DropTarget::Field { id: a, index: 2 }).is_empty());

    assert!(core.drop(DropTarget::Field { id: a, index: 2 }).is_empty());
    assert_eq!(top_ids(&core), [b, c, a]);
}

#[test]
fn drag_field_into_panel_and_back_out() {
    let mut core = engine();
    let x = created(&core.add_field(FieldKind::Date));
    let p = created(&core.add_field(FieldKind::Panel));

    core.begin_field_drag(&x);
    core.drop(DropTarget::Panel { id: p, index: 1 });
    assert_eq!(top_ids(&core), [p]);
    assert_eq!(core.doc().field_count(), 2);

    core.begin_field_drag(&x);
    core.drop(DropTarget::Canvas);
    assert_eq!(top_ids(&core), [p, x]);
    assert!(core.doc().check_invariants().is_ok());
}

#[test]
fn panel_drag_over_panel_only_reorders() {
    let mut core = engine();
    let p = created(&core.add_field(FieldKind::Panel));
    let q = created(&core.add_field(FieldKind::Panel));

    core.begin_field_drag(&p);
    core.hover(DropTarget::Panel { id: q, index: 1 });
    core.drop(DropTarget::Panel { id: q, index: 0 });

    assert_eq!(top_ids(&core), [q, p]);
    assert!(core.doc().children(&q).is_some_and(<[Field]>::is_empty));
}

#[test]
fn panel_drop_without_hover_reorders() {
    let mut core = engine();
    let p = created(&core.add_field(FieldKind::Panel));
    let q = created(&core.add_field(FieldKind::Panel));

    core.begin_field_drag(&p);
    assert_eq!(core.drop(DropTarget::Panel { id: q, index: 1 }), [Action::FieldMoved(p), Action::RenderNeeded]);
    assert_eq!(top_ids(&core), [q, p]);
}

#[test]
fn cancelled_drag_leaves_document() {
    let mut core = engine();
    core.add_field(FieldKind::Text);
    let before = core.snapshot();
    core.begin_tool_drag(FieldKind::Text);
    assert!(core.cancel_drag());
    assert!(core.drop(DropTarget::Canvas).is_empty());
    assert_eq!(core.snapshot(), before);
}

#[test]
fn drag_of_unknown_field_does_not_start() {
    let mut core = engine();
    assert!(!core.begin_field_drag(&id(7)));
    assert!(!core.is_dragging());
}

// =============================================================
// Controls and properties
// =============================================================

#[test]
fn edit_mode_input_patches_document() {
    let mut core = engine();
    let t = created(&core.add_field(FieldKind::Text));
    let actions = core.input_change(&t, &InputChange::Text { text: "Ada".into() });
    assert_eq!(actions, [Action::FieldUpdated(t), Action::RenderNeeded]);
    assert_eq!(core.doc().get(&t).and_then(Field::value), Some(Answer::One("Ada".into())));
}

#[test]
fn preview_input_goes_to_answers() {
    let mut core = engine();
    let t = created(&core.add_field(FieldKind::Text));
    core.set_mode(Mode::Preview);

    assert_eq!(core.input_change(&t, &InputChange::Text { text: "Bo".into() }), [Action::RenderNeeded]);
    assert_eq!(core.doc().get(&t).and_then(Field::value), Some(Answer::One(String::new())));
    assert_eq!(core.submit_preview(), json!({ t.to_string(): "Bo" }));

    core.set_mode(Mode::Edit);
    core.set_mode(Mode::Preview);
    assert!(core.answers().is_empty());
}

#[test]
fn preview_hides_selection() {
    let mut core = engine();
    core.add_field(FieldKind::Text);
    assert!(core.render()[0].selected);
    core.set_mode(Mode::Preview);
    assert!(!core.render()[0].selected);
}

#[test]
fn property_edit_targets_selection() {
    let mut core = engine();
    assert!(core.apply_property(&PropertyEdit::Required(true)).is_empty());

    let r = created(&core.add_field(FieldKind::Radio));
    core.apply_property(&PropertyEdit::LayoutDirection(Direction::Grid));
    core.apply_property(&PropertyEdit::GridColumns(3));
    core.apply_property(&PropertyEdit::AddOption);

    let Some(FieldBody::Radio(choice)) = core.doc().get(&r).map(|f| &f.body) else {
        panic!("expected radio");
    };
    assert_eq!(choice.options.len(), 4);
    assert_eq!(choice.layout, crate::field::ChoiceLayout::Grid { columns: 3 });
}

#[test]
fn removing_last_option_is_blocked() {
    let mut core = engine();
    core.add_field(FieldKind::Select);
    core.apply_property(&PropertyEdit::RemoveOption(0));
    core.apply_property(&PropertyEdit::RemoveOption(0));
    assert!(core.apply_property(&PropertyEdit::RemoveOption(0)).is_empty());
    assert_eq!(core.selected_field().and_then(Field::options).map(<[_]>::len), Some(1));
}

#[test]
fn children_patch_prunes_selection() {
    let mut core = engine();
    let p = created(&core.add_field(FieldKind::Panel));
    created(&core.add_field_to_panel(&p, FieldKind::Text));
    let actions = core.update_field(&p, &FieldPatch { children: Some(Vec::new()), ..Default::default() });
    assert!(actions.contains(&Action::SelectionChanged(None)));
    assert_eq!(core.doc().field_count(), 1);
}

// =============================================================
// Form and snapshot
// =============================================================

#[test]
fn title_change_is_reported_once() {
    let mut core = engine();
    assert_eq!(core.set_title("Intake"), [Action::RenderNeeded]);
    assert!(core.set_title("Intake").is_empty());
    assert_eq!(core.snapshot().title, "Intake");
}

#[test]
fn snapshot_serializes() {
    let mut core = engine();
    core.add_field(FieldKind::Signature);
    let value = serde_json::to_value(core.snapshot()).unwrap();
    assert_eq!(value["selectedId"], json!(id(1).to_string()));
    assert_eq!(value["fields"][0]["kind"], "signature");
    assert_eq!(value["fields"][0]["label"], "New signature Field");
}

#[test]
fn actions_serialize_tagged() {
    let value = serde_json::to_value([Action::FieldMoved(id(2)), Action::RenderNeeded]).unwrap();
    assert_eq!(value, json!([{ "action": "field-moved", "id": id(2).to_string() }, { "action": "render-needed" }]));
}
