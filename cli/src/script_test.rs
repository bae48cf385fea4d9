use formsmith::field::{Field, FieldKind};
use formsmith::ids::SequentialIds;
use formsmith::properties::PropertyEdit;
use formsmith::render::{InputChange, Mode};
use serde_json::json;
use uuid::Uuid;

use super::*;

fn runner() -> Runner {
    Runner::new(EngineCore::with_ids(SequentialIds::new()))
}

fn run(text: &str) -> Runner {
    let mut runner = runner();
    runner.run(&parse_script(text).unwrap()).unwrap();
    runner
}

fn top_kinds(runner: &Runner) -> Vec<FieldKind> {
    runner.engine().doc().fields().iter().map(Field::kind).collect()
}

// =============================================================
// Parsing
// =============================================================

#[test]
fn skips_blank_lines_and_comments() {
    let lines = parse_script("\n# heading\n   \nadd text\n").unwrap();
    assert_eq!(lines, [Line { number: 4, step: Step::Add(FieldKind::Text) }]);
}

#[test]
fn title_keeps_the_rest_of_the_line() {
    assert_eq!(parse_line(1, "title  Patient intake  ").unwrap(), Some(Step::Title("Patient intake".into())));
}

#[test]
fn parses_references() {
    let id = Uuid::from_u128(5);
    assert_eq!(parse_line(1, "select @3").unwrap(), Some(Step::Select(Reference::Created(3))));
    assert_eq!(parse_line(1, &format!("remove {id}")).unwrap(), Some(Step::Remove(Reference::Id(id))));
    assert!(matches!(parse_line(2, "select @0"), Err(ScriptError::BadReference { line: 2, .. })));
    assert!(matches!(parse_line(2, "select field-1"), Err(ScriptError::BadReference { .. })));
}

#[test]
fn parses_drop_targets() {
    assert_eq!(
        parse_line(1, "drop tool radio on canvas").unwrap(),
        Some(Step::Drop { source: Source::Tool(FieldKind::Radio), target: Target::Canvas })
    );
    assert_eq!(
        parse_line(1, "drop field @1 on header @2").unwrap(),
        Some(Step::Drop { source: Source::Field(Reference::Created(1)), target: Target::Panel(Reference::Created(2)) })
    );
    assert!(matches!(parse_line(3, "drop tool radio canvas"), Err(ScriptError::Syntax { line: 3, .. })));
}

#[test]
fn parses_json_arguments() {
    assert_eq!(
        parse_line(1, r#"input @1 {"change": "text", "text": "Ada"}"#).unwrap(),
        Some(Step::Input { field: Reference::Created(1), change: InputChange::Text { text: "Ada".into() } })
    );
    assert_eq!(
        parse_line(1, r#"prop {"edit": "required", "value": true}"#).unwrap(),
        Some(Step::Prop(PropertyEdit::Required(true)))
    );
    assert!(matches!(parse_line(4, "update @1 {label"), Err(ScriptError::Json { line: 4, .. })));
}

#[test]
fn reports_unknown_commands_and_kinds() {
    let err = parse_script("add text\nfrobnicate\n").unwrap_err();
    assert!(matches!(err, ScriptError::UnknownCommand { line: 2, ref command } if command == "frobnicate"));
    assert_eq!(err.to_string(), "line 2: unknown command `frobnicate`");
    assert!(matches!(parse_line(1, "add gizmo"), Err(ScriptError::Kind { line: 1, .. })));
    assert!(matches!(parse_line(1, "mode sideways"), Err(ScriptError::Syntax { .. })));
}

// =============================================================
// Running
// =============================================================

#[test]
fn created_fields_are_numbered_in_order() {
    let runner = run("add text\nadd panel\nadd-to @2 date\ndrop tool signature on canvas\n");
    assert_eq!(top_kinds(&runner), [FieldKind::Text, FieldKind::Panel, FieldKind::Signature]);
    assert_eq!(runner.resolve(1, Reference::Created(3)).unwrap(), Uuid::from_u128(3));
    assert_eq!(runner.resolve(1, Reference::Created(4)).unwrap(), Uuid::from_u128(4));
}

#[test]
fn unknown_created_reference_fails_at_its_line() {
    let mut runner = runner();
    let lines = parse_script("add text\nremove @2\n").unwrap();
    let err = runner.run(&lines).unwrap_err();
    assert!(matches!(err, ScriptError::UnknownReference { line: 2, index: 2 }));
    assert_eq!(runner.engine().doc().len(), 1);
}

#[test]
fn field_dropped_on_panel_moves_inside() {
    let runner = run("add text\nadd panel\ndrop field @1 on panel @2\n");
    let doc = runner.engine().doc();
    assert_eq!(top_kinds(&runner), [FieldKind::Panel]);
    assert_eq!(doc.children(&Uuid::from_u128(2)).map(<[Field]>::len), Some(1));
}

#[test]
fn tool_dropped_on_nested_field_lands_in_its_panel() {
    let runner = run("add panel\nadd-to @1 text\ndrop tool radio on field @2\n");
    assert_eq!(runner.engine().doc().len(), 1);
    assert_eq!(runner.engine().doc().children(&Uuid::from_u128(1)).map(<[Field]>::len), Some(2));
}

#[test]
fn field_dropped_on_field_reorders() {
    let runner = run("add text\nadd date\nadd signature\ndrop field @1 on field @3\n");
    assert_eq!(top_kinds(&runner), [FieldKind::Date, FieldKind::Signature, FieldKind::Text]);
}

#[test]
fn drop_with_stale_reference_changes_nothing() {
    let runner = run("add text\nadd date\nremove @2\ndrop field @2 on canvas\n");
    assert_eq!(top_kinds(&runner), [FieldKind::Text]);
    assert!(!runner.engine().is_dragging());
}

#[test]
fn property_edits_follow_selection() {
    let runner = run(concat!(
        "add checkbox\n",
        "add text\n",
        "select @1\n",
        "prop {\"edit\": \"add-option\"}\n",
        "deselect\n",
        "prop {\"edit\": \"add-option\"}\n",
    ));
    let doc = runner.engine().doc();
    assert_eq!(doc.get(&Uuid::from_u128(1)).and_then(Field::options).map(<[_]>::len), Some(4));
    assert_eq!(runner.engine().selection(), None);
}

#[test]
fn preview_answers_are_submitted() {
    let runner = run(concat!(
        "add text\n",
        "add checkbox\n",
        "mode preview\n",
        "input @1 {\"change\": \"text\", \"text\": \"Ada\"}\n",
        "input @2 {\"change\": \"toggle\", \"value\": \"option_2\", \"checked\": true}\n",
    ));
    assert_eq!(runner.engine().mode(), Mode::Preview);
    assert_eq!(
        runner.engine().submit_preview(),
        json!({
            Uuid::from_u128(1).to_string(): "Ada",
            Uuid::from_u128(2).to_string(): ["option_2"],
        })
    );
}

#[test]
fn update_applies_json_patch() {
    let runner = run("add text\nupdate @1 {\"label\": \"Full name\", \"required\": true}\n");
    let field = runner.engine().doc().get(&Uuid::from_u128(1)).unwrap();
    assert_eq!(field.label, "Full name");
    assert!(field.required);
}
