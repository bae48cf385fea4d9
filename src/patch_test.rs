use serde_json::json;
use uuid::Uuid;

use super::*;
use crate::field::FieldKind;

fn make(kind: FieldKind) -> Field {
    Field::template(kind, Uuid::from_u128(1))
}

#[test]
fn empty_patch_changes_nothing() {
    let before = make(FieldKind::Radio);
    let mut after = before.clone();
    FieldPatch::default().apply_to(&mut after);
    assert_eq!(before, after);
    assert!(FieldPatch::default().is_empty());
}

#[test]
fn label_patch_touches_only_label() {
    let before = make(FieldKind::Text);
    let mut after = before.clone();
    FieldPatch { label: Some("Full name".into()), ..Default::default() }.apply_to(&mut after);
    assert_eq!(after.label, "Full name");
    after.label.clone_from(&before.label);
    assert_eq!(before, after);
}

#[test]
fn label_style_keys_merge_individually() {
    let mut f = make(FieldKind::Text);
    FieldPatch { label_bold: Some(true), label_size: Some(20), ..Default::default() }.apply_to(&mut f);
    assert!(f.label_style.bold);
    assert!(!f.label_style.italic);
    assert_eq!(f.label_style.size, 20);
}

#[test]
fn empty_helper_text_clears() {
    let mut f = make(FieldKind::Text);
    FieldPatch { helper_text: Some("Shown below".into()), ..Default::default() }.apply_to(&mut f);
    assert_eq!(f.helper_text.as_deref(), Some("Shown below"));
    FieldPatch { helper_text: Some(String::new()), ..Default::default() }.apply_to(&mut f);
    assert_eq!(f.helper_text, None);
}

#[test]
fn options_replace_wholesale() {
    let mut f = make(FieldKind::Select);
    let options = vec![ChoiceOption { label: "Yes".into(), value: "y".into() }];
    FieldPatch { options: Some(options.clone()), ..Default::default() }.apply_to(&mut f);
    assert_eq!(f.options(), Some(options.as_slice()));
}

#[test]
fn keys_for_other_kinds_are_ignored() {
    let before = make(FieldKind::Date);
    let mut after = before.clone();
    FieldPatch {
        placeholder: Some("ignored".into()),
        options: Some(Vec::new()),
        columns_per_row: Some(4),
        ..Default::default()
    }
    .apply_to(&mut after);
    assert_eq!(before, after);
}

#[test]
fn value_shape_must_match_kind() {
    let mut text = make(FieldKind::Text);
    FieldPatch::value(Answer::Many(vec!["a".into()])).apply_to(&mut text);
    assert_eq!(text.value(), Some(Answer::One(String::new())));

    let mut boxes = make(FieldKind::Checkbox);
    FieldPatch::value(Answer::One("option_1".into())).apply_to(&mut boxes);
    assert_eq!(boxes.value(), Some(Answer::Many(Vec::new())));
    FieldPatch::value(Answer::Many(vec!["option_2".into()])).apply_to(&mut boxes);
    assert_eq!(boxes.value(), Some(Answer::Many(vec!["option_2".into()])));
}

#[test]
fn panel_keys_apply_to_panels() {
    let mut p = make(FieldKind::Panel);
    FieldPatch {
        columns_per_row: Some(3),
        rows_layout: Some(false),
        show_panel_label: Some(false),
        background_color: Some("#f9fafb".into()),
        ..Default::default()
    }
    .apply_to(&mut p);
    let FieldBody::Panel(panel) = &p.body else {
        panic!("expected panel body");
    };
    assert_eq!(panel.columns_per_row, 3);
    assert!(!panel.rows_layout);
    assert!(!panel.show_panel_label);
    assert_eq!(panel.background_color, "#f9fafb");
    assert_eq!(panel.border_color, "#e5e7eb");
}

#[test]
fn patch_deserializes_from_camel_case_json() {
    let patch: FieldPatch = serde_json::from_value(json!({
        "label": "Email",
        "required": true,
        "helperText": "We never share it",
        "width": "half",
        "value": "a@b.c"
    }))
    .unwrap();
    assert_eq!(patch.label.as_deref(), Some("Email"));
    assert_eq!(patch.required, Some(true));
    assert_eq!(patch.width, Some(Width::Half));
    assert_eq!(patch.value, Some(Answer::One("a@b.c".into())));
    assert_eq!(patch.options, None);
}

#[test]
fn patch_serializes_only_present_keys() {
    let patch = FieldPatch { padding: Some(8), ..Default::default() };
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "padding": 8 }));
}
