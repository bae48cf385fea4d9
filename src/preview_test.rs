use serde_json::json;

use super::*;
use crate::ids::SequentialIds;

fn store() -> DocStore {
    DocStore::with_ids(SequentialIds::new())
}

#[test]
fn starts_empty() {
    let answers = Answers::new();
    assert!(answers.is_empty());
    assert_eq!(answers.len(), 0);
}

#[test]
fn apply_never_touches_document() {
    let mut doc = store();
    let id = doc.add_field(FieldKind::Text);
    let before = doc.snapshot();

    let mut answers = Answers::new();
    assert!(answers.apply(doc.get(&id).unwrap(), &InputChange::Text { text: "hi".into() }));
    assert_eq!(answers.get(&id), Some(&Answer::One("hi".into())));
    assert_eq!(doc.snapshot(), before);
}

#[test]
fn checkbox_answers_accumulate() {
    let mut doc = store();
    let id = doc.add_field(FieldKind::Checkbox);
    let field = doc.get(&id).unwrap();
    let mut answers = Answers::new();
    answers.apply(field, &InputChange::Toggle { value: "option_2".into(), checked: true });
    answers.apply(field, &InputChange::Toggle { value: "option_1".into(), checked: true });
    assert_eq!(answers.get(&id), Some(&Answer::Many(vec!["option_2".into(), "option_1".into()])));
}

#[test]
fn rejected_change_is_not_recorded() {
    let mut doc = store();
    let id = doc.add_field(FieldKind::Radio);
    let mut answers = Answers::new();
    assert!(!answers.apply(doc.get(&id).unwrap(), &InputChange::Choose { value: "missing".into() }));
    assert!(!answers.apply(doc.get(&id).unwrap(), &InputChange::AppendRow));
    assert!(answers.is_empty());
}

#[test]
fn submit_covers_value_fields_in_order() {
    let mut doc = store();
    let text = doc.add_field(FieldKind::Text);
    doc.add_field(FieldKind::Description);
    let p = doc.add_field(FieldKind::Panel);
    let boxes = doc.add_field_to_panel(&p, FieldKind::Checkbox).unwrap();
    let date = doc.add_field(FieldKind::Date);

    let mut answers = Answers::new();
    answers.apply(doc.get(&date).unwrap(), &InputChange::Date { text: "2025-12-01T08:00".into() });

    let submitted = answers.submit(&doc);
    let keys: Vec<&String> = submitted.as_object().unwrap().keys().collect();
    assert_eq!(keys, [&text.to_string(), &boxes.to_string(), &date.to_string()]);
    assert_eq!(
        submitted,
        json!({
            text.to_string(): "",
            boxes.to_string(): [],
            date.to_string(): "2025-12-01",
        })
    );
}

#[test]
fn retain_known_drops_removed_fields() {
    let mut doc = store();
    let a = doc.add_field(FieldKind::Text);
    let b = doc.add_field(FieldKind::Text);
    let mut answers = Answers::new();
    answers.apply(doc.get(&a).unwrap(), &InputChange::Text { text: "a".into() });
    answers.apply(doc.get(&b).unwrap(), &InputChange::Text { text: "b".into() });

    doc.remove_field(&b);
    answers.retain_known(&doc);
    assert_eq!(answers.len(), 1);
    assert!(answers.get(&a).is_some());
    assert!(answers.get(&b).is_none());
}

#[test]
fn clear_empties() {
    let mut doc = store();
    let a = doc.add_field(FieldKind::Text);
    let mut answers = Answers::new();
    answers.apply(doc.get(&a).unwrap(), &InputChange::Text { text: "a".into() });
    answers.clear();
    assert!(answers.get(&a).is_none());
}
