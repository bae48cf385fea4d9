//! Preview answers.
//!
//! Preview mode never writes to the document. Answers typed into the preview
//! live here, keyed by field id, and start out empty each time.

#[cfg(test)]
#[path = "preview_test.rs"]
mod preview_test;

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::doc::DocStore;
use crate::field::{Answer, Field, FieldId, FieldKind};
use crate::render::{InputChange, next_answer};

/// Answers entered in preview mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Answers {
    values: HashMap<FieldId, Answer>,
}

impl Answers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, id: &FieldId) -> Option<&Answer> {
        self.values.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Record the answer `change` produces for `field`. Returns false when the
    /// change does not apply to the field's kind or is rejected.
    pub fn apply(&mut self, field: &Field, change: &InputChange) -> bool {
        match next_answer(field, self.values.get(&field.id), change) {
            Some(answer) => {
                self.values.insert(field.id, answer);
                true
            }
            None => {
                debug!(id = %field.id, ?change, "preview change ignored");
                false
            }
        }
    }

    /// Drop answers whose field is no longer in `doc`.
    pub fn retain_known(&mut self, doc: &DocStore) {
        self.values.retain(|id, _| doc.contains(id));
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// The submitted form: one entry per value-bearing field, nested fields
    /// included, keyed by id in document order. Unanswered fields submit an
    /// empty string or an empty list.
    #[must_use]
    pub fn submit(&self, doc: &DocStore) -> Value {
        let mut out = Map::new();
        for field in doc.fields() {
            self.collect(field, &mut out);
            for child in field.children() {
                self.collect(child, &mut out);
            }
        }
        Value::Object(out)
    }

    fn collect(&self, field: &Field, out: &mut Map<String, Value>) {
        if !field.kind().has_value() {
            return;
        }
        let value = match (self.values.get(&field.id), field.kind() == FieldKind::Checkbox) {
            (Some(answer), _) => Value::from(answer),
            (None, true) => Value::Array(Vec::new()),
            (None, false) => Value::String(String::new()),
        };
        out.insert(field.id.to_string(), value);
    }
}
