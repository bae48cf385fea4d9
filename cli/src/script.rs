//! Line script: parsing and execution against an [`EngineCore`].
//!
//! One command per line. Blank lines and lines starting with `#` are skipped.
//! Fields are referenced as `@N` (the N-th field created by the script,
//! counting from 1) or by literal UUID.
//!
//! ```text
//! title Intake form
//! add text
//! add panel
//! add-to @2 checkbox
//! drop field @1 on panel @2
//! update @3 {"label": "Pick some"}
//! prop {"edit": "add-option"}
//! mode preview
//! input @3 {"change": "toggle", "value": "option_1", "checked": true}
//! ```

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::str::FromStr;

use formsmith::doc::Location;
use formsmith::engine::{Action, EngineCore};
use formsmith::field::{FieldId, FieldKind, ParseKindError};
use formsmith::patch::FieldPatch;
use formsmith::placement::{DragSource, DropTarget, FieldToken};
use formsmith::properties::PropertyEdit;
use formsmith::render::{InputChange, Mode};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{command}`")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("line {line}: {source}")]
    Kind {
        line: usize,
        #[source]
        source: ParseKindError,
    },
    #[error("line {line}: bad field reference `{reference}`")]
    BadReference { line: usize, reference: String },
    #[error("line {line}: no field has been created as @{index}")]
    UnknownReference { line: usize, index: usize },
    #[error("line {line}: invalid JSON: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// A field named in a script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    /// `@N`, 1-based creation order.
    Created(usize),
    Id(FieldId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Tool(FieldKind),
    Field(Reference),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Canvas,
    /// Whatever the field is: a top-level field, a panel, or a nested field.
    Field(Reference),
    /// A panel's header or body.
    Panel(Reference),
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Title(String),
    Add(FieldKind),
    AddTo { panel: Reference, kind: FieldKind },
    Move { from: usize, to: usize },
    Update { field: Reference, patch: FieldPatch },
    Remove(Reference),
    RemoveFrom { panel: Reference, field: Reference },
    Select(Reference),
    Deselect,
    Drop { source: Source, target: Target },
    Mode(Mode),
    Input { field: Reference, change: InputChange },
    Prop(PropertyEdit),
}

/// A parsed step with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub number: usize,
    pub step: Step,
}

/// Parse a whole script.
///
/// # Errors
///
/// Returns the first malformed line.
pub fn parse_script(text: &str) -> Result<Vec<Line>, ScriptError> {
    let mut lines = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let number = i + 1;
        if let Some(step) = parse_line(number, raw)? {
            lines.push(Line { number, step });
        }
    }
    Ok(lines)
}

/// Parse one line. Blank lines and comments yield `None`.
///
/// # Errors
///
/// Returns an error for an unknown command or malformed arguments.
pub fn parse_line(line: usize, raw: &str) -> Result<Option<Step>, ScriptError> {
    let raw = raw.trim();
    if raw.is_empty() || raw.starts_with('#') {
        return Ok(None);
    }
    let (command, rest) = split_word(raw);
    let syntax = |message: &str| ScriptError::Syntax { line, message: format!("{command}: {message}") };

    let step = match command {
        "title" => Step::Title(rest.to_owned()),
        "add" => Step::Add(kind(line, rest)?),
        "add-to" => {
            let (panel, kind_word) = split_word(rest);
            Step::AddTo { panel: reference(line, panel)?, kind: kind(line, kind_word)? }
        }
        "move" => {
            let (from, to) = split_word(rest);
            let index = |s: &str| s.parse::<usize>().map_err(|_| syntax("expected two indices"));
            Step::Move { from: index(from)?, to: index(to)? }
        }
        "update" => {
            let (field, json) = split_word(rest);
            Step::Update { field: reference(line, field)?, patch: parse_json(line, json)? }
        }
        "remove" => Step::Remove(reference(line, rest)?),
        "remove-from" => {
            let (panel, field) = split_word(rest);
            Step::RemoveFrom { panel: reference(line, panel)?, field: reference(line, field)? }
        }
        "select" => Step::Select(reference(line, rest)?),
        "deselect" => Step::Deselect,
        "drop" => parse_drop(line, rest)?,
        "mode" => match rest {
            "edit" => Step::Mode(Mode::Edit),
            "preview" => Step::Mode(Mode::Preview),
            _ => return Err(syntax("expected `edit` or `preview`")),
        },
        "input" => {
            let (field, json) = split_word(rest);
            Step::Input { field: reference(line, field)?, change: parse_json(line, json)? }
        }
        "prop" => Step::Prop(parse_json(line, rest)?),
        _ => return Err(ScriptError::UnknownCommand { line, command: command.to_owned() }),
    };
    Ok(Some(step))
}

/// `drop tool <kind> on <target>` or `drop field <ref> on <target>`, where
/// target is `canvas`, `field <ref>`, `panel <ref>` or `header <ref>`.
fn parse_drop(line: usize, rest: &str) -> Result<Step, ScriptError> {
    let words: Vec<&str> = rest.split_whitespace().collect();
    let syntax = || ScriptError::Syntax {
        line,
        message: "drop: expected `drop tool|field <x> on canvas|field|panel|header [<ref>]`".to_owned(),
    };
    let (source, target_words) = match words.as_slice() {
        ["tool", k, "on", target @ ..] => (Source::Tool(kind(line, k)?), target),
        ["field", r, "on", target @ ..] => (Source::Field(reference(line, r)?), target),
        _ => return Err(syntax()),
    };
    let target = match target_words {
        ["canvas"] => Target::Canvas,
        ["field", r] => Target::Field(reference(line, r)?),
        ["panel" | "header", r] => Target::Panel(reference(line, r)?),
        _ => return Err(syntax()),
    };
    Ok(Step::Drop { source, target })
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim();
    match s.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (s, ""),
    }
}

fn kind(line: usize, word: &str) -> Result<FieldKind, ScriptError> {
    FieldKind::from_str(word).map_err(|source| ScriptError::Kind { line, source })
}

fn reference(line: usize, word: &str) -> Result<Reference, ScriptError> {
    let bad = || ScriptError::BadReference { line, reference: word.to_owned() };
    if let Some(n) = word.strip_prefix('@') {
        return match n.parse::<usize>() {
            Ok(n) if n > 0 => Ok(Reference::Created(n)),
            _ => Err(bad()),
        };
    }
    Uuid::parse_str(word).map(Reference::Id).map_err(|_| bad())
}

fn parse_json<T: serde::de::DeserializeOwned>(line: usize, text: &str) -> Result<T, ScriptError> {
    serde_json::from_str(text).map_err(|source| ScriptError::Json { line, source })
}

/// Executes parsed steps and remembers every field they create.
pub struct Runner {
    engine: EngineCore,
    created: Vec<FieldId>,
}

impl Runner {
    #[must_use]
    pub fn new(engine: EngineCore) -> Self {
        Self { engine, created: Vec::new() }
    }

    #[must_use]
    pub fn engine(&self) -> &EngineCore {
        &self.engine
    }

    /// Run every line in order.
    ///
    /// # Errors
    ///
    /// Stops at the first `@N` that names a field not yet created.
    pub fn run(&mut self, lines: &[Line]) -> Result<(), ScriptError> {
        for line in lines {
            let actions = self.apply(line)?;
            tracing::debug!(line = line.number, ?actions, "step applied");
            if actions.is_empty() {
                tracing::info!(line = line.number, step = ?line.step, "step changed nothing");
            }
        }
        Ok(())
    }

    /// Apply one line.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::UnknownReference`] for an `@N` past the number
    /// of fields created so far.
    pub fn apply(&mut self, line: &Line) -> Result<Vec<Action>, ScriptError> {
        let n = line.number;
        let actions = match &line.step {
            Step::Title(title) => self.engine.set_title(title.as_str()),
            Step::Add(kind) => self.engine.add_field(*kind),
            Step::AddTo { panel, kind } => {
                let panel = self.resolve(n, *panel)?;
                self.engine.add_field_to_panel(&panel, *kind)
            }
            Step::Move { from, to } => self.engine.move_field(*from, *to),
            Step::Update { field, patch } => {
                let id = self.resolve(n, *field)?;
                self.engine.update_field(&id, patch)
            }
            Step::Remove(field) => {
                let id = self.resolve(n, *field)?;
                self.engine.remove_field(&id)
            }
            Step::RemoveFrom { panel, field } => {
                let panel = self.resolve(n, *panel)?;
                let id = self.resolve(n, *field)?;
                self.engine.remove_field_from_panel(&panel, &id)
            }
            Step::Select(field) => {
                let id = self.resolve(n, *field)?;
                self.engine.select(id)
            }
            Step::Deselect => self.engine.clear_selection(),
            Step::Drop { source, target } => self.drag_and_drop(n, *source, *target)?,
            Step::Mode(mode) => self.engine.set_mode(*mode),
            Step::Input { field, change } => {
                let id = self.resolve(n, *field)?;
                self.engine.input_change(&id, change)
            }
            Step::Prop(edit) => self.engine.apply_property(edit),
        };
        self.created.extend(actions.iter().filter_map(|a| match a {
            Action::FieldCreated(id) => Some(*id),
            _ => None,
        }));
        Ok(actions)
    }

    /// Drag `source` onto `target`: the pointer passes over the target, then
    /// releases there.
    fn drag_and_drop(&mut self, line: usize, source: Source, target: Target) -> Result<Vec<Action>, ScriptError> {
        let source = match source {
            Source::Tool(kind) => DragSource::Tool(kind),
            Source::Field(r) => {
                let id = self.resolve(line, r)?;
                match FieldToken::for_field(self.engine.doc(), &id) {
                    Some(token) => DragSource::Field(token),
                    None => {
                        tracing::info!(line, %id, "drop: unknown field");
                        return Ok(Vec::new());
                    }
                }
            }
        };
        let Some(target) = self.drop_target(line, target)? else {
            tracing::info!(line, "drop: unknown target");
            return Ok(Vec::new());
        };
        self.engine.begin_drag(source);
        let mut actions = self.engine.hover(target);
        actions.extend(self.engine.drop(target));
        Ok(actions)
    }

    fn drop_target(&self, line: usize, target: Target) -> Result<Option<DropTarget>, ScriptError> {
        let doc = self.engine.doc();
        let resolved = match target {
            Target::Canvas => Some(DropTarget::Canvas),
            Target::Panel(r) => {
                let id = self.resolve(line, r)?;
                match doc.location(&id) {
                    Some(Location::TopLevel(index)) if doc.is_panel(&id) => Some(DropTarget::Panel { id, index }),
                    _ => None,
                }
            }
            Target::Field(r) => {
                let id = self.resolve(line, r)?;
                match doc.location(&id) {
                    Some(Location::TopLevel(index)) if doc.is_panel(&id) => Some(DropTarget::Panel { id, index }),
                    Some(Location::TopLevel(index)) => Some(DropTarget::Field { id, index }),
                    Some(Location::Nested { panel, .. }) => Some(DropTarget::NestedField { panel_id: panel, id }),
                    None => None,
                }
            }
        };
        Ok(resolved)
    }

    fn resolve(&self, line: usize, reference: Reference) -> Result<FieldId, ScriptError> {
        match reference {
            Reference::Id(id) => Ok(id),
            Reference::Created(index) => {
                self.created.get(index - 1).copied().ok_or(ScriptError::UnknownReference { line, index })
            }
        }
    }
}
