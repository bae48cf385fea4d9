//! Field id generation.
//!
//! The document only needs ids that never collide. Where they come from is
//! the host's business, so the store takes any [`IdSource`].

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use uuid::Uuid;

use crate::field::FieldId;

/// A source of globally unique field ids.
pub trait IdSource {
    /// Produce an id that has never been returned before.
    fn next_id(&mut self) -> FieldId;
}

/// Random v4 UUIDs. The default for interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&mut self) -> FieldId {
        Uuid::new_v4()
    }
}

/// Counting ids (`...0001`, `...0002`, ...) for reproducible output.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    last: u128,
}

impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> FieldId {
        self.last += 1;
        Uuid::from_u128(self.last)
    }
}
