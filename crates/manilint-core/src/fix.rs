//! Batched token edits.
//!
//! Checks compute all their findings against one snapshot of token indices,
//! queue the repairs in a [`FixSet`] and apply them at the end. Edits run
//! back to front so an insertion never shifts an index that is still
//! waiting to be edited.

use crate::token::{Token, TokenStream};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Edit {
    Replace { index: usize, text: String },
    Insert { index: usize, token: Token },
}

impl Edit {
    fn index(&self) -> usize {
        match self {
            Self::Replace { index, .. } | Self::Insert { index, .. } => *index,
        }
    }
}

/// Pending edits against one token stream snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixSet {
    edits: Vec<Edit>,
}

impl FixSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues replacing the text of the token at `index`.
    pub fn replace(&mut self, index: usize, text: impl Into<String>) {
        self.edits.push(Edit::Replace {
            index,
            text: text.into(),
        });
    }

    /// Queues inserting `token` before the token at `index`.
    pub fn insert(&mut self, index: usize, token: Token) {
        self.edits.push(Edit::Insert { index, token });
    }

    /// Number of queued edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Returns true if nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Applies every edit, highest index first, and returns how many took
    /// effect. Edits whose index is out of range are skipped.
    pub fn apply(mut self, tokens: &mut TokenStream) -> usize {
        // Stable sort keeps queue order for edits at the same index.
        self.edits.sort_by_key(|e| std::cmp::Reverse(e.index()));
        let mut applied = 0;
        for edit in self.edits {
            let ok = match edit {
                Edit::Replace { index, text } => tokens.set_text(index, text),
                Edit::Insert { index, token } => tokens.insert(index, token),
            };
            if ok {
                applied += 1;
            }
        }
        debug!("Applied {} token edit(s)", applied);
        applied
    }
}
