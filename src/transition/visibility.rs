// SPDX-License-Identifier: MPL-2.0
//! Hide/restore bookkeeping for views that a transition temporarily covers.
//!
//! Hiding a view hands out a [`VisibilityToken`]; the view only becomes
//! visible again once every token issued for it has been given back.

use super::ViewId;
use std::collections::HashMap;

/// Proof that a view was hidden. Not `Clone`: each token restores once.
#[must_use = "a hidden view stays hidden until its token is restored"]
#[derive(Debug, PartialEq, Eq)]
pub struct VisibilityToken {
    id: ViewId,
}

impl VisibilityToken {
    #[must_use]
    pub fn view(&self) -> ViewId {
        self.id
    }
}

/// Registry of hidden views, shared by the overlay and its host.
#[derive(Debug, Default, Clone)]
pub struct Visibility {
    hidden: HashMap<ViewId, usize>,
}

impl Visibility {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hide(&mut self, id: ViewId) -> VisibilityToken {
        *self.hidden.entry(id).or_insert(0) += 1;
        VisibilityToken { id }
    }

    pub fn restore(&mut self, token: VisibilityToken) {
        if let Some(count) = self.hidden.get_mut(&token.id) {
            *count -= 1;
            if *count == 0 {
                self.hidden.remove(&token.id);
            }
        }
    }

    /// Restores every token in `tokens`.
    pub fn restore_all(&mut self, tokens: impl IntoIterator<Item = VisibilityToken>) {
        for token in tokens {
            self.restore(token);
        }
    }

    #[must_use]
    pub fn is_hidden(&self, id: ViewId) -> bool {
        self.hidden.contains_key(&id)
    }

    /// Whether no view is currently hidden.
    #[must_use]
    pub fn all_visible(&self) -> bool {
        self.hidden.is_empty()
    }
}
