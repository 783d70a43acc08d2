// SPDX-License-Identifier: MPL-2.0
//! Index navigation between stories.
//!
//! The viewer only emits "next" and "previous" intents. Resolving them against
//! the current collection happens here: next past the end closes the viewer,
//! previous before the start stays put.

/// Position of the displayed story relative to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationContext {
    pub has_prev: bool,
    pub has_next: bool,
}

impl NavigationContext {
    /// Context for `index` in a collection of `len` stories.
    #[must_use]
    pub fn at(index: usize, len: usize) -> Self {
        Self {
            has_prev: index > 0 && index < len,
            has_next: index + 1 < len,
        }
    }
}

/// Outcome of resolving a navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Display the story at this index.
    Show(usize),
    /// Keep the current story.
    Stay,
    /// Close the viewer.
    Close,
}

/// Index of the story open in the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    index: usize,
}

impl Selection {
    /// Selects `index` if it is inside a collection of `len` stories.
    #[must_use]
    pub fn new(index: usize, len: usize) -> Option<Self> {
        (index < len).then_some(Self { index })
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.index
    }

    #[must_use]
    pub fn context(self, len: usize) -> NavigationContext {
        NavigationContext::at(self.index, len)
    }

    /// Resolves a "next" request.
    #[must_use]
    pub fn next(self, len: usize) -> Step {
        if self.index + 1 < len {
            Step::Show(self.index + 1)
        } else {
            Step::Close
        }
    }

    /// Resolves a "previous" request.
    #[must_use]
    pub fn previous(self, len: usize) -> Step {
        if self.index > 0 && self.index <= len {
            Step::Show(self.index - 1)
        } else {
            Step::Stay
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_in_the_middle_has_both_neighbours() {
        assert_eq!(
            NavigationContext::at(1, 3),
            NavigationContext {
                has_prev: true,
                has_next: true
            }
        );
    }

    #[test]
    fn context_for_single_story_has_no_neighbours() {
        assert_eq!(NavigationContext::at(0, 1), NavigationContext::default());
    }

    #[test]
    fn selection_outside_collection_is_rejected() {
        assert!(Selection::new(3, 3).is_none());
        assert!(Selection::new(0, 0).is_none());
        assert_eq!(Selection::new(2, 3).map(Selection::index), Some(2));
    }

    #[test]
    fn next_advances_inside_collection() {
        let selection = Selection::new(0, 2).unwrap();
        assert_eq!(selection.next(2), Step::Show(1));
    }

    #[test]
    fn next_at_last_index_closes() {
        let selection = Selection::new(1, 2).unwrap();
        assert_eq!(selection.next(2), Step::Close);
    }

    #[test]
    fn previous_at_first_index_stays() {
        let selection = Selection::new(0, 2).unwrap();
        assert_eq!(selection.previous(2), Step::Stay);
    }

    #[test]
    fn previous_moves_back() {
        let selection = Selection::new(2, 3).unwrap();
        assert_eq!(selection.previous(3), Step::Show(1));
    }

    #[test]
    fn next_after_collection_shrank_closes() {
        let selection = Selection::new(2, 3).unwrap();
        assert_eq!(selection.next(1), Step::Close);
    }
}
