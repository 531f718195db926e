//! Compound edits: the sealed groups of changes one edit session produces.

use serde::Serialize;

use stratum_model::Stage;

use crate::change::{Change, Member};

/// Ordered group of changes captured between a session's begin and end
///
/// Opened implicitly when a session begins, sealed when it ends, immutable
/// thereafter. The undo manager replays sealed edits forward (redo) or
/// backward (undo); the changes flip their own direction on each replay.
#[derive(Debug, Clone, Serialize)]
pub struct CompoundEdit {
    name: Option<String>,
    changes: Vec<Change>,
    stage_before: Stage,
    stage_after: Option<Stage>,
    significant: bool,
    sealed: bool,
}

impl CompoundEdit {
    pub(crate) fn open(name: Option<String>, stage_before: Stage) -> Self {
        Self {
            name,
            changes: Vec::new(),
            stage_before,
            stage_after: None,
            significant: true,
            sealed: false,
        }
    }

    pub(crate) fn record(&mut self, change: Change) {
        debug_assert!(!self.sealed);
        self.changes.push(change);
    }

    pub(crate) fn seal(&mut self, stage_after: Stage) {
        self.stage_after = Some(stage_after);
        self.sealed = true;
    }

    pub(crate) fn set_significant(&mut self, significant: bool) {
        if !self.sealed {
            self.significant = significant;
        }
    }

    /// Human-readable label for undo/redo menus
    pub fn presentation_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn is_significant(&self) -> bool {
        self.significant
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub(crate) fn changes_mut(&mut self) -> &mut [Change] {
        &mut self.changes
    }

    /// Stage observed when the session began
    pub fn stage_before(&self) -> Stage {
        self.stage_before
    }

    /// Stage stamped at seal time; `None` while the session is open
    pub fn stage_after(&self) -> Option<Stage> {
        self.stage_after
    }

    /// Whether this edit references the given member
    pub fn touches(&self, member: &Member) -> bool {
        self.changes.iter().any(|c| c.affected_member() == *member)
    }

    /// A sealed, non-empty edit can be replayed backward
    pub fn can_undo(&self) -> bool {
        self.sealed && !self.changes.is_empty()
    }

    /// A sealed, non-empty edit can be replayed forward again
    pub fn can_redo(&self) -> bool {
        self.sealed && !self.changes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_model::{ContainerId, Generation};

    #[test]
    fn test_seal_stamps_and_freezes() {
        let mut gen = Generation::new();
        let s0 = gen.stage();

        let mut edit = CompoundEdit::open(Some("insert tokens".into()), s0);
        edit.record(Change::remove(ContainerId::from("c-1"), 0));
        assert!(!edit.is_sealed());
        assert!(!edit.can_undo());

        let s1 = gen.advance();
        edit.seal(s1);

        assert!(edit.is_sealed());
        assert!(edit.can_undo());
        assert_eq!(edit.stage_before(), s0);
        assert_eq!(edit.stage_after(), Some(s1));
        assert_eq!(edit.presentation_name(), Some("insert tokens"));

        // significance is frozen at seal time
        edit.set_significant(false);
        assert!(edit.is_significant());
    }

    #[test]
    fn test_touches_matches_affected_members() {
        let edit = {
            let mut e = CompoundEdit::open(None, Generation::new().stage());
            e.record(Change::remove(ContainerId::from("c-1"), 0));
            e
        };

        use crate::change::Member;
        assert!(edit.touches(&Member::Container(ContainerId::from("c-1"))));
        assert!(!edit.touches(&Member::Container(ContainerId::from("c-2"))));
    }
}
