//! # Undo manager
//!
//! A bounded double-ended stack of sealed compound edits. Significant
//! edits form undo boundaries; insignificant ones ride along with the
//! nearest significant edit beneath them. New significant history clears
//! the redo stack; branching invalidates the old future.
//!
//! The manager tracks the stage it last left the corpus at. If the corpus
//! moves without the manager seeing it (an edit never handed to
//! `add_edit`), the whole history is stale and both directions refuse
//! until the history is cleared.

use crate::change::Member;
use crate::compound::CompoundEdit;
use crate::errors::EditError;
use crate::manager::EditManager;
use stratum_model::{Corpus, Stage};

/// Bounded undo/redo history over sealed compound edits
#[derive(Debug)]
pub struct UndoManager {
    undo_stack: Vec<CompoundEdit>,
    redo_stack: Vec<CompoundEdit>,
    limit: usize,
    expected_stage: Stage,
    saved_stage: Stage,
    in_progress: bool,
}

impl UndoManager {
    /// Default history bound, in significant edits
    pub const DEFAULT_LIMIT: usize = 100;

    pub fn new(corpus: &Corpus) -> Self {
        Self::with_limit(corpus, Self::DEFAULT_LIMIT)
    }

    /// `limit == 0` means unbounded
    pub fn with_limit(corpus: &Corpus, limit: usize) -> Self {
        let stage = corpus.generation().stage();
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            limit,
            expected_stage: stage,
            saved_stage: stage,
            in_progress: true,
        }
    }

    /// Record a sealed edit; empty or unsealed edits are ignored
    pub fn add_edit(&mut self, edit: CompoundEdit) {
        if !self.in_progress || !edit.is_sealed() || edit.is_empty() {
            return;
        }

        if let Some(stage) = edit.stage_after() {
            self.expected_stage = stage;
        }
        if edit.is_significant() {
            self.redo_stack.clear();
        }
        self.undo_stack.push(edit);

        if self.limit > 0 && self.undo_stack.len() > self.limit {
            self.undo_stack.remove(0);
        }
    }

    pub fn can_undo(&self, manager: &EditManager) -> bool {
        self.in_progress
            && manager.corpus().generation().stage() == self.expected_stage
            && self.undo_stack.last().is_some_and(CompoundEdit::can_undo)
            && self.undo_stack.iter().any(CompoundEdit::is_significant)
    }

    pub fn can_redo(&self, manager: &EditManager) -> bool {
        self.in_progress
            && manager.corpus().generation().stage() == self.expected_stage
            && self.redo_stack.last().is_some_and(CompoundEdit::can_redo)
    }

    /// Replay history backward to the nearest significant boundary
    pub fn undo(&mut self, manager: &mut EditManager) -> Result<(), EditError> {
        self.check_live(manager)?;
        if !self.undo_stack.iter().any(CompoundEdit::is_significant) {
            return Err(EditError::NothingToUndo);
        }
        if !self.undo_stack.last().is_some_and(CompoundEdit::can_undo) {
            return Err(EditError::NothingToUndo);
        }

        loop {
            let mut edit = self.undo_stack.pop().ok_or(EditError::NothingToUndo)?;
            let significant = edit.is_significant();
            for change in edit.changes_mut().iter_mut().rev() {
                change.execute(manager.corpus_mut())?;
            }
            self.redo_stack.push(edit);
            if significant {
                break;
            }
        }

        // undoing commits new content; issue a fresh stage, never a rewind
        self.expected_stage = manager.corpus_mut().advance_generation();
        tracing::debug!("undo complete ({} edits remain)", self.undo_stack.len());
        Ok(())
    }

    /// Replay the most recently undone boundary forward again
    pub fn redo(&mut self, manager: &mut EditManager) -> Result<(), EditError> {
        self.check_live(manager)?;
        if !self.redo_stack.last().is_some_and(CompoundEdit::can_redo) {
            return Err(EditError::NothingToRedo);
        }

        let mut edit = self.redo_stack.pop().ok_or(EditError::NothingToRedo)?;
        for change in edit.changes_mut() {
            change.execute(manager.corpus_mut())?;
        }
        self.undo_stack.push(edit);

        // insignificant edits recorded above the boundary ride along
        while self.redo_stack.last().is_some_and(|e| !e.is_significant()) {
            if let Some(mut follow) = self.redo_stack.pop() {
                for change in follow.changes_mut() {
                    change.execute(manager.corpus_mut())?;
                }
                self.undo_stack.push(follow);
            }
        }

        self.expected_stage = manager.corpus_mut().advance_generation();
        tracing::debug!("redo complete ({} edits remain)", self.redo_stack.len());
        Ok(())
    }

    fn check_live(&self, manager: &EditManager) -> Result<(), EditError> {
        if !self.in_progress {
            return Err(EditError::ManagerEnded);
        }
        if manager.corpus().generation().stage() != self.expected_stage {
            return Err(EditError::StaleHistory);
        }
        Ok(())
    }

    /// Drop every history entry referencing `member`
    ///
    /// Used after an unrelated structural removal invalidates the indices
    /// a recorded change relies on.
    pub fn prune(&mut self, member: &Member) {
        self.undo_stack.retain(|e| !e.touches(member));
        self.redo_stack.retain(|e| !e.touches(member));
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Label of the next undo boundary
    pub fn undo_presentation_name(&self) -> Option<&str> {
        self.undo_stack
            .iter()
            .rev()
            .find(|e| e.is_significant())
            .and_then(CompoundEdit::presentation_name)
    }

    /// Label of the next redo boundary
    pub fn redo_presentation_name(&self) -> Option<&str> {
        self.redo_stack.last().and_then(CompoundEdit::presentation_name)
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    /// Whether the corpus still matches its last-saved generation
    pub fn is_saved_state(&self, manager: &EditManager) -> bool {
        manager.corpus().generation().stage() == self.saved_stage
    }

    /// Stamp the current generation as the saved one
    pub fn mark_saved(&mut self, manager: &EditManager) {
        self.saved_stage = manager.corpus().generation().stage();
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress
    }

    /// Shut the manager down; history is discarded and further
    /// undo/redo/add calls are refused or ignored
    pub fn end(&mut self) {
        self.clear();
        self.in_progress = false;
    }
}
