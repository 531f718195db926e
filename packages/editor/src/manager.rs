//! # Edit manager
//!
//! The single mutation path onto a corpus. Client code opens an edit
//! session, executes changes (applied immediately, so readers inside the
//! session observe them right away), and closes the session; the manager
//! assembles the sealed [`CompoundEdit`], stamps it with the generation
//! before/after, and publishes it.
//!
//! Sessions nest: only the outermost `begin_update` opens the compound
//! edit and only the outermost `end_update` seals it. Event order per
//! session is fixed: `BeginUpdate`, zero or more `Execute` in application
//! order, then `BeforeUndo`, undo-listener delivery, `EndUpdate`.

use crate::change::Change;
use crate::compound::CompoundEdit;
use crate::errors::EditError;
use stratum_model::{Corpus, Item, LayerId};

/// Session lifecycle events, fanned out to subscribers in order
#[derive(Debug, Clone)]
pub enum EditEvent {
    /// First begin of a session
    BeginUpdate {
        level: usize,
        name: Option<String>,
    },
    /// A change was applied (the corpus is already mutated)
    Execute { level: usize, change: Change },
    /// The outermost end is sealing; fired before undo listeners run
    BeforeUndo { level: usize, edit: CompoundEdit },
    /// The session is complete
    EndUpdate { level: usize },
}

type EditListener = Box<dyn FnMut(&EditEvent)>;
type UndoListener = Box<dyn FnMut(&CompoundEdit)>;

/// Groups changes into atomic, named, nested compound edits
pub struct EditManager {
    corpus: Corpus,
    level: usize,
    pending: Option<CompoundEdit>,
    listeners: Vec<EditListener>,
    undo_listeners: Vec<UndoListener>,
}

impl EditManager {
    pub fn new(corpus: Corpus) -> Self {
        Self {
            corpus,
            level: 0,
            pending: None,
            listeners: Vec::new(),
            undo_listeners: Vec::new(),
        }
    }

    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }

    /// Hand the corpus back (e.g. for undo replay); consumes the manager
    pub fn into_corpus(self) -> Corpus {
        self.corpus
    }

    pub(crate) fn corpus_mut(&mut self) -> &mut Corpus {
        &mut self.corpus
    }

    /// Mint a fresh item on `layer` through the corpus's id generator
    ///
    /// Minting is not a recorded mutation; the item only enters the corpus
    /// once an add change places it in a container.
    pub fn new_item(&mut self, layer: &LayerId) -> Result<Item, EditError> {
        Ok(self.corpus.new_item(layer)?)
    }

    /// Current nesting level; 0 means idle
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn in_update(&self) -> bool {
        self.level > 0
    }

    /// Subscribe to session lifecycle events
    pub fn subscribe(&mut self, listener: impl FnMut(&EditEvent) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Subscribe to sealed compound edits, delivered once per session
    pub fn subscribe_undo(&mut self, listener: impl FnMut(&CompoundEdit) + 'static) {
        self.undo_listeners.push(Box::new(listener));
    }

    /// Open (or nest into) an edit session
    pub fn begin_update(&mut self) -> Result<(), EditError> {
        self.begin_inner(None)
    }

    /// Open a named session; only the outermost begin may name it
    pub fn begin_update_named(&mut self, name: impl Into<String>) -> Result<(), EditError> {
        self.begin_inner(Some(name.into()))
    }

    fn begin_inner(&mut self, name: Option<String>) -> Result<(), EditError> {
        if self.level == 0 {
            let stage = self.corpus.generation().stage();
            self.pending = Some(CompoundEdit::open(name.clone(), stage));
            self.level = 1;
            tracing::debug!("begin update session (name: {:?})", name);
            self.fire(&EditEvent::BeginUpdate { level: 1, name });
            return Ok(());
        }

        if let Some(name) = name {
            let pending = self
                .pending
                .as_mut()
                .ok_or(EditError::NoOpenUpdate)?;
            if pending.presentation_name() != Some(name.as_str()) {
                return Err(EditError::NestedName {
                    pending: pending.presentation_name().map(str::to_string),
                });
            }
        }
        self.level += 1;
        Ok(())
    }

    /// Mark the edit under construction as not worth an undo boundary
    pub fn mark_insignificant(&mut self) -> Result<(), EditError> {
        self.pending
            .as_mut()
            .ok_or(EditError::NoOpenUpdate)?
            .set_significant(false);
        Ok(())
    }

    /// Apply a change immediately and record it in the pending edit
    ///
    /// Outside a session, wraps itself in a one-change session.
    pub fn execute(&mut self, change: Change) -> Result<(), EditError> {
        if !self.corpus.is_editable() {
            return Err(EditError::NotEditable);
        }

        if self.level == 0 {
            self.begin_update()?;
            let result = self.execute_inner(change);
            // seal the implicit session even if the change failed
            self.end_update()?;
            return result;
        }

        self.execute_inner(change)
    }

    fn execute_inner(&mut self, mut change: Change) -> Result<(), EditError> {
        change.execute(&mut self.corpus)?;
        tracing::trace!("executed {} change", change.kind_name());

        let pending = self.pending.as_mut().ok_or(EditError::NoOpenUpdate)?;
        pending.record(change.clone());

        let level = self.level;
        self.fire(&EditEvent::Execute { level, change });
        Ok(())
    }

    /// Close one nesting level; seals and publishes at the outermost end
    ///
    /// Returns the sealed edit at the outermost end so the caller can feed
    /// it to an undo manager; `Ok(None)` while still nested.
    pub fn end_update(&mut self) -> Result<Option<CompoundEdit>, EditError> {
        if self.level == 0 {
            return Err(EditError::UnbalancedEnd);
        }

        self.level -= 1;
        if self.level > 0 {
            return Ok(None);
        }

        let mut edit = self.pending.take().ok_or(EditError::UnbalancedEnd)?;
        let stage_after = if edit.is_empty() {
            self.corpus.generation().stage()
        } else {
            self.corpus.advance_generation()
        };
        edit.seal(stage_after);
        tracing::debug!(
            "sealed edit {:?} with {} changes",
            edit.presentation_name(),
            edit.len()
        );

        self.fire(&EditEvent::BeforeUndo {
            level: 0,
            edit: edit.clone(),
        });
        for listener in &mut self.undo_listeners {
            listener(&edit);
        }
        self.fire(&EditEvent::EndUpdate { level: 0 });

        Ok(Some(edit))
    }

    fn fire(&mut self, event: &EditEvent) {
        for listener in &mut self.listeners {
            listener(event);
        }
    }
}
