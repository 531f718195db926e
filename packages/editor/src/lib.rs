//! # Stratum Editor
//!
//! Mutation-and-versioning engine over a `stratum-model` corpus.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ model: corpus, containers, items, layers    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: sessions + reversible changes       │
//! │  - Execute changes with validation          │
//! │  - Group them into sealed compound edits    │
//! │  - Stamp edits with generation stages       │
//! │  - Maintain bounded undo/redo history       │
//! │  - Gate view teardown behind owners         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Changes are self-reversing**: executing the same instance twice
//!    restores the prior observable state
//! 2. **Validate first**: a change that cannot satisfy its precondition
//!    fails before mutating anything
//! 3. **Stages only move forward**: undo commits a fresh generation stage,
//!    it never rewinds one
//! 4. **Single writer**: the edit manager is the only mutation path; only
//!    the view owner set is thread-safe
//!
//! ## Usage
//!
//! ```rust,ignore
//! use stratum_editor::{Change, EditManager, UndoManager};
//! use stratum_model::Corpus;
//!
//! let mut corpus = Corpus::new("news-corpus");
//! let tokens = corpus.add_layer("token");
//! let sentence = corpus.add_container(&tokens)?;
//!
//! let mut manager = EditManager::new(corpus);
//! let mut undo = UndoManager::new(manager.corpus());
//!
//! manager.begin_update_named("insert token")?;
//! manager.execute(Change::add(sentence.clone(), 0, item))?;
//! if let Some(edit) = manager.end_update()? {
//!     undo.add_edit(edit);
//! }
//!
//! undo.undo(&mut manager)?;
//! undo.redo(&mut manager)?;
//! ```

mod change;
mod compound;
mod errors;
mod manager;
mod undo;
mod view;

pub use change::{Change, Member};
pub use compound::CompoundEdit;
pub use errors::{ChangeError, EditError, ReleaseInterrupted, ViewError};
pub use manager::{EditEvent, EditManager};
pub use undo::UndoManager;
pub use view::{AccessMode, CorpusView, ViewOwner, ViewResources, ViewStatus};

// Re-export common model types for convenience
pub use stratum_model::{AnnotationKey, AnnotationValue, Corpus, Item, ItemId, Stage};
