//! # Stratum Model
//!
//! The corpus node model: items, containers, structures, layers and
//! scalar annotations, plus the generation counter the editing layer
//! stamps its compound edits with.
//!
//! ```text
//! Corpus
//!  ├── Layer*                  named annotation strata
//!  ├── Container*              ordered item owners (id → index map)
//!  │    └── Item*              alive/locked/dirty flags, one layer each
//!  ├── Structure*              containers + edges + a virtual root
//!  ├── annotations             (item, layer, key) → scalar value
//!  └── Generation              monotonic stage counter
//! ```
//!
//! The model performs no I/O and carries no locking. Single-writer access
//! is assumed; the editing layer in `stratum-editor` is the intended
//! mutation path.

mod annotation;
mod container;
mod corpus;
mod error;
mod generation;
mod ids;
mod item;
mod structure;

pub use annotation::{AnnotationKey, AnnotationValue};
pub use container::{Container, EditVerifier};
pub use corpus::{Corpus, Layer};
pub use error::ModelError;
pub use generation::{Generation, Stage};
pub use ids::{corpus_seed, ContainerId, EdgeId, IdGenerator, ItemId, LayerId};
pub use item::{Item, ItemFlags};
pub use structure::{Edge, Structure};
