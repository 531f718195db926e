//! Error types for the editing layer

use thiserror::Error;

use stratum_model::{ContainerId, ItemId, ModelError};

/// Why a change refused to validate or execute
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChangeError {
    #[error("container {0} not found")]
    ContainerNotFound(ContainerId),

    #[error("item {0} not found")]
    ItemNotFound(ItemId),

    #[error("index {index} out of bounds for container of {len} items")]
    OutOfBounds { index: usize, len: usize },

    #[error("run {begin}..{end} is not a valid span of a container of {len} items")]
    InvalidRun {
        begin: usize,
        end: usize,
        len: usize,
    },

    #[error("item {0} is locked against value changes")]
    ItemLocked(ItemId),

    #[error("item {0} is already held by the container")]
    DuplicateItem(ItemId),

    #[error("splice carries no item payload to insert")]
    MissingPayload,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Edit-session and undo-history errors
#[derive(Error, Debug)]
pub enum EditError {
    #[error("corpus is not editable")]
    NotEditable,

    #[error("end_update without a matching begin_update")]
    UnbalancedEnd,

    #[error("cannot name a nested update (pending name: {pending:?})")]
    NestedName { pending: Option<String> },

    #[error("no update in progress")]
    NoOpenUpdate,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("undo history is stale: the corpus changed outside the undo manager")]
    StaleHistory,

    #[error("undo manager has ended")]
    ManagerEnded,

    #[error("change failed: {0}")]
    Change(#[from] ChangeError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Raised when an owner's release (or the view's own resource release)
/// is interrupted before completing
#[derive(Error, Debug, Clone, PartialEq)]
#[error("release interrupted: {0}")]
pub struct ReleaseInterrupted(pub String);

/// View lifecycle errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    #[error("view {0} is closed")]
    Closed(String),

    #[error("owner {owner} never acquired view {view}")]
    UnknownOwner { view: String, owner: String },

    #[error("view {view} cannot close: blocked by {blocking:?}")]
    Unclosable {
        view: String,
        blocking: Vec<String>,
    },

    #[error("closing view {view} was interrupted: {cause}")]
    Interrupted {
        view: String,
        cause: ReleaseInterrupted,
    },
}
