use thiserror::Error;

use crate::ids::{EdgeId, ItemId, LayerId};

/// Node-model errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("index {index} out of bounds for container of {len} items")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("item {0} is already held by this container")]
    DuplicateItem(ItemId),

    #[error("layer {0} is not registered with this corpus")]
    UnknownLayer(LayerId),

    #[error("edge {0} not found")]
    EdgeNotFound(EdgeId),

    #[error("edge endpoint {0} is not a member of the structure")]
    DanglingEndpoint(ItemId),
}
