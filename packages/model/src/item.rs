use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, LayerId};

bitflags! {
    /// Lifecycle flags carried by every item
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ItemFlags: u8 {
        /// Item is live corpus content (cleared when detached for good)
        const ALIVE  = 1 << 0;
        /// Item refuses scalar value changes
        const LOCKED = 1 << 1;
        /// Item was touched since the corpus was last saved
        const DIRTY  = 1 << 2;
    }
}

/// Smallest addressable corpus element
///
/// An item belongs to exactly one layer and is exclusively owned by the
/// container that reports it via index access; items are never shared
/// across containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub layer: LayerId,
    pub flags: ItemFlags,
}

impl Item {
    pub fn new(id: ItemId, layer: LayerId) -> Self {
        Self {
            id,
            layer,
            flags: ItemFlags::ALIVE,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.flags.contains(ItemFlags::ALIVE)
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(ItemFlags::LOCKED)
    }

    pub fn is_dirty(&self) -> bool {
        self.flags.contains(ItemFlags::DIRTY)
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.flags.set(ItemFlags::LOCKED, locked);
    }

    pub fn mark_dirty(&mut self) {
        self.flags.insert(ItemFlags::DIRTY);
    }

    pub fn clear_dirty(&mut self) {
        self.flags.remove(ItemFlags::DIRTY);
    }
}
