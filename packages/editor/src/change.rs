//! # Reversible changes
//!
//! One `Change` describes one structural or scalar mutation of the corpus
//! and carries enough recorded state to invert itself. `execute` applies
//! the mutation when the change is in its forward state and inverts it
//! when reversed, flipping the recorded direction each time. Executing
//! the same instance twice restores the corpus to its prior observable
//! state.
//!
//! ## Semantics
//!
//! ### Splice
//! - One item inserted at or removed from an index; `is_add` selects the
//!   direction of the next execution
//! - Removing from a structure detaches incident edges and records them
//!   so the inverse can restore them
//!
//! ### SpliceRun
//! - A contiguous run of items over `[begin, end)`
//! - Validated as a whole before the first insertion (no partial runs)
//!
//! ### Move
//! - Atomic relocation within one container; `move(to, from)` is the
//!   exact inverse
//!
//! ### SetValue
//! - Atomic replacement of a scalar annotation value, recording the
//!   previous value for inversion

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use stratum_model::{
    AnnotationKey, AnnotationValue, Container, ContainerId, Corpus, Edge, EditVerifier, Item,
    ItemId, LayerId,
};

use crate::errors::ChangeError;

/// The corpus member a change touches, for undo-history correlation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Member {
    Item(ItemId),
    Container(ContainerId),
}

/// One reversible mutation unit
///
/// Every variant keeps its reversal state explicit; `execute` takes
/// `&mut self` so the direction flip is visible in the type system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Change {
    /// Insert or remove one item at an index
    Splice {
        container: ContainerId,
        index: usize,
        /// Payload to insert next (filled by a removal, drained by an add)
        item: Option<Item>,
        /// Identity of the spliced item, kept stable across direction flips
        item_id: Option<ItemId>,
        /// Direction of the next execution
        is_add: bool,
        /// Edges detached by removing the item from a structure
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        detached: Vec<Edge>,
    },

    /// Insert or remove a contiguous run of items over `[begin, end)`
    SpliceRun {
        container: ContainerId,
        begin: usize,
        end: usize,
        items: Vec<Item>,
        is_add: bool,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        detached: Vec<Edge>,
    },

    /// Relocate one item from `from` to `to` within a container
    Move {
        container: ContainerId,
        from: usize,
        to: usize,
        applied: bool,
    },

    /// Replace the scalar annotation value for (item, key, layer)
    SetValue {
        item: ItemId,
        layer: LayerId,
        key: String,
        /// Value the forward direction writes (`None` clears)
        value: Option<AnnotationValue>,
        /// Captured at execution time for inversion
        previous: Option<AnnotationValue>,
        applied: bool,
    },
}

impl Change {
    pub fn add(container: ContainerId, index: usize, item: Item) -> Self {
        let item_id = Some(item.id.clone());
        Change::Splice {
            container,
            index,
            item: Some(item),
            item_id,
            is_add: true,
            detached: Vec::new(),
        }
    }

    pub fn remove(container: ContainerId, index: usize) -> Self {
        Change::Splice {
            container,
            index,
            item: None,
            item_id: None,
            is_add: false,
            detached: Vec::new(),
        }
    }

    pub fn add_run(container: ContainerId, begin: usize, items: Vec<Item>) -> Self {
        let end = begin + items.len();
        Change::SpliceRun {
            container,
            begin,
            end,
            items,
            is_add: true,
            detached: Vec::new(),
        }
    }

    pub fn remove_run(container: ContainerId, begin: usize, end: usize) -> Self {
        Change::SpliceRun {
            container,
            begin,
            end,
            items: Vec::new(),
            is_add: false,
            detached: Vec::new(),
        }
    }

    pub fn move_item(container: ContainerId, from: usize, to: usize) -> Self {
        Change::Move {
            container,
            from,
            to,
            applied: false,
        }
    }

    pub fn set_value(
        item: ItemId,
        layer: LayerId,
        key: impl Into<String>,
        value: Option<AnnotationValue>,
    ) -> Self {
        Change::SetValue {
            item,
            layer,
            key: key.into(),
            value,
            previous: None,
            applied: false,
        }
    }

    /// Debug label for events and logs
    pub fn kind_name(&self) -> &'static str {
        match self {
            Change::Splice { .. } => "splice",
            Change::SpliceRun { .. } => "splice-run",
            Change::Move { .. } => "move",
            Change::SetValue { .. } => "set-value",
        }
    }

    /// The member this change is correlated with when pruning history
    pub fn affected_member(&self) -> Member {
        match self {
            Change::Splice {
                container, item_id, ..
            } => match item_id {
                Some(id) => Member::Item(id.clone()),
                None => Member::Container(container.clone()),
            },
            Change::SpliceRun { container, .. } => Member::Container(container.clone()),
            Change::Move { container, .. } => Member::Container(container.clone()),
            Change::SetValue { item, .. } => Member::Item(item.clone()),
        }
    }

    /// Check the precondition for the next execution without mutating
    pub fn validate(&self, corpus: &Corpus) -> Result<(), ChangeError> {
        match self {
            Change::Splice {
                container,
                index,
                item,
                is_add,
                ..
            } => {
                let target = lookup(corpus, container)?;
                if *is_add {
                    let payload = item.as_ref().ok_or(ChangeError::MissingPayload)?;
                    if !target.can_add(*index, payload) {
                        return Err(if *index > target.item_count() {
                            ChangeError::OutOfBounds {
                                index: *index,
                                len: target.item_count(),
                            }
                        } else {
                            ChangeError::DuplicateItem(payload.id.clone())
                        });
                    }
                } else if !target.can_remove(*index) {
                    return Err(ChangeError::OutOfBounds {
                        index: *index,
                        len: target.item_count(),
                    });
                }
                Ok(())
            }

            Change::SpliceRun {
                container,
                begin,
                end,
                items,
                is_add,
                ..
            } => {
                let target = lookup(corpus, container)?;
                let len = target.item_count();
                if *is_add {
                    if *begin > len {
                        return Err(ChangeError::OutOfBounds { index: *begin, len });
                    }
                    let mut seen = HashSet::new();
                    for it in items {
                        if target.contains(&it.id) || !seen.insert(it.id.clone()) {
                            return Err(ChangeError::DuplicateItem(it.id.clone()));
                        }
                    }
                    Ok(())
                } else if *begin > *end || *end > len {
                    Err(ChangeError::InvalidRun {
                        begin: *begin,
                        end: *end,
                        len,
                    })
                } else {
                    Ok(())
                }
            }

            Change::Move {
                container,
                from,
                to,
                applied,
            } => {
                let target = lookup(corpus, container)?;
                let (src, dst) = if *applied { (*to, *from) } else { (*from, *to) };
                if !target.can_move(src, dst) {
                    let len = target.item_count();
                    let bad = if src >= len { src } else { dst };
                    return Err(ChangeError::OutOfBounds { index: bad, len });
                }
                Ok(())
            }

            Change::SetValue { item, .. } => {
                let found = corpus
                    .item(item)
                    .ok_or_else(|| ChangeError::ItemNotFound(item.clone()))?;
                if found.is_locked() {
                    return Err(ChangeError::ItemLocked(item.clone()));
                }
                Ok(())
            }
        }
    }

    /// Apply or invert the mutation, flipping the recorded direction
    ///
    /// Re-validates first and fails without side effects if the target no
    /// longer satisfies the precondition.
    pub fn execute(&mut self, corpus: &mut Corpus) -> Result<(), ChangeError> {
        self.validate(corpus)?;

        match self {
            Change::Splice {
                container,
                index,
                item,
                item_id,
                is_add,
                detached,
            } => {
                if *is_add {
                    let payload = item.take().ok_or(ChangeError::MissingPayload)?;
                    lookup_mut(corpus, container)?.add_item(*index, payload)?;
                    if !detached.is_empty() {
                        if let Some(structure) = corpus.structure_mut(container) {
                            structure.restore_edges(std::mem::take(detached))?;
                        }
                    }
                    *is_add = false;
                } else {
                    let target = lookup(corpus, container)?;
                    let removed_id = target
                        .item_at(*index)
                        .ok_or(ChangeError::OutOfBounds {
                            index: *index,
                            len: target.item_count(),
                        })?
                        .id
                        .clone();
                    if let Some(structure) = corpus.structure_mut(container) {
                        *detached = structure.detach_item_edges(&removed_id);
                    }
                    let removed = lookup_mut(corpus, container)?.remove_item(*index)?;
                    *item_id = Some(removed.id.clone());
                    *item = Some(removed);
                    *is_add = true;
                }
                Ok(())
            }

            Change::SpliceRun {
                container,
                begin,
                end,
                items,
                is_add,
                detached,
            } => {
                if *is_add {
                    let run = std::mem::take(items);
                    *end = *begin + run.len();
                    {
                        let target = lookup_mut(corpus, container)?;
                        for (offset, it) in run.into_iter().enumerate() {
                            target.add_item(*begin + offset, it)?;
                        }
                    }
                    if !detached.is_empty() {
                        if let Some(structure) = corpus.structure_mut(container) {
                            structure.restore_edges(std::mem::take(detached))?;
                        }
                    }
                    *is_add = false;
                } else {
                    let target = lookup(corpus, container)?;
                    let run_ids: Vec<ItemId> = target
                        .items()
                        .get(*begin..*end)
                        .ok_or(ChangeError::InvalidRun {
                            begin: *begin,
                            end: *end,
                            len: target.item_count(),
                        })?
                        .iter()
                        .map(|it| it.id.clone())
                        .collect();
                    if let Some(structure) = corpus.structure_mut(container) {
                        for id in &run_ids {
                            detached.extend(structure.detach_item_edges(id));
                        }
                    }
                    let target = lookup_mut(corpus, container)?;
                    let mut removed = Vec::with_capacity(*end - *begin);
                    for _ in *begin..*end {
                        removed.push(target.remove_item(*begin)?);
                    }
                    *items = removed;
                    *is_add = true;
                }
                Ok(())
            }

            Change::Move {
                container,
                from,
                to,
                applied,
            } => {
                let (src, dst) = if *applied { (*to, *from) } else { (*from, *to) };
                lookup_mut(corpus, container)?.move_item(src, dst)?;
                *applied = !*applied;
                Ok(())
            }

            Change::SetValue {
                item,
                layer,
                key,
                value,
                previous,
                applied,
            } => {
                let k = AnnotationKey::new(item.clone(), layer.clone(), key.clone());
                if *applied {
                    corpus.set_annotation(k, previous.take());
                    *applied = false;
                } else {
                    *previous = corpus.set_annotation(k, value.clone());
                    *applied = true;
                }
                Ok(())
            }
        }
    }
}

fn lookup<'a>(corpus: &'a Corpus, id: &ContainerId) -> Result<&'a Container, ChangeError> {
    corpus
        .container(id)
        .ok_or_else(|| ChangeError::ContainerNotFound(id.clone()))
}

fn lookup_mut<'a>(corpus: &'a mut Corpus, id: &ContainerId) -> Result<&'a mut Container, ChangeError> {
    corpus
        .container_mut(id)
        .ok_or_else(|| ChangeError::ContainerNotFound(id.clone()))
}
