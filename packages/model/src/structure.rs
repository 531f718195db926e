//! Structures: containers that also own edges and a virtual root.

use serde::{Deserialize, Serialize};

use crate::container::Container;
use crate::error::ModelError;
use crate::ids::{ContainerId, EdgeId, ItemId, LayerId};

/// Directed edge between two members of one structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: ItemId,
    pub target: ItemId,
}

/// A container that additionally owns edges between its items
///
/// The virtual root is a distinguished node id that never appears among
/// the regular items; edges may originate at it (e.g. top-level
/// dominance relations).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    container: Container,
    root: ItemId,
    edges: Vec<Edge>,
}

impl Structure {
    pub fn new(id: ContainerId, layer: LayerId, root: ItemId) -> Self {
        Self {
            container: Container::new(id, layer),
            root,
            edges: Vec::new(),
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// The virtual root, not counted among regular items
    pub fn root(&self) -> &ItemId {
        &self.root
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn is_member(&self, id: &ItemId) -> bool {
        *id == self.root || self.container.contains(id)
    }

    /// Add an edge; both endpoints must be the root or contained items
    pub fn add_edge(&mut self, id: EdgeId, source: ItemId, target: ItemId) -> Result<(), ModelError> {
        if !self.is_member(&source) {
            return Err(ModelError::DanglingEndpoint(source));
        }
        if !self.is_member(&target) {
            return Err(ModelError::DanglingEndpoint(target));
        }

        self.edges.push(Edge { id, source, target });
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &EdgeId) -> Result<Edge, ModelError> {
        let pos = self
            .edges
            .iter()
            .position(|e| e.id == *id)
            .ok_or_else(|| ModelError::EdgeNotFound(id.clone()))?;
        Ok(self.edges.remove(pos))
    }

    pub fn edges_from<'a>(&'a self, item: &ItemId) -> impl Iterator<Item = &'a Edge> + 'a {
        let item = item.clone();
        self.edges.iter().filter(move |e| e.source == item)
    }

    pub fn edges_into<'a>(&'a self, item: &ItemId) -> impl Iterator<Item = &'a Edge> + 'a {
        let item = item.clone();
        self.edges.iter().filter(move |e| e.target == item)
    }

    /// Detach and return every edge incident to `item`
    ///
    /// Called before the item leaves the structure; the returned edges let
    /// a reversible change restore them when the removal is inverted.
    pub fn detach_item_edges(&mut self, item: &ItemId) -> Vec<Edge> {
        let (detached, kept): (Vec<_>, Vec<_>) = self
            .edges
            .drain(..)
            .partition(|e| e.source == *item || e.target == *item);
        self.edges = kept;
        detached
    }

    /// Re-attach previously detached edges; endpoints must be present again
    pub fn restore_edges(&mut self, edges: Vec<Edge>) -> Result<(), ModelError> {
        for edge in &edges {
            if !self.is_member(&edge.source) {
                return Err(ModelError::DanglingEndpoint(edge.source.clone()));
            }
            if !self.is_member(&edge.target) {
                return Err(ModelError::DanglingEndpoint(edge.target.clone()));
            }
        }
        self.edges.extend(edges);
        Ok(())
    }
}
