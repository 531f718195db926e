//! # Corpus
//!
//! The aggregate root of the node model: registered layers, containers and
//! structures keyed by container id, the scalar annotation store, the id
//! generator, and the generation counter. The editing layer treats the
//! corpus as the single mutation target; everything here is plain
//! synchronous data access.

use serde::Serialize;
use std::collections::HashMap;

use crate::annotation::{AnnotationKey, AnnotationValue};
use crate::container::Container;
use crate::error::ModelError;
use crate::generation::{Generation, Stage};
use crate::ids::{ContainerId, IdGenerator, ItemId, LayerId};
use crate::item::Item;
use crate::structure::Structure;

/// Named annotation stratum
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
}

/// A registered container, plain or structured
#[derive(Debug, Clone, PartialEq, Serialize)]
enum ContainerSlot {
    Plain(Container),
    Structured(Structure),
}

impl ContainerSlot {
    fn container(&self) -> &Container {
        match self {
            ContainerSlot::Plain(c) => c,
            ContainerSlot::Structured(s) => s.container(),
        }
    }

    fn container_mut(&mut self) -> &mut Container {
        match self {
            ContainerSlot::Plain(c) => c,
            ContainerSlot::Structured(s) => s.container_mut(),
        }
    }
}

/// Mutable, versioned, layered corpus
#[derive(Debug, Clone, Serialize)]
pub struct Corpus {
    name: String,
    editable: bool,
    layers: Vec<Layer>,
    containers: HashMap<ContainerId, ContainerSlot>,
    annotations: HashMap<AnnotationKey, AnnotationValue>,
    ids: IdGenerator,
    generation: Generation,
}

impl Corpus {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let ids = IdGenerator::new(&name);
        Self {
            name,
            editable: true,
            layers: Vec::new(),
            containers: HashMap::new(),
            annotations: HashMap::new(),
            ids,
            generation: Generation::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    pub fn generation(&self) -> &Generation {
        &self.generation
    }

    /// Commit point: issue the next stage
    pub fn advance_generation(&mut self) -> Stage {
        self.generation.advance()
    }

    // ---- layers ----

    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        let name = name.into();
        let id = LayerId::new(self.ids.next_id());
        self.layers.push(Layer {
            id: id.clone(),
            name,
        });
        id
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn has_layer(&self, id: &LayerId) -> bool {
        self.layers.iter().any(|l| l.id == *id)
    }

    // ---- containers and structures ----

    /// Register a new plain container on `layer`
    pub fn add_container(&mut self, layer: &LayerId) -> Result<ContainerId, ModelError> {
        if !self.has_layer(layer) {
            return Err(ModelError::UnknownLayer(layer.clone()));
        }

        let id = ContainerId::new(self.ids.next_id());
        self.containers.insert(
            id.clone(),
            ContainerSlot::Plain(Container::new(id.clone(), layer.clone())),
        );
        Ok(id)
    }

    /// Register a new structure on `layer`, minting its virtual root
    pub fn add_structure(&mut self, layer: &LayerId) -> Result<ContainerId, ModelError> {
        if !self.has_layer(layer) {
            return Err(ModelError::UnknownLayer(layer.clone()));
        }

        let id = ContainerId::new(self.ids.next_id());
        let root = ItemId::new(self.ids.next_id());
        self.containers.insert(
            id.clone(),
            ContainerSlot::Structured(Structure::new(id.clone(), layer.clone(), root)),
        );
        Ok(id)
    }

    /// Container access, transparent over plain and structured slots
    pub fn container(&self, id: &ContainerId) -> Option<&Container> {
        self.containers.get(id).map(ContainerSlot::container)
    }

    pub fn container_mut(&mut self, id: &ContainerId) -> Option<&mut Container> {
        self.containers.get_mut(id).map(ContainerSlot::container_mut)
    }

    pub fn structure(&self, id: &ContainerId) -> Option<&Structure> {
        match self.containers.get(id) {
            Some(ContainerSlot::Structured(s)) => Some(s),
            _ => None,
        }
    }

    pub fn structure_mut(&mut self, id: &ContainerId) -> Option<&mut Structure> {
        match self.containers.get_mut(id) {
            Some(ContainerSlot::Structured(s)) => Some(s),
            _ => None,
        }
    }

    pub fn container_ids(&self) -> impl Iterator<Item = &ContainerId> {
        self.containers.keys()
    }

    // ---- items ----

    /// Mint a fresh item on `layer`; the caller decides where it lives
    pub fn new_item(&mut self, layer: &LayerId) -> Result<Item, ModelError> {
        if !self.has_layer(layer) {
            return Err(ModelError::UnknownLayer(layer.clone()));
        }
        Ok(Item::new(ItemId::new(self.ids.next_id()), layer.clone()))
    }

    /// Find an item by id across all containers
    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.containers
            .values()
            .find_map(|slot| slot.container().item(id))
    }

    pub fn item_mut(&mut self, id: &ItemId) -> Option<&mut Item> {
        self.containers
            .values_mut()
            .find_map(|slot| slot.container_mut().item_mut(id))
    }

    /// The container currently holding `id`, if any
    pub fn owner_of(&self, id: &ItemId) -> Option<&ContainerId> {
        self.containers
            .iter()
            .find(|(_, slot)| slot.container().contains(id))
            .map(|(cid, _)| cid)
    }

    // ---- annotations ----

    pub fn annotation(&self, key: &AnnotationKey) -> Option<&AnnotationValue> {
        self.annotations.get(key)
    }

    /// Write (or clear, with `None`) a scalar value; returns the previous one
    pub fn set_annotation(
        &mut self,
        key: AnnotationKey,
        value: Option<AnnotationValue>,
    ) -> Option<AnnotationValue> {
        if let Some(item) = self.item_mut(&key.item) {
            item.mark_dirty();
        }
        match value {
            Some(v) => self.annotations.insert(key, v),
            None => self.annotations.remove(&key),
        }
    }

    pub fn annotation_count(&self) -> usize {
        self.annotations.len()
    }
}
