use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::{ItemId, LayerId};

/// Scalar annotation value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum AnnotationValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Str(v) => f.write_str(v),
            AnnotationValue::Int(v) => write!(f, "{}", v),
            AnnotationValue::Float(v) => write!(f, "{}", v),
            AnnotationValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Scalar values are keyed by (item, layer, key)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnnotationKey {
    pub item: ItemId,
    pub layer: LayerId,
    pub key: String,
}

impl AnnotationKey {
    pub fn new(item: ItemId, layer: LayerId, key: impl Into<String>) -> Self {
        Self {
            item,
            layer,
            key: key.into(),
        }
    }
}
