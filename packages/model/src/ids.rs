use crc32fast::Hasher;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Derive a corpus seed from its name using CRC32
pub fn corpus_seed(name: &str) -> String {
    let mut buff = String::from(name);
    if !name.starts_with("corpus://") {
        buff = format!("corpus://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

id_type!(
    /// Stable identity of an item within its corpus
    ItemId
);
id_type!(
    /// Stable identity of a container or structure
    ContainerId
);
id_type!(
    /// Stable identity of an annotation layer
    LayerId
);
id_type!(
    /// Stable identity of an edge within a structure
    EdgeId
);

/// Sequential ID generator for corpus members
///
/// All members of one corpus share the same CRC32 seed so ids stay
/// unique corpus-wide and stable across runs for the same creation order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdGenerator {
    seed: String, // Corpus ID (CRC32)
    count: u32,   // Sequential counter
}

impl IdGenerator {
    pub fn new(corpus_name: &str) -> Self {
        Self {
            seed: corpus_seed(corpus_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn next_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Get the corpus ID seed
    pub fn seed(&self) -> &str {
        &self.seed
    }
}
