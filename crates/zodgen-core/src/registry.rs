use crate::expr::{ExpressionNode, ShapeKey};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// RegistryError
///
/// Violations of the two-phase discipline. These are internal invariants:
/// the composer registers every key it will build before building any
/// body, and every embedded reference must resolve to a registered key.
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("shape '{0}' registered twice")]
    Duplicate(String),

    #[error("shape '{0}' embeds a reference to unregistered '{1}'")]
    Dangling(String, String),

    #[error("cannot fill shapes before the registry is sealed")]
    NotSealed,

    #[error("shape '{0}' filled twice")]
    Refilled(String),

    #[error("registry is sealed; cannot register '{0}'")]
    Sealed(String),

    #[error("shape '{0}' was never registered")]
    Unknown(String),

    #[error("unfilled shapes at finish: {0}")]
    Unfilled(String),
}

///
/// ShapeRegistry
///
/// Write-once registry of deferred handles. Phase 1 registers a slot for
/// every `(target, kind)` the plan will build, then the registry is
/// sealed (the barrier); phase 2 fills each body exactly once, resolving
/// embedded references against the phase-1 slots. No handle is ever
/// expanded before all handles exist, which is what terminates self- and
/// mutually-referential models.
///

#[derive(Debug, Default)]
pub struct ShapeRegistry {
    keys: Vec<ShapeKey>,
    slots: Vec<Option<ExpressionNode>>,
    index: BTreeMap<ShapeKey, usize>,
    sealed: bool,
}

impl ShapeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phase 1: reserve a slot for a key the composer will build.
    pub fn register(&mut self, key: ShapeKey) -> Result<(), RegistryError> {
        if self.sealed {
            return Err(RegistryError::Sealed(key.to_string()));
        }
        if self.index.contains_key(&key) {
            return Err(RegistryError::Duplicate(key.to_string()));
        }

        self.index.insert(key.clone(), self.slots.len());
        self.keys.push(key);
        self.slots.push(None);

        Ok(())
    }

    /// The barrier between registration and construction.
    pub const fn seal(&mut self) {
        self.sealed = true;
    }

    #[must_use]
    pub fn contains(&self, key: &ShapeKey) -> bool {
        self.index.contains_key(key)
    }

    /// Registered keys in registration order.
    #[must_use]
    pub fn registered_keys(&self) -> Vec<ShapeKey> {
        self.keys.clone()
    }

    /// Phase 2: fill a registered slot, exactly once. Every reference the
    /// body embeds must resolve to a registered key.
    pub fn fill(&mut self, key: &ShapeKey, node: ExpressionNode) -> Result<(), RegistryError> {
        if !self.sealed {
            return Err(RegistryError::NotSealed);
        }
        let Some(&slot) = self.index.get(key) else {
            return Err(RegistryError::Unknown(key.to_string()));
        };
        if self.slots[slot].is_some() {
            return Err(RegistryError::Refilled(key.to_string()));
        }

        let mut dangling = None;
        node.for_each_reference(&mut |reference| {
            if dangling.is_none() && !self.index.contains_key(reference) {
                dangling = Some(reference.clone());
            }
        });
        if let Some(reference) = dangling {
            return Err(RegistryError::Dangling(
                key.to_string(),
                reference.to_string(),
            ));
        }

        self.slots[slot] = Some(node);

        Ok(())
    }

    /// Close the registry: every slot must have been filled.
    pub fn finish(self) -> Result<ShapeForest, RegistryError> {
        let unfilled: Vec<String> = self
            .keys
            .iter()
            .zip(&self.slots)
            .filter(|(_, slot)| slot.is_none())
            .map(|(key, _)| key.to_string())
            .collect();
        if !unfilled.is_empty() {
            return Err(RegistryError::Unfilled(unfilled.join(", ")));
        }

        let entries = self
            .keys
            .into_iter()
            .zip(self.slots)
            .map(|(key, slot)| (key, slot.expect("slot filled; checked above")))
            .collect();

        Ok(ShapeForest { entries })
    }
}

///
/// ShapeForest
///
/// The completed, immutable expression-tree set, in registration order
/// (model-declaration order within a run). This is the outbound handoff
/// to the external emitter.
///

#[derive(Debug, Serialize)]
pub struct ShapeForest {
    entries: Vec<(ShapeKey, ExpressionNode)>,
}

impl ShapeForest {
    #[must_use]
    pub fn get(&self, key: &ShapeKey) -> Option<&ExpressionNode> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, node)| node)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ShapeKey, ExpressionNode)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ShapeKey> {
        self.entries.iter().map(|(key, _)| key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

///
/// TESTS
///
