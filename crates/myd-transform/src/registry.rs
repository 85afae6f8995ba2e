//! Named extension hooks for `custom` transforms and validators.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use myd_model::ExtensionRef;
use thiserror::Error;

use crate::builtins;

/// Failure reported by an extension for a single value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExtensionError {
    pub message: String,
}

impl ExtensionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Maps one textual value to another.
pub trait TransformExtension: Send + Sync {
    fn apply(&self, value: &str) -> Result<String, ExtensionError>;
}

/// Decides whether a textual value is acceptable.
pub trait ValidatorExtension: Send + Sync {
    fn check(&self, value: &str) -> Result<bool, ExtensionError>;
}

impl<F> TransformExtension for F
where
    F: Fn(&str) -> Result<String, ExtensionError> + Send + Sync,
{
    fn apply(&self, value: &str) -> Result<String, ExtensionError> {
        self(value)
    }
}

impl<F> ValidatorExtension for F
where
    F: Fn(&str) -> Result<bool, ExtensionError> + Send + Sync,
{
    fn check(&self, value: &str) -> Result<bool, ExtensionError> {
        self(value)
    }
}

/// Extensions keyed by `module.function`.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    transforms: HashMap<String, Arc<dyn TransformExtension>>,
    validators: HashMap<String, Arc<dyn ValidatorExtension>>,
}

impl ExtensionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in `text.*` transforms and `checks.*`
    /// validators.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register(&mut registry);
        registry
    }

    pub fn register_transform(
        &mut self,
        id: impl Into<String>,
        extension: impl TransformExtension + 'static,
    ) {
        self.transforms.insert(id.into(), Arc::new(extension));
    }

    pub fn register_validator(
        &mut self,
        id: impl Into<String>,
        extension: impl ValidatorExtension + 'static,
    ) {
        self.validators.insert(id.into(), Arc::new(extension));
    }

    pub fn transform(&self, reference: &ExtensionRef) -> Option<Arc<dyn TransformExtension>> {
        self.transforms.get(&reference.id()).cloned()
    }

    pub fn validator(&self, reference: &ExtensionRef) -> Option<Arc<dyn ValidatorExtension>> {
        self.validators.get(&reference.id()).cloned()
    }

    pub fn has_transform(&self, id: &str) -> bool {
        self.transforms.contains_key(id)
    }

    pub fn has_validator(&self, id: &str) -> bool {
        self.validators.contains_key(id)
    }

    /// Registered transform ids, sorted.
    pub fn transform_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Registered validator ids, sorted.
    pub fn validator_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("transforms", &self.transform_ids())
            .field("validators", &self.validator_ids())
            .finish()
    }
}
