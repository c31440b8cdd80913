//! Execution environment and dependency bag handed to every validation context.

use std::any::Any;
use std::sync::Arc;

use ahash::AHashMap;

use crate::message;

pub type Translator = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Where validation runs and how message keys are localized.
#[derive(Clone)]
pub struct Environment {
    pub is_server: bool,
    translator: Translator,
}

impl core::fmt::Debug for Environment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Environment")
            .field("is_server", &self.is_server)
            .finish_non_exhaustive()
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::server()
    }
}

impl Environment {
    pub fn new(is_server: bool) -> Self {
        Self {
            is_server,
            translator: Arc::new(message::english),
        }
    }

    pub fn server() -> Self {
        Self::new(true)
    }

    pub fn client() -> Self {
        Self::new(false)
    }

    /// Replace the translation lookup. Keys are `validation.<code>` style.
    pub fn with_translator(
        mut self,
        translate: impl Fn(&str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.translator = Arc::new(translate);
        self
    }

    pub fn translate(&self, key: &str) -> String {
        (self.translator)(key)
    }
}

/// Request-scoped values (an authenticated actor, a clock, ...) that dynamic
/// constraints may read. Passed through unchanged.
#[derive(Clone, Default)]
pub struct Dependencies(AHashMap<String, Arc<dyn Any + Send + Sync>>);

impl core::fmt::Debug for Dependencies {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) -> &mut Self {
        self.0.insert(key.into(), Arc::new(value));
        self
    }

    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// The value stored under `key`, if present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.0.get(key)?.downcast_ref()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}
