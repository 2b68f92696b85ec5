//! Backend registry for managing available backends.
//!
//! The [`BackendRegistry`] maps device identifiers to factories. Lookups are
//! case-insensitive and go through three tables in order: exact names,
//! aliases, then identifier prefixes (used for raw device ARNs).

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::backend::{Backend, BackendConfig, BackendFactory};
use crate::error::{HalError, HalResult};

/// Future returned by backend factories.
pub type BackendFuture = Pin<Box<dyn Future<Output = HalResult<Box<dyn Backend>>> + Send>>;

/// Factory function type. Cloud backends connect asynchronously.
type Factory = Arc<dyn Fn(BackendConfig) -> BackendFuture + Send + Sync>;

/// Central registry for quantum backends.
pub struct BackendRegistry {
    /// Backend factories keyed by lowercase name.
    builtins: FxHashMap<String, Factory>,
    /// Alternative names, lowercase alias -> canonical name.
    aliases: FxHashMap<String, String>,
    /// Factories for identifiers that start with a given prefix.
    prefixes: Vec<(String, Factory)>,
}

impl BackendRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            builtins: FxHashMap::default(),
            aliases: FxHashMap::default(),
            prefixes: Vec::new(),
        }
    }

    /// Register a backend type constructed synchronously from its config.
    pub fn register<B>(&mut self, name: impl Into<String>)
    where
        B: BackendFactory + 'static,
    {
        self.register_factory(name, |config| async move {
            let backend = B::from_config(config)?;
            Ok(Box::new(backend) as Box<dyn Backend>)
        });
    }

    /// Register a backend factory with a custom (possibly async) constructor.
    pub fn register_factory<F, Fut>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(BackendConfig) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HalResult<Box<dyn Backend>>> + Send + 'static,
    {
        let name = name.into().to_lowercase();
        debug!("Registering backend: {}", name);
        self.builtins.insert(name, boxed(factory));
    }

    /// Register `alias` as another name for the backend `target`.
    pub fn register_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        let alias = alias.into().to_lowercase();
        let target = target.into().to_lowercase();
        debug!("Registering alias: {} -> {}", alias, target);
        self.aliases.insert(alias, target);
    }

    /// Register a factory for every identifier starting with `prefix`.
    pub fn register_prefix<F, Fut>(&mut self, prefix: impl Into<String>, factory: F)
    where
        F: Fn(BackendConfig) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HalResult<Box<dyn Backend>>> + Send + 'static,
    {
        let prefix = prefix.into();
        debug!("Registering prefix backend: {}*", prefix);
        self.prefixes.push((prefix, boxed(factory)));
    }

    /// Resolve an identifier to the canonical registered name, if any.
    pub fn resolve(&self, name: &str) -> Option<String> {
        let key = name.to_lowercase();
        if self.builtins.contains_key(&key) {
            return Some(key);
        }
        if let Some(target) = self.aliases.get(&key) {
            if self.builtins.contains_key(target) {
                return Some(target.clone());
            }
        }
        self.prefixes
            .iter()
            .any(|(prefix, _)| name.starts_with(prefix.as_str()))
            .then(|| name.to_string())
    }

    /// Create a backend by identifier.
    ///
    /// `config.name` is replaced by the resolved identifier.
    pub async fn create(&self, name: &str, mut config: BackendConfig) -> HalResult<Box<dyn Backend>> {
        let key = name.to_lowercase();
        let canonical = self.aliases.get(&key).unwrap_or(&key);

        if let Some(factory) = self.builtins.get(canonical) {
            config.name = canonical.clone();
            return factory(config).await;
        }

        if let Some((_, factory)) = self
            .prefixes
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix.as_str()))
        {
            config.name = name.to_string();
            return factory(config).await;
        }

        Err(HalError::BackendUnavailable(format!(
            "No backend registered with name '{name}'"
        )))
    }

    /// List all registered backend names (aliases excluded).
    pub fn available_backends(&self) -> Vec<String> {
        let mut names: Vec<_> = self.builtins.keys().cloned().collect();
        names.sort();
        names
    }

    /// Aliases that resolve to `name`, sorted.
    pub fn aliases_of(&self, name: &str) -> Vec<String> {
        let target = name.to_lowercase();
        let mut aliases: Vec<_> = self
            .aliases
            .iter()
            .filter(|(_, t)| **t == target)
            .map(|(a, _)| a.clone())
            .collect();
        aliases.sort();
        aliases
    }

    /// Check if an identifier resolves to a backend.
    pub fn has_backend(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn boxed<F, Fut>(factory: F) -> Factory
where
    F: Fn(BackendConfig) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HalResult<Box<dyn Backend>>> + Send + 'static,
{
    Arc::new(move |config| Box::pin(factory(config)) as BackendFuture)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing(_config: BackendConfig) -> impl Future<Output = HalResult<Box<dyn Backend>>> {
        async { Err(HalError::BackendUnavailable("test only".into())) }
    }

    #[test]
    fn test_empty_registry() {
        let registry = BackendRegistry::new();
        assert!(registry.available_backends().is_empty());
        assert!(!registry.has_backend("simulator"));
    }

    #[test]
    fn test_register_factory_and_aliases() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("Test", failing);
        registry.register_alias("t", "test");
        registry.register_alias("tst", "test");

        assert!(registry.has_backend("test"));
        assert!(registry.has_backend("TEST"));
        assert_eq!(registry.resolve("t"), Some("test".to_string()));
        assert_eq!(registry.available_backends(), vec!["test"]);
        assert_eq!(registry.aliases_of("test"), vec!["t", "tst"]);
    }

    #[test]
    fn test_prefix_resolution() {
        let mut registry = BackendRegistry::new();
        registry.register_prefix("arn:aws:braket:", failing);

        let arn = "arn:aws:braket:us-east-1::device/qpu/rigetti/Ankaa-3";
        assert_eq!(registry.resolve(arn), Some(arn.to_string()));
        assert!(!registry.has_backend("arn:aws:s3:::bucket"));
    }

    #[tokio::test]
    async fn test_create_unknown_backend() {
        let registry = BackendRegistry::new();
        let result = registry
            .create("nonexistent", BackendConfig::new("nonexistent"))
            .await;
        assert!(matches!(result, Err(HalError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn test_create_dispatches_to_factory() {
        let mut registry = BackendRegistry::new();
        registry.register_factory("broken", failing);
        registry.register_alias("b", "broken");

        let err = registry.create("b", BackendConfig::new("b")).await;
        match err {
            Err(HalError::BackendUnavailable(msg)) => assert_eq!(msg, "test only"),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("factory should fail"),
        }
    }
}
