//! Manifest builders for creating test fixtures
//!
//! Produces `module.json` values with keys in the order a hand-written
//! manifest usually has them.

#![allow(dead_code)]

use serde_json::{json, Map, Value};

/// Builder for module manifests
pub struct ManifestBuilder {
    name: String,
    alias: Option<String>,
    description: String,
    version: String,
    order: i64,
    requires: Vec<String>,
    providers: Vec<String>,
    extra: Map<String, Value>,
}

impl ManifestBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
            description: format!("{} module", name.to_lowercase()),
            version: "0.1".to_string(),
            order: 0,
            requires: Vec::new(),
            providers: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    pub fn requires(mut self, name: &str) -> Self {
        self.requires.push(name.to_string());
        self
    }

    pub fn with_provider(mut self, provider: &str) -> Self {
        self.providers.push(provider.to_string());
        self
    }

    /// Extra top-level key, appended after the standard ones
    pub fn with_key(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Value {
        let alias = self
            .alias
            .unwrap_or_else(|| self.name.to_lowercase());
        let mut value = json!({
            "name": self.name,
            "alias": alias,
            "description": self.description,
            "keywords": [],
            "version": self.version,
            "order": self.order,
            "requires": self.requires,
            "providers": self.providers,
            "aliases": {},
            "files": []
        });
        if let Some(object) = value.as_object_mut() {
            object.extend(self.extra);
        }
        value
    }
}
