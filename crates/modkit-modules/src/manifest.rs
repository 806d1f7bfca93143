//! Module manifest reading and writing
//!
//! Every module directory carries a JSON descriptor, `module.json` by
//! default:
//!
//! ```json
//! {
//!     "name": "Recipe",
//!     "alias": "recipe",
//!     "description": "recipe module",
//!     "version": "0.1",
//!     "keywords": [],
//!     "order": 0,
//!     "requires": ["required_module"],
//!     "providers": ["Modules\\Recipe\\Providers\\RecipeServiceProvider"],
//!     "aliases": {},
//!     "files": []
//! }
//! ```
//!
//! [`ManifestDocument`] is the raw, mutable view of that file and keeps keys
//! in document order so that reading and writing it back is byte-stable.
//! [`ModuleManifest`] is the validated, typed record built from it.

use modkit_core::naming;
use modkit_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default manifest file name
pub const DEFAULT_MANIFEST: &str = "module.json";

/// Indentation used for every JSON file modkit writes
const INDENT: &[u8] = b"    ";

/// Raw JSON document backing a manifest file
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestDocument {
    path: PathBuf,
    attributes: Map<String, Value>,
    /// File text as read; dropped on the first mutation
    raw: Option<String>,
    trailing_newline: bool,
}

impl ManifestDocument {
    /// Create a document that has not been written yet
    pub fn new(path: impl Into<PathBuf>, attributes: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            attributes,
            raw: None,
            trailing_newline: true,
        }
    }

    /// Read and parse a manifest file
    ///
    /// Parses from disk on every call; nothing is cached.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let shown = path.display().to_string();

        let content =
            std::fs::read_to_string(path).map_err(|e| Error::invalid_manifest(&shown, e))?;

        let value: Value =
            serde_json::from_str(&content).map_err(|e| Error::invalid_manifest(&shown, e))?;

        let attributes = match value {
            Value::Object(map) => map,
            other => {
                return Err(Error::invalid_manifest(
                    &shown,
                    format!("expected a JSON object at the top level, found {}", kind(&other)),
                ))
            }
        };

        debug!("Read manifest {} ({} keys)", shown, attributes.len());
        Ok(Self {
            path: path.to_path_buf(),
            attributes,
            trailing_newline: content.ends_with('\n'),
            raw: Some(content),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Point the document at another file (used by `save`)
    pub fn set_path(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.path = path.into();
        self
    }

    /// All attributes in document order
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// File text exactly as read, until the document is modified
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Look up a top-level key
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Look up a top-level key, falling back to `default` when absent
    pub fn get_or(&self, key: &str, default: impl Into<Value>) -> Value {
        self.attributes
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.into())
    }

    /// Look up a string-valued key
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(Value::as_str)
    }

    /// Set a top-level key; new keys are appended after existing ones
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.raw = None;
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Set a top-level key; a new key lands right after `anchor`
    ///
    /// Existing keys keep their position. Without `anchor` the key is
    /// appended.
    pub fn set_after(
        &mut self,
        anchor: &str,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> &mut Self {
        let key = key.into();
        if self.attributes.contains_key(&key) || !self.attributes.contains_key(anchor) {
            return self.set(key, value);
        }

        self.raw = None;
        let mut value = Some(value.into());
        let mut reordered = Map::new();
        for (existing, current) in std::mem::take(&mut self.attributes) {
            let at_anchor = existing == anchor;
            reordered.insert(existing, current);
            if at_anchor {
                if let Some(value) = value.take() {
                    reordered.insert(key.clone(), value);
                }
            }
        }
        self.attributes = reordered;
        self
    }

    /// Remove a top-level key, keeping the order of the others
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let removed = self.attributes.shift_remove(key);
        if removed.is_some() {
            self.raw = None;
        }
        removed
    }

    /// Pretty-printed JSON with 4-space indentation, no trailing newline
    pub fn to_pretty_string(&self) -> Result<String> {
        to_pretty_json(&self.attributes)
    }

    /// Bytes written by `save`: pretty JSON, newline-terminated unless the
    /// file was read without one
    pub fn to_file_contents(&self) -> Result<String> {
        let mut content = self.to_pretty_string()?;
        if self.trailing_newline {
            content.push('\n');
        }
        Ok(content)
    }

    /// Write the document back to its path in normalized form
    pub fn save(&self) -> Result<()> {
        std::fs::write(&self.path, self.to_file_contents()?)?;
        debug!("Saved manifest {}", self.path.display());
        Ok(())
    }
}

/// The file text as read, or the normalized form once modified
impl fmt::Display for ManifestDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.raw {
            Some(raw) => f.write_str(raw),
            None => {
                let content = self.to_file_contents().map_err(|_| fmt::Error)?;
                f.write_str(&content)
            }
        }
    }
}

/// Serialize any value the way modkit writes JSON files
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| Error::invalid_config(e.to_string()))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validated manifest record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleManifest {
    pub name: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub alias: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,

    #[serde(default, deserialize_with = "lenient::string")]
    pub version: String,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub keywords: Vec<String>,

    /// Load priority, lower loads first
    #[serde(default, deserialize_with = "lenient::integer")]
    pub order: i64,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub requires: Vec<String>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub providers: Vec<String>,

    /// Extension hook: class aliases registered by the module
    #[serde(default, deserialize_with = "lenient::object")]
    pub aliases: Map<String, Value>,

    /// Extension hook: files autoloaded with the module
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub files: Vec<String>,
}

impl ModuleManifest {
    /// Minimal manifest for `name` with the conventional alias
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            alias: naming::lower(&name),
            name,
            description: String::new(),
            version: String::new(),
            keywords: Vec::new(),
            order: 0,
            requires: Vec::new(),
            providers: Vec::new(),
            aliases: Map::new(),
            files: Vec::new(),
        }
    }

    /// Read and validate the manifest at `path`
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_document(&ManifestDocument::read(path)?)
    }

    /// Build the typed record from a raw document and check its invariants
    pub fn from_document(document: &ManifestDocument) -> Result<Self> {
        let shown = document.path().display().to_string();

        let mut manifest: Self =
            serde_json::from_value(Value::Object(document.attributes().clone()))
                .map_err(|e| Error::invalid_manifest(&shown, e))?;

        manifest.name = manifest.name.trim().to_string();
        if manifest.name.is_empty() {
            return Err(Error::invalid_manifest(
                &shown,
                "module name must not be empty",
            ));
        }

        if manifest.alias.trim().is_empty() {
            manifest.alias = naming::lower(&manifest.name);
        }

        let lower_name = naming::lower(&manifest.name);
        if manifest
            .requires
            .iter()
            .any(|dep| naming::lower(dep) == lower_name)
        {
            return Err(Error::invalid_manifest(
                &shown,
                format!("module [{}] cannot require itself", manifest.name),
            ));
        }

        Ok(manifest)
    }

    /// Render as a document with the canonical key order
    pub fn to_document(&self, path: impl Into<PathBuf>) -> ManifestDocument {
        let mut attributes = Map::new();
        attributes.insert("name".into(), self.name.clone().into());
        attributes.insert("alias".into(), self.alias.clone().into());
        attributes.insert("description".into(), self.description.clone().into());
        attributes.insert("version".into(), self.version.clone().into());
        attributes.insert("keywords".into(), self.keywords.clone().into());
        attributes.insert("order".into(), self.order.into());
        attributes.insert("requires".into(), self.requires.clone().into());
        attributes.insert("providers".into(), self.providers.clone().into());
        attributes.insert("aliases".into(), Value::Object(self.aliases.clone()));
        attributes.insert("files".into(), self.files.clone().into());
        ManifestDocument::new(path, attributes)
    }
}

/// Deserializers that accept the loosely-typed values found in hand-written
/// manifests (numeric versions, `[]` for empty objects, null for absent).
mod lenient {
    use super::*;
    use serde::de::Error as _;

    pub fn string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<String, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(String::new()),
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!("expected a string, found {}", kind(&other)))),
        }
    }

    pub fn string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Vec<String>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s),
                    other => Err(D::Error::custom(format!(
                        "expected a list of strings, found {}",
                        kind(&other)
                    ))),
                })
                .collect(),
            other => Err(D::Error::custom(format!("expected a list, found {}", kind(&other)))),
        }
    }

    pub fn integer<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<i64, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(0),
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| D::Error::custom(format!("expected an integer, found {}", n))),
            Value::String(s) => s
                .trim()
                .parse()
                .map_err(|_| D::Error::custom(format!("expected an integer, found \"{}\"", s))),
            other => Err(D::Error::custom(format!("expected an integer, found {}", kind(&other)))),
        }
    }

    pub fn object<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Map<String, Value>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Map::new()),
            Value::Object(map) => Ok(map),
            Value::Array(items) if items.is_empty() => Ok(Map::new()),
            other => Err(D::Error::custom(format!("expected an object, found {}", kind(&other)))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(DEFAULT_MANIFEST);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_get_with_default() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, r#"{"name": "Recipe", "version": "0.1"}"#);

        let doc = ManifestDocument::read(&path).unwrap();
        assert_eq!(doc.get_str("name"), Some("Recipe"));
        assert_eq!(doc.get_or("version", "none"), json!("0.1"));
        assert_eq!(doc.get_or("some-thing-non-there", "my default"), json!("my default"));
        assert!(doc.get("missing").is_none());
    }

    #[test]
    fn test_top_level_must_be_object() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, "[1, 2, 3]");

        let err = ManifestDocument::read(&path).unwrap_err();
        assert!(matches!(err, Error::InvalidManifest { .. }));
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_missing_file_is_invalid_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let err = ManifestDocument::read(temp_dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::InvalidManifest { .. }));
    }

    #[test]
    fn test_remove_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = write(&temp_dir, r#"{"name": "A", "active": 1, "order": 2}"#);

        let mut doc = ManifestDocument::read(&path).unwrap();
        assert_eq!(doc.remove("active"), Some(json!(1)));
        let keys: Vec<&String> = doc.attributes().keys().collect();
        assert_eq!(keys, vec!["name", "order"]);
    }

    #[test]
    fn test_alias_defaults_to_lower_name() {
        let attrs = json!({"name": "Blog"});
        let doc = ManifestDocument::new("module.json", attrs.as_object().unwrap().clone());
        let manifest = ModuleManifest::from_document(&doc).unwrap();
        assert_eq!(manifest.alias, "blog");
        assert!(manifest.requires.is_empty());
        assert_eq!(manifest.order, 0);
    }

    #[test]
    fn test_self_dependency_rejected() {
        let attrs = json!({"name": "Blog", "requires": ["blog"]});
        let doc = ManifestDocument::new("module.json", attrs.as_object().unwrap().clone());
        let err = ModuleManifest::from_document(&doc).unwrap_err();
        assert!(err.to_string().contains("cannot require itself"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let attrs = json!({"name": "  "});
        let doc = ManifestDocument::new("module.json", attrs.as_object().unwrap().clone());
        assert!(ModuleManifest::from_document(&doc).is_err());
    }

    #[test]
    fn test_lenient_values() {
        let attrs = json!({
            "name": "Legacy",
            "version": 1.5,
            "order": "3",
            "aliases": [],
            "description": null
        });
        let doc = ManifestDocument::new("module.json", attrs.as_object().unwrap().clone());
        let manifest = ModuleManifest::from_document(&doc).unwrap();
        assert_eq!(manifest.version, "1.5");
        assert_eq!(manifest.order, 3);
        assert!(manifest.aliases.is_empty());
        assert_eq!(manifest.description, "");
    }

    #[test]
    fn test_canonical_document_order() {
        let mut manifest = ModuleManifest::new("Blog");
        manifest.requires = vec!["Users".to_string()];
        let doc = manifest.to_document("module.json");
        let keys: Vec<&str> = doc.attributes().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "name",
                "alias",
                "description",
                "version",
                "keywords",
                "order",
                "requires",
                "providers",
                "aliases",
                "files"
            ]
        );
        assert_eq!(ModuleManifest::from_document(&doc).unwrap(), manifest);
    }
}
