//! Transitive dependency resolution using topological sort with DFS
//!
//! `ModuleRepository::find_requirements` only follows one level of
//! `requires`. This resolver walks the whole chain and reports cycles.
//! Names that match no discovered module are skipped, like the shallow
//! lookup does.

use crate::collection::ModuleCollection;
use modkit_core::naming;
use modkit_core::{Error, Result};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Dependency resolver over one scan result
pub struct DependencyResolver {
    /// lower name -> lower names of direct requirements
    graph: HashMap<String, Vec<String>>,
    /// lower name -> name as declared
    names: HashMap<String, String>,
}

impl DependencyResolver {
    pub fn new(modules: &ModuleCollection) -> Self {
        let mut graph = HashMap::new();
        let mut names = HashMap::new();
        for module in modules {
            let key = module.lower_name();
            graph.insert(
                key.clone(),
                module.requires().iter().map(|r| naming::lower(r)).collect(),
            );
            names.insert(key, module.name().to_string());
        }
        Self { graph, names }
    }

    /// Names in load order: every requirement before the module needing it,
    /// `module` itself last
    pub fn resolve(&self, module: &str) -> Result<Vec<String>> {
        let mut resolved = Vec::new();
        let mut seen = HashSet::new();
        let mut visiting = Vec::new();

        self.visit(&naming::lower(module), &mut resolved, &mut seen, &mut visiting)?;
        Ok(resolved)
    }

    fn visit(
        &self,
        key: &str,
        resolved: &mut Vec<String>,
        seen: &mut HashSet<String>,
        visiting: &mut Vec<String>,
    ) -> Result<()> {
        if let Some(start) = visiting.iter().position(|k| k == key) {
            let mut cycle: Vec<&str> = visiting[start..].iter().map(|k| self.display(k)).collect();
            cycle.push(self.display(key));
            return Err(Error::circular_dependency(cycle.join(" -> ")));
        }

        if seen.contains(key) {
            return Ok(());
        }

        let Some(deps) = self.graph.get(key) else {
            debug!("Skipping unknown requirement {}", key);
            return Ok(());
        };

        visiting.push(key.to_string());
        for dep in deps {
            self.visit(dep, resolved, seen, visiting)?;
        }
        visiting.pop();

        seen.insert(key.to_string());
        resolved.push(self.display(key).to_string());
        Ok(())
    }

    fn display<'a>(&'a self, key: &'a str) -> &'a str {
        self.names.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Direct requirements of `module` that are not in `available`
    pub fn missing(&self, module: &str, available: &HashSet<String>) -> Vec<String> {
        self.graph
            .get(&naming::lower(module))
            .map(|deps| {
                deps.iter()
                    .filter(|d| !available.contains(*d))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activator::{ActivationStore, FileActivator};
    use crate::events::TracingSink;
    use crate::manifest::ModuleManifest;
    use crate::module::Module;
    use std::sync::Arc;

    fn collection(specs: Vec<(&str, Vec<&str>)>) -> ModuleCollection {
        let store = Arc::new(ActivationStore::new(
            Box::new(FileActivator::new("/nonexistent/modules_statuses.json")),
            false,
            Arc::new(TracingSink),
        ));
        let modules = specs
            .into_iter()
            .map(|(name, requires)| {
                let mut manifest = ModuleManifest::new(name);
                manifest.requires = requires.iter().map(|r| r.to_string()).collect();
                Module::new(manifest, format!("/modules/{}", name), "module.json", store.clone())
            })
            .collect();
        ModuleCollection::ordered(modules)
    }

    #[test]
    fn test_chain() {
        let modules = collection(vec![
            ("Blog", vec!["Users"]),
            ("Users", vec!["Core"]),
            ("Core", vec![]),
        ]);
        let order = DependencyResolver::new(&modules).resolve("Blog").unwrap();
        assert_eq!(order, vec!["Core", "Users", "Blog"]);
    }

    #[test]
    fn test_diamond_visits_shared_requirement_once() {
        let modules = collection(vec![
            ("App", vec!["Left", "Right"]),
            ("Left", vec!["Base"]),
            ("Right", vec!["base"]),
            ("Base", vec![]),
        ]);
        let order = DependencyResolver::new(&modules).resolve("app").unwrap();
        assert_eq!(order, vec!["Base", "Left", "Right", "App"]);
    }

    #[test]
    fn test_cycle() {
        let modules = collection(vec![("A", vec!["B"]), ("B", vec!["C"]), ("C", vec!["A"])]);
        let err = DependencyResolver::new(&modules).resolve("A").unwrap_err();
        assert!(err.to_string().contains("A -> B -> C -> A"));
    }

    #[test]
    fn test_missing_requirements() {
        let modules = collection(vec![("Blog", vec!["Users", "Ghost"]), ("Users", vec![])]);
        let available: HashSet<String> = modules.iter().map(Module::lower_name).collect();
        let missing = DependencyResolver::new(&modules).missing("Blog", &available);
        assert_eq!(missing, vec!["ghost"]);
    }
}
