//! Ordered module collection

use crate::module::Module;
use modkit_core::naming;
use modkit_core::Result;
use std::ops::Index;

/// Modules ordered by manifest `order`, ties in discovery order
#[derive(Debug, Clone, Default)]
pub struct ModuleCollection {
    modules: Vec<Module>,
}

impl ModuleCollection {
    /// Sort modules by priority; the sort is stable so discovery order
    /// breaks ties
    pub fn ordered(mut modules: Vec<Module>) -> Self {
        modules.sort_by_key(Module::priority);
        Self { modules }
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Module> {
        self.modules.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Module> {
        self.modules.get(index)
    }

    pub fn first(&self) -> Option<&Module> {
        self.modules.first()
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&Module> {
        let wanted = naming::lower(name);
        self.modules.iter().find(|m| m.lower_name() == wanted)
    }

    /// Case-insensitive lookup by alias
    pub fn find_by_alias(&self, alias: &str) -> Option<&Module> {
        let wanted = naming::lower(alias);
        self.modules
            .iter()
            .find(|m| naming::lower(m.alias()) == wanted)
    }

    pub fn names(&self) -> Vec<&str> {
        self.modules.iter().map(Module::name).collect()
    }

    /// Modules whose activation status equals `status`
    pub fn with_status(&self, status: bool) -> Result<Self> {
        let mut matching = Vec::new();
        for module in &self.modules {
            if module.is_status(status)? {
                matching.push(module.clone());
            }
        }
        Ok(Self { modules: matching })
    }

    pub fn into_vec(self) -> Vec<Module> {
        self.modules
    }
}

impl Index<usize> for ModuleCollection {
    type Output = Module;

    fn index(&self, index: usize) -> &Module {
        &self.modules[index]
    }
}

impl IntoIterator for ModuleCollection {
    type Item = Module;
    type IntoIter = std::vec::IntoIter<Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.into_iter()
    }
}

impl<'a> IntoIterator for &'a ModuleCollection {
    type Item = &'a Module;
    type IntoIter = std::slice::Iter<'a, Module>;

    fn into_iter(self) -> Self::IntoIter {
        self.modules.iter()
    }
}
