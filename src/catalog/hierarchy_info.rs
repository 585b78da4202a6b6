//! Hierarchy metadata: an ordered list of levels.

use crate::catalog::level_info::LevelInfo;
use crate::catalog::property_info::{PropertyInfo, StandardProperty};

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyInfo {
    pub name: String,
    pub levels: Vec<LevelInfo>,
}

impl HierarchyInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            levels: Vec::new(),
        }
    }

    /// Append a level below the current deepest one
    pub fn with_level(mut self, mut level: LevelInfo) -> Self {
        level.depth = self.levels.len();
        self.levels.push(level);
        self
    }

    pub fn level(&self, name: &str) -> Option<&LevelInfo> {
        self.levels.iter().find(|l| l.name == name)
    }

    /// The most specific level of the hierarchy
    pub fn deepest_level(&self) -> Option<&LevelInfo> {
        self.levels.last()
    }

    /// Find a property declared on the level at `depth` or any level above it
    pub fn find_declared(
        &self,
        depth: usize,
        name: &str,
        case_sensitive: bool,
    ) -> Option<&PropertyInfo> {
        let top = depth.min(self.levels.len().checked_sub(1)?);
        self.levels[..=top]
            .iter()
            .rev()
            .find_map(|level| level.find_property(name, case_sensitive))
    }

    /// Resolve a property for members at `depth`: declared properties first,
    /// then the standard ones.
    pub fn lookup_property(
        &self,
        depth: usize,
        name: &str,
        case_sensitive: bool,
    ) -> Option<PropertyInfo> {
        self.find_declared(depth, name, case_sensitive)
            .cloned()
            .or_else(|| StandardProperty::lookup(name, case_sensitive).map(StandardProperty::info))
    }
}
