//! Level metadata.

use crate::catalog::property_info::{PropertyInfo, PropertyKind};

#[derive(Debug, Clone, PartialEq)]
pub struct LevelInfo {
    pub name: String,
    /// Depth within the hierarchy, 0 for the top level
    pub depth: usize,
    pub properties: Vec<PropertyInfo>,
}

impl LevelInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            depth: 0,
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, kind: PropertyKind) -> Self {
        self.properties.push(PropertyInfo::new(name, kind));
        self
    }

    /// Find a property declared directly on this level
    pub fn find_property(&self, name: &str, case_sensitive: bool) -> Option<&PropertyInfo> {
        self.properties
            .iter()
            .find(|p| p.matches_name(name, case_sensitive))
    }
}
