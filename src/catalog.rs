//! Multidimensional metadata: hierarchies, levels, typed properties and members.
//!
//! The function core only sees metadata through the [`Metadata`] trait.
//! [`Catalog`] is an in-memory implementation that can be built in code or
//! loaded from a JSON definition file.

pub mod definition;
pub mod hierarchy_info;
pub mod level_info;
pub mod member_info;
pub mod property_info;

pub use definition::CatalogDefinition;
pub use hierarchy_info::HierarchyInfo;
pub use level_info::LevelInfo;
pub use member_info::{Member, MemberInfo};
pub use property_info::{PropertyInfo, PropertyKind, StandardProperty};

use crate::access::Value;
use anyhow::{anyhow, bail, Context, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Metadata lookups consumed by resolution and evaluation
pub trait Metadata: Send + Sync {
    /// Get a hierarchy with its ordered levels
    fn hierarchy(&self, name: &str) -> Option<Arc<HierarchyInfo>>;

    /// Resolve a property for members at `depth` of `hierarchy`
    fn lookup_property(
        &self,
        hierarchy: &str,
        depth: usize,
        name: &str,
        case_sensitive: bool,
    ) -> Option<PropertyInfo> {
        self.hierarchy(hierarchy)?
            .lookup_property(depth, name, case_sensitive)
    }

    /// Check if a property name is legal for the member's level
    fn is_valid_property(&self, member: &MemberInfo, name: &str, case_sensitive: bool) -> bool {
        self.lookup_property(member.hierarchy(), member.depth(), name, case_sensitive)
            .is_some()
    }
}

/// Description of a member to add to a [`Catalog`]
#[derive(Debug, Clone, Default)]
pub struct MemberSpec {
    pub hierarchy: String,
    pub level: String,
    pub name: String,
    /// Unique name of the parent member
    pub parent: Option<String>,
    pub caption: Option<String>,
    pub properties: Vec<(String, Value)>,
}

impl MemberSpec {
    pub fn new(hierarchy: &str, level: &str, name: &str) -> Self {
        Self {
            hierarchy: hierarchy.to_string(),
            level: level.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn child_of(mut self, parent_unique_name: &str) -> Self {
        self.parent = Some(parent_unique_name.to_string());
        self
    }

    pub fn caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    pub fn property(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.properties.push((name.to_string(), value.into()));
        self
    }
}

/// In-memory metadata catalog
#[derive(Debug, Default)]
pub struct Catalog {
    hierarchies: RwLock<HashMap<String, Arc<HierarchyInfo>>>,
    /// Members keyed by unique name
    members: RwLock<HashMap<String, Member>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a JSON definition
    pub fn from_json(json: &str) -> Result<Self> {
        CatalogDefinition::from_json(json)?.build()
    }

    /// Load a catalog from a JSON definition file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Register a new hierarchy
    pub fn create_hierarchy(&self, hierarchy: HierarchyInfo) -> Result<Arc<HierarchyInfo>> {
        if hierarchy.levels.is_empty() {
            bail!("Hierarchy '{}' has no levels", hierarchy.name);
        }
        for level in &hierarchy.levels {
            if let Some(property) = level
                .properties
                .iter()
                .find(|p| StandardProperty::lookup(&p.name, false).is_some())
            {
                bail!(
                    "Property '{}' on level '{}' shadows a standard property",
                    property.name,
                    level.name
                );
            }
        }

        let mut hierarchies = self.hierarchies.write();
        if hierarchies.contains_key(&hierarchy.name) {
            bail!("Hierarchy '{}' already exists", hierarchy.name);
        }

        let hierarchy = Arc::new(hierarchy);
        hierarchies.insert(hierarchy.name.clone(), hierarchy.clone());
        log::debug!(
            "created hierarchy '{}' with {} levels",
            hierarchy.name,
            hierarchy.levels.len()
        );
        Ok(hierarchy)
    }

    /// Add a member, checking its level, parent and stored property values
    pub fn add_member(&self, spec: MemberSpec) -> Result<Member> {
        let hierarchy = self
            .hierarchy(&spec.hierarchy)
            .ok_or_else(|| anyhow!("Hierarchy '{}' does not exist", spec.hierarchy))?;
        let level = hierarchy.level(&spec.level).ok_or_else(|| {
            anyhow!(
                "Level '{}' not found in hierarchy '{}'",
                spec.level,
                spec.hierarchy
            )
        })?;

        let parent = match &spec.parent {
            Some(unique_name) => {
                let parent = self
                    .member(unique_name)
                    .ok_or_else(|| anyhow!("Parent member '{}' does not exist", unique_name))?;
                if parent.hierarchy() != hierarchy.name || parent.depth() + 1 != level.depth {
                    bail!(
                        "Member '{}' at level '{}' cannot be a child of '{}'",
                        spec.name,
                        level.name,
                        unique_name
                    );
                }
                Some(parent)
            }
            None if level.depth != 0 => {
                bail!(
                    "Member '{}' at level '{}' needs a parent",
                    spec.name,
                    level.name
                );
            }
            None => None,
        };

        for (name, value) in &spec.properties {
            let declared = hierarchy
                .find_declared(level.depth, name, true)
                .ok_or_else(|| {
                    anyhow!(
                        "Property '{}' is not declared for level '{}'",
                        name,
                        level.name
                    )
                })?;
            if !value.is_compatible_with(declared.kind.category()) {
                bail!(
                    "Value {:?} is not compatible with property '{}' of kind {:?}",
                    value,
                    name,
                    declared.kind
                );
            }
        }

        let mut members = self.members.write();
        let ordinal = members
            .values()
            .filter(|m| m.hierarchy() == hierarchy.name)
            .count();

        let mut info = MemberInfo::new(
            &hierarchy.name,
            &level.name,
            level.depth,
            &spec.name,
            parent.as_deref(),
            ordinal,
        );
        if let Some(caption) = spec.caption {
            info = info.with_caption(caption);
        }
        for (name, value) in spec.properties {
            info = info.with_property(name, value);
        }

        if members.contains_key(info.unique_name()) {
            bail!("Member '{}' already exists", info.unique_name());
        }
        let member = Arc::new(info);
        members.insert(member.unique_name().to_string(), member.clone());
        Ok(member)
    }

    /// Get a member by unique name
    pub fn member(&self, unique_name: &str) -> Option<Member> {
        self.members.read().get(unique_name).cloned()
    }

    /// List members of a hierarchy in ordinal order
    pub fn members_of(&self, hierarchy: &str) -> Vec<Member> {
        let mut members: Vec<Member> = self
            .members
            .read()
            .values()
            .filter(|m| m.hierarchy() == hierarchy)
            .cloned()
            .collect();
        members.sort_by_key(|m| m.ordinal());
        members
    }

    /// List all hierarchy names
    pub fn list_hierarchies(&self) -> Vec<String> {
        let mut names: Vec<String> = self.hierarchies.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Metadata for Catalog {
    fn hierarchy(&self, name: &str) -> Option<Arc<HierarchyInfo>> {
        self.hierarchies.read().get(name).cloned()
    }
}

/// Employee/Product catalog shared by unit tests
#[cfg(test)]
pub(crate) fn sample_catalog() -> Catalog {
    let catalog = Catalog::new();
    catalog
        .create_hierarchy(
            HierarchyInfo::new("Employee")
                .with_level(
                    LevelInfo::new("Department").with_property("Budget", PropertyKind::Numeric),
                )
                .with_level(
                    LevelInfo::new("Name")
                        .with_property("Salary", PropertyKind::Numeric)
                        .with_property("Title", PropertyKind::String)
                        .with_property("Manager", PropertyKind::Boolean)
                        .with_property("Hired", PropertyKind::Date),
                ),
        )
        .unwrap();
    catalog
        .create_hierarchy(
            HierarchyInfo::new("Product")
                .with_level(LevelInfo::new("Category"))
                .with_level(LevelInfo::new("Item").with_property("Price", PropertyKind::Numeric)),
        )
        .unwrap();

    catalog
        .add_member(MemberSpec::new("Employee", "Department", "Sales").property("Budget", 100000))
        .unwrap();
    catalog
        .add_member(
            MemberSpec::new("Employee", "Name", "John")
                .child_of("[Employee].[Sales]")
                .caption("John Smith")
                .property("Salary", 52000)
                .property("Title", "Account Manager")
                .property("Manager", true),
        )
        .unwrap();
    catalog
        .add_member(
            MemberSpec::new("Employee", "Name", "Mary")
                .child_of("[Employee].[Sales]")
                .property("Salary", 61000),
        )
        .unwrap();
    catalog
        .add_member(MemberSpec::new("Product", "Category", "Drinks"))
        .unwrap();
    catalog
        .add_member(
            MemberSpec::new("Product", "Item", "Beer")
                .child_of("[Product].[Drinks]")
                .property("Price", 4.5),
        )
        .unwrap();
    catalog
}
