//! JSON catalog definitions.
//!
//! A definition file lists hierarchies, their levels with typed
//! properties, and the members with their stored property values:
//!
//! ```json
//! { "hierarchies": [ {
//!     "name": "Employee",
//!     "levels": [ { "name": "Name", "properties": [ { "name": "Salary", "kind": "numeric" } ] } ],
//!     "members": [ { "name": "John", "level": "Name", "properties": { "Salary": 52000 } } ]
//! } ] }
//! ```

use crate::access::value::DATETIME_FORMAT;
use crate::access::Value;
use crate::catalog::property_info::{PropertyInfo, PropertyKind};
use crate::catalog::{Catalog, HierarchyInfo, LevelInfo, MemberSpec};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default)]
    pub hierarchies: Vec<HierarchyDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyDefinition {
    pub name: String,
    pub levels: Vec<LevelDefinition>,
    #[serde(default)]
    pub members: Vec<MemberDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    #[serde(default)]
    pub properties: Vec<PropertyInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDefinition {
    pub name: String,
    pub level: String,
    /// Unique name of the parent member
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl CatalogDefinition {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid catalog definition")
    }

    /// Build a catalog; members must be listed after their parents
    pub fn build(&self) -> Result<Catalog> {
        let catalog = Catalog::new();

        for hierarchy_def in &self.hierarchies {
            let hierarchy = hierarchy_def
                .levels
                .iter()
                .fold(HierarchyInfo::new(&hierarchy_def.name), |h, level_def| {
                    let mut level = LevelInfo::new(&level_def.name);
                    level.properties = level_def.properties.clone();
                    h.with_level(level)
                });
            let hierarchy = catalog.create_hierarchy(hierarchy)?;

            for member_def in &hierarchy_def.members {
                let level = hierarchy.level(&member_def.level).ok_or_else(|| {
                    anyhow!(
                        "Level '{}' not found in hierarchy '{}'",
                        member_def.level,
                        hierarchy.name
                    )
                })?;

                let mut spec = MemberSpec::new(&hierarchy.name, &level.name, &member_def.name);
                if let Some(parent) = &member_def.parent {
                    spec = spec.child_of(parent);
                }
                if let Some(caption) = &member_def.caption {
                    spec = spec.caption(caption);
                }
                for (name, json) in &member_def.properties {
                    let declared = hierarchy.find_declared(level.depth, name, true).ok_or_else(|| {
                        anyhow!("Property '{}' is not declared for level '{}'", name, level.name)
                    })?;
                    let value = convert_property_value(declared.kind, json)
                        .with_context(|| {
                            format!("Property '{}' of member '{}'", name, member_def.name)
                        })?;
                    spec = spec.property(name, value);
                }

                catalog.add_member(spec)?;
            }
        }

        Ok(catalog)
    }
}

/// Convert a JSON property value to a runtime value of the declared kind
pub fn convert_property_value(kind: PropertyKind, json: &serde_json::Value) -> Result<Value> {
    use serde_json::Value as Json;

    let value = match (kind, json) {
        (_, Json::Null) => Value::Null,
        (PropertyKind::Boolean, Json::Bool(b)) => Value::Boolean(*b),
        (PropertyKind::Numeric, Json::Number(n)) => Value::Numeric(
            n.as_f64()
                .ok_or_else(|| anyhow!("Number {} is out of range", n))?,
        ),
        (PropertyKind::String, Json::String(s)) => Value::String(s.clone()),
        (PropertyKind::Date, Json::String(s)) => Value::DateTime(
            NaiveDate::parse_from_str(s, "%Y-%m-%d")?
                .and_hms_opt(0, 0, 0)
                .ok_or_else(|| anyhow!("Invalid date {}", s))?,
        ),
        (PropertyKind::Time, Json::String(s)) => {
            let time = NaiveTime::parse_from_str(s, "%H:%M:%S")?;
            let epoch =
                NaiveDate::from_ymd_opt(1970, 1, 1).ok_or_else(|| anyhow!("Invalid epoch date"))?;
            Value::DateTime(epoch.and_time(time))
        }
        (PropertyKind::Timestamp, Json::String(s)) => Value::DateTime(
            NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))?,
        ),
        (kind, other) => bail!("Value {} is not compatible with kind {:?}", other, kind),
    };
    Ok(value)
}
