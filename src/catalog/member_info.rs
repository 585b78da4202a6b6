//! Members of a hierarchy and their stored property values.

use crate::access::Value;
use crate::catalog::property_info::{names_match, StandardProperty};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Shared handle to a member, as carried in values and expressions
pub type Member = Arc<MemberInfo>;

#[derive(Debug, Clone)]
pub struct MemberInfo {
    hierarchy: String,
    level: String,
    depth: usize,
    name: String,
    caption: Option<String>,
    unique_name: String,
    parent_unique_name: Option<String>,
    ordinal: usize,
    properties: Vec<(String, Value)>,
}

impl MemberInfo {
    /// Create a member; the unique name is derived from the parent's
    pub fn new(
        hierarchy: &str,
        level: &str,
        depth: usize,
        name: &str,
        parent: Option<&MemberInfo>,
        ordinal: usize,
    ) -> Self {
        let unique_name = match parent {
            Some(p) => format!("{}.{}", p.unique_name, quote(name)),
            None => format!("{}.{}", quote(hierarchy), quote(name)),
        };
        Self {
            hierarchy: hierarchy.to_string(),
            level: level.to_string(),
            depth,
            name: name.to_string(),
            caption: None,
            unique_name,
            parent_unique_name: parent.map(|p| p.unique_name.clone()),
            ordinal,
            properties: Vec::new(),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.push((name.into(), value));
        self
    }

    pub fn hierarchy(&self) -> &str {
        &self.hierarchy
    }

    pub fn level(&self) -> &str {
        &self.level
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Caption, defaulting to the name
    pub fn caption(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.name)
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    pub fn parent_unique_name(&self) -> Option<&str> {
        self.parent_unique_name.as_deref()
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Value of a property on this member, or NULL when it has none.
    ///
    /// Standard properties are answered from the member itself; anything
    /// else comes from the stored level properties.
    pub fn property_value(&self, name: &str, case_sensitive: bool) -> Value {
        if let Some(standard) = StandardProperty::lookup(name, case_sensitive) {
            return self.standard_value(standard);
        }
        self.properties
            .iter()
            .find(|(declared, _)| names_match(declared, name, case_sensitive))
            .map(|(_, value)| value.clone())
            .unwrap_or(Value::Null)
    }

    fn standard_value(&self, property: StandardProperty) -> Value {
        match property {
            StandardProperty::Name => Value::String(self.name.clone()),
            StandardProperty::Caption => Value::String(self.caption().to_string()),
            StandardProperty::UniqueName => Value::String(self.unique_name.clone()),
            StandardProperty::ParentUniqueName => self
                .parent_unique_name
                .clone()
                .map(Value::String)
                .unwrap_or(Value::Null),
            StandardProperty::LevelNumber => Value::Numeric(self.depth as f64),
            StandardProperty::MemberOrdinal => Value::Numeric(self.ordinal as f64),
        }
    }
}

impl PartialEq for MemberInfo {
    fn eq(&self, other: &Self) -> bool {
        self.unique_name == other.unique_name
    }
}

impl Eq for MemberInfo {}

impl Hash for MemberInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.unique_name.hash(state);
    }
}

impl fmt::Display for MemberInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.unique_name)
    }
}

fn quote(name: &str) -> String {
    format!("[{}]", name.replace(']', "]]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_names() {
        let sales = MemberInfo::new("Employee", "Department", 0, "Sales", None, 0);
        let john = MemberInfo::new("Employee", "Name", 1, "John", Some(&sales), 1);

        assert_eq!(sales.unique_name(), "[Employee].[Sales]");
        assert_eq!(john.unique_name(), "[Employee].[Sales].[John]");
        assert_eq!(john.parent_unique_name(), Some("[Employee].[Sales]"));
    }

    #[test]
    fn test_property_value() {
        let john = MemberInfo::new("Employee", "Name", 0, "John", None, 3)
            .with_caption("John Smith")
            .with_property("Salary", Value::Numeric(52000.0));

        assert_eq!(john.property_value("Salary", true), Value::Numeric(52000.0));
        assert_eq!(john.property_value("salary", true), Value::Null);
        assert_eq!(john.property_value("salary", false), Value::Numeric(52000.0));
        assert_eq!(john.property_value("Bonus", false), Value::Null);
    }

    #[test]
    fn test_standard_property_values() {
        let john =
            MemberInfo::new("Employee", "Name", 0, "John", None, 3).with_caption("John Smith");

        assert_eq!(john.property_value("CAPTION", true), Value::from("John Smith"));
        assert_eq!(john.property_value("name", false), Value::from("John"));
        assert_eq!(john.property_value("MEMBER_ORDINAL", true), Value::Numeric(3.0));
        assert_eq!(john.property_value("PARENT_UNIQUE_NAME", true), Value::Null);
    }

    #[test]
    fn test_quoting() {
        let odd = MemberInfo::new("Product", "Name", 0, "A]B", None, 0);
        assert_eq!(odd.unique_name(), "[Product].[A]]B]");
    }
}
