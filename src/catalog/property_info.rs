//! Typed member properties declared on levels.

use crate::expression::Category;
use serde::{Deserialize, Serialize};

/// Declared data kind of a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    Boolean,
    Numeric,
    String,
    Date,
    Time,
    Timestamp,
}

impl PropertyKind {
    /// Category of values of this kind
    pub fn category(self) -> Category {
        match self {
            PropertyKind::Boolean => Category::Logical,
            PropertyKind::Numeric => Category::Numeric,
            PropertyKind::String => Category::String,
            PropertyKind::Date | PropertyKind::Time | PropertyKind::Timestamp => Category::DateTime,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyInfo {
    pub name: String,
    pub kind: PropertyKind,
}

impl PropertyInfo {
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn matches_name(&self, name: &str, case_sensitive: bool) -> bool {
        names_match(&self.name, name, case_sensitive)
    }
}

/// Properties every member carries, whatever its level declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardProperty {
    Name,
    Caption,
    UniqueName,
    ParentUniqueName,
    LevelNumber,
    MemberOrdinal,
}

impl StandardProperty {
    pub const ALL: [StandardProperty; 6] = [
        StandardProperty::Name,
        StandardProperty::Caption,
        StandardProperty::UniqueName,
        StandardProperty::ParentUniqueName,
        StandardProperty::LevelNumber,
        StandardProperty::MemberOrdinal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StandardProperty::Name => "NAME",
            StandardProperty::Caption => "CAPTION",
            StandardProperty::UniqueName => "UNIQUE_NAME",
            StandardProperty::ParentUniqueName => "PARENT_UNIQUE_NAME",
            StandardProperty::LevelNumber => "LEVEL_NUMBER",
            StandardProperty::MemberOrdinal => "MEMBER_ORDINAL",
        }
    }

    pub fn kind(self) -> PropertyKind {
        match self {
            StandardProperty::LevelNumber | StandardProperty::MemberOrdinal => {
                PropertyKind::Numeric
            }
            _ => PropertyKind::String,
        }
    }

    /// Find a standard property by name
    pub fn lookup(name: &str, case_sensitive: bool) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| names_match(p.name(), name, case_sensitive))
    }

    pub fn info(self) -> PropertyInfo {
        PropertyInfo::new(self.name(), self.kind())
    }
}

pub(crate) fn names_match(declared: &str, requested: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        declared == requested
    } else {
        declared.eq_ignore_ascii_case(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_category() {
        assert_eq!(PropertyKind::Boolean.category(), Category::Logical);
        assert_eq!(PropertyKind::Numeric.category(), Category::Numeric);
        assert_eq!(PropertyKind::String.category(), Category::String);
        assert_eq!(PropertyKind::Date.category(), Category::DateTime);
        assert_eq!(PropertyKind::Time.category(), Category::DateTime);
        assert_eq!(PropertyKind::Timestamp.category(), Category::DateTime);
    }

    #[test]
    fn test_standard_lookup() {
        assert_eq!(
            StandardProperty::lookup("Caption", false),
            Some(StandardProperty::Caption)
        );
        assert_eq!(StandardProperty::lookup("Caption", true), None);
        assert_eq!(
            StandardProperty::lookup("LEVEL_NUMBER", true),
            Some(StandardProperty::LevelNumber)
        );
        assert_eq!(StandardProperty::lookup("Salary", false), None);
    }

    #[test]
    fn test_kind_serde_names() {
        let info: PropertyInfo =
            serde_json::from_str(r#"{"name": "Hired", "kind": "timestamp"}"#).unwrap();
        assert_eq!(info, PropertyInfo::new("Hired", PropertyKind::Timestamp));
    }
}
