// Language-neutral type vocabulary shared by the model, the rules and codegen.
// No serde_json::Value here.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Primitive lattice points. Declaration order is the widening order for the
/// numeric chain; `String` is the top element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Int,
    Long,
    Double,
    String,
}

impl Primitive {
    pub const ALL: [Primitive; 5] = [
        Primitive::Boolean,
        Primitive::Int,
        Primitive::Long,
        Primitive::Double,
        Primitive::String,
    ];

    /// Neutral spelling, used when rules refer to primitive types by name.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Double => "double",
            Primitive::String => "string",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Primitive::Int | Primitive::Long | Primitive::Double)
    }
}

/// Element type of a field (array-ness is tracked separately on the field).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(Primitive),
    /// Another node of the class graph, a built-in, or a caller-supplied
    /// type such as the date type.
    Named(String),
}

impl TypeRef {
    /// Resolve a rule-supplied type name: neutral primitive spellings map to
    /// primitives, everything else is a named type.
    pub fn parse(name: &str) -> Self {
        match Primitive::from_name(name) {
            Some(p) => TypeRef::Primitive(p),
            None => TypeRef::Named(name.to_string()),
        }
    }

    /// Like [`TypeRef::parse`], with the target language's own spelling of
    /// the string type (`String`, `string`) also naming the string primitive.
    pub fn parse_with_string_alias(name: &str, string_type: &str) -> Self {
        if name == string_type {
            return TypeRef::Primitive(Primitive::String);
        }
        Self::parse(name)
    }

    pub fn name(&self) -> &str {
        match self {
            TypeRef::Primitive(p) => p.name(),
            TypeRef::Named(n) => n,
        }
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            TypeRef::Named(n) => Some(n),
            TypeRef::Primitive(_) => None,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target of a type-rename rule: the new type name and whether fields of the
/// renamed type become lists of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: String,
    #[serde(default)]
    pub is_array: bool,
}

impl TypeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_array: false }
    }

    pub fn array_of(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_array: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_neutral_names_to_primitives() {
        assert_eq!(TypeRef::parse("long"), TypeRef::Primitive(Primitive::Long));
        assert_eq!(TypeRef::parse("string"), TypeRef::Primitive(Primitive::String));
        assert_eq!(TypeRef::parse("String"), TypeRef::Named("String".into()));
        assert_eq!(TypeRef::parse("Address"), TypeRef::Named("Address".into()));
    }

    #[test]
    fn language_string_spelling_aliases_the_primitive() {
        let string = TypeRef::Primitive(Primitive::String);
        assert_eq!(TypeRef::parse_with_string_alias("String", "String"), string);
        assert_eq!(TypeRef::parse_with_string_alias("string", "String"), string);
        assert_eq!(TypeRef::parse_with_string_alias("string", "string"), string);
        assert_eq!(TypeRef::parse_with_string_alias("Date", "String"), TypeRef::Named("Date".into()));
    }

    #[test]
    fn numeric_chain_orders_by_width() {
        assert!(Primitive::Int < Primitive::Long);
        assert!(Primitive::Long < Primitive::Double);
        assert!(!Primitive::Boolean.is_numeric());
    }
}
