//! Declarative post-inference edits.
//!
//! Four independent categories. Within a category rules do not depend on each
//! other; across categories [`crate::model::ClassModelGraph::apply_rules`]
//! runs subtype assignment, then type renames, then field renames and
//! deletions, because later categories may name types introduced earlier.
//! Rules naming classes or fields that do not exist are skipped.

use indexmap::IndexMap;

use crate::ir::TypeSpec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldRename {
    pub class_name: String,
    pub json_name: String,
    pub field_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDelete {
    pub class_name: String,
    pub json_name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformRuleSet {
    type_renames: IndexMap<String, TypeSpec>,
    subtypes: IndexMap<String, String>,
    field_renames: Vec<FieldRename>,
    field_deletes: Vec<FieldDelete>,
}

impl TransformRuleSet {
    pub fn new() -> Self { Self::default() }

    /// Replace every use of type `from` with `to`; merges or renames the
    /// class node named `from`.
    pub fn rename_type(self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.map_type(from, TypeSpec::new(to))
    }

    /// Like [`Self::rename_type`], but fields of type `from` become lists of
    /// `element`.
    pub fn rename_to_array_type(self, from: impl Into<String>, element: impl Into<String>) -> Self {
        self.map_type(from, TypeSpec::array_of(element))
    }

    pub fn map_type(mut self, from: impl Into<String>, to: TypeSpec) -> Self {
        self.type_renames.insert(from.into(), to);
        self
    }

    pub fn assign_subtype(mut self, sub_type: impl Into<String>, base_type: impl Into<String>) -> Self {
        self.subtypes.insert(sub_type.into(), base_type.into());
        self
    }

    pub fn rename_field(
        mut self,
        class_name: impl Into<String>,
        json_name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        self.field_renames.push(FieldRename {
            class_name: class_name.into(),
            json_name: json_name.into(),
            field_name: field_name.into(),
        });
        self
    }

    pub fn delete_field(mut self, class_name: impl Into<String>, json_name: impl Into<String>) -> Self {
        self.field_deletes.push(FieldDelete {
            class_name: class_name.into(),
            json_name: json_name.into(),
        });
        self
    }

    /// Append `other`'s rules. For the keyed categories `other` wins.
    pub fn extend(mut self, other: TransformRuleSet) -> Self {
        self.type_renames.extend(other.type_renames);
        self.subtypes.extend(other.subtypes);
        self.field_renames.extend(other.field_renames);
        self.field_deletes.extend(other.field_deletes);
        self
    }

    pub fn type_renames(&self) -> impl Iterator<Item = (&str, &TypeSpec)> {
        self.type_renames.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn subtypes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.subtypes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn field_renames(&self) -> &[FieldRename] { &self.field_renames }

    pub fn field_deletes(&self) -> &[FieldDelete] { &self.field_deletes }

    pub fn is_empty(&self) -> bool {
        self.type_renames.is_empty()
            && self.subtypes.is_empty()
            && self.field_renames.is_empty()
            && self.field_deletes.is_empty()
    }
}
