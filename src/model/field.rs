use serde_json::Value;

use crate::inference::{self, Observed, TypeLattice};
use crate::ir::{Primitive, TypeRef};
use crate::naming;

/// One inferred member of a class, keyed by its source JSON key.
///
/// The type is never cached: it is recomputed from the observation multiset
/// unless a type rule has mapped it, which freezes inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldModel {
    json_name: String,
    default_name: String,
    override_name: Option<String>,
    nested_type: Option<String>,
    mapped_type: Option<TypeRef>,
    is_array: bool,
    observed: Vec<Observed>,
}

impl FieldModel {
    pub fn new(json_name: impl Into<String>) -> Self {
        let json_name = json_name.into();
        Self {
            default_name: naming::field_name(&json_name),
            json_name,
            override_name: None,
            nested_type: None,
            mapped_type: None,
            is_array: false,
            observed: Vec::new(),
        }
    }

    /// A field holding instances of another class.
    pub fn of_type(json_name: impl Into<String>, type_name: impl Into<String>, is_array: bool) -> Self {
        let mut field = Self::new(json_name);
        field.nested_type = Some(type_name.into());
        field.is_array = is_array;
        field
    }

    /// Record one JSON value seen under this key. Object-valued sightings
    /// (directly or inside arrays) make the field refer to `nested_type`.
    pub fn observe(&mut self, value: &Value, nested_type: &str) {
        let shape = inference::observe_value(value, &mut self.observed);
        self.is_array |= shape.is_array;
        if shape.has_object && self.nested_type.is_none() {
            self.nested_type = Some(nested_type.to_string());
        }
    }

    pub fn json_name(&self) -> &str { &self.json_name }

    /// Name used in generated code: the rule-supplied override, else the
    /// normalized JSON key.
    pub fn name(&self) -> &str {
        self.override_name.as_deref().unwrap_or(&self.default_name)
    }

    pub fn default_name(&self) -> &str { &self.default_name }

    pub fn override_name(&self) -> Option<&str> { self.override_name.as_deref() }

    pub fn set_override_name(&mut self, name: impl Into<String>) {
        self.override_name = Some(name.into());
    }

    pub fn is_array(&self) -> bool { self.is_array }

    pub fn observed(&self) -> &[Observed] { &self.observed }

    pub fn is_type_mapped(&self) -> bool { self.mapped_type.is_some() }

    /// Lattice result over everything observed so far.
    pub fn inferred_primitive(&self) -> Option<Primitive> {
        TypeLattice::infer(&self.observed, None)
    }

    /// Element type of this field. Fields never seen with a usable value
    /// default to string.
    pub fn type_ref(&self) -> TypeRef {
        if let Some(mapped) = &self.mapped_type {
            return mapped.clone();
        }
        if let Some(nested) = &self.nested_type {
            return TypeRef::Named(nested.clone());
        }
        TypeRef::Primitive(self.inferred_primitive().unwrap_or(Primitive::String))
    }

    /// Retype this field if its current type is `from`. Array-ness is only
    /// ever added: a list of `from` stays a list of the new type.
    pub fn map_type(&mut self, from: &TypeRef, to: &TypeRef, as_array: bool) -> bool {
        if self.type_ref() != *from {
            return false;
        }
        self.mapped_type = Some(to.clone());
        self.is_array |= as_array;
        true
    }

    /// Fold `other` (same JSON key) into this field. Observations are unioned
    /// as a multiset; explicit state already present on `self` wins.
    pub fn merge(&mut self, other: &FieldModel) {
        debug_assert_eq!(self.json_name, other.json_name);
        self.observed.extend(other.observed.iter().cloned());
        self.is_array |= other.is_array;
        if self.nested_type.is_none() {
            self.nested_type = other.nested_type.clone();
        }
        if self.mapped_type.is_none() {
            self.mapped_type = other.mapped_type.clone();
        }
        if self.override_name.is_none() {
            self.override_name = other.override_name.clone();
        }
    }

    /// The wire name starts with an upper-case letter.
    pub fn has_upper_case_wire_name(&self) -> bool {
        self.json_name.starts_with(|c: char| c.is_uppercase())
    }

    /// A field-rename rule has retitled this field.
    pub fn is_renamed(&self) -> bool {
        self.override_name.as_deref().is_some_and(|o| o != self.default_name)
    }

    /// Generated code must carry the wire name explicitly.
    pub fn needs_serialized_name(&self) -> bool {
        self.name() != self.json_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn observed_with(json_name: &str, values: &[Value]) -> FieldModel {
        let mut f = FieldModel::new(json_name);
        for v in values {
            f.observe(v, "Unused");
        }
        f
    }

    #[test]
    fn upper_case_key_is_lowered_and_flagged() {
        let f = FieldModel::new("Name");
        assert_eq!(f.name(), "name");
        assert!(f.has_upper_case_wire_name());
        assert!(!f.is_renamed());
        assert!(f.needs_serialized_name());

        let f = FieldModel::new("name");
        assert!(!f.needs_serialized_name());
        assert!(!f.has_upper_case_wire_name());
    }

    #[test]
    fn explicit_rename_is_tracked_separately() {
        let mut f = FieldModel::new("name");
        f.set_override_name("title");
        assert!(f.is_renamed());
        assert!(!f.has_upper_case_wire_name());
        assert!(f.needs_serialized_name());
        assert_eq!(f.name(), "title");
    }

    #[test]
    fn type_is_recomputed_as_values_arrive() {
        let mut f = observed_with("n", &[json!(1), json!(2)]);
        assert_eq!(f.type_ref(), TypeRef::Primitive(Primitive::Int));
        f.observe(&json!(4_000_000_000u64), "N");
        assert_eq!(f.type_ref(), TypeRef::Primitive(Primitive::Long));
        f.observe(&json!(1.5), "N");
        assert_eq!(f.type_ref(), TypeRef::Primitive(Primitive::Double));
    }

    #[test]
    fn mapped_type_freezes_inference() {
        let mut f = observed_with("when", &[json!("2024-01-01")]);
        let date = TypeRef::Named("Date".into());
        assert!(f.map_type(&TypeRef::Primitive(Primitive::String), &date, false));
        f.observe(&json!(12), "When");
        assert_eq!(f.type_ref(), TypeRef::Named("Date".into()));
        assert!(f.is_type_mapped());
    }

    #[test]
    fn map_type_keeps_list_ness() {
        let origin = TypeRef::Named("AddressComponents".into());
        let mut f = FieldModel::of_type("components", "AddressComponents", true);
        assert!(f.map_type(&origin, &TypeRef::Named("AddressComponent".into()), false));
        assert!(f.is_array());
        assert!(!f.map_type(&origin, &TypeRef::Named("Other".into()), false));
    }

    #[test]
    fn empty_array_leaves_type_alone() {
        let mut f = observed_with("tags", &[json!(["a"])]);
        f.observe(&json!([]), "Tags");
        assert!(f.is_array());
        assert_eq!(f.type_ref(), TypeRef::Primitive(Primitive::String));
    }

    #[test]
    fn merge_unions_observations() {
        let mut a = observed_with("aa", &[json!("a first")]);
        let b = observed_with("aa", &[json!("a second")]);
        a.merge(&b);
        assert_eq!(a.observed().len(), 2);
        assert!(a.observed().contains(&Observed::Text("a second".into())));
    }

    #[test]
    fn self_merge_keeps_inferred_type() {
        let mut a = observed_with("n", &[json!(1), json!(3_000_000_000u64)]);
        let before = a.type_ref();
        let copy = a.clone();
        a.merge(&copy);
        assert_eq!(a.type_ref(), before);
    }
}
