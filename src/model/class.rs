use indexmap::IndexMap;

use super::FieldModel;

/// Stable identity of a node, unaffected by renames.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(pub(crate) u32);

/// One enum member: the symbolic name used in code and the literal seen on
/// the wire (when it differs or is known).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnumConstant {
    pub name: String,
    pub json: Option<String>,
}

impl EnumConstant {
    pub fn new(name: impl Into<String>, json: Option<String>) -> Self {
        Self { name: name.into(), json }
    }

    pub fn needs_serialized_name(&self) -> bool {
        self.json.as_deref().is_some_and(|j| j != self.name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ClassKind {
    /// Own fields keyed by JSON name, in first-seen order.
    Class { fields: IndexMap<String, FieldModel> },
    Enum { constants: Vec<EnumConstant> },
}

impl ClassKind {
    /// Same variant, no content.
    pub fn empty_like(&self) -> Self {
        match self {
            ClassKind::Class { .. } => ClassKind::Class { fields: IndexMap::new() },
            ClassKind::Enum { .. } => ClassKind::Enum { constants: Vec::new() },
        }
    }
}

/// One inferred data-holder type (or caller-supplied enum).
///
/// The base class is held by name and resolved through the owning
/// [`super::ClassModelGraph`]; a model on its own knows nothing about its
/// ancestors' fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassModel {
    id: ClassId,
    namespace: String,
    name: String,
    kind: ClassKind,
    base: Option<String>,
    generate_output: bool,
}

impl ClassModel {
    pub(crate) fn new(id: ClassId, namespace: &str, name: &str, generate_output: bool) -> Self {
        Self {
            id,
            namespace: namespace.to_string(),
            name: name.to_string(),
            kind: ClassKind::Class { fields: IndexMap::new() },
            base: None,
            generate_output,
        }
    }

    pub fn id(&self) -> ClassId { self.id }
    pub fn namespace(&self) -> &str { &self.namespace }
    pub fn name(&self) -> &str { &self.name }
    pub fn kind(&self) -> &ClassKind { &self.kind }
    pub fn base(&self) -> Option<&str> { self.base.as_deref() }
    pub fn generate_output(&self) -> bool { self.generate_output }
    pub fn is_enum(&self) -> bool { matches!(self.kind, ClassKind::Enum { .. }) }

    pub fn set_generate_output(&mut self, generate: bool) {
        self.generate_output = generate;
    }

    pub(crate) fn rename(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub(crate) fn set_base(&mut self, base: Option<String>) {
        self.base = base;
    }

    pub(crate) fn set_kind(&mut self, kind: ClassKind) {
        self.kind = kind;
    }

    /// Own fields in declaration order; empty for enums.
    pub fn fields(&self) -> impl Iterator<Item = &FieldModel> {
        let fields = match &self.kind {
            ClassKind::Class { fields } => Some(fields.values()),
            ClassKind::Enum { .. } => None,
        };
        fields.into_iter().flatten()
    }

    pub fn fields_mut(&mut self) -> impl Iterator<Item = &mut FieldModel> {
        let fields = match &mut self.kind {
            ClassKind::Class { fields } => Some(fields.values_mut()),
            ClassKind::Enum { .. } => None,
        };
        fields.into_iter().flatten()
    }

    pub fn field_count(&self) -> usize {
        match &self.kind {
            ClassKind::Class { fields } => fields.len(),
            ClassKind::Enum { .. } => 0,
        }
    }

    /// Own field by JSON name (inherited fields are not searched).
    pub fn field(&self, json_name: &str) -> Option<&FieldModel> {
        match &self.kind {
            ClassKind::Class { fields } => fields.get(json_name),
            ClassKind::Enum { .. } => None,
        }
    }

    pub fn field_mut(&mut self, json_name: &str) -> Option<&mut FieldModel> {
        match &mut self.kind {
            ClassKind::Class { fields } => fields.get_mut(json_name),
            ClassKind::Enum { .. } => None,
        }
    }

    /// Existing field for `json_name`, created on first sight. `None` for enums.
    pub(crate) fn field_entry(&mut self, json_name: &str) -> Option<&mut FieldModel> {
        match &mut self.kind {
            ClassKind::Class { fields } => Some(
                fields
                    .entry(json_name.to_string())
                    .or_insert_with(|| FieldModel::new(json_name)),
            ),
            ClassKind::Enum { .. } => None,
        }
    }

    /// Add a field, merging into an existing one with the same JSON name.
    pub fn add_field(&mut self, field: FieldModel) {
        if let ClassKind::Class { fields } = &mut self.kind {
            match fields.get_mut(field.json_name()) {
                Some(existing) => existing.merge(&field),
                None => {
                    fields.insert(field.json_name().to_string(), field);
                }
            }
        }
    }

    pub fn remove_field(&mut self, json_name: &str) -> Option<FieldModel> {
        match &mut self.kind {
            ClassKind::Class { fields } => fields.shift_remove(json_name),
            ClassKind::Enum { .. } => None,
        }
    }

    pub fn constants(&self) -> &[EnumConstant] {
        match &self.kind {
            ClassKind::Enum { constants } => constants,
            ClassKind::Class { .. } => &[],
        }
    }

    /// Union `other`'s content into `self`: matching fields merge their
    /// observations, new fields are adopted as-is. Base classes are the
    /// graph's business (see [`super::ClassModelGraph::merge`]).
    pub fn merge_content(&mut self, other: &ClassModel) {
        match (&mut self.kind, &other.kind) {
            (ClassKind::Class { fields }, ClassKind::Class { fields: theirs }) => {
                for field in theirs.values() {
                    match fields.get_mut(field.json_name()) {
                        Some(existing) => existing.merge(field),
                        None => {
                            fields.insert(field.json_name().to_string(), field.clone());
                        }
                    }
                }
            }
            (ClassKind::Enum { constants }, ClassKind::Enum { constants: theirs }) => {
                for c in theirs {
                    if !constants.iter().any(|own| own.name == c.name) {
                        constants.push(c.clone());
                    }
                }
            }
            _ => {
                tracing::debug!(
                    class = %self.name,
                    other = %other.name,
                    "class/enum kind mismatch; keeping target content"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn class_with(name: &str, fields: &[(&str, serde_json::Value)]) -> ClassModel {
        let mut c = ClassModel::new(ClassId(0), "a.b", name, true);
        for (k, v) in fields {
            if let Some(f) = c.field_entry(k) {
                f.observe(v, "Unused");
            }
        }
        c
    }

    #[test]
    fn merge_adopts_missing_and_unions_existing() {
        let mut first = class_with("First", &[("aa", json!("a first"))]);
        let second = class_with("Second", &[("aa", json!("a second")), ("bb", json!("b second"))]);

        first.merge_content(&second);

        assert_eq!(first.name(), "First");
        assert_eq!(first.field_count(), 2);
        assert!(first.field("bb").is_some());
        assert_eq!(first.field("aa").map(|f| f.observed().len()), Some(2));
    }

    #[test]
    fn merge_is_idempotent_on_field_set() {
        let mut c = class_with("C", &[("x", json!(1)), ("y", json!("s"))]);
        let copy = c.clone();
        c.merge_content(&copy);
        let names: Vec<_> = c.fields().map(|f| f.json_name().to_string()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert_eq!(c.field("x").map(|f| f.type_ref()), copy.field("x").map(|f| f.type_ref()));
    }

    #[test]
    fn remove_field_keeps_order() {
        let mut c = class_with("C", &[("a", json!(1)), ("b", json!(2)), ("c", json!(3))]);
        assert!(c.remove_field("b").is_some());
        assert!(c.remove_field("zz").is_none());
        let names: Vec<_> = c.fields().map(|f| f.json_name()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn enum_constants_union_by_name() {
        let mut a = ClassModel::new(ClassId(0), "x", "Color", true);
        a.set_kind(ClassKind::Enum { constants: vec![EnumConstant::new("RED", Some("red".into()))] });
        let mut b = a.clone();
        b.set_kind(ClassKind::Enum {
            constants: vec![
                EnumConstant::new("RED", Some("red".into())),
                EnumConstant::new("BLUE", None),
            ],
        });
        a.merge_content(&b);
        assert_eq!(a.constants().len(), 2);
        assert!(a.constants()[0].needs_serialized_name());
        assert!(!a.constants()[1].needs_serialized_name());
        assert_eq!(a.fields().count(), 0);
    }
}
