use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{ClassId, ClassKind, ClassModel, EnumConstant, FieldModel};
use crate::inference;
use crate::ir::{TypeRef, TypeSpec};
use crate::naming;
use crate::rules::TransformRuleSet;

/// Types the target language provides itself. The string type is seeded into
/// every graph as a pseudo-class so that rename rules can fold inferred
/// classes into it; nodes in the reserved namespace are never generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Builtins {
    pub namespace: String,
    pub string_type: String,
    pub reserved_prefix: String,
}

impl Default for Builtins {
    fn default() -> Self {
        Self {
            namespace: "java.lang".into(),
            string_type: "String".into(),
            reserved_prefix: "java".into(),
        }
    }
}

/// Every class inferred from one or many documents, keyed by name.
///
/// `find_by_name` is the single source of truth for identity: building a
/// nested object whose derived type name already exists extends that node
/// instead of creating a second one.
#[derive(Clone, Debug)]
pub struct ClassModelGraph {
    classes: IndexMap<String, ClassModel>,
    builtins: Builtins,
    next_id: u32,
    file_header: Option<String>,
    class_comment: Option<String>,
}

impl Default for ClassModelGraph {
    fn default() -> Self { Self::new() }
}

impl ClassModelGraph {
    pub fn new() -> Self {
        Self::with_builtins(Builtins::default())
    }

    pub fn with_builtins(builtins: Builtins) -> Self {
        let mut graph = Self {
            classes: IndexMap::new(),
            builtins,
            next_id: 0,
            file_header: None,
            class_comment: None,
        };
        let namespace = graph.builtins.namespace.clone();
        let string_type = graph.builtins.string_type.clone();
        graph.class(&namespace, &string_type);
        graph
    }

    pub fn builtins(&self) -> &Builtins { &self.builtins }

    pub fn file_header(&self) -> Option<&str> { self.file_header.as_deref() }

    pub fn set_file_header(&mut self, header: Option<String>) {
        self.file_header = header;
    }

    /// Class doc-comment template; `$className` is substituted per class.
    pub fn class_comment(&self) -> Option<&str> { self.class_comment.as_deref() }

    pub fn set_class_comment(&mut self, comment: Option<String>) {
        self.class_comment = comment;
    }

    pub fn is_reserved_namespace(&self, namespace: &str) -> bool {
        !self.builtins.reserved_prefix.is_empty() && namespace.starts_with(&self.builtins.reserved_prefix)
    }

    // ------------------------------- Lookup --------------------------------- //

    /// The node named `name`, created in `namespace` on first request.
    pub fn class(&mut self, namespace: &str, name: &str) -> &mut ClassModel {
        let generate = !self.is_reserved_namespace(namespace);
        let next_id = &mut self.next_id;
        self.classes.entry(name.to_string()).or_insert_with(|| {
            let id = ClassId(*next_id);
            *next_id += 1;
            debug!(namespace, name, "new class node");
            ClassModel::new(id, namespace, name, generate)
        })
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ClassModel> {
        self.classes.get(name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut ClassModel> {
        self.classes.get_mut(name)
    }

    pub fn find_by_id(&self, id: ClassId) -> Option<&ClassModel> {
        self.classes.values().find(|c| c.id() == id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// Number of nodes, built-ins included.
    pub fn len(&self) -> usize { self.classes.len() }

    pub fn is_empty(&self) -> bool { self.classes.is_empty() }

    /// All nodes in creation order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassModel> {
        self.classes.values()
    }

    /// Nodes that get a source file.
    pub fn generatable(&self) -> impl Iterator<Item = &ClassModel> {
        self.classes.values().filter(|c| c.generate_output())
    }

    /// Declare an enum. An existing node of that name becomes the enum (its
    /// identity is kept); constants are appended unless already present.
    pub fn add_enum(&mut self, namespace: &str, name: &str, constants: Vec<EnumConstant>) -> &mut ClassModel {
        let node = self.class(namespace, name);
        if node.field_count() > 0 {
            debug!(name, fields = node.field_count(), "enum declaration replaces inferred fields");
        }
        let mut merged = node.constants().to_vec();
        for c in constants {
            if !merged.iter().any(|m| m.name == c.name) {
                merged.push(c);
            }
        }
        node.set_kind(ClassKind::Enum { constants: merged });
        node
    }

    // ------------------------------- Build ---------------------------------- //

    /// Model one document under `class_name`. Arrays at the top are unwrapped
    /// and every object found merges into the same root node. A document with
    /// no object to model produces nothing and returns `None`.
    pub fn build(&mut self, document: &Value, namespace: &str, class_name: &str) -> Option<ClassId> {
        let roots = inference::objects_in(document);
        if roots.is_empty() {
            debug!(class_name, "document holds no object; nothing to model");
            return None;
        }
        for object in roots {
            self.build_object(object, namespace, class_name);
        }
        self.find_by_name(class_name).map(ClassModel::id)
    }

    /// Recursive descent over one object. Nested objects (directly or inside
    /// arrays) are built into the node named after their key, so every
    /// sighting of the same key converges on one class.
    pub fn build_object(&mut self, object: &Map<String, Value>, namespace: &str, class_name: &str) -> &ClassModel {
        self.class(namespace, class_name);
        for (key, value) in object {
            let nested = naming::type_name(key);
            match self.class(namespace, class_name).field_entry(key) {
                Some(field) => field.observe(value, &nested),
                None => {
                    debug!(class_name, key, "enum node cannot hold fields; key skipped");
                    continue;
                }
            }
            for child in inference::objects_in(value) {
                self.build_object(child, namespace, &nested);
            }
        }
        self.class(namespace, class_name)
    }

    // ------------------------------- Merge ---------------------------------- //

    /// Fold `other` into the node named `target`, which keeps its identity.
    /// When both have a base class, the target's base absorbs the other's
    /// base (recursively); otherwise the target adopts the other's base.
    pub fn merge(&mut self, target: &str, other: &ClassModel) {
        let mut visiting = Vec::new();
        self.merge_inner(target, other, &mut visiting);
    }

    fn merge_inner(&mut self, target: &str, other: &ClassModel, visiting: &mut Vec<String>) {
        if visiting.iter().any(|v| v == target) {
            return;
        }
        visiting.push(target.to_string());

        let Some(node) = self.classes.get_mut(target) else {
            debug!(target, "merge target missing; skipped");
            return;
        };
        node.merge_content(other);
        let own_base = node.base().map(str::to_string);

        match (own_base, other.base()) {
            (Some(own), Some(theirs)) if own != theirs => {
                if let Some(their_base) = self.classes.get(theirs).cloned() {
                    self.merge_inner(&own, &their_base, visiting);
                }
            }
            (None, Some(theirs)) => {
                self.set_base_class(target, theirs);
            }
            _ => {}
        }
    }

    /// Merge a separately built graph into this one, class by class.
    pub fn absorb(&mut self, other: ClassModelGraph) {
        // create missing nodes first so base references resolve in any order
        for model in other.classes.values() {
            if !self.contains(model.name()) {
                let node = self.class(model.namespace(), model.name());
                node.set_kind(model.kind().empty_like());
                node.set_generate_output(model.generate_output());
            }
        }
        for model in other.classes.values() {
            self.merge(model.name(), model);
        }
    }

    // ------------------------- Structure & hierarchy ------------------------ //

    /// Rename a node in place (identity and position kept). Fails when `from`
    /// is absent or `to` is taken.
    pub fn rename_class(&mut self, from: &str, to: &str) -> bool {
        if from == to || self.contains(to) {
            return false;
        }
        let Some(index) = self.classes.get_index_of(from) else {
            return false;
        };
        let Some((_, mut node)) = self.classes.shift_remove_index(index) else {
            return false;
        };
        node.rename(to);
        self.classes.shift_insert(index, to.to_string(), node);
        self.replace_base_references(from, to);
        true
    }

    /// Drop a node; classes deriving from it lose their base.
    pub fn remove(&mut self, name: &str) -> Option<ClassModel> {
        let removed = self.classes.shift_remove(name)?;
        for node in self.classes.values_mut() {
            if node.base() == Some(name) {
                node.set_base(None);
            }
        }
        Some(removed)
    }

    fn replace_base_references(&mut self, from: &str, to: &str) {
        for node in self.classes.values_mut() {
            if node.base() == Some(from) {
                let base = (node.name() != to).then(|| to.to_string());
                node.set_base(base);
            }
        }
    }

    /// Make `sub` derive from `base`. No-op (returns false) when either is
    /// missing or the link would close an inheritance cycle.
    pub fn set_base_class(&mut self, sub: &str, base: &str) -> bool {
        if !self.contains(sub) || !self.contains(base) {
            debug!(sub, base, "subtype assignment does not resolve; skipped");
            return false;
        }
        if sub == base || self.ancestor_names(base).iter().any(|n| n == sub) {
            warn!(sub, base, "subtype assignment would form an inheritance cycle; ignored");
            return false;
        }
        if let Some(node) = self.classes.get_mut(sub) {
            node.set_base(Some(base.to_string()));
        }
        true
    }

    pub fn base_of(&self, name: &str) -> Option<&ClassModel> {
        self.find_by_name(name)?.base().and_then(|b| self.find_by_name(b))
    }

    /// Base chain of `name`, nearest first.
    pub fn ancestor_names(&self, name: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut cursor = self.find_by_name(name).and_then(ClassModel::base);
        while let Some(base) = cursor {
            if base == name || out.iter().any(|n| n == base) {
                break;
            }
            out.push(base.to_string());
            cursor = self.find_by_name(base).and_then(ClassModel::base);
        }
        out
    }

    /// Own fields plus every inherited field, ancestors first; an own field
    /// shadows the inherited field with the same JSON name.
    pub fn effective_fields(&self, name: &str) -> Vec<&FieldModel> {
        self.effective_field_map(name, &mut Vec::new()).into_values().collect()
    }

    fn effective_field_map<'a>(&'a self, name: &str, seen: &mut Vec<String>) -> IndexMap<&'a str, &'a FieldModel> {
        if seen.iter().any(|s| s == name) {
            return IndexMap::new();
        }
        seen.push(name.to_string());
        let Some(node) = self.find_by_name(name) else {
            return IndexMap::new();
        };
        let mut out = match node.base() {
            Some(base) => self.effective_field_map(base, seen),
            None => IndexMap::new(),
        };
        for field in node.fields() {
            out.insert(field.json_name(), field);
        }
        out
    }

    /// Whether `json_name` reaches `class_name` from an ancestor.
    pub fn is_inherited(&self, class_name: &str, json_name: &str) -> bool {
        match self.find_by_name(class_name).and_then(ClassModel::base) {
            Some(base) => self.effective_field_map(base, &mut vec![class_name.to_string()]).contains_key(json_name),
            None => false,
        }
    }

    /// Own fields not already provided by an ancestor.
    pub fn declared_fields(&self, name: &str) -> Vec<&FieldModel> {
        let Some(node) = self.find_by_name(name) else {
            return Vec::new();
        };
        node.fields().filter(|f| !self.is_inherited(name, f.json_name())).collect()
    }

    /// Constructor parameters: the base's constructor parameters first, then
    /// the fields this class declares itself.
    pub fn constructor_fields(&self, name: &str) -> Vec<&FieldModel> {
        let mut out = Vec::new();
        let chain = self.ancestor_names(name);
        for ancestor in chain.iter().rev() {
            out.extend(self.declared_fields(ancestor));
        }
        out.extend(self.declared_fields(name));
        out
    }

    // ------------------------------ Rules ----------------------------------- //

    /// Apply a rule set in place: subtype assignment, type renames, field
    /// renames, field deletions. Unresolvable rules are skipped.
    pub fn apply_rules(&mut self, rules: &TransformRuleSet) {
        for (sub, base) in rules.subtypes() {
            self.set_base_class(sub, base);
        }
        for (from, to) in rules.type_renames() {
            self.apply_type_rename(from, to);
        }
        for rule in rules.field_renames() {
            self.rename_field(&rule.class_name, &rule.json_name, &rule.field_name);
        }
        for rule in rules.field_deletes() {
            self.delete_field(&rule.class_name, &rule.json_name);
        }
    }

    /// Rename or fold the node `from`, then retype every field of type `from`.
    ///
    /// If no node is named `to.name`, `from` is renamed in place. Otherwise
    /// `from` merges into the existing target and disappears: the target's
    /// identity survives, the origin's does not. Built-in nodes are never
    /// renamed or folded; only the fields using them are retyped.
    pub fn apply_type_rename(&mut self, from: &str, to: &TypeSpec) {
        let builtin = self
            .find_by_name(from)
            .is_some_and(|c| self.is_reserved_namespace(c.namespace()));
        if builtin {
            debug!(from, to = %to.name, "built-in type keeps its node; retyping fields only");
        } else if from != to.name && self.contains(from) {
            if self.contains(&to.name) {
                if let Some(origin) = self.classes.shift_remove(from) {
                    debug!(from, to = %to.name, "folding class into existing target");
                    self.merge(&to.name, &origin);
                    self.replace_base_references(from, &to.name);
                }
            } else {
                debug!(from, to = %to.name, "renaming class");
                self.rename_class(from, &to.name);
            }
        }

        let origin = self.resolve_type(from);
        let target = self.resolve_type(&to.name);
        let mut retyped = 0usize;
        for node in self.classes.values_mut() {
            for field in node.fields_mut() {
                if field.map_type(&origin, &target, to.is_array) {
                    retyped += 1;
                }
            }
        }
        debug!(from, to = %to.name, array = to.is_array, retyped, "type rule applied");
    }

    /// A type name as written in a rule; the target language's string
    /// spelling names the string primitive.
    pub fn resolve_type(&self, name: &str) -> TypeRef {
        TypeRef::parse_with_string_alias(name, &self.builtins.string_type)
    }

    /// Give an own field (looked up by JSON name) an explicit name.
    pub fn rename_field(&mut self, class_name: &str, json_name: &str, field_name: &str) -> bool {
        match self.classes.get_mut(class_name).and_then(|c| c.field_mut(json_name)) {
            Some(field) => {
                field.set_override_name(field_name);
                true
            }
            None => {
                debug!(class_name, json_name, "field rename rule does not resolve; skipped");
                false
            }
        }
    }

    /// Remove an own field; inherited fields are not touched.
    pub fn delete_field(&mut self, class_name: &str, json_name: &str) -> bool {
        let removed = self
            .classes
            .get_mut(class_name)
            .and_then(|c| c.remove_field(json_name))
            .is_some();
        if !removed {
            debug!(class_name, json_name, "field delete rule does not resolve; skipped");
        }
        removed
    }
}

// ------------------------------- Tests ------------------------------------ //
