//! Lower one graph node into a declaration plan with everything resolved
//! against the target syntax: escaped names, spelled-out types, the
//! constructor's parameter list and the import set.
//!
//! The plan is still language-neutral in shape; [`crate::codegen`] turns it
//! into text.
use std::collections::{BTreeSet, HashSet};

use tracing::debug;

use crate::codegen::syntax::{fill, Syntax};
use crate::ir::TypeRef;
use crate::model::{ClassKind, ClassModel, ClassModelGraph, FieldModel};
use crate::naming;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// In-language name, keyword-escaped.
    pub name: String,
    pub json_name: String,
    /// Fully spelled type, list wrapper included.
    pub ty: String,
    /// Carries the serialization-name annotation.
    pub annotated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDecl {
    pub name: String,
    /// Wire literal, present only when it differs from `name`.
    pub json: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    Class {
        base: Option<String>,
        /// Fields declared in this file (not provided by an ancestor).
        fields: Vec<FieldDecl>,
        /// Constructor parameters: the base's parameters, then `fields`.
        params: Vec<FieldDecl>,
        /// Names forwarded to the base constructor.
        super_args: Vec<String>,
    },
    Enum { members: Vec<MemberDecl> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub namespace: String,
    pub name: String,
    /// Sorted, deduplicated.
    pub imports: Vec<String>,
    pub header: Option<String>,
    pub comment: Option<String>,
    pub kind: DeclKind,
}

pub fn lower_class(graph: &ClassModelGraph, class: &ClassModel, syntax: &Syntax) -> ClassDecl {
    let mut imports = BTreeSet::new();
    let kind = match class.kind() {
        ClassKind::Enum { constants } => {
            let members: Vec<MemberDecl> = constants
                .iter()
                .map(|c| MemberDecl {
                    name: c.name.clone(),
                    json: c.json.clone().filter(|_| c.needs_serialized_name()),
                })
                .collect();
            if members.iter().any(|m| m.json.is_some()) {
                imports.extend(syntax.serialized_name_import.clone());
            }
            DeclKind::Enum { members }
        }
        ClassKind::Class { .. } => {
            let name = class.name();
            let params = unique_members(graph.constructor_fields(name), syntax, name);
            // the base's parameters are a prefix of ours, so they share names
            let split = params.len().saturating_sub(graph.declared_fields(name).len());
            let fields = params[split..].to_vec();
            let base = graph.base_of(name);
            let super_args = match base {
                Some(_) => params[..split].iter().map(|p| p.name.clone()).collect(),
                None => Vec::new(),
            };

            if fields.iter().any(|f| f.annotated) {
                imports.extend(syntax.serialized_name_import.clone());
            }
            // parameters cover own and inherited field types alike
            for field in graph.constructor_fields(name) {
                collect_type_imports(graph, class, field, syntax, &mut imports);
            }
            if let Some(b) = base {
                if let Some(import) = class_import(graph, class, b.name(), syntax) {
                    imports.insert(import);
                }
            }
            DeclKind::Class { base: base.map(|b| b.name().to_string()), fields, params, super_args }
        }
    };

    ClassDecl {
        namespace: class.namespace().to_string(),
        name: class.name().to_string(),
        imports: imports.into_iter().collect(),
        header: graph.file_header().map(str::to_string),
        comment: graph
            .class_comment()
            .map(|c| c.replace("$className", class.name())),
        kind,
    }
}

pub fn lower_field(field: &FieldModel, syntax: &Syntax) -> FieldDecl {
    let name = syntax.identifier(field.name());
    FieldDecl {
        annotated: name != field.json_name(),
        ty: spell_type(&field.type_ref(), field.is_array(), syntax),
        json_name: field.json_name().to_string(),
        name,
    }
}

/// Lower `fields` in order, suffixing `2`, `3`, ... onto any name (or
/// accessor) already taken in the same class. A suffixed member always
/// carries the wire-name annotation.
fn unique_members(fields: Vec<&FieldModel>, syntax: &Syntax, class_name: &str) -> Vec<FieldDecl> {
    let mut taken = HashSet::new();
    let mut out = Vec::with_capacity(fields.len());
    for field in fields {
        let mut decl = lower_field(field, syntax);
        if !taken.insert(accessor_name(&decl)) {
            let base = decl.name.clone();
            let mut n = 2;
            loop {
                let candidate = format!("{base}{n}");
                if taken.insert(naming::capitalize(&candidate)) {
                    debug!(class_name, json_name = %decl.json_name, name = %candidate, "member name collision; suffixed");
                    decl.name = candidate;
                    decl.annotated = true;
                    break;
                }
                n += 1;
            }
        }
        out.push(decl);
    }
    out
}

/// Type text for a field's element type, wrapped in the list type when the
/// field is an array.
pub fn spell_type(ty: &TypeRef, is_array: bool, syntax: &Syntax) -> String {
    let element = match ty {
        TypeRef::Primitive(p) => syntax.primitive(*p, is_array).to_string(),
        TypeRef::Named(n) => n.clone(),
    };
    if is_array {
        fill(&syntax.list_type, &[("element", &element)])
    } else {
        element
    }
}

/// Accessor suffix: `getName`, `Name`.
pub fn accessor_name(field: &FieldDecl) -> String {
    naming::capitalize(&field.name)
}

fn collect_type_imports(
    graph: &ClassModelGraph,
    class: &ClassModel,
    field: &FieldModel,
    syntax: &Syntax,
    imports: &mut BTreeSet<String>,
) {
    if field.is_array() {
        imports.extend(syntax.list_import.clone());
    }
    let TypeRef::Named(name) = field.type_ref() else {
        return;
    };
    if name == syntax.date_type {
        imports.extend(syntax.date_import.clone());
    } else if let Some(import) = class_import(graph, class, &name, syntax) {
        imports.insert(import);
    }
}

fn class_import(graph: &ClassModelGraph, class: &ClassModel, name: &str, syntax: &Syntax) -> Option<String> {
    let target = graph.find_by_name(name)?;
    let ns = target.namespace();
    if ns == class.namespace() || ns == syntax.builtin_namespace || graph.is_reserved_namespace(ns) {
        return None;
    }
    Some(fill(&syntax.type_import, &[("namespace", ns), ("name", target.name())]))
}
