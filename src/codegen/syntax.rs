//! Target-language surface syntax as data.
//!
//! Templates use `{placeholder}` slots filled by [`fill`]; unknown slots are
//! left as written. A template may span several lines (`\n`), which the
//! emitter splits before layout.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ir::Primitive;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimitiveSpelling {
    /// Spelling in declarations and parameters.
    pub plain: String,
    /// Spelling as a generic argument (`List<Integer>`).
    pub boxed: String,
}

impl PrimitiveSpelling {
    fn new(plain: &str, boxed: &str) -> Self {
        Self { plain: plain.into(), boxed: boxed.into() }
    }
}

/// How a constructor forwards its base-class parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseCall {
    /// First statement of the constructor body, e.g. `super({args});`.
    Statement(String),
    /// Clause substituted into the constructor header's `{base_init}` slot,
    /// e.g. ` : base({args})`.
    Initializer(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntax {
    pub file_extension: String,
    /// Namespace of the language's own types; never imported.
    pub builtin_namespace: String,
    /// Classes whose namespace starts with this prefix get no file.
    pub reserved_prefix: String,
    /// Name of the built-in string type in `builtin_namespace`.
    pub string_type: String,

    pub line_comment: String,
    pub package_decl: String,
    pub import_decl: String,
    /// Import of a generated class living in another namespace.
    pub type_import: String,
    pub class_decl: String,
    pub enum_decl: String,
    pub extends_clause: String,
    pub field_decl: String,
    pub constructor_decl: String,
    pub parameter: String,
    pub base_call: BaseCall,
    pub assignment: String,
    pub accessor: String,
    pub serialized_name: String,
    pub serialized_name_import: Option<String>,
    pub list_type: String,
    pub list_import: Option<String>,
    pub date_type: String,
    pub date_import: Option<String>,

    pub primitives: BTreeMap<Primitive, PrimitiveSpelling>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub keyword_escape: String,
}

impl Default for Syntax {
    fn default() -> Self { Self::java() }
}

impl Syntax {
    /// Java with Gson annotations.
    pub fn java() -> Self {
        Self {
            file_extension: "java".into(),
            builtin_namespace: "java.lang".into(),
            reserved_prefix: "java".into(),
            string_type: "String".into(),
            line_comment: "//".into(),
            package_decl: "package {namespace};".into(),
            import_decl: "import {import};".into(),
            type_import: "{namespace}.{name}".into(),
            class_decl: "public class {name}{extends} {".into(),
            enum_decl: "public enum {name} {".into(),
            extends_clause: " extends {base}".into(),
            field_decl: "private final {type} {name};".into(),
            constructor_decl: "public {class}({params}) {".into(),
            parameter: "{type} {name}".into(),
            base_call: BaseCall::Statement("super({args});".into()),
            assignment: "this.{name} = {name};".into(),
            accessor: "public {type} get{Name}() {\nreturn {name};\n}".into(),
            serialized_name: "@SerializedName(\"{json}\")".into(),
            serialized_name_import: Some("com.google.gson.annotations.SerializedName".into()),
            list_type: "List<{element}>".into(),
            list_import: Some("java.util.List".into()),
            date_type: "Date".into(),
            date_import: Some("java.util.Date".into()),
            primitives: BTreeMap::from([
                (Primitive::Boolean, PrimitiveSpelling::new("boolean", "Boolean")),
                (Primitive::Int, PrimitiveSpelling::new("int", "Integer")),
                (Primitive::Long, PrimitiveSpelling::new("long", "Long")),
                (Primitive::Double, PrimitiveSpelling::new("double", "Double")),
                (Primitive::String, PrimitiveSpelling::new("String", "String")),
            ]),
            keywords: words(JAVA_KEYWORDS),
            keyword_escape: "{name}_".into(),
        }
    }

    /// C# with `System.Text.Json` attributes.
    pub fn csharp() -> Self {
        Self {
            file_extension: "cs".into(),
            builtin_namespace: "System".into(),
            reserved_prefix: "System".into(),
            string_type: "string".into(),
            line_comment: "//".into(),
            package_decl: "namespace {namespace};".into(),
            import_decl: "using {import};".into(),
            type_import: "{namespace}".into(),
            class_decl: "public class {name}{extends} {".into(),
            enum_decl: "public enum {name} {".into(),
            extends_clause: " : {base}".into(),
            field_decl: "private readonly {type} {name};".into(),
            constructor_decl: "public {class}({params}){base_init} {".into(),
            parameter: "{type} {name}".into(),
            base_call: BaseCall::Initializer(" : base({args})".into()),
            assignment: "this.{name} = {name};".into(),
            accessor: "public {type} {Name} => {name};".into(),
            serialized_name: "[JsonPropertyName(\"{json}\")]".into(),
            serialized_name_import: Some("System.Text.Json.Serialization".into()),
            list_type: "List<{element}>".into(),
            list_import: Some("System.Collections.Generic".into()),
            date_type: "DateTime".into(),
            date_import: Some("System".into()),
            primitives: BTreeMap::from([
                (Primitive::Boolean, PrimitiveSpelling::new("bool", "bool")),
                (Primitive::Int, PrimitiveSpelling::new("int", "int")),
                (Primitive::Long, PrimitiveSpelling::new("long", "long")),
                (Primitive::Double, PrimitiveSpelling::new("double", "double")),
                (Primitive::String, PrimitiveSpelling::new("string", "string")),
            ]),
            keywords: words(CSHARP_KEYWORDS),
            keyword_escape: "@{name}".into(),
        }
    }

    /// Look up a preset by name (`java`, `csharp`/`cs`).
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "java" => Some(Self::java()),
            "csharp" | "cs" | "c#" => Some(Self::csharp()),
            _ => None,
        }
    }

    pub fn primitive(&self, p: Primitive, boxed: bool) -> &str {
        match self.primitives.get(&p) {
            Some(s) if boxed => &s.boxed,
            Some(s) => &s.plain,
            None => p.name(),
        }
    }

    pub fn is_keyword(&self, name: &str) -> bool {
        self.keywords.iter().any(|k| k == name)
    }

    /// `name`, escaped when it collides with a reserved word.
    pub fn identifier(&self, name: &str) -> String {
        if self.is_keyword(name) {
            fill(&self.keyword_escape, &[("name", name)])
        } else {
            name.to_string()
        }
    }
}

/// Substitute `{key}` slots in one pass; substituted text is not rescanned.
pub fn fill(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after
            .find('}')
            .map(|close| &after[..close])
            .filter(|key| !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'));
        match slot.and_then(|key| vars.iter().find(|(k, _)| *k == key).map(|(_, v)| (key, v))) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &after[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

const JAVA_KEYWORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "false", "final", "finally",
    "float", "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "null", "package", "private", "protected", "public", "return", "short",
    "static", "strictfp", "super", "switch", "synchronized", "this", "throw", "throws",
    "transient", "true", "try", "void", "volatile", "while",
];

const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked", "class",
    "const", "continue", "decimal", "default", "delegate", "do", "double", "else", "enum", "event",
    "explicit", "extern", "false", "finally", "fixed", "float", "for", "foreach", "goto", "if",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "return", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static",
    "string", "struct", "switch", "this", "throw", "true", "try", "typeof", "uint", "ulong",
    "unchecked", "unsafe", "ushort", "using", "virtual", "void", "volatile", "while",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_substitutes_known_slots_only() {
        assert_eq!(fill("{type} {name};", &[("type", "int"), ("name", "a")]), "int a;");
        assert_eq!(fill("class X {", &[("name", "a")]), "class X {");
        assert_eq!(fill("{a}{b}", &[("a", "{b}"), ("b", "x")]), "{b}x");
        assert_eq!(fill("open { brace", &[]), "open { brace");
    }

    #[test]
    fn keywords_are_escaped() {
        let java = Syntax::java();
        assert_eq!(java.identifier("class"), "class_");
        assert_eq!(java.identifier("name"), "name");
        assert_eq!(Syntax::csharp().identifier("object"), "@object");
    }

    #[test]
    fn presets_resolve_by_name() {
        assert_eq!(Syntax::preset("Java"), Some(Syntax::java()));
        assert_eq!(Syntax::preset("cs").map(|s| s.file_extension), Some("cs".to_string()));
        assert!(Syntax::preset("cobol").is_none());
    }

    #[test]
    fn primitive_spelling_depends_on_position() {
        let java = Syntax::java();
        assert_eq!(java.primitive(Primitive::Int, false), "int");
        assert_eq!(java.primitive(Primitive::Int, true), "Integer");
    }

    #[test]
    fn syntax_deserializes_from_json() {
        let text = serde_json::to_string(&Syntax::csharp()).unwrap();
        let back: Syntax = serde_json::from_str(&text).unwrap();
        assert_eq!(back.base_call, BaseCall::Initializer(" : base({args})".into()));
        assert_eq!(back.primitive(Primitive::Boolean, false), "bool");
    }
}
