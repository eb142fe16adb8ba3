//! Generator configuration: a JSON file mapped onto the rule set, the enum
//! declarations, the syntax templates and the layout settings.
//!
//! Deserialization errors carry the JSON path of the offending node.
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::codegen::syntax::Syntax;
use crate::error::{Error, Result};
use crate::format::LayoutFormatter;
use crate::ir::TypeSpec;
use crate::model::EnumConstant;
use crate::rules::TransformRuleSet;

// ————————————————————————————————————————————————————————————————————————————
// FILE FORMAT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub root_namespace: String,
    pub root_class: String,
    pub rules: RulesConfig,
    pub enums: Vec<EnumConfig>,
    /// `$year` is replaced with the current year.
    pub file_header: Option<String>,
    /// `$className` is replaced per class.
    pub class_comment: Option<String>,
    pub format: LayoutFormatter,
    pub syntax: SyntaxChoice,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_namespace: "com.example".into(),
            root_class: "Root".into(),
            rules: RulesConfig::default(),
            enums: Vec::new(),
            file_header: None,
            class_comment: None,
            format: LayoutFormatter::default(),
            syntax: SyntaxChoice::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RulesConfig {
    pub type_renames: Vec<TypeRenameRule>,
    pub subtypes: Vec<SubtypeRule>,
    pub field_renames: Vec<FieldRenameRule>,
    pub field_deletes: Vec<FieldDeleteRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRenameRule {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub array: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubtypeRule {
    pub sub_type: String,
    pub base_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRenameRule {
    pub class: String,
    pub json_name: String,
    pub field: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeleteRule {
    pub class: String,
    pub json_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumConfig {
    /// Defaults to the root namespace.
    #[serde(default)]
    pub namespace: Option<String>,
    pub name: String,
    pub values: Vec<EnumValueConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumValueConfig {
    pub name: String,
    #[serde(default)]
    pub json: Option<String>,
}

/// A preset name or a complete inline template set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SyntaxChoice {
    Preset(String),
    Custom(Box<Syntax>),
}

impl Default for SyntaxChoice {
    fn default() -> Self { SyntaxChoice::Preset("java".into()) }
}

impl SyntaxChoice {
    pub fn resolve(&self) -> Result<Syntax> {
        match self {
            SyntaxChoice::Custom(syntax) => Ok((**syntax).clone()),
            SyntaxChoice::Preset(name) => Syntax::preset(name).ok_or_else(|| Error::Config {
                path: "syntax".into(),
                message: format!("unknown syntax preset `{name}` (expected `java` or `csharp`)"),
            }),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        from_slice_with_path(&bytes)
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        from_slice_with_path(src.as_bytes())
    }

    pub fn rule_set(&self) -> TransformRuleSet {
        let r = &self.rules;
        let mut rules = TransformRuleSet::new();
        for s in &r.subtypes {
            rules = rules.assign_subtype(&s.sub_type, &s.base_type);
        }
        for t in &r.type_renames {
            let spec = TypeSpec { name: t.to.clone(), is_array: t.array };
            rules = rules.map_type(&t.from, spec);
        }
        for f in &r.field_renames {
            rules = rules.rename_field(&f.class, &f.json_name, &f.field);
        }
        for d in &r.field_deletes {
            rules = rules.delete_field(&d.class, &d.json_name);
        }
        rules
    }

    /// `(namespace, name, constants)` per declared enum.
    pub fn enum_declarations(&self) -> Vec<(String, String, Vec<EnumConstant>)> {
        self.enums
            .iter()
            .map(|e| {
                let namespace = e.namespace.clone().unwrap_or_else(|| self.root_namespace.clone());
                let constants = e.values.iter().map(|v| EnumConstant::new(&v.name, v.json.clone())).collect();
                (namespace, e.name.clone(), constants)
            })
            .collect()
    }

    /// File header with `$year` expanded for `year`.
    pub fn file_header_for_year(&self, year: i32) -> Option<String> {
        self.file_header.as_ref().map(|h| h.replace("$year", &year.to_string()))
    }

    pub fn file_header_now(&self) -> Option<String> {
        use chrono::Datelike;
        self.file_header_for_year(chrono::Local::now().year())
    }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| Error::Config {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_an_empty_object() {
        let cfg = GeneratorConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg, GeneratorConfig::default());
        assert_eq!(cfg.syntax.resolve().unwrap(), Syntax::java());
        assert_eq!(cfg.format.max_width, 100);
        assert!(cfg.rule_set().is_empty());
    }

    #[test]
    fn rules_map_onto_the_rule_set() {
        let cfg = GeneratorConfig::from_json_str(r#"{
            "root_namespace": "com.google.geocoding",
            "root_class": "Response",
            "rules": {
                "type_renames": [
                    {"from": "Northeast", "to": "Location"},
                    {"from": "Types", "to": "String", "array": true}
                ],
                "subtypes": [{"sub_type": "Viewport", "base_type": "Bounds"}],
                "field_renames": [{"class": "Result", "json_name": "types", "field": "kinds"}],
                "field_deletes": [{"class": "Result", "json_name": "place_id"}]
            },
            "format": {"indent": "  ", "max_width": 80},
            "syntax": "csharp"
        }"#).unwrap();

        let rules = cfg.rule_set();
        let renames: Vec<_> = rules.type_renames().collect();
        assert_eq!(renames[1], ("Types", &TypeSpec::array_of("String")));
        assert_eq!(rules.subtypes().collect::<Vec<_>>(), vec![("Viewport", "Bounds")]);
        assert_eq!(rules.field_renames()[0].field_name, "kinds");
        assert_eq!(rules.field_deletes()[0].json_name, "place_id");
        assert_eq!(cfg.format, LayoutFormatter::new("  ", 80));
        assert_eq!(cfg.syntax.resolve().unwrap().file_extension, "cs");
    }

    #[test]
    fn errors_name_the_offending_path() {
        let err = GeneratorConfig::from_json_str(r#"{"rules": {"subtypes": [{"sub_type": 3}]}}"#).unwrap_err();
        match err {
            Error::Config { path, .. } => assert_eq!(path, "rules.subtypes[0].sub_type"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_preset_is_a_config_error() {
        let cfg = GeneratorConfig::from_json_str(r#"{"syntax": "cobol"}"#).unwrap();
        assert!(matches!(cfg.syntax.resolve(), Err(Error::Config { .. })));
    }

    #[test]
    fn inline_syntax_is_accepted() {
        let inline = serde_json::to_string(&Syntax::csharp()).unwrap();
        let cfg = GeneratorConfig::from_json_str(&format!(r#"{{"syntax": {inline}}}"#)).unwrap();
        assert_eq!(cfg.syntax.resolve().unwrap(), Syntax::csharp());
    }

    #[test]
    fn enums_default_to_the_root_namespace() {
        let cfg = GeneratorConfig::from_json_str(r#"{
            "root_namespace": "acme",
            "enums": [{"name": "Status", "values": [{"name": "OK", "json": "ok"}, {"name": "FAILED"}]}]
        }"#).unwrap();
        let decls = cfg.enum_declarations();
        assert_eq!(decls[0].0, "acme");
        assert_eq!(decls[0].2[0], EnumConstant::new("OK", Some("ok".into())));
        assert_eq!(decls[0].2[1].json, None);
    }

    #[test]
    fn header_year_token_expands() {
        let cfg = GeneratorConfig {
            file_header: Some("// (c) $year Acme\n".into()),
            ..GeneratorConfig::default()
        };
        assert_eq!(cfg.file_header_for_year(2015).as_deref(), Some("// (c) 2015 Acme\n"));
    }
}
