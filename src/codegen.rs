//! Render a lowered declaration into flat source text.
//!
//! Lines are produced without indentation; [`crate::format::LayoutFormatter`]
//! re-indents them from the brace structure afterwards.
pub mod syntax;

use crate::lower::{self, ClassDecl, DeclKind, FieldDecl, MemberDecl};
use crate::model::{ClassModel, ClassModelGraph};

use syntax::{fill, BaseCall, Syntax};

// ————————————————————————————————————————————————————————————————————————————
// EMITTER
// ————————————————————————————————————————————————————————————————————————————

pub struct SourceEmitter<'a> {
    syntax: &'a Syntax,
    lines: Vec<String>,
}

impl<'a> SourceEmitter<'a> {
    pub fn new(syntax: &'a Syntax) -> Self {
        Self { syntax, lines: Vec::new() }
    }

    /// Lower and render one node of `graph`.
    pub fn render(syntax: &Syntax, graph: &ClassModelGraph, class: &ClassModel) -> String {
        let decl = lower::lower_class(graph, class, syntax);
        let mut emitter = SourceEmitter::new(syntax);
        emitter.emit(&decl);
        emitter.into_string()
    }

    pub fn emit(&mut self, decl: &ClassDecl) {
        if let Some(header) = &decl.header {
            self.push_text(header);
        }
        self.push(fill(&self.syntax.package_decl, &[("namespace", &decl.namespace)]));
        if !decl.imports.is_empty() {
            self.blank();
            for import in &decl.imports {
                self.push(fill(&self.syntax.import_decl, &[("import", import)]));
            }
        }
        self.blank();
        if let Some(comment) = &decl.comment {
            self.push_text(comment);
        }
        match &decl.kind {
            DeclKind::Enum { members } => self.emit_enum(&decl.name, members),
            DeclKind::Class { base, fields, params, super_args } => {
                self.emit_class(&decl.name, base.as_deref(), fields, params, super_args)
            }
        }
    }

    pub fn into_string(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    // ------------------------------ Classes ---------------------------------- //

    fn emit_class(
        &mut self,
        name: &str,
        base: Option<&str>,
        fields: &[FieldDecl],
        params: &[FieldDecl],
        super_args: &[String],
    ) {
        let extends = base
            .map(|b| fill(&self.syntax.extends_clause, &[("base", b)]))
            .unwrap_or_default();
        self.push(fill(&self.syntax.class_decl, &[("name", name), ("extends", &extends)]));

        if !fields.is_empty() {
            self.blank();
            for field in fields {
                if field.annotated {
                    self.push(fill(&self.syntax.serialized_name, &[("json", &escape_literal(&field.json_name))]));
                }
                self.push(fill(&self.syntax.field_decl, &[("type", &field.ty), ("name", &field.name)]));
            }
        }

        self.blank();
        self.emit_constructor(name, fields, params, super_args);

        for field in fields {
            self.blank();
            let accessor = lower::accessor_name(field);
            let text = fill(&self.syntax.accessor, &[
                ("type", &field.ty),
                ("name", &field.name),
                ("Name", &accessor),
            ]);
            self.push_text(&text);
        }
        self.push("}".to_string());
    }

    fn emit_constructor(&mut self, name: &str, fields: &[FieldDecl], params: &[FieldDecl], super_args: &[String]) {
        let params = params
            .iter()
            .map(|p| fill(&self.syntax.parameter, &[("type", &p.ty), ("name", &p.name)]))
            .collect::<Vec<_>>()
            .join(", ");
        let args = super_args.join(", ");

        let (base_init, base_statement) = match &self.syntax.base_call {
            _ if super_args.is_empty() => (String::new(), None),
            BaseCall::Initializer(t) => (fill(t, &[("args", &args)]), None),
            BaseCall::Statement(t) => (String::new(), Some(fill(t, &[("args", &args)]))),
        };
        self.push(fill(&self.syntax.constructor_decl, &[
            ("class", name),
            ("params", &params),
            ("base_init", &base_init),
        ]));
        if let Some(statement) = base_statement {
            self.push(statement);
        }
        for field in fields {
            self.push(fill(&self.syntax.assignment, &[("name", &field.name)]));
        }
        self.push("}".to_string());
    }

    // ------------------------------- Enums ----------------------------------- //

    fn emit_enum(&mut self, name: &str, members: &[MemberDecl]) {
        self.push(fill(&self.syntax.enum_decl, &[("name", name)]));
        let last = members.len().saturating_sub(1);
        for (i, member) in members.iter().enumerate() {
            let mut line = String::new();
            if let Some(json) = &member.json {
                line.push_str(&fill(&self.syntax.serialized_name, &[("json", &escape_literal(json))]));
                line.push(' ');
            }
            line.push_str(&member.name);
            if i != last {
                line.push(',');
            }
            self.push(line);
        }
        self.push("}".to_string());
    }

    // ------------------------------ Helpers ---------------------------------- //

    fn push(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Multi-line text, one entry per line; a trailing newline adds nothing.
    fn push_text(&mut self, text: &str) {
        self.lines.extend(text.trim_end_matches('\n').split('\n').map(str::to_string));
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }
}

fn escape_literal(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render_java(g: &ClassModelGraph, name: &str) -> String {
        SourceEmitter::render(&Syntax::java(), g, g.find_by_name(name).unwrap())
    }

    #[test]
    fn renders_a_flat_java_class() {
        let mut g = ClassModelGraph::new();
        g.build(&json!({"Id": 5, "Tags": ["a", "b"]}), "com.example", "Item");
        let expected = "\
package com.example;

import com.google.gson.annotations.SerializedName;
import java.util.List;

public class Item {

@SerializedName(\"Id\")
private final int id;
@SerializedName(\"Tags\")
private final List<String> tags;

public Item(int id, List<String> tags) {
this.id = id;
this.tags = tags;
}

public int getId() {
return id;
}

public List<String> getTags() {
return tags;
}
}
";
        assert_eq!(render_java(&g, "Item"), expected);
    }

    #[test]
    fn subclass_forwards_base_parameters() {
        let mut g = ClassModelGraph::new();
        g.build(&json!({"a": "a base"}), "a.b", "BaseClass");
        g.build(&json!({"a": "a sub", "b": "b value"}), "a.b", "SubClass");
        g.set_base_class("SubClass", "BaseClass");

        let text = render_java(&g, "SubClass");
        assert!(text.contains("public class SubClass extends BaseClass {"));
        assert!(text.contains("public SubClass(String a, String b) {\nsuper(a);\nthis.b = b;\n}"));
        assert!(!text.contains("private final String a;"));
        assert!(!text.contains("getA()"));
    }

    #[test]
    fn csharp_uses_initializer_and_properties() {
        let mut g = ClassModelGraph::with_builtins(crate::model::Builtins {
            namespace: "System".into(),
            string_type: "string".into(),
            reserved_prefix: "System".into(),
        });
        g.build(&json!({"a": 1}), "Acme", "Base");
        g.build(&json!({"a": 1, "b": true}), "Acme", "Sub");
        g.set_base_class("Sub", "Base");

        let text = SourceEmitter::render(&Syntax::csharp(), &g, g.find_by_name("Sub").unwrap());
        assert!(text.starts_with("namespace Acme;\n"));
        assert!(text.contains("public class Sub : Base {"));
        assert!(text.contains("public Sub(int a, bool b) : base(a) {"));
        assert!(text.contains("public bool B => b;"));
    }

    #[test]
    fn header_and_comment_frame_the_class() {
        let mut g = ClassModelGraph::new();
        g.build(&json!({"x": 1}), "p", "Root");
        g.set_file_header(Some("/*\n * Header\n */\n".into()));
        g.set_class_comment(Some("/** $className */".into()));
        let text = render_java(&g, "Root");
        assert!(text.starts_with("/*\n * Header\n */\npackage p;\n\n/** Root */\npublic class Root {"));
    }

    #[test]
    fn enums_render_member_lines() {
        let mut g = ClassModelGraph::new();
        g.add_enum("p", "Color", vec![
            crate::model::EnumConstant::new("RED", Some("red".into())),
            crate::model::EnumConstant::new("BLUE", None),
        ]);
        let text = render_java(&g, "Color");
        assert!(text.ends_with("public enum Color {\n@SerializedName(\"red\") RED,\nBLUE\n}\n"));
    }

    #[test]
    fn wire_names_are_escaped_in_annotations() {
        let mut g = ClassModelGraph::new();
        g.build(&json!({"say \"hi\"": 1}), "p", "Root");
        assert!(render_java(&g, "Root").contains(r#"@SerializedName("say \"hi\"")"#));
    }
}
