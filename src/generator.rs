//! The whole pipeline: documents in, rendered classes out.
//!
//! ```text
//! observe(doc)* ─▶ ClassModelGraph ─▶ apply_rules ─▶ SourceEmitter ─▶ LayoutFormatter ─▶ OutputSink
//! ```
use serde_json::Value;
use tracing::{debug, info};

use crate::codegen::syntax::Syntax;
use crate::codegen::SourceEmitter;
use crate::error::Result;
use crate::format::LayoutFormatter;
use crate::model::{Builtins, ClassModelGraph};
use crate::output::OutputSink;
use crate::rules::TransformRuleSet;

pub struct Generator {
    namespace: String,
    root_class: String,
    syntax: Syntax,
    formatter: LayoutFormatter,
    rules: TransformRuleSet,
    /// Everything observed so far, rules not applied.
    graph: ClassModelGraph,
    /// `graph` with the rules applied; dropped whenever `graph` changes.
    finished: Option<ClassModelGraph>,
}

impl Generator {
    pub fn new(namespace: impl Into<String>, root_class: impl Into<String>, syntax: Syntax) -> Self {
        let graph = ClassModelGraph::with_builtins(Builtins {
            namespace: syntax.builtin_namespace.clone(),
            string_type: syntax.string_type.clone(),
            reserved_prefix: syntax.reserved_prefix.clone(),
        });
        Self {
            namespace: namespace.into(),
            root_class: root_class.into(),
            syntax,
            formatter: LayoutFormatter::default(),
            rules: TransformRuleSet::new(),
            graph,
            finished: None,
        }
    }

    pub fn with_formatter(mut self, formatter: LayoutFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_rules(mut self, rules: TransformRuleSet) -> Self {
        self.rules = self.rules.extend(rules);
        self
    }

    pub fn with_file_header(mut self, header: Option<String>) -> Self {
        self.graph.set_file_header(header);
        self
    }

    pub fn with_class_comment(mut self, comment: Option<String>) -> Self {
        self.graph.set_class_comment(comment);
        self
    }

    pub fn syntax(&self) -> &Syntax { &self.syntax }

    /// The observed graph, before any rule.
    pub fn graph(&self) -> &ClassModelGraph { &self.graph }

    pub fn graph_mut(&mut self) -> &mut ClassModelGraph {
        self.finished = None;
        &mut self.graph
    }

    /// Fold one document into the graph under the root class.
    pub fn observe(&mut self, document: &Value) {
        self.graph.build(document, &self.namespace, &self.root_class);
        self.finished = None;
    }

    /// Parse and fold one document. Malformed JSON aborts the run.
    pub fn observe_str(&mut self, text: &str) -> Result<()> {
        let document: Value = serde_json::from_str(text)?;
        self.observe(&document);
        Ok(())
    }

    /// The observed graph with the rules applied. The rules run once per
    /// batch of observations; observing more documents starts over from the
    /// untouched graph.
    pub fn finish(&mut self) -> &ClassModelGraph {
        self.finished.get_or_insert_with(|| with_rules_applied(&self.graph, &self.rules))
    }

    /// Render and lay out one class of the finished graph.
    pub fn render(&mut self, class_name: &str) -> Option<String> {
        let graph: &ClassModelGraph = self.finished.get_or_insert_with(|| with_rules_applied(&self.graph, &self.rules));
        let class = graph.find_by_name(class_name)?;
        let flat = SourceEmitter::render(&self.syntax, graph, class);
        Some(self.formatter.format(&flat))
    }

    /// Apply rules, then hand every generatable class to `sink`. The first
    /// sink failure aborts the loop. Returns the number of classes written.
    pub fn generate(&mut self, sink: &mut dyn OutputSink) -> Result<usize> {
        let graph: &ClassModelGraph = self.finished.get_or_insert_with(|| with_rules_applied(&self.graph, &self.rules));
        let mut written = 0;
        for class in graph.generatable() {
            let flat = SourceEmitter::render(&self.syntax, graph, class);
            let body = self.formatter.format(&flat);
            sink.write_class(class.namespace(), class.name(), &body)?;
            info!(namespace = class.namespace(), class = class.name(), "generated class");
            written += 1;
        }
        Ok(written)
    }
}

fn with_rules_applied(observed: &ClassModelGraph, rules: &TransformRuleSet) -> ClassModelGraph {
    debug!(classes = observed.len(), "applying transformation rules");
    let mut graph = observed.clone();
    graph.apply_rules(rules);
    graph
}
