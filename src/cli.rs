//! CLI: infer → (inspect | generate)
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;
use tracing::debug;

use json_classgen::config::GeneratorConfig;
use json_classgen::describe::describe_graph;
use json_classgen::format::LayoutFormatter;
use json_classgen::output::{FsSink, MemorySink};
use json_classgen::{Error, Generator};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer a class model from sample JSON documents and emit data-holder classes
#[derive(Parser, Debug)]
#[command(name = "json-classgen", version)]
pub struct CommandLineInterface {
    /// debug-level logging on stderr (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// infer, apply rules and write one source file per class
    Generate(GenerateOut),
    /// infer, apply rules and print the class graph as JSON
    Inspect(InspectOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// treat input as newline-delimited JSON (NDJSON)
    #[arg(long, default_value_t = false)]
    ndjson: bool,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0/payload)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; every output is one document
    #[arg(long, alias = "jq-expr")]
    jq: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns or '-' for stdin
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug, Clone)]
struct GeneratorSettings {
    /// generator configuration (JSON): rules, enums, header, layout, syntax
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// namespace/package of the root class
    #[arg(long)]
    namespace: Option<String>,

    /// name of the class inferred from each top-level document
    #[arg(long)]
    root_class: Option<String>,

    /// syntax preset: java | csharp
    #[arg(long)]
    syntax: Option<String>,

    /// maximum line width before wrapping
    #[arg(long)]
    max_width: Option<usize>,

    /// spaces per indentation level
    #[arg(long)]
    indent_width: Option<usize>,
}

#[derive(clap::Parser, Debug)]
struct GenerateOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator_settings: GeneratorSettings,

    /// output directory (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct InspectOut {
    #[command(flatten)]
    input_settings: InputSettings,

    #[command(flatten)]
    generator_settings: GeneratorSettings,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_process(&self, mut apply: impl FnMut(Value)) -> json_classgen::Result<()> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        for source_path in source_paths {
            let source = read_source(&source_path)?;
            debug!(path = %source_path.display(), bytes = source.len(), "read input");
            let documents = if self.ndjson {
                source
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(serde_json::from_str::<Value>)
                    .collect::<Result<Vec<_>, _>>()?
            } else {
                vec![serde_json::from_str::<Value>(&source)?]
            };
            for document in documents {
                let Some(document) = self.select(document) else {
                    debug!(path = %source_path.display(), "json pointer matched nothing; document skipped");
                    continue;
                };
                match self.jq.as_ref() {
                    None => apply(document),
                    Some(jq) => {
                        for output in json_classgen::jq_exec::run_jaq(jq, &document)? {
                            apply(output);
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn select(&self, mut document: Value) -> Option<Value> {
        match self.json_pointer.as_deref() {
            None => Some(document),
            Some(pointer) => document.pointer_mut(pointer).map(Value::take),
        }
    }
}

impl GeneratorSettings {
    /// Config file (if any) with command-line overrides applied.
    fn resolve(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::load(path)
                .with_context(|| format!("loading configuration {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        if let Some(ns) = &self.namespace {
            config.root_namespace = ns.clone();
        }
        if let Some(root) = &self.root_class {
            config.root_class = root.clone();
        }
        if let Some(syntax) = &self.syntax {
            config.syntax = json_classgen::config::SyntaxChoice::Preset(syntax.clone());
        }
        if let Some(width) = self.max_width {
            config.format.max_width = width;
        }
        if let Some(indent) = self.indent_width {
            config.format = LayoutFormatter::with_indent_width(indent, config.format.max_width);
        }
        Ok(config)
    }

    fn generator(&self) -> anyhow::Result<Generator> {
        let config = self.resolve()?;
        let syntax = config.syntax.resolve()?;
        let mut generator = Generator::new(&config.root_namespace, &config.root_class, syntax)
            .with_formatter(config.format.clone())
            .with_rules(config.rule_set())
            .with_file_header(config.file_header_now())
            .with_class_comment(config.class_comment.clone());
        for (namespace, name, constants) in config.enum_declarations() {
            generator.graph_mut().add_enum(&namespace, &name, constants);
        }
        Ok(generator)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn init_tracing(&self) {
        let default = if self.verbose { "debug" } else { "warn" };
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Generate(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                // 1) build state
                let mut generator = target.generator_settings.generator()?;
                target.input_settings.load_process(|value| generator.observe(&value))?;

                // 2) rules, render, write
                match target.out.as_ref() {
                    Some(out) => {
                        let mut sink = FsSink::new(out, generator.syntax().file_extension.clone());
                        let written = generator.generate(&mut sink)?;
                        eprintln!(
                            "{} {written} class file(s) under {}",
                            "generated".green().bold(),
                            out.display()
                        );
                    }
                    None => {
                        let mut sink = MemorySink::new();
                        generator.generate(&mut sink)?;
                        let comment = &generator.syntax().line_comment;
                        for class in &sink.classes {
                            println!("{comment} ---- {}.{} ----", class.namespace, class.class_name);
                            print!("{}", class.body);
                        }
                    }
                }
            }
            Command::Inspect(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }

                // 1) build state
                let mut generator = target.generator_settings.generator()?;
                target.input_settings.load_process(|value| generator.observe(&value))?;

                // 2) rules & describe
                let description = describe_graph(generator.finish());
                let description_src = serde_json::to_string_pretty(&description)?;
                if let Some(out) = target.out.as_ref() {
                    if let Some(parent) = out.parent() {
                        std::fs::create_dir_all(parent).map_err(|e| Error::Io { path: parent.to_path_buf(), source: e })?;
                    }
                    std::fs::write(out, &description_src).map_err(|e| Error::Io { path: out.clone(), source: e })?;
                    eprintln!("{} {}", "wrote".green().bold(), out.display());
                } else {
                    println!("{description_src}");
                }
            }
        }
        Ok(())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn read_source(path: &Path) -> json_classgen::Result<String> {
    let io_error = |source| Error::Io { path: path.to_path_buf(), source };
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf).map_err(io_error)?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(io_error)
}

fn resolve_file_path_patterns<I>(patterns: I) -> json_classgen::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();
        let pattern_error = |message: String| Error::InputPattern { pattern: pattern.to_string(), message };

        if has_glob_chars(pattern) {
            // Treat as a glob pattern
            let mut matched_any = false;
            let entries = glob::glob(pattern).map_err(|e| pattern_error(e.to_string()))?;
            for entry in entries {
                let p = entry.map_err(|e| pattern_error(e.to_string()))?;
                matched_any = true;
                out.push(p);
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                return Err(pattern_error("glob pattern matched no files".into()));
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
