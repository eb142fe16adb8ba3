//! Infer a class model from sample JSON documents and render it as flat
//! data-holder classes (fields, constructor, accessors).
//!
//! ```no_run
//! use json_classgen::{Generator, Syntax, TransformRuleSet};
//! use json_classgen::output::FsSink;
//!
//! let mut generator = Generator::new("com.example", "Item", Syntax::java())
//!     .with_rules(TransformRuleSet::new().rename_type("Tags", "String"));
//! generator.observe(&serde_json::json!({"Id": 5, "Tags": ["a", "b"]}));
//! generator.generate(&mut FsSink::new("generated", "java"))?;
//! # Ok::<(), json_classgen::Error>(())
//! ```
pub mod codegen;
pub mod config;
pub mod describe;
pub mod error;
pub mod format;
pub mod generator;
pub mod inference;
pub mod ir;
pub mod jq_exec;
pub mod lower;
pub mod model;
pub mod naming;
pub mod output;
pub mod rules;

pub use codegen::syntax::Syntax;
pub use error::{Error, Result};
pub use format::LayoutFormatter;
pub use generator::Generator;
pub use model::{ClassModel, ClassModelGraph, FieldModel};
pub use rules::TransformRuleSet;
