//! The class graph: nodes inferred from JSON documents and the edits applied
//! to them before rendering.
//!
//! ```text
//! JSON ──build──▶ ClassModelGraph ──apply_rules──▶ ClassModelGraph ──▶ codegen
//!                  └─ ClassModel ─ FieldModel (observations)
//! ```
mod class;
mod field;
mod graph;

pub use class::{ClassId, ClassKind, ClassModel, EnumConstant};
pub use field::FieldModel;
pub use graph::{Builtins, ClassModelGraph};
