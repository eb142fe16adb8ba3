use super::{num, Observed};
use crate::ir::Primitive;

/// Minimal common type of a set of observed primitive values.
///
/// Lattice: `boolean` and the numeric chain `int ⊂ long ⊂ double` sit below
/// `string`; joining across the two branches (or with any non-boolean text)
/// lands on `string`. Joins are commutative, associative and idempotent, so
/// the result never depends on observation order and never narrows.
pub struct TypeLattice;

impl TypeLattice {
    /// Lattice point of one observation.
    pub fn classify(value: &Observed) -> Primitive {
        match value {
            Observed::Bool(_) => Primitive::Boolean,
            Observed::Whole(n) => num::classify_whole(*n),
            Observed::Fraction(_) => Primitive::Double,
            Observed::Text(s) if is_boolean_text(s) => Primitive::Boolean,
            Observed::Text(_) => Primitive::String,
        }
    }

    pub fn join(a: Primitive, b: Primitive) -> Primitive {
        if a == b {
            a
        } else if a.is_numeric() && b.is_numeric() {
            a.max(b)
        } else {
            Primitive::String
        }
    }

    /// Fold `values` into `current`. An empty set leaves `current` unchanged.
    pub fn infer<'a, I>(values: I, current: Option<Primitive>) -> Option<Primitive>
    where
        I: IntoIterator<Item = &'a Observed>,
    {
        let mut acc = current;
        for v in values {
            let ty = Self::classify(v);
            acc = Some(match acc {
                None => ty,
                Some(prev) => Self::join(prev, ty),
            });
            if acc == Some(Primitive::String) {
                break; // top
            }
        }
        acc
    }
}

fn is_boolean_text(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false")
}
