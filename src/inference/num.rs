use ordered_float::OrderedFloat;
use serde_json::Number;

use super::Observed;
use crate::ir::Primitive;

/// Read a JSON number as an observation. Floats with no fractional part
/// (`3.0`) are whole numbers: widening is decided by value, not by spelling.
pub fn observe_number(n: &Number) -> Observed {
    if let Some(i) = n.as_i64() {
        return Observed::Whole(i as i128);
    }
    if let Some(u) = n.as_u64() {
        return Observed::Whole(u as i128);
    }
    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Observed::Whole(f as i128)
    } else {
        Observed::Fraction(OrderedFloat(f))
    }
}

/// Narrowest numeric type holding a whole number.
pub fn classify_whole(n: i128) -> Primitive {
    if i32::try_from(n).is_ok() {
        Primitive::Int
    } else if i64::try_from(n).is_ok() {
        Primitive::Long
    } else {
        Primitive::Double
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, Primitive::Int)]
    #[test_case(2_147_483_647, Primitive::Int)]
    #[test_case(-2_147_483_648, Primitive::Int)]
    #[test_case(2_147_483_648, Primitive::Long)]
    #[test_case(4_000_000_000, Primitive::Long)]
    #[test_case(i64::MAX as i128 + 1, Primitive::Double)]
    fn whole_numbers_pick_the_narrowest_fit(n: i128, expected: Primitive) {
        assert_eq!(classify_whole(n), expected);
    }

    #[test]
    fn whole_valued_floats_count_as_whole() {
        let n = serde_json::Number::from_f64(3.0).unwrap();
        assert_eq!(observe_number(&n), Observed::Whole(3));
        let n = serde_json::Number::from_f64(1.5).unwrap();
        assert_eq!(observe_number(&n), Observed::Fraction(OrderedFloat(1.5)));
    }

    #[test]
    fn large_unsigned_values_stay_exact() {
        let n = serde_json::Number::from(u64::MAX);
        assert_eq!(observe_number(&n), Observed::Whole(u64::MAX as i128));
    }
}
