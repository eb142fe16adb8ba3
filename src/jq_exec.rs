//! Optional jq preprocessing of input documents (jaq).
use jaq_core::{compile::Undefined, load, Compiler, Ctx, RcIter};
use jaq_json::Val;
use serde_json::Value;

use crate::error::{Error, Result};

/// Run `filter_src` over `input`; every output of the filter becomes one
/// document.
pub fn run_jaq(filter_src: &str, input: &Value) -> Result<Vec<Value>> {
    let loader = load::Loader::new(jaq_std::defs().chain(jaq_json::defs()));
    let arena = load::Arena::default();
    let program = load::File { code: filter_src, path: () };

    let modules = loader
        .load(&arena, program)
        .map_err(format_parse_errors)?;

    let filter = Compiler::default()
        .with_funs(jaq_std::funs().chain(jaq_json::funs()))
        .compile(modules)
        .map_err(format_undefined_errors)?;

    let inputs = RcIter::new(core::iter::empty());
    let it = filter.run((Ctx::new([], &inputs), Val::from(input.clone())));

    let mut out = Vec::new();
    for item in it {
        let v = item.map_err(|e| Error::Jq { message: format!("{e:?}") })?;
        // Val: Display -> JSON text
        out.push(serde_json::from_str::<Value>(&v.to_string())?);
    }
    Ok(out)
}

fn format_parse_errors(errs: Vec<(load::File<&str, ()>, load::Error<&str>)>) -> Error {
    let mut message = String::new();
    for (file, err) in errs {
        message.push_str(&format!("parse error: {err:?} in `{}`\n", file.code));
    }
    Error::Jq { message }
}

fn format_undefined_errors(errs: Vec<(load::File<&str, ()>, Vec<(&str, Undefined)>)>) -> Error {
    let mut message = String::new();
    for (file, list) in errs {
        for (name, undef) in list {
            message.push_str(&format!("undefined `{name}`: {undef:?} in `{}`\n", file.code));
        }
    }
    Error::Jq { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn each_filter_output_is_a_document() {
        let out = run_jaq(".items[]", &json!({"items": [{"a": 1}, {"a": 2}]})).unwrap();
        assert_eq!(out, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn bad_filters_are_jq_errors() {
        assert!(matches!(run_jaq(".[", &json!({})), Err(Error::Jq { .. })));
        assert!(matches!(run_jaq("no_such_fn", &json!({})), Err(Error::Jq { .. })));
    }
}
