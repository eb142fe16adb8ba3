//! JSON view of a class graph, printed by `inspect`.
use serde_json::{json, Map, Value};

use crate::model::{ClassKind, ClassModel, ClassModelGraph, FieldModel};

pub fn describe_graph(graph: &ClassModelGraph) -> Value {
    let classes: Vec<Value> = graph.classes().map(|c| describe_class(graph, c)).collect();
    json!({ "classes": classes })
}

pub fn describe_class(graph: &ClassModelGraph, class: &ClassModel) -> Value {
    let mut o = json!({
        "name": class.name(),
        "namespace": class.namespace(),
        "generate": class.generate_output(),
    });
    if let Some(base) = class.base() {
        o["base"] = Value::from(base);
    }
    match class.kind() {
        ClassKind::Class { fields } => {
            let fields: Vec<Value> = fields
                .values()
                .map(|f| {
                    let mut d = describe_field(f);
                    if graph.is_inherited(class.name(), f.json_name()) {
                        d["shadows_inherited"] = Value::Bool(true);
                    }
                    d
                })
                .collect();
            o["fields"] = Value::Array(fields);
        }
        ClassKind::Enum { constants } => {
            let values: Vec<Value> = constants
                .iter()
                .map(|c| {
                    let mut m = Map::new();
                    m.insert("name".into(), Value::from(c.name.as_str()));
                    if let Some(json) = &c.json {
                        m.insert("json".into(), Value::from(json.as_str()));
                    }
                    Value::Object(m)
                })
                .collect();
            o["enum"] = Value::Array(values);
        }
    }
    o
}

fn describe_field(f: &FieldModel) -> Value {
    json!({
        "json_name": f.json_name(),
        "name": f.name(),
        "type": f.type_ref().name(),
        "array": f.is_array(),
        "observations": f.observed().len(),
        "mapped": f.is_type_mapped(),
        "renamed": f.is_renamed(),
        "upper_case_wire_name": f.has_upper_case_wire_name(),
        "annotated": f.needs_serialized_name(),
    })
}
