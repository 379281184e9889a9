//! Specs arriving as JSON.
//!
//! ```json
//! {
//!   "uid": "save",
//!   "dom": { "tag": "button", "classes": ["btn"], "innerHtml": "Save" },
//!   "components": ["a text child", { "dom": { "tag": "span" } }],
//!   "behaviours": { "toggling": { "toggleClass": "on" }, "disabling": null },
//!   "eventOrder": { "alloy.execute": ["disabling", "toggling"] }
//! }
//! ```
//!
//! Every level is validated with a closed schema before anything is built.
//! A `null` behaviour config means the behaviour is explicitly not
//! configured. Behaviours are configured in key order.

use std::collections::{BTreeMap, HashMap};

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::{AlloySpec, ComponentSpec, DomSpec};
use crate::behaviour::BehaviourRegistry;
use crate::error::Result;
use crate::schema::{
    any_value, arr_of, as_raw, defaulted_of, obj_of_only, option_of, required_of, set_of, string,
    ValueSchema,
};

/// Label on every error path of a decoded spec.
pub const SPEC_LABEL: &str = "component.spec";

pub fn dom_schema() -> ValueSchema {
    obj_of_only(vec![
        required_of("tag", string()),
        defaulted_of("classes", json!([]), arr_of(string())),
        defaulted_of("attributes", json!({}), set_of(string())),
        defaulted_of("styles", json!({}), set_of(string())),
        option_of("innerHtml", string()),
        option_of("value", string()),
    ])
}

pub fn spec_schema() -> ValueSchema {
    obj_of_only(vec![
        option_of("uid", string()),
        required_of("dom", dom_schema()),
        defaulted_of("components", json!([]), arr_of(any_value())),
        defaulted_of("behaviours", json!({}), set_of(any_value())),
        defaulted_of("eventOrder", json!({}), set_of(arr_of(string()))),
    ])
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDom {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    inner_html: Option<String>,
    value: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpec {
    uid: Option<String>,
    dom: RawDom,
    components: Vec<Value>,
    behaviours: Map<String, Value>,
    event_order: HashMap<String, Vec<String>>,
}

/// Decode a component spec. Children given as JSON strings become text
/// components.
pub fn decode_spec(registry: &BehaviourRegistry, raw: &Value) -> Result<ComponentSpec> {
    let validated = as_raw(SPEC_LABEL, &spec_schema(), raw)?;
    let spec: RawSpec = serde_json::from_value(validated)?;

    let mut behaviours = Vec::with_capacity(spec.behaviours.len());
    for (name, config) in &spec.behaviours {
        if config.is_null() {
            tracing::trace!(behaviour = %name, "behaviour explicitly not configured");
            continue;
        }
        behaviours.push(registry.decode(name, config)?);
    }

    let components = spec
        .components
        .iter()
        .map(|child| decode_child(registry, child))
        .collect::<Result<Vec<_>>>()?;

    Ok(ComponentSpec {
        uid: spec.uid,
        dom: DomSpec {
            tag: spec.dom.tag,
            classes: spec.dom.classes,
            attributes: spec.dom.attributes,
            styles: spec.dom.styles,
            inner_html: spec.dom.inner_html,
            value: spec.dom.value,
        },
        components,
        behaviours,
        event_order: spec.event_order,
        ..ComponentSpec::default()
    })
}

fn decode_child(registry: &BehaviourRegistry, raw: &Value) -> Result<AlloySpec> {
    match raw {
        Value::String(text) => Ok(AlloySpec::text(text.as_str())),
        other => decode_spec(registry, other).map(AlloySpec::from),
    }
}
