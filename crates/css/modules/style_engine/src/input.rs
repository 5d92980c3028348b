//! Style requests as emitted by module render callbacks.

use anyhow::{Result, bail};
use log::{trace, warn};
use serde::Deserialize;
use serde_json::Value;

use crate::context::{StyleGroup, StyleKey};

/// One `{selector, declaration, atRules}` item.
///
/// An empty `selector` marks free-form CSS: `declaration` then holds complete rules.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StyleDeclaration {
    pub selector: String,
    pub declaration: String,
    /// Breakpoint name, verbatim media query, or empty for the general bucket.
    #[serde(rename = "atRules")]
    pub at_rules: String,
}

impl StyleDeclaration {
    /// A general-bucket declaration block for `selector`.
    pub fn new(selector: impl Into<String>, declaration: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            declaration: declaration.into(),
            at_rules: String::new(),
        }
    }

    /// A free-form block of complete CSS rules.
    pub fn free_form(css: impl Into<String>) -> Self {
        Self::new(String::new(), css)
    }

    /// Move this item into another media bucket.
    #[must_use]
    pub fn at_rules(mut self, at_rules: impl Into<String>) -> Self {
        self.at_rules = at_rules.into();
        self
    }

    /// Whether this item carries complete rules instead of a declaration block.
    #[inline]
    pub fn is_free_form(&self) -> bool {
        self.selector.is_empty()
    }
}

/// Arguments of one [`crate::StyleRegistry::add`] call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleArgs {
    /// Id of the emitting module, used for the ancestor lookup.
    pub id: String,
    /// Position of the module among its siblings.
    pub order_index: u32,
    /// Block-tree instance the module belongs to.
    pub store_instance: Option<u32>,
    /// Flattened style items in emission order.
    pub styles: Vec<StyleDeclaration>,
    /// Explicit base priority.
    pub priority: Option<i64>,
    /// Base priority of the preset being emitted.
    pub preset_priority: Option<i64>,
    /// Target group; defaults to the registry's current group.
    pub group: Option<StyleGroup>,
    /// Target partition; defaults to the registry's current style key.
    pub key: Option<StyleKey>,
}

impl StyleArgs {
    /// A request for module `id` with no styles and default ordering.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Set the sibling position.
    #[must_use]
    pub fn order_index(mut self, order_index: u32) -> Self {
        self.order_index = order_index;
        self
    }

    /// Set the block-tree instance.
    #[must_use]
    pub fn store_instance(mut self, store_instance: u32) -> Self {
        self.store_instance = Some(store_instance);
        self
    }

    /// Append one style item.
    #[must_use]
    pub fn style(mut self, item: StyleDeclaration) -> Self {
        self.styles.push(item);
        self
    }

    /// Append style items in order.
    #[must_use]
    pub fn styles(mut self, items: impl IntoIterator<Item = StyleDeclaration>) -> Self {
        self.styles.extend(items);
        self
    }

    /// Set the explicit base priority.
    #[must_use]
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the preset base priority, used when no explicit priority is given.
    #[must_use]
    pub fn preset_priority(mut self, priority: i64) -> Self {
        self.preset_priority = Some(priority);
        self
    }

    /// Target a specific group.
    #[must_use]
    pub fn group(mut self, group: StyleGroup) -> Self {
        self.group = Some(group);
        self
    }

    /// Target a specific partition.
    #[must_use]
    pub fn key(mut self, key: StyleKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Decode an editor-shaped request:
    /// `{id, orderIndex, storeInstance, styles, priority, presetPriority, group}`.
    ///
    /// `styles` may nest arrays and objects to any depth; every object carrying a
    /// `declaration` is one item, everything else is dropped. A string `styles` value is a
    /// caller bug: it is reported and treated as no styles.
    ///
    /// # Errors
    /// Returns an error if `value` is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self> {
        let Value::Object(ref fields) = *value else {
            bail!("style request must be a JSON object, got {}", kind_of(value));
        };
        let id = match fields.get("id") {
            Some(&Value::String(ref id)) => id.clone(),
            Some(&Value::Number(ref id)) => id.to_string(),
            _ => String::new(),
        };
        let mut styles = Vec::new();
        match fields.get("styles") {
            Some(&Value::String(_)) => {
                warn!("style request for module {id:?}: `styles` must be an array, not a string");
            }
            Some(nested) => collect_declarations(nested, &mut styles),
            None => {}
        }
        Ok(Self {
            order_index: fields
                .get("orderIndex")
                .and_then(integer_of)
                .and_then(|index| u32::try_from(index).ok())
                .unwrap_or(0),
            store_instance: fields
                .get("storeInstance")
                .and_then(integer_of)
                .and_then(|instance| u32::try_from(instance).ok()),
            styles,
            priority: fields.get("priority").and_then(integer_of),
            preset_priority: fields.get("presetPriority").and_then(integer_of),
            group: fields
                .get("group")
                .and_then(Value::as_str)
                .filter(|group| !group.is_empty())
                .map(StyleGroup::from_name),
            key: None,
            id,
        })
    }
}

/// Walk a nested `styles` value and push every declaration item in document order.
fn collect_declarations(value: &Value, out: &mut Vec<StyleDeclaration>) {
    match *value {
        Value::Object(ref fields) if fields.contains_key("declaration") => {
            match StyleDeclaration::deserialize(value) {
                Ok(item) => out.push(item),
                Err(error) => trace!("dropping malformed style item: {error}"),
            }
        }
        Value::Object(ref fields) => {
            for child in fields.values() {
                collect_declarations(child, out);
            }
        }
        Value::Array(ref items) => {
            for child in items {
                collect_declarations(child, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Integer from a JSON number or numeric string.
fn integer_of(value: &Value) -> Option<i64> {
    match *value {
        Value::Number(ref number) => number.as_i64(),
        Value::String(ref text) => text.trim().parse().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match *value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
