//! Element properties.
//!
//! Property names keep their authoring spelling (`className`, `onClick`,
//! `backgroundColor` inside styles); the rendering rules live here so that the
//! initial markup and incremental updates agree on them:
//! - `key` is never rendered.
//! - `on<Capitalized>` names are delegated events keyed by the lowercased rest.
//! - `className` renders as `class`.
//! - `style` renders as `kebab-name:value` declarations joined with `;`.
//! - `Bool(true)` renders as an empty attribute, `Bool(false)` is omitted.

use crate::element::Child;
use crate::event::EventHandler;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub enum PropValue {
    Text(Arc<str>),
    Number(f64),
    Bool(bool),
    Style(Vec<(Arc<str>, Arc<str>)>),
    Handler(EventHandler),
}

impl PropValue {
    /// Attribute text this value renders as; `None` means "no attribute".
    pub fn attribute_value(&self) -> Option<String> {
        match self {
            PropValue::Text(text) => Some(text.to_string()),
            PropValue::Number(n) => Some(format_number(*n)),
            PropValue::Bool(true) => Some(String::new()),
            PropValue::Bool(false) => None,
            PropValue::Style(declarations) => Some(style_text(declarations)),
            PropValue::Handler(_) => None,
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(handler) => Some(handler),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Text(a), PropValue::Text(b)) => a == b,
            (PropValue::Number(a), PropValue::Number(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Style(a), PropValue::Style(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::Text(Arc::from(value))
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::Text(Arc::from(value))
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        PropValue::Number(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<i32> for PropValue {
    fn from(value: i32) -> Self {
        PropValue::Number(value as f64)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<EventHandler> for PropValue {
    fn from(value: EventHandler) -> Self {
        PropValue::Handler(value)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Props {
    key: Option<Arc<str>>,
    entries: Vec<(Arc<str>, PropValue)>,
    children: Vec<Child>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter. A `key` entry sets the reconciliation key instead
    /// of a rendered property; re-setting a name replaces its value in place.
    pub fn with(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.set(name, value.into());
        self
    }

    pub fn key(mut self, key: impl Into<Arc<str>>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn class_name(self, class: &str) -> Self {
        self.with("className", class)
    }

    pub fn style<N, V>(self, declarations: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<Arc<str>>,
        V: Into<Arc<str>>,
    {
        let declarations = declarations
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect();
        self.with("style", PropValue::Style(declarations))
    }

    /// Registers `handler` under an `on<Event>` property name.
    pub fn on(self, name: &str, handler: EventHandler) -> Self {
        debug_assert!(event_name(name).is_some(), "event props are on<Capitalized>");
        self.with(name, handler)
    }

    fn set(&mut self, name: &str, value: PropValue) {
        if name == "key" {
            self.key = value.attribute_value().map(Arc::from);
            return;
        }
        if value.as_handler().is_some() && event_name(name).is_none() {
            log::warn!(target: "vdom.props", "handler under non-event prop {name:?} is never bound");
        }
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| &**n == name) {
            slot.1 = value;
        } else {
            self.entries.push((Arc::from(name), value));
        }
    }

    pub fn key_value(&self) -> Option<&Arc<str>> {
        self.key.as_ref()
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.entries
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.entries.iter().map(|(name, value)| (&**name, value))
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub(crate) fn set_children(&mut self, children: Vec<Child>) {
        self.children = children;
    }
}

/// `onClick` → `click`. Anything not shaped `on<Capitalized>` is not an event.
pub fn event_name(prop: &str) -> Option<String> {
    let rest = prop.strip_prefix("on")?;
    if !rest.starts_with(|c: char| c.is_ascii_uppercase()) {
        return None;
    }
    Some(rest.to_ascii_lowercase())
}

/// Rendered attribute name for a non-event property.
pub fn attribute_name(prop: &str) -> &str {
    match prop {
        "className" => "class",
        other => other,
    }
}

pub fn style_text(declarations: &[(Arc<str>, Arc<str>)]) -> String {
    let mut out = String::new();
    for (i, (name, value)) in declarations.iter().enumerate() {
        if i != 0 {
            out.push(';');
        }
        out.push_str(&kebab_case(name));
        out.push(':');
        out.push_str(value);
    }
    out
}

/// `backgroundColor` → `background-color`. Names already in kebab case pass through.
pub fn kebab_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Numbers render the way a JS engine prints them: integral values drop the fraction.
pub fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}
