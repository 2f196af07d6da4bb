//! Immutable element descriptions.

use crate::component::ComponentType;
use crate::props::{Props, format_number};
use std::rc::Rc;
use std::sync::Arc;

/// Reconciliation key: the explicit `key` prop, or the child's position.
///
/// Explicit and positional keys never compare equal, so `key: "1"` does not
/// match the unkeyed child at index 1.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Explicit(Arc<str>),
    Index(usize),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ElementType {
    Tag(Arc<str>),
    Component(ComponentType),
}

impl From<&str> for ElementType {
    fn from(tag: &str) -> Self {
        ElementType::Tag(Arc::from(tag))
    }
}

impl From<ComponentType> for ElementType {
    fn from(ty: ComponentType) -> Self {
        ElementType::Component(ty)
    }
}

/// Shared, immutable element. Cloning is a reference-count bump.
#[derive(Clone, Debug)]
pub struct Element(Rc<ElementData>);

#[derive(Debug)]
struct ElementData {
    ty: ElementType,
    props: Props,
}

impl Element {
    pub fn ty(&self) -> &ElementType {
        &self.0.ty
    }

    pub fn props(&self) -> &Props {
        &self.0.props
    }

    pub fn children(&self) -> &[Child] {
        self.0.props.children()
    }

    pub fn key(&self) -> Option<&Arc<str>> {
        self.0.props.key_value()
    }

    pub fn tag(&self) -> Option<&str> {
        match &self.0.ty {
            ElementType::Tag(tag) => Some(tag),
            ElementType::Component(_) => None,
        }
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// One entry of a children list: a primitive or a nested element.
#[derive(Clone, Debug)]
pub enum Child {
    Text(Arc<str>),
    Number(f64),
    Element(Element),
}

impl Child {
    /// `props.key ?? index`.
    pub fn resolve_key(&self, index: usize) -> Key {
        match self {
            Child::Element(element) => match element.key() {
                Some(key) => Key::Explicit(Arc::clone(key)),
                None => Key::Index(index),
            },
            Child::Text(_) | Child::Number(_) => Key::Index(index),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Child::Text(_) | Child::Number(_))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Child::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text content of a primitive child.
    pub fn primitive_text(&self) -> Option<String> {
        match self {
            Child::Text(text) => Some(text.to_string()),
            Child::Number(n) => Some(format_number(*n)),
            Child::Element(_) => None,
        }
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Child::Text(Arc::from(text))
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Child::Text(Arc::from(text))
    }
}

impl From<f64> for Child {
    fn from(n: f64) -> Self {
        Child::Number(n)
    }
}

impl From<i64> for Child {
    fn from(n: i64) -> Self {
        Child::Number(n as f64)
    }
}

impl From<i32> for Child {
    fn from(n: i32) -> Self {
        Child::Number(n as f64)
    }
}

impl From<Element> for Child {
    fn from(element: Element) -> Self {
        Child::Element(element)
    }
}

/// Builds an element; `children` are normalized into `props.children`.
pub fn create_element(
    ty: impl Into<ElementType>,
    mut props: Props,
    children: impl IntoIterator<Item = Child>,
) -> Element {
    props.set_children(children.into_iter().collect());
    Element(Rc::new(ElementData {
        ty: ty.into(),
        props,
    }))
}
