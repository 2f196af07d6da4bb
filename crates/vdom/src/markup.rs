//! Mount-time markup fragments.
//!
//! A `Markup` tree is what a unit produces when it is mounted and what INSERT
//! and REPLACE operations carry. Its `Display` output is the HTML
//! serialization used for initial mounts: every node carries its mount
//! identity in a `data-mount-id` attribute, and text units are wrapped in a
//! `span` so they stay addressable.

use crate::mount_id::MountId;
use memchr::{memchr, memchr3};
use std::fmt::{self, Write};
use std::sync::Arc;

pub const MOUNT_ATTRIBUTE: &str = "data-mount-id";

/// Tag used to serialize text units.
pub const TEXT_WRAPPER_TAG: &str = "span";

#[derive(Clone, Debug, PartialEq)]
pub enum Markup {
    Text {
        id: MountId,
        text: String,
    },
    Element {
        id: MountId,
        tag: Arc<str>,
        attributes: Vec<(Arc<str>, String)>,
        children: Vec<Markup>,
    },
}

impl Markup {
    pub fn id(&self) -> &MountId {
        match self {
            Markup::Text { id, .. } | Markup::Element { id, .. } => id,
        }
    }

    pub fn children(&self) -> &[Markup] {
        match self {
            Markup::Element { children, .. } => children,
            Markup::Text { .. } => &[],
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self {
            Markup::Element { attributes, .. } => attributes
                .iter()
                .find(|(n, _)| &**n == name)
                .map(|(_, v)| v.as_str()),
            Markup::Text { .. } => None,
        }
    }

    /// Concatenated text of this fragment.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    pub fn find(&self, target: &MountId) -> Option<&Markup> {
        if self.id() == target {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(target))
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(Markup::node_count)
            .sum::<usize>()
    }
}

fn collect_text(markup: &Markup, out: &mut String) {
    match markup {
        Markup::Text { text, .. } => out.push_str(text),
        Markup::Element { children, .. } => {
            for child in children {
                collect_text(child, out);
            }
        }
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Markup::Text { id, text } => {
                write!(f, "<{TEXT_WRAPPER_TAG} {MOUNT_ATTRIBUTE}=\"")?;
                write_escaped_attr(f, id.as_str())?;
                f.write_str("\">")?;
                write_escaped_text(f, text)?;
                write!(f, "</{TEXT_WRAPPER_TAG}>")
            }
            Markup::Element {
                id,
                tag,
                attributes,
                children,
            } => {
                write!(f, "<{tag} {MOUNT_ATTRIBUTE}=\"")?;
                write_escaped_attr(f, id.as_str())?;
                f.write_char('"')?;
                for (name, value) in attributes {
                    write!(f, " {name}=\"")?;
                    write_escaped_attr(f, value)?;
                    f.write_char('"')?;
                }
                f.write_char('>')?;
                for child in children {
                    fmt::Display::fmt(child, f)?;
                }
                write!(f, "</{tag}>")
            }
        }
    }
}

fn write_escaped_text<W: Write>(out: &mut W, text: &str) -> fmt::Result {
    if memchr3(b'&', b'<', b'>', text.as_bytes()).is_none() {
        return out.write_str(text);
    }
    for ch in text.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

fn write_escaped_attr<W: Write>(out: &mut W, value: &str) -> fmt::Result {
    let bytes = value.as_bytes();
    if memchr3(b'&', b'<', b'>', bytes).is_none() && memchr(b'"', bytes).is_none() {
        return out.write_str(value);
    }
    for ch in value.chars() {
        match ch {
            '&' => out.write_str("&amp;")?,
            '<' => out.write_str("&lt;")?,
            '>' => out.write_str("&gt;")?,
            '"' => out.write_str("&quot;")?,
            _ => out.write_char(ch)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn li(id: &str, text: &str) -> Markup {
        Markup::Element {
            id: MountId::from(id),
            tag: Arc::from("li"),
            attributes: vec![(Arc::from("class"), "item".to_string())],
            children: vec![Markup::Text {
                id: MountId::from(format!("{id}.0").as_str()),
                text: text.to_string(),
            }],
        }
    }

    #[test]
    fn serializes_with_mount_ids() {
        let html = li("0.$A", "A").to_string();
        assert_eq!(
            html,
            "<li data-mount-id=\"0.$A\" class=\"item\"><span data-mount-id=\"0.$A.0\">A</span></li>"
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let markup = Markup::Element {
            id: MountId::from("0"),
            tag: Arc::from("p"),
            attributes: vec![(Arc::from("title"), "a \"b\" & c".to_string())],
            children: vec![Markup::Text {
                id: MountId::from("0.0"),
                text: "<x> & y".to_string(),
            }],
        };
        assert_eq!(
            markup.to_string(),
            "<p data-mount-id=\"0\" title=\"a &quot;b&quot; &amp; c\"><span data-mount-id=\"0.0\">&lt;x&gt; &amp; y</span></p>"
        );
    }

    #[test]
    fn lookup_helpers() {
        let markup = li("0.1", "hi");
        assert_eq!(markup.node_count(), 2);
        assert_eq!(markup.text_content(), "hi");
        assert_eq!(markup.attribute("class"), Some("item"));
        assert!(markup.find(&MountId::from("0.1.0")).is_some());
        assert!(markup.find(&MountId::from("0.2")).is_none());
    }
}
