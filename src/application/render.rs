//! Serialization of built documents to text.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use termtree::Tree;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Content, Document, Node};

/// Output options for [`XmlRenderer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub xml_declaration: bool,
    pub pretty: bool,
    pub indent: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            xml_declaration: true,
            pretty: false,
            indent: 2,
        }
    }
}

/// Turns a finished document into text.
pub trait Renderer: Send + Sync {
    fn render(&self, document: &Document) -> ApplicationResult<String>;
}

#[derive(Debug, Clone, Default)]
pub struct XmlRenderer {
    options: RenderOptions,
}

impl XmlRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, node: &Node) -> ApplicationResult<()> {
        let mut start = BytesStart::new(node.name());
        for (key, value) in node.attributes().iter() {
            ensure_xml_chars(node.name(), value)?;
            start.push_attribute((key, value));
        }

        match node.content() {
            Content::Text(text) => {
                ensure_xml_chars(node.name(), text)?;
                write_event(writer, Event::Start(start))?;
                write_event(writer, Event::Text(BytesText::new(text)))?;
                write_event(writer, Event::End(BytesEnd::new(node.name())))
            }
            Content::Children(children) if children.is_empty() => {
                write_event(writer, Event::Empty(start))
            }
            Content::Children(children) => {
                write_event(writer, Event::Start(start))?;
                for child in children {
                    self.write_node(writer, child)?;
                }
                write_event(writer, Event::End(BytesEnd::new(node.name())))
            }
        }
    }
}

impl Renderer for XmlRenderer {
    fn render(&self, document: &Document) -> ApplicationResult<String> {
        let mut writer = if self.options.pretty {
            Writer::new_with_indent(Vec::new(), b' ', self.options.indent)
        } else {
            Writer::new(Vec::new())
        };

        if self.options.xml_declaration {
            write_event(
                &mut writer,
                Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
            )?;
        }
        self.write_node(&mut writer, document.root())?;

        String::from_utf8(writer.into_inner()).map_err(|e| ApplicationError::Render {
            message: e.to_string(),
        })
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> ApplicationResult<()> {
    writer
        .write_event(event)
        .map_err(|e| ApplicationError::Render {
            message: e.to_string(),
        })
}

/// XML 1.0 `Char`: no control characters except tab, newline and carriage return.
fn ensure_xml_chars(node: &str, value: &str) -> ApplicationResult<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(ApplicationError::Render {
            message: format!(
                "value of <{node}> contains U+{:04X}, which XML 1.0 does not allow",
                c as u32
            ),
        }),
        None => Ok(()),
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r')
        || ('\u{20}'..='\u{D7FF}').contains(&c)
        || ('\u{E000}'..='\u{FFFD}').contains(&c)
        || c >= '\u{10000}'
}

/// Human-readable outline of a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeRenderer;

impl TreeRenderer {
    fn to_tree(node: &Node) -> Tree<String> {
        let mut label = node.name().to_string();
        if !node.attributes().is_empty() {
            label = format!("{label} [{}]", node.attributes());
        }
        if let Some(text) = node.text() {
            label = format!("{label} = {text:?}");
        }
        Tree::new(label).with_leaves(node.children().iter().map(Self::to_tree))
    }
}

impl Renderer for TreeRenderer {
    fn render(&self, document: &Document) -> ApplicationResult<String> {
        Ok(Self::to_tree(document.root()).to_string())
    }
}
