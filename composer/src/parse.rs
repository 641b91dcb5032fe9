//! MJML import: a small recursive-descent reader for MJML documents.
//!
//! Accepts a full `<mjml>` document or a bare `<mj-body>`. `<mj-head>` is
//! skipped. Content-bearing kinds and unknown tags keep their inner markup as
//! an opaque payload; every other element is read as nested components.

#[cfg(test)]
#[path = "parse_test.rs"]
mod parse_test;

use crate::doc::{Attributes, ComponentDef, ComponentTree, is_name_char};
use crate::kind::{ComponentKind, Tag};

/// Deepest element nesting accepted on import. The tallest valid email
/// (`mjml > mj-body > mj-wrapper > mj-section > mj-group > mj-column > leaf`)
/// is far below this.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Error returned by [`parse`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("expected {expected} at offset {offset}")]
    Expected { expected: &'static str, offset: usize },
    #[error("closing tag </{close}> does not match <{open}>")]
    MismatchedClose { open: String, close: String },
    #[error("unexpected text at offset {offset}")]
    UnexpectedText { offset: usize },
    #[error("document has no <mj-body>")]
    MissingBody,
    #[error("elements nested deeper than {max} levels at offset {offset}", max = MAX_NESTING_DEPTH)]
    TooDeep { offset: usize },
}

/// Parse MJML markup into a document tree.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first malformed construct.
pub fn parse(input: &str) -> Result<ComponentTree, ParseError> {
    let body = parse_body(input)?;
    Ok(ComponentTree::from_def(&body))
}

/// Parse MJML markup and return the `mj-body` definition.
///
/// # Errors
///
/// Returns a [`ParseError`] describing the first malformed construct.
pub fn parse_body(input: &str) -> Result<ComponentDef, ParseError> {
    let mut reader = Reader { src: input, pos: 0 };
    reader.skip_prolog();

    let root = reader.element(1)?;
    reader.skip_trivia();
    if reader.pos < reader.src.len() {
        return Err(ParseError::UnexpectedText { offset: reader.pos });
    }

    match root.tag {
        Tag::Known(ComponentKind::Body) => Ok(root),
        Tag::Other(ref name) if name == "mjml" => root
            .components
            .into_iter()
            .find(|c| c.tag == Tag::Known(ComponentKind::Body))
            .ok_or(ParseError::MissingBody),
        _ => Err(ParseError::MissingBody),
    }
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl Reader<'_> {
    fn rest(&self) -> &str {
        &self.src[self.pos..]
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.src.len() - trimmed.len();
    }

    /// Skip whitespace and comments between elements.
    fn skip_trivia(&mut self) {
        loop {
            self.skip_ws();
            if self.rest().starts_with("<!--") {
                match self.rest().find("-->") {
                    Some(end) => self.pos += end + 3,
                    None => self.pos = self.src.len(),
                }
            } else {
                return;
            }
        }
    }

    fn skip_prolog(&mut self) {
        self.skip_trivia();
        if self.rest().starts_with("<?") {
            if let Some(end) = self.rest().find("?>") {
                self.pos += end + 2;
            }
        }
        self.skip_trivia();
    }

    fn eat(&mut self, token: &'static str) -> Result<(), ParseError> {
        if self.rest().starts_with(token) {
            self.pos += token.len();
            Ok(())
        } else if self.rest().is_empty() {
            Err(ParseError::UnexpectedEof)
        } else {
            Err(ParseError::Expected { expected: token, offset: self.pos })
        }
    }

    fn name(&mut self) -> Result<String, ParseError> {
        let len = self
            .rest()
            .find(|c: char| !is_name_char(c))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return Err(if self.rest().is_empty() {
                ParseError::UnexpectedEof
            } else {
                ParseError::Expected { expected: "tag name", offset: self.pos }
            });
        }
        let name = self.rest()[..len].to_owned();
        self.pos += len;
        Ok(name)
    }

    /// Read one element, including its subtree or payload. `depth` counts
    /// this element; the document root is 1.
    fn element(&mut self, depth: usize) -> Result<ComponentDef, ParseError> {
        if depth > MAX_NESTING_DEPTH {
            return Err(ParseError::TooDeep { offset: self.pos });
        }
        self.eat("<")?;
        let name = self.name()?;
        let attributes = self.attributes()?;
        let mut def = ComponentDef::new(Tag::from(name.as_str()));
        def.attributes = attributes;

        self.skip_ws();
        if self.rest().starts_with("/>") {
            self.pos += 2;
            return Ok(def);
        }
        self.eat(">")?;

        if name == "mj-head" {
            self.raw_until_close(&name)?;
            return Ok(def);
        }

        let opaque = match &def.tag {
            Tag::Known(kind) => kind.has_content(),
            Tag::Other(other) => other != "mjml",
        };
        if opaque {
            let content = self.raw_until_close(&name)?;
            if !content.is_empty() {
                def.content = Some(content);
            }
            return Ok(def);
        }

        loop {
            self.skip_trivia();
            if self.rest().starts_with("</") {
                self.pos += 2;
                let close = self.name()?;
                self.skip_ws();
                self.eat(">")?;
                if close != name {
                    return Err(ParseError::MismatchedClose { open: name, close });
                }
                return Ok(def);
            }
            if self.rest().is_empty() {
                return Err(ParseError::UnexpectedEof);
            }
            if !self.rest().starts_with('<') {
                return Err(ParseError::UnexpectedText { offset: self.pos });
            }
            let child = self.element(depth + 1)?;
            if child.tag.as_str() != "mj-head" {
                def.components.push(child);
            }
        }
    }

    fn attributes(&mut self) -> Result<Attributes, ParseError> {
        let mut attrs = Attributes::new();
        loop {
            self.skip_ws();
            if self.rest().starts_with('>') || self.rest().starts_with("/>") {
                return Ok(attrs);
            }
            let key = self.name()?;
            self.skip_ws();
            if !self.rest().starts_with('=') {
                // Bare attribute, e.g. `<mj-raw css-inline>`.
                attrs.insert(key, String::new());
                continue;
            }
            self.pos += 1;
            self.skip_ws();
            let quote = match self.rest().chars().next() {
                Some(q @ ('"' | '\'')) => q,
                Some(_) => return Err(ParseError::Expected { expected: "quoted attribute value", offset: self.pos }),
                None => return Err(ParseError::UnexpectedEof),
            };
            self.pos += 1;
            let end = self.rest().find(quote).ok_or(ParseError::UnexpectedEof)?;
            let value = unescape(&self.rest()[..end]);
            self.pos += end + 1;
            attrs.insert(key, value);
        }
    }

    /// Consume everything up to and including `</name>`, returning the inner text.
    fn raw_until_close(&mut self, name: &str) -> Result<String, ParseError> {
        let close = format!("</{name}");
        let end = self.rest().find(&close).ok_or(ParseError::UnexpectedEof)?;
        let inner = self.rest()[..end].to_owned();
        self.pos += end + close.len();
        self.skip_ws();
        self.eat(">")?;
        Ok(inner)
    }
}

fn unescape(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
