//! Minimal HTML template parser.
//!
//! Understands the subset of markup that widget templates use: nested
//! elements, quoted/unquoted/bare attributes, self-closing and void tags,
//! comments, text and the common character entities. Whitespace-only text
//! between tags is dropped and text runs are trimmed.

use crate::element::Element;
use crate::error::{DomError, Result};

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

/// Parse a template into its top-level elements.
pub fn parse(template: &str) -> Result<Vec<Element>> {
    let mut parser = Parser {
        src: template,
        pos: 0,
    };
    let roots = parser.parse_nodes(None)?;
    log::trace!("template::parse roots={}", roots.len());
    Ok(roots)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn parse_nodes(&mut self, open: Option<&str>) -> Result<Vec<Element>> {
        let mut nodes = Vec::new();

        loop {
            let rest = self.rest();

            if rest.is_empty() {
                return match open {
                    Some(tag) => Err(DomError::UnclosedTag { tag: tag.into() }),
                    None => Ok(nodes),
                };
            }

            if rest.starts_with("<!--") {
                let end = rest
                    .find("-->")
                    .ok_or(DomError::MalformedTag { offset: self.pos })?;
                self.pos += end + 3;
                continue;
            }

            if rest.starts_with("</") {
                let start = self.pos;
                let end = rest
                    .find('>')
                    .ok_or(DomError::MalformedTag { offset: start })?;
                let found = rest[2..end].trim().to_ascii_lowercase();
                self.pos += end + 1;

                return match open {
                    Some(tag) if tag == found => Ok(nodes),
                    Some(tag) => Err(DomError::MismatchedTag {
                        expected: tag.into(),
                        found,
                    }),
                    // Stray closing tag at the top level
                    None => Err(DomError::MalformedTag { offset: start }),
                };
            }

            if rest.starts_with('<') {
                nodes.push(self.parse_element()?);
                continue;
            }

            let end = rest.find('<').unwrap_or(rest.len());
            let text = decode_entities(&rest[..end]);
            self.pos += end;

            let trimmed = text.trim();
            if !trimmed.is_empty() {
                nodes.push(Element::text(trimmed));
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        let start = self.pos;
        self.pos += 1;

        let name = self.take_while(|c| c.is_ascii_alphanumeric() || c == '-');
        if name.is_empty() {
            return Err(DomError::MalformedTag { offset: start });
        }
        let mut element = Element::new(name);

        loop {
            self.skip_whitespace();
            let rest = self.rest();

            if rest.starts_with("/>") {
                self.pos += 2;
                return Ok(element);
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }

            let attr = self.take_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/');
            if attr.is_empty() {
                return Err(DomError::MalformedTag { offset: start });
            }

            self.skip_whitespace();
            let value = if self.rest().starts_with('=') {
                self.pos += 1;
                self.skip_whitespace();
                self.parse_attr_value(start)?
            } else {
                String::new()
            };
            element = element.attr(attr.to_ascii_lowercase(), value);
        }

        if VOID_TAGS.contains(&element.tag.as_str()) {
            return Ok(element);
        }

        let tag = element.tag.clone();
        let children = self.parse_nodes(Some(&tag))?;
        Ok(element.children(children))
    }

    fn parse_attr_value(&mut self, start: usize) -> Result<String> {
        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let end = rest[1..]
                    .find(quote)
                    .ok_or(DomError::MalformedTag { offset: start })?;
                let value = decode_entities(&rest[1..1 + end]);
                self.pos += end + 2;
                Ok(value)
            }
            Some(_) => {
                let raw = self.take_while(|c| !c.is_whitespace() && c != '>');
                Ok(decode_entities(raw))
            }
            None => Err(DomError::MalformedTag { offset: start }),
        }
    }

    fn take_while(&mut self, f: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, c)| !f(*c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn skip_whitespace(&mut self) {
        self.take_while(char::is_whitespace);
    }
}

fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
