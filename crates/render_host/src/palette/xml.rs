//! Streaming XML pull reader
//!
//! A minimal pull parser for the palette document format: elements,
//! attributes, text, comments, and XML declarations. It makes no attempt at
//! full XML conformance (no entities, no namespaces, no CDATA); the palette
//! schema needs none of that.

use thiserror::Error;

/// Malformed markup encountered while reading a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed markup at byte {offset}: {message}")]
pub struct MarkupError {
    /// Byte offset into the source where the problem was detected
    pub offset: usize,
    /// What went wrong
    pub message: String,
}

/// One element attribute, `name="value"`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Attribute value with surrounding quotes removed
    pub value: String,
}

/// One parsing event pulled from the document
#[derive(Debug, Clone, PartialEq)]
pub enum XmlEvent {
    /// An element opened. Self-closing elements produce a matching
    /// [`XmlEvent::EndTag`] on the next pull.
    StartTag {
        /// Element name
        name: String,
        /// Attributes in document order
        attributes: Vec<Attribute>,
    },
    /// An element closed
    EndTag {
        /// Element name
        name: String,
    },
    /// Non-whitespace character data, trimmed
    Text(String),
    /// End of the document
    Eof,
}

/// Pull reader over an in-memory document
pub struct XmlReader<'s> {
    src: &'s str,
    pos: usize,
    // End tag still owed for a self-closing element
    pending_end: Option<String>,
}

impl<'s> XmlReader<'s> {
    /// Create a reader over the given source text
    pub fn new(src: &'s str) -> Self {
        Self {
            src,
            pos: 0,
            pending_end: None,
        }
    }

    /// Pull the next event. Returns [`XmlEvent::Eof`] forever once the
    /// document is exhausted.
    pub fn next_event(&mut self) -> Result<XmlEvent, MarkupError> {
        if let Some(name) = self.pending_end.take() {
            return Ok(XmlEvent::EndTag { name });
        }

        loop {
            let text_start = self.pos;
            while matches!(self.peek(), Some(c) if c != '<') {
                self.advance();
            }
            let text = self.src[text_start..self.pos].trim();
            if !text.is_empty() {
                return Ok(XmlEvent::Text(text.to_string()));
            }

            if self.peek().is_none() {
                return Ok(XmlEvent::Eof);
            }

            if self.starts_with("<!--") {
                self.skip_past("-->", "unterminated comment")?;
            } else if self.starts_with("<?") {
                self.skip_past("?>", "unterminated processing instruction")?;
            } else if self.starts_with("<!") {
                self.skip_past(">", "unterminated declaration")?;
            } else if self.starts_with("</") {
                return self.read_end_tag();
            } else {
                return self.read_start_tag();
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.src[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.src[self.pos..].starts_with(pat)
    }

    fn error(&self, message: impl Into<String>) -> MarkupError {
        MarkupError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn skip_past(&mut self, terminator: &str, message: &str) -> Result<(), MarkupError> {
        match self.src[self.pos..].find(terminator) {
            Some(index) => {
                self.pos += index + terminator.len();
                Ok(())
            }
            None => Err(self.error(message)),
        }
    }

    fn read_name(&mut self) -> Result<String, MarkupError> {
        let start = self.pos;
        while matches!(
            self.peek(),
            Some(c) if c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
        ) {
            self.advance();
        }
        if self.pos == start {
            return Err(self.error("expected a name"));
        }
        Ok(self.src[start..self.pos].to_string())
    }

    fn read_start_tag(&mut self) -> Result<XmlEvent, MarkupError> {
        self.advance(); // consume `<`
        let name = self.read_name()?;
        let mut attributes = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(self.error(format!("unterminated <{name}> tag"))),
                Some('>') => {
                    self.advance();
                    return Ok(XmlEvent::StartTag { name, attributes });
                }
                Some('/') => {
                    self.advance();
                    if self.peek() != Some('>') {
                        return Err(self.error("expected `>` after `/`"));
                    }
                    self.advance();
                    self.pending_end = Some(name.clone());
                    return Ok(XmlEvent::StartTag { name, attributes });
                }
                Some(_) => attributes.push(self.read_attribute()?),
            }
        }
    }

    fn read_attribute(&mut self) -> Result<Attribute, MarkupError> {
        let name = self.read_name()?;
        self.skip_whitespace();
        if self.peek() != Some('=') {
            return Err(self.error(format!("attribute {name:?} missing `=`")));
        }
        self.advance();
        self.skip_whitespace();
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error(format!("attribute {name:?} value must be quoted"))),
        };
        self.advance();
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c != quote) {
            self.advance();
        }
        if self.peek().is_none() {
            return Err(self.error(format!("unterminated value for attribute {name:?}")));
        }
        let value = self.src[start..self.pos].to_string();
        self.advance(); // consume closing quote
        Ok(Attribute { name, value })
    }

    fn read_end_tag(&mut self) -> Result<XmlEvent, MarkupError> {
        self.advance();
        self.advance(); // consume `</`
        let name = self.read_name()?;
        self.skip_whitespace();
        if self.peek() != Some('>') {
            return Err(self.error(format!("unterminated </{name}> tag")));
        }
        self.advance();
        Ok(XmlEvent::EndTag { name })
    }
}
