use super::types::{Token, TokenKind};
use crate::error::SearchError;

struct Tokenizer {
    input: Vec<char>,
    pos: usize,
}

/// Text collected for one token while scanning.
struct Pending {
    text: String,
    offset: usize,
    colon_at: Option<usize>,
    quote_seen: bool,
    value_quoted: bool,
}

impl Tokenizer {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn tokenize(&mut self) -> Result<Vec<Token>, SearchError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            if self.peek().is_none() {
                break;
            }
            if let Some(token) = self.read_token()? {
                tokens.push(token);
            }
        }

        Ok(tokens)
    }

    fn read_token(&mut self) -> Result<Option<Token>, SearchError> {
        let mut pending = Pending {
            text: String::new(),
            offset: self.pos,
            colon_at: None,
            quote_seen: false,
            value_quoted: false,
        };

        while let Some(ch) = self.peek() {
            match ch {
                _ if ch.is_whitespace() => break,
                '"' => {
                    self.read_quoted(&mut pending.text)?;
                    if pending.colon_at.is_some() {
                        pending.value_quoted = true;
                    }
                    pending.quote_seen = true;
                }
                ':' if pending.colon_at.is_none() && !pending.quote_seen => {
                    self.advance();
                    pending.colon_at = Some(pending.text.len());
                    pending.text.push(':');
                }
                _ => {
                    self.advance();
                    pending.text.push(ch);
                }
            }
        }

        Ok(finish_token(pending))
    }

    /// Consumes a quoted span starting at the current `"` and appends its
    /// content to `out`.
    fn read_quoted(&mut self, out: &mut String) -> Result<(), SearchError> {
        let start = self.pos;
        self.advance();

        loop {
            match self.advance() {
                Some('"') => return Ok(()),
                Some('\\') => match self.peek() {
                    Some(next @ ('"' | '\\')) => {
                        self.advance();
                        out.push(next);
                    }
                    _ => out.push('\\'),
                },
                Some(ch) => out.push(ch),
                None => {
                    return Err(SearchError::ParseError {
                        position: start,
                        message: "unterminated quote".to_string(),
                    })
                }
            }
        }
    }
}

fn finish_token(pending: Pending) -> Option<Token> {
    if pending.text.is_empty() {
        // Only an empty quoted phrase gets here.
        return None;
    }

    if let Some(idx) = pending.colon_at {
        let key = &pending.text[..idx];
        let value = &pending.text[idx + 1..];
        if !key.is_empty() && !value.is_empty() {
            return Some(Token {
                kind: TokenKind::KeyValue {
                    key: key.to_string(),
                    value: value.to_string(),
                },
                quoted: pending.value_quoted,
                raw: pending.text,
                offset: pending.offset,
            });
        }
    }

    Some(Token {
        kind: TokenKind::FreeText,
        quoted: pending.quote_seen,
        raw: pending.text,
        offset: pending.offset,
    })
}

/// Splits a raw filter string into tokens in input order.
pub fn tokenize(raw: &str) -> Result<Vec<Token>, SearchError> {
    Tokenizer::new(raw).tokenize()
}
