//! Remote mirror list loading.
//!
//! The list host serves a literal map of capability name to ordered base
//! URLs. Some hosts emit strict JSON, others a scripting-language dict
//! literal (single quotes, trailing commas, `#` comments), so both are
//! accepted.

use reqwest::Client;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::capability::Capability;
use crate::config::MirrorSourceConfig;
use crate::identity::IdentityProvider;

use super::MirrorList;

#[derive(Debug, Error)]
pub enum MirrorSourceError {
    #[error("Mirror list unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("Mirror list source returned HTTP {0}")]
    BadStatus(u16),

    #[error("Malformed mirror list: {0}")]
    Malformed(String),

    #[error("Mirror list has no entry for capability '{0}'")]
    MissingCapability(Capability),
}

/// Fetch and parse the mirror list. Called once at startup.
pub async fn load_mirror_list(
    config: &MirrorSourceConfig,
    identity: &dyn IdentityProvider,
) -> Result<MirrorList, MirrorSourceError> {
    let client = Client::builder()
        .connect_timeout(config.connect_timeout())
        .timeout(config.connect_timeout() + config.read_timeout())
        .build()?;

    debug!(url = %config.source_url, "Fetching mirror list");

    let response = client
        .get(&config.source_url)
        .headers(identity.headers())
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(MirrorSourceError::BadStatus(status.as_u16()));
    }

    let text = response.text().await?;
    let list = parse_mirror_list(&text)?;

    info!(mirrors = list.total(), "Mirror list loaded");
    Ok(list)
}

/// Parse the textual mirror map. All five capability keys must be present.
pub fn parse_mirror_list(text: &str) -> Result<MirrorList, MirrorSourceError> {
    let text = text.trim();
    let value = match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(_) => LiteralParser::new(text).parse_document()?,
    };

    let Value::Object(map) = value else {
        return Err(MirrorSourceError::Malformed(
            "top-level value is not a map".to_string(),
        ));
    };

    let mut list = MirrorList::new();
    for capability in Capability::ALL {
        let entry = map
            .get(capability.as_str())
            .ok_or(MirrorSourceError::MissingCapability(capability))?;
        list.insert(capability, mirror_urls(capability, entry)?);
    }
    Ok(list)
}

fn mirror_urls(capability: Capability, entry: &Value) -> Result<Vec<String>, MirrorSourceError> {
    let Value::Array(items) = entry else {
        return Err(MirrorSourceError::Malformed(format!(
            "'{}' is not a list",
            capability
        )));
    };

    let mut urls: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(url) = item else {
            return Err(MirrorSourceError::Malformed(format!(
                "'{}' contains a non-string entry: {}",
                capability, item
            )));
        };
        let url = url.trim();
        // First occurrence wins.
        if !url.is_empty() && !urls.iter().any(|u| u == url) {
            urls.push(url.to_string());
        }
    }
    Ok(urls)
}

/// Recursive-descent reader for dict/list/str literals.
struct LiteralParser<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> LiteralParser<'a> {
    fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn parse_document(mut self) -> Result<Value, MirrorSourceError> {
        let value = self.parse_value()?;
        self.skip_trivia();
        if self.pos != self.src.len() {
            return Err(self.error("trailing characters"));
        }
        Ok(value)
    }

    fn parse_value(&mut self) -> Result<Value, MirrorSourceError> {
        self.skip_trivia();
        match self.peek() {
            Some('{') => self.parse_map(),
            Some('[') => self.parse_sequence('[', ']'),
            Some('(') => self.parse_sequence('(', ')'),
            Some('\'') | Some('"') => self.parse_string().map(Value::String),
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_constant(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn parse_map(&mut self) -> Result<Value, MirrorSourceError> {
        self.expect('{')?;
        let mut map = Map::new();
        loop {
            self.skip_trivia();
            if self.eat('}') {
                return Ok(Value::Object(map));
            }
            let key = self.parse_string()?;
            self.skip_trivia();
            self.expect(':')?;
            let value = self.parse_value()?;
            map.insert(key, value);
            self.skip_trivia();
            if !self.eat(',') {
                self.skip_trivia();
                self.expect('}')?;
                return Ok(Value::Object(map));
            }
        }
    }

    fn parse_sequence(&mut self, open: char, close: char) -> Result<Value, MirrorSourceError> {
        self.expect(open)?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia();
            if self.eat(close) {
                return Ok(Value::Array(items));
            }
            items.push(self.parse_value()?);
            self.skip_trivia();
            if !self.eat(',') {
                self.skip_trivia();
                self.expect(close)?;
                return Ok(Value::Array(items));
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, MirrorSourceError> {
        let quote = match self.bump() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error("expected string")),
        };
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn parse_number(&mut self) -> Result<Value, MirrorSourceError> {
        let start = self.pos;
        let token =
            self.take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '.' | '_'));
        let digits = token.replace('_', "");

        if let Ok(n) = digits.parse::<i64>() {
            return Ok(Value::from(n));
        }
        digits
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| {
                MirrorSourceError::Malformed(format!("invalid number at offset {}", start))
            })
    }

    fn parse_constant(&mut self) -> Result<Value, MirrorSourceError> {
        let start = self.pos;
        match self.take_while(|c| c.is_ascii_alphanumeric() || c == '_') {
            "True" => Ok(Value::Bool(true)),
            "False" => Ok(Value::Bool(false)),
            "None" => Ok(Value::Null),
            other => Err(MirrorSourceError::Malformed(format!(
                "unknown name '{}' at offset {}",
                other, start
            ))),
        }
    }

    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !accept(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        let src = self.src;
        &src[start..self.pos]
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if c == '#' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), MirrorSourceError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.error(&format!("expected '{}'", expected)))
        }
    }

    fn error(&self, message: &str) -> MirrorSourceError {
        MirrorSourceError::Malformed(format!("{} at offset {}", message, self.pos))
    }
}
