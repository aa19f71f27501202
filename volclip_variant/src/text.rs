//! Canonical export/import text for field values.
//!
//! Scalars export bare at the top level. Inside a container (struct member,
//! array element, map entry) strings and names are quoted so that `,`, `(`
//! and `)` stay unambiguous:
//!
//! ```text
//! 42            True            Some Label         /Game/Mats/M_Glow.M_Glow
//! (X=1,Y=2.5,Z=-3)              ("/Game/Maps/Sub_A","/Game/Maps/Sub_B")
//! INVTEXT("Shown to players")   None               ()
//! ```

use std::str::Chars;
use std::sync::Arc;

use thiserror::Error;

use crate::{FieldType, FieldValue, Number, NumberKind, StructMember, TypeCategory};

pub const NONE_SENTINEL: &str = "None";
pub const EMPTY_LIST_SENTINEL: &str = "()";
pub const NULL_POINTER_SENTINEL: &str = "nullptr";

/// True for exported text that carries no information worth storing.
pub fn is_empty_export(text: &str) -> bool {
    text.is_empty()
        || text == NONE_SENTINEL
        || text == EMPTY_LIST_SENTINEL
        || text == NULL_POINTER_SENTINEL
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextError {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("expected `{expected}`, found `{found}`")]
    Expected { expected: char, found: char },

    #[error("invalid {kind:?} literal `{text}`")]
    InvalidNumber { kind: NumberKind, text: String },

    #[error("invalid boolean literal `{0}`")]
    InvalidBool(String),

    #[error("`{variant}` is not a variant of enum {enum_name}")]
    UnknownEnumVariant { enum_name: String, variant: String },

    #[error("trailing input after value: `{0}`")]
    TrailingInput(String),

    #[error("{0} fields have no text import")]
    Unsupported(TypeCategory),
}

// -------------------- Export --------------------

/// Renders `value` the way a top-level field is exported.
pub fn export_text(value: &FieldValue) -> String {
    let mut out = String::new();
    write_value(&mut out, value, false);
    out
}

fn write_value(out: &mut String, value: &FieldValue, delimited: bool) {
    match value {
        FieldValue::Number(n) => out.push_str(&n.to_string()),
        FieldValue::Bool(b) => out.push_str(if *b { "True" } else { "False" }),
        FieldValue::Str(s) => {
            if delimited {
                write_quoted(out, s);
            } else {
                out.push_str(s);
            }
        }
        FieldValue::Name(s) => {
            if s.is_empty() {
                out.push_str(NONE_SENTINEL);
            } else if delimited {
                write_quoted(out, s);
            } else {
                out.push_str(s);
            }
        }
        FieldValue::Text(s) => {
            if s.is_empty() {
                if delimited {
                    out.push_str("\"\"");
                }
            } else {
                out.push_str("INVTEXT(");
                write_quoted(out, s);
                out.push(')');
            }
        }
        FieldValue::Enum(v) => out.push_str(v),
        FieldValue::Struct(members) => {
            out.push('(');
            for (i, (name, member)) in members.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(name);
                out.push('=');
                write_value(out, member, true);
            }
            out.push(')');
        }
        FieldValue::Array(items) | FieldValue::Set(items) => {
            out.push('(');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, true);
            }
            out.push(')');
        }
        FieldValue::Map(entries) => {
            out.push('(');
            for (i, (k, v)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('(');
                write_value(out, k, true);
                out.push(',');
                write_value(out, v, true);
                out.push(')');
            }
            out.push(')');
        }
        FieldValue::Object(path) | FieldValue::Interface(path) | FieldValue::Delegate(path) => {
            match path {
                Some(p) => out.push_str(p),
                None => out.push_str(NONE_SENTINEL),
            }
        }
    }
}

fn write_quoted(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
}

// -------------------- Import --------------------

/// Parses top-level exported text back into a value of type `ty`.
pub fn import_text(ty: &FieldType, text: &str) -> Result<FieldValue, TextError> {
    match ty {
        FieldType::Str => return Ok(FieldValue::Str(Arc::from(text))),
        FieldType::Name => {
            let trimmed = text.trim();
            if trimmed == NONE_SENTINEL {
                return Ok(FieldValue::Name(Arc::from("")));
            }
            if !trimmed.starts_with('"') {
                return Ok(FieldValue::Name(Arc::from(text)));
            }
        }
        FieldType::Text => {
            let trimmed = text.trim_start();
            if !(trimmed.starts_with('"') || is_text_macro(trimmed)) {
                return Ok(FieldValue::Text(Arc::from(text)));
            }
        }
        _ => {}
    }

    let mut reader = Reader::new(text);
    let value = reader.parse_value(ty)?;
    reader.skip_ws();
    if reader.peek.is_some() {
        return Err(TextError::TrailingInput(reader.rest()));
    }
    Ok(value)
}

fn is_text_macro(s: &str) -> bool {
    ["INVTEXT(", "NSLOCTEXT(", "LOCTEXT("]
        .iter()
        .any(|m| s.starts_with(m))
}

struct Reader<'a> {
    chars: Chars<'a>,
    peek: Option<char>,
}

impl<'a> Reader<'a> {
    fn new(src: &'a str) -> Self {
        let mut chars = src.chars();
        let peek = chars.next();
        Self { chars, peek }
    }

    fn bump(&mut self) -> Option<char> {
        let cur = self.peek;
        self.peek = self.chars.next();
        cur
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek, Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn rest(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.bump() {
            s.push(c);
        }
        s
    }

    fn expect(&mut self, expected: char) -> Result<(), TextError> {
        self.skip_ws();
        match self.bump() {
            Some(c) if c == expected => Ok(()),
            Some(found) => Err(TextError::Expected { expected, found }),
            None => Err(TextError::UnexpectedEnd),
        }
    }

    /// Consumes `c` if it is next; returns whether it did.
    fn eat(&mut self, c: char) -> bool {
        self.skip_ws();
        if self.peek == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Reads an unquoted token up to the next delimiter.
    fn read_bare(&mut self) -> String {
        self.skip_ws();
        let mut s = String::new();
        while let Some(c) = self.peek {
            if matches!(c, ',' | ')' | '=' | '(') {
                break;
            }
            s.push(c);
            self.bump();
        }
        s.trim_end().to_string()
    }

    fn read_quoted(&mut self) -> Result<String, TextError> {
        self.expect('"')?;
        let mut s = String::new();
        loop {
            match self.bump() {
                None => return Err(TextError::UnexpectedEnd),
                Some('"') => return Ok(s),
                Some('\\') => match self.bump() {
                    Some('n') => s.push('\n'),
                    Some('r') => s.push('\r'),
                    Some('t') => s.push('\t'),
                    Some(c) => s.push(c),
                    None => return Err(TextError::UnexpectedEnd),
                },
                Some(c) => s.push(c),
            }
        }
    }

    /// Quoted string if one starts here, bare token otherwise.
    fn read_string_like(&mut self) -> Result<String, TextError> {
        self.skip_ws();
        if self.peek == Some('"') {
            self.read_quoted()
        } else {
            Ok(self.read_bare())
        }
    }

    /// Skips one value of unknown type (balanced parentheses, quoted runs).
    fn skip_value(&mut self) -> Result<(), TextError> {
        self.skip_ws();
        let mut depth = 0usize;
        while let Some(c) = self.peek {
            match c {
                '"' => {
                    self.read_quoted()?;
                    continue;
                }
                '(' => depth += 1,
                ')' if depth == 0 => return Ok(()),
                ')' => depth -= 1,
                ',' if depth == 0 => return Ok(()),
                _ => {}
            }
            self.bump();
        }
        if depth == 0 {
            Ok(())
        } else {
            Err(TextError::UnexpectedEnd)
        }
    }

    fn parse_value(&mut self, ty: &FieldType) -> Result<FieldValue, TextError> {
        match ty {
            FieldType::Number(kind) => {
                let token = self.read_bare();
                parse_number(*kind, &token).map(FieldValue::Number)
            }
            FieldType::Bool => {
                let token = self.read_bare();
                parse_bool(&token).map(FieldValue::Bool)
            }
            FieldType::Str => Ok(FieldValue::Str(Arc::from(self.read_string_like()?))),
            FieldType::Name => {
                self.skip_ws();
                let quoted = self.peek == Some('"');
                let s = self.read_string_like()?;
                if !quoted && s == NONE_SENTINEL {
                    Ok(FieldValue::Name(Arc::from("")))
                } else {
                    Ok(FieldValue::Name(Arc::from(s)))
                }
            }
            FieldType::Text => self.parse_text().map(|s| FieldValue::Text(Arc::from(s))),
            FieldType::Enum { name, variants } => {
                let token = self.read_bare();
                let variant = token
                    .rsplit_once("::")
                    .map(|(_, v)| v.to_string())
                    .unwrap_or(token);
                match variants.iter().find(|v| v.as_ref() == variant) {
                    Some(v) => Ok(FieldValue::Enum(v.clone())),
                    None => Err(TextError::UnknownEnumVariant {
                        enum_name: name.to_string(),
                        variant,
                    }),
                }
            }
            FieldType::Struct { members, .. } => self.parse_struct(members),
            FieldType::Array(inner) => self.parse_list(inner).map(FieldValue::Array),
            FieldType::Set(inner) => self.parse_list(inner).map(FieldValue::Set),
            FieldType::Object { .. } => Ok(FieldValue::Object(self.parse_reference())),
            FieldType::Interface { .. } => Ok(FieldValue::Interface(self.parse_reference())),
            FieldType::Map(..) => Err(TextError::Unsupported(TypeCategory::Map)),
            FieldType::Delegate => Err(TextError::Unsupported(TypeCategory::Delegate)),
        }
    }

    fn parse_reference(&mut self) -> Option<Arc<str>> {
        let token = self.read_bare();
        if token.is_empty() || token == NONE_SENTINEL || token == NULL_POINTER_SENTINEL {
            None
        } else {
            Some(Arc::from(token))
        }
    }

    fn parse_text(&mut self) -> Result<String, TextError> {
        self.skip_ws();
        if self.peek == Some('"') {
            return self.read_quoted();
        }
        let macro_name = self.read_bare();
        self.expect('(')?;
        let mut args = Vec::new();
        if !self.eat(')') {
            loop {
                args.push(self.read_quoted()?);
                if self.eat(',') {
                    continue;
                }
                self.expect(')')?;
                break;
            }
        }
        // NSLOCTEXT(ns, key, source), LOCTEXT(key, source), INVTEXT(source)
        match macro_name.as_str() {
            "NSLOCTEXT" | "LOCTEXT" | "INVTEXT" => Ok(args.pop().unwrap_or_default()),
            _ => Err(TextError::TrailingInput(macro_name)),
        }
    }

    fn parse_struct(&mut self, members: &[StructMember]) -> Result<FieldValue, TextError> {
        let mut values: Vec<(Arc<str>, FieldValue)> = members
            .iter()
            .map(|m| (m.name.clone(), m.ty.default_value()))
            .collect();

        self.expect('(')?;
        if self.eat(')') {
            return Ok(FieldValue::Struct(values));
        }
        loop {
            let key = self.read_bare();
            self.expect('=')?;
            match members.iter().position(|m| m.name.as_ref() == key) {
                Some(idx) => {
                    let value = self.parse_value(&members[idx].ty)?;
                    values[idx].1 = value;
                }
                None => self.skip_value()?,
            }
            if self.eat(',') {
                continue;
            }
            self.expect(')')?;
            break;
        }
        Ok(FieldValue::Struct(values))
    }

    fn parse_list(&mut self, inner: &FieldType) -> Result<Vec<FieldValue>, TextError> {
        let mut items = Vec::new();
        self.expect('(')?;
        if self.eat(')') {
            return Ok(items);
        }
        loop {
            items.push(self.parse_value(inner)?);
            if self.eat(',') {
                continue;
            }
            self.expect(')')?;
            break;
        }
        Ok(items)
    }
}

fn parse_number(kind: NumberKind, token: &str) -> Result<Number, TextError> {
    Number::parse(kind, token).ok_or_else(|| TextError::InvalidNumber {
        kind,
        text: token.to_string(),
    })
}

fn parse_bool(token: &str) -> Result<bool, TextError> {
    match token.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(TextError::InvalidBool(token.to_string())),
    }
}
