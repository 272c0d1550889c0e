//! SQL identifier quoting.
//!
//! This module provides [`Ident`] which represents a (possibly dotted, possibly
//! aliased) SQL identifier, and [`QuoteStyle`] which renders it for a dialect.
//!
//! - Each dot-separated segment is quoted on its own: `a.b` -> `` `a`.`b` ``
//! - `*` segments are never quoted
//! - `name AS alias` keeps the alias and quotes both sides
//! - The closing quote character is doubled inside a segment
//!
//! # Example
//! ```ignore
//! use polysql::{Ident, QuoteStyle};
//!
//! let t = Ident::parse("shop.orders AS o");
//! assert_eq!(t.to_sql(QuoteStyle::Backtick), "`shop`.`orders` AS `o`");
//! ```

/// Identifier quoting template of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Emit identifiers unchanged.
    #[default]
    None,
    /// `` `name` `` (MySQL)
    Backtick,
    /// `[name]` (SQL Server)
    Bracket,
    /// `"name"` (NuoDB, ANSI)
    DoubleQuote,
}

impl QuoteStyle {
    fn delimiters(self) -> Option<(char, char)> {
        match self {
            QuoteStyle::None => None,
            QuoteStyle::Backtick => Some(('`', '`')),
            QuoteStyle::Bracket => Some(('[', ']')),
            QuoteStyle::DoubleQuote => Some(('"', '"')),
        }
    }

    /// Quote a single identifier segment.
    pub(crate) fn write_segment(self, segment: &str, out: &mut String) {
        let Some((open, close)) = self.delimiters() else {
            out.push_str(segment);
            return;
        };
        out.push(open);
        for ch in segment.chars() {
            if ch == close {
                out.push(close);
            }
            out.push(ch);
        }
        out.push(close);
    }
}

/// A part of a SQL identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentPart {
    /// A named segment, quoted according to the dialect.
    Name(String),
    /// `*`, never quoted.
    Star,
}

/// A SQL identifier (table or column name), optionally aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub parts: Vec<IdentPart>,
    pub alias: Option<String>,
}

impl Ident {
    /// Parse an identifier string.
    ///
    /// - Dotted: `schema.table.column`
    /// - Star: `users.*`
    /// - Aliased: `users AS u` (case-insensitive `as`)
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        let (name, alias) = match split_alias(s) {
            Some((name, alias)) => (name, Some(alias.to_string())),
            None => (s, None),
        };

        let parts = name
            .split('.')
            .map(|segment| {
                if segment == "*" {
                    IdentPart::Star
                } else {
                    IdentPart::Name(segment.to_string())
                }
            })
            .collect();

        Self { parts, alias }
    }

    /// Render the identifier with the given quote style.
    pub fn to_sql(&self, style: QuoteStyle) -> String {
        let mut out = String::new();
        self.write_sql(style, &mut out);
        out
    }

    pub(crate) fn write_sql(&self, style: QuoteStyle, out: &mut String) {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            match part {
                IdentPart::Name(s) => style.write_segment(s, out),
                IdentPart::Star => out.push('*'),
            }
        }
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            style.write_segment(alias, out);
        }
    }
}

/// Split `name AS alias` on the last ` as ` keyword.
fn split_alias(s: &str) -> Option<(&str, &str)> {
    let lower = s.to_ascii_lowercase();
    let pos = lower.rfind(" as ")?;
    let name = s[..pos].trim_end();
    let alias = s[pos + 4..].trim_start();
    if name.is_empty() || alias.is_empty() {
        return None;
    }
    Some((name, alias))
}

/// Quote `identifier` with `style`; shorthand for `Ident::parse(..).to_sql(..)`.
pub fn wrap(identifier: &str, style: QuoteStyle) -> String {
    Ident::parse(identifier).to_sql(style)
}
