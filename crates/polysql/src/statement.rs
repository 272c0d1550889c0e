//! Compiled statements and the execution boundary.

use crate::dialect::Dialect;
use crate::value::Value;
use serde::Serialize;
use std::fmt;

/// The kind of statement a terminal operation produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    Delete,
}

impl StatementKind {
    /// SELECT returns rows.
    pub fn returns_rows(self) -> bool {
        matches!(self, StatementKind::Select)
    }

    /// UPDATE and DELETE report an affected-row count.
    pub fn returns_affected(self) -> bool {
        matches!(self, StatementKind::Update | StatementKind::Delete)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
        }
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SQL text with positional `?` placeholders plus the values to bind, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledStatement {
    pub kind: StatementKind,
    pub dialect: Dialect,
    pub sql: String,
    pub params: Vec<Value>,
}

impl CompiledStatement {
    /// Number of `?` placeholders in the SQL text.
    ///
    /// Placeholders inside single-quoted literals are not counted.
    pub fn placeholder_count(&self) -> usize {
        let mut in_literal = false;
        let mut count = 0;
        for ch in self.sql.chars() {
            match ch {
                '\'' => in_literal = !in_literal,
                '?' if !in_literal => count += 1,
                _ => {}
            }
        }
        count
    }
}

impl fmt::Display for CompiledStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// Result of [`Executor::execute`], shaped by the statement kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<R> {
    Rows(Vec<R>),
    Affected(u64),
    Done(bool),
}

/// The connection side of a compiled statement.
///
/// Implementors bind `params` positionally and run `sql`. The result shape is
/// picked from [`CompiledStatement::kind`], never from the SQL text.
pub trait Executor {
    type Row;
    type Error;

    /// Run a row-returning statement.
    fn fetch(&mut self, stmt: &CompiledStatement) -> Result<Vec<Self::Row>, Self::Error>;

    /// Run a statement and report the affected-row count.
    fn affect(&mut self, stmt: &CompiledStatement) -> Result<u64, Self::Error>;

    /// Run a statement and report success.
    fn run(&mut self, stmt: &CompiledStatement) -> Result<bool, Self::Error>;

    /// Dispatch on the statement kind.
    fn execute(&mut self, stmt: &CompiledStatement) -> Result<Outcome<Self::Row>, Self::Error> {
        match stmt.kind {
            StatementKind::Select => self.fetch(stmt).map(Outcome::Rows),
            StatementKind::Update | StatementKind::Delete => {
                self.affect(stmt).map(Outcome::Affected)
            }
            StatementKind::Insert => self.run(stmt).map(Outcome::Done),
        }
    }
}
