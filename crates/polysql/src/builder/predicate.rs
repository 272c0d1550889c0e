//! Predicate nodes for WHERE/HAVING clauses.
//!
//! [`Predicates`] is an ordered list of [`Clause`]s. Each clause carries its own
//! [`Separator`]; the separator of the first rendered clause is dropped.
//! Rendering is done by the compiler, this module only holds state.

use crate::value::Operand;

/// Boolean connective placed before a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Separator {
    #[default]
    And,
    Or,
}

impl Separator {
    pub fn as_str(self) -> &'static str {
        match self {
            Separator::And => "AND",
            Separator::Or => "OR",
        }
    }
}

/// A single condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column operator value`; the operator is emitted verbatim.
    Compare {
        column: String,
        operator: String,
        value: Operand,
    },
    /// `column [NOT] BETWEEN low AND high`
    Between {
        column: String,
        low: Operand,
        high: Operand,
        negated: bool,
    },
    /// `column [NOT] IN (...)`; an empty list never matches (or always does when negated).
    In {
        column: String,
        values: Vec<Operand>,
        negated: bool,
    },
    /// `column IS [NOT] NULL`
    Null { column: String, negated: bool },
    /// Verbatim SQL condition.
    Raw(String),
    /// Parenthesized sub-list.
    Group(Predicates),
}

/// A predicate and the separator joining it to the previous one.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub separator: Separator,
    pub predicate: Predicate,
}

/// Ordered predicate list backing WHERE, HAVING and nested groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicates {
    clauses: Vec<Clause>,
}

impl Predicates {
    /// Create an empty list.
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// True when nothing would render (no clauses, or only empty groups and
    /// blank raw conditions).
    pub fn is_empty(&self) -> bool {
        self.clauses.iter().all(|c| match &c.predicate {
            Predicate::Group(g) => g.is_empty(),
            Predicate::Raw(sql) => sql.trim().is_empty(),
            _ => false,
        })
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Append a predicate with an explicit separator.
    pub fn push(&mut self, separator: Separator, predicate: Predicate) -> &mut Self {
        self.clauses.push(Clause {
            separator,
            predicate,
        });
        self
    }

    // ==================== Comparison ====================

    /// `column operator value`, separated by AND.
    pub fn filter(
        &mut self,
        column: &str,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.compare(Separator::And, column, operator, value.into())
    }

    /// `column operator value`, separated by OR.
    pub fn or_filter(
        &mut self,
        column: &str,
        operator: &str,
        value: impl Into<Operand>,
    ) -> &mut Self {
        self.compare(Separator::Or, column, operator, value.into())
    }

    fn compare(
        &mut self,
        separator: Separator,
        column: &str,
        operator: &str,
        value: Operand,
    ) -> &mut Self {
        self.push(
            separator,
            Predicate::Compare {
                column: column.to_string(),
                operator: operator.to_string(),
                value,
            },
        )
    }

    // `eq`/`ne` would be shadowed by `PartialEq` on owned lists.
    pub fn equals(&mut self, column: &str, value: impl Into<Operand>) -> &mut Self {
        self.filter(column, "=", value)
    }

    pub fn or_equals(&mut self, column: &str, value: impl Into<Operand>) -> &mut Self {
        self.or_filter(column, "=", value)
    }

    pub fn not_equals(&mut self, column: &str, value: impl Into<Operand>) -> &mut Self {
        self.filter(column, "!=", value)
    }

    pub fn gt(&mut self, column: &str, value: impl Into<Operand>) -> &mut Self {
        self.filter(column, ">", value)
    }

    pub fn gte(&mut self, column: &str, value: impl Into<Operand>) -> &mut Self {
        self.filter(column, ">=", value)
    }

    pub fn lt(&mut self, column: &str, value: impl Into<Operand>) -> &mut Self {
        self.filter(column, "<", value)
    }

    pub fn lte(&mut self, column: &str, value: impl Into<Operand>) -> &mut Self {
        self.filter(column, "<=", value)
    }

    pub fn like(&mut self, column: &str, pattern: impl Into<Operand>) -> &mut Self {
        self.filter(column, "LIKE", pattern)
    }

    pub fn not_like(&mut self, column: &str, pattern: impl Into<Operand>) -> &mut Self {
        self.filter(column, "NOT LIKE", pattern)
    }

    /// Verbatim condition, separated by AND.
    pub fn raw(&mut self, sql: &str) -> &mut Self {
        self.push(Separator::And, Predicate::Raw(sql.to_string()))
    }

    /// Verbatim condition, separated by OR.
    pub fn or_raw(&mut self, sql: &str) -> &mut Self {
        self.push(Separator::Or, Predicate::Raw(sql.to_string()))
    }

    // ==================== BETWEEN ====================

    pub fn between(
        &mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> &mut Self {
        self.range(Separator::And, column, low.into(), high.into(), false)
    }

    pub fn or_between(
        &mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> &mut Self {
        self.range(Separator::Or, column, low.into(), high.into(), false)
    }

    pub fn not_between(
        &mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> &mut Self {
        self.range(Separator::And, column, low.into(), high.into(), true)
    }

    pub fn or_not_between(
        &mut self,
        column: &str,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> &mut Self {
        self.range(Separator::Or, column, low.into(), high.into(), true)
    }

    fn range(
        &mut self,
        separator: Separator,
        column: &str,
        low: Operand,
        high: Operand,
        negated: bool,
    ) -> &mut Self {
        self.push(
            separator,
            Predicate::Between {
                column: column.to_string(),
                low,
                high,
                negated,
            },
        )
    }

    // ==================== IN ====================

    pub fn in_list<V: Into<Operand>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.membership(Separator::And, column, values, false)
    }

    pub fn or_in_list<V: Into<Operand>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.membership(Separator::Or, column, values, false)
    }

    pub fn not_in<V: Into<Operand>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.membership(Separator::And, column, values, true)
    }

    pub fn or_not_in<V: Into<Operand>>(
        &mut self,
        column: &str,
        values: impl IntoIterator<Item = V>,
    ) -> &mut Self {
        self.membership(Separator::Or, column, values, true)
    }

    fn membership<V: Into<Operand>>(
        &mut self,
        separator: Separator,
        column: &str,
        values: impl IntoIterator<Item = V>,
        negated: bool,
    ) -> &mut Self {
        self.push(
            separator,
            Predicate::In {
                column: column.to_string(),
                values: values.into_iter().map(Into::into).collect(),
                negated,
            },
        )
    }

    // ==================== NULL ====================

    pub fn is_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Separator::And, column, false)
    }

    pub fn or_is_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Separator::Or, column, false)
    }

    pub fn is_not_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Separator::And, column, true)
    }

    pub fn or_is_not_null(&mut self, column: &str) -> &mut Self {
        self.null_check(Separator::Or, column, true)
    }

    fn null_check(&mut self, separator: Separator, column: &str, negated: bool) -> &mut Self {
        self.push(
            separator,
            Predicate::Null {
                column: column.to_string(),
                negated,
            },
        )
    }

    // ==================== Groups ====================

    /// Nested `( ... )` group, separated by AND.
    pub fn group<F: FnOnce(&mut Predicates)>(&mut self, build: F) -> &mut Self {
        self.nested(Separator::And, build)
    }

    /// Nested `( ... )` group, separated by OR.
    pub fn or_group<F: FnOnce(&mut Predicates)>(&mut self, build: F) -> &mut Self {
        self.nested(Separator::Or, build)
    }

    pub(crate) fn nested<F: FnOnce(&mut Predicates)>(
        &mut self,
        separator: Separator,
        build: F,
    ) -> &mut Self {
        let mut group = Predicates::new();
        build(&mut group);
        self.push(separator, Predicate::Group(group))
    }
}
