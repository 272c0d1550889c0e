//! JOIN clauses.

use crate::builder::predicate::Separator;
use crate::error::{QueryError, QueryResult};
use std::str::FromStr;

/// JOIN flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinType {
    /// SQL keyword sequence, including `JOIN`.
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL OUTER JOIN",
            JoinType::Cross => "CROSS JOIN",
        }
    }
}

impl FromStr for JoinType {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INNER" => Ok(JoinType::Inner),
            "LEFT" => Ok(JoinType::Left),
            "RIGHT" => Ok(JoinType::Right),
            "FULL" => Ok(JoinType::Full),
            "CROSS" => Ok(JoinType::Cross),
            other => Err(QueryError::validation(format!("unknown join type '{other}'"))),
        }
    }
}

/// One `left operator right` condition of an ON clause. Both sides are column
/// references and are emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCondition {
    pub separator: Separator,
    pub left: String,
    pub operator: String,
    pub right: String,
}

/// A JOIN clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub table: String,
    pub join_type: JoinType,
    pub conditions: Vec<JoinCondition>,
}

impl Join {
    pub fn new(table: &str, join_type: JoinType) -> Self {
        Self {
            table: table.to_string(),
            join_type,
            conditions: Vec::new(),
        }
    }

    /// Add an ON condition, separated by AND.
    pub fn on(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        self.condition(Separator::And, left, operator, right)
    }

    /// Add an ON condition, separated by OR.
    pub fn or_on(&mut self, left: &str, operator: &str, right: &str) -> &mut Self {
        self.condition(Separator::Or, left, operator, right)
    }

    fn condition(
        &mut self,
        separator: Separator,
        left: &str,
        operator: &str,
        right: &str,
    ) -> &mut Self {
        self.conditions.push(JoinCondition {
            separator,
            left: left.to_string(),
            operator: operator.to_string(),
            right: right.to_string(),
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_join_type() {
        assert_eq!("left".parse::<JoinType>().unwrap(), JoinType::Left);
        assert_eq!(" FULL ".parse::<JoinType>().unwrap(), JoinType::Full);
        assert!("OUTER".parse::<JoinType>().is_err());
    }

    #[test]
    fn conditions_keep_order() {
        let mut j = Join::new("orders", JoinType::Left);
        j.on("users.id", "=", "orders.user_id")
            .or_on("users.alt_id", "=", "orders.user_id");
        assert_eq!(j.conditions.len(), 2);
        assert_eq!(j.conditions[1].separator, Separator::Or);
    }
}
