//! JSON query documents.
//!
//! A document describes one statement declaratively:
//!
//! ```json
//! {
//!   "statement": "select",
//!   "table": "users",
//!   "columns": ["id", "email"],
//!   "where": [
//!     { "column": "status", "op": "=", "value": "active" },
//!     { "kind": "in", "column": "role", "values": ["admin", "owner"], "or": true },
//!     { "column": "created_at", "op": "<", "value": { "raw": "NOW()" } }
//!   ],
//!   "order_by": [{ "column": "id", "direction": "desc" }],
//!   "limit": 10
//! }
//! ```

use anyhow::Context;
use polysql::{
    CompiledStatement, Dialect, Direction, Join, JoinType, Operand, Predicate, Predicates,
    QueryBuilder, Separator, Value, Values, raw,
};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    #[default]
    Select,
    First,
    Column,
    Insert,
    Update,
    Delete,
    Count,
    CountDistinct,
    Min,
    Max,
    Sum,
    Avg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionKind {
    #[default]
    Compare,
    Between,
    In,
    Null,
    Raw,
    Group,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConditionDoc {
    #[serde(default)]
    pub kind: ConditionKind,
    #[serde(default)]
    pub column: String,
    #[serde(default = "default_op")]
    pub op: String,
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
    #[serde(default)]
    pub low: serde_json::Value,
    #[serde(default)]
    pub high: serde_json::Value,
    /// Verbatim SQL for `kind: raw`.
    pub sql: Option<String>,
    /// Nested conditions for `kind: group`.
    #[serde(default)]
    pub conditions: Vec<ConditionDoc>,
    #[serde(default)]
    pub or: bool,
    #[serde(default)]
    pub not: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinDoc {
    pub table: String,
    #[serde(rename = "type", default = "default_join_type")]
    pub join_type: String,
    pub left: Option<String>,
    #[serde(default = "default_op")]
    pub op: String,
    pub right: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderDoc {
    pub column: String,
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryDocument {
    #[serde(default)]
    pub statement: StatementType,
    pub table: String,
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub columns: Vec<String>,
    pub column: Option<String>,
    #[serde(default, rename = "where")]
    pub wheres: Vec<ConditionDoc>,
    #[serde(default)]
    pub joins: Vec<JoinDoc>,
    #[serde(default)]
    pub group_by: Vec<String>,
    #[serde(default)]
    pub having: Vec<ConditionDoc>,
    #[serde(default)]
    pub order_by: Vec<OrderDoc>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
}

fn default_op() -> String {
    "=".to_string()
}

fn default_join_type() -> String {
    "inner".to_string()
}

impl QueryDocument {
    pub fn parse(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("invalid query document")
    }

    /// Build the query state for `dialect`.
    pub fn builder(&self, dialect: Dialect) -> anyhow::Result<QueryBuilder> {
        let mut qb = QueryBuilder::new(&self.table, dialect);
        if self.distinct {
            qb = qb.distinct();
        }

        for join in &self.joins {
            qb = apply_join(qb, join)?;
        }

        for cond in &self.wheres {
            let (separator, predicate) = to_predicate(cond)?;
            qb = qb.where_predicate(separator, predicate);
        }

        let groups: Vec<&str> = self.group_by.iter().map(String::as_str).collect();
        qb = qb.group_by_cols(&groups);

        for cond in &self.having {
            let (separator, predicate) = to_predicate(cond)?;
            qb = qb.having_predicate(separator, predicate);
        }

        for order in &self.order_by {
            qb = match &order.direction {
                Some(direction) => qb.order_by(&order.column, direction.parse::<Direction>()?),
                None => qb.order_by_raw(&order.column),
            };
        }

        if let Some(limit) = self.limit {
            qb = qb.limit(limit);
        }
        if let Some(offset) = self.offset {
            qb = qb.offset(offset);
        }

        Ok(qb)
    }

    /// Build and compile the document's statement.
    pub fn compile(&self, dialect: Dialect) -> anyhow::Result<CompiledStatement> {
        let qb = self.builder(dialect)?;
        let columns: Vec<&str> = self.columns.iter().map(String::as_str).collect();

        let stmt = match self.statement {
            StatementType::Select => qb.select_all(&columns),
            StatementType::First => qb.select_first(&columns),
            StatementType::Column => qb.select_column(self.required_column()?),
            StatementType::Insert => qb.insert(self.write_values()?),
            StatementType::Update => qb.update(self.write_values()?),
            StatementType::Delete => qb.delete(),
            StatementType::Count => qb.count(self.column.as_deref().unwrap_or("*")),
            StatementType::CountDistinct => qb.count_distinct(self.required_column()?),
            StatementType::Min => qb.min(self.required_column()?),
            StatementType::Max => qb.max(self.required_column()?),
            StatementType::Sum => qb.sum(self.required_column()?),
            StatementType::Avg => qb.avg(self.required_column()?),
        }?;
        Ok(stmt)
    }

    fn required_column(&self) -> anyhow::Result<&str> {
        self.column
            .as_deref()
            .with_context(|| format!("statement {:?} requires \"column\"", self.statement))
    }

    fn write_values(&self) -> anyhow::Result<Values> {
        let mut values = Values::new();
        for (column, value) in &self.values {
            values = values.set(column, operand(value)?);
        }
        Ok(values)
    }
}

fn apply_join(qb: QueryBuilder, doc: &JoinDoc) -> anyhow::Result<QueryBuilder> {
    let join_type: JoinType = doc.join_type.parse()?;
    if join_type == JoinType::Cross {
        return Ok(qb.cross_join(&doc.table));
    }
    let (Some(left), Some(right)) = (&doc.left, &doc.right) else {
        anyhow::bail!("join on {} requires \"left\" and \"right\"", doc.table);
    };
    Ok(qb.join_on(&doc.table, join_type, |j: &mut Join| {
        j.on(left, &doc.op, right);
    }))
}

fn to_predicate(doc: &ConditionDoc) -> anyhow::Result<(Separator, Predicate)> {
    let separator = if doc.or { Separator::Or } else { Separator::And };
    let needs_column = !matches!(doc.kind, ConditionKind::Raw | ConditionKind::Group);
    if needs_column && doc.column.trim().is_empty() {
        anyhow::bail!("{:?} condition requires \"column\"", doc.kind);
    }
    let column = doc.column.clone();

    let predicate = match doc.kind {
        ConditionKind::Compare => {
            if doc.not {
                anyhow::bail!("\"not\" is not supported on compare conditions; use a negated \"op\"");
            }
            Predicate::Compare {
                column,
                operator: doc.op.clone(),
                value: operand(&doc.value)?,
            }
        }
        ConditionKind::Between => Predicate::Between {
            column,
            low: operand(&doc.low)?,
            high: operand(&doc.high)?,
            negated: doc.not,
        },
        ConditionKind::In => Predicate::In {
            column,
            values: doc.values.iter().map(operand).collect::<anyhow::Result<_>>()?,
            negated: doc.not,
        },
        ConditionKind::Null => Predicate::Null {
            column,
            negated: doc.not,
        },
        ConditionKind::Raw => {
            let Some(sql) = &doc.sql else {
                anyhow::bail!("raw condition requires \"sql\"");
            };
            Predicate::Raw(sql.clone())
        }
        ConditionKind::Group => {
            let mut group = Predicates::new();
            for cond in &doc.conditions {
                let (separator, predicate) = to_predicate(cond)?;
                group.push(separator, predicate);
            }
            Predicate::Group(group)
        }
    };

    Ok((separator, predicate))
}

/// Map a JSON value to a bound value, or `{"raw": "..."}` to an inline expression.
pub fn operand(value: &serde_json::Value) -> anyhow::Result<Operand> {
    use serde_json::Value as Json;

    let bound = match value {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(*b),
        Json::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else if let Some(u) = n.as_u64() {
                Value::UInt(u)
            } else {
                Value::Float(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Json::String(s) => Value::Text(s.clone()),
        Json::Object(map) if map.contains_key("raw") => {
            return match (map.len(), map.get("raw")) {
                (1, Some(Json::String(sql))) => Ok(Operand::Raw(raw(sql.clone()))),
                _ => anyhow::bail!("raw expression must be {{\"raw\": \"<sql>\"}}"),
            };
        }
        Json::Array(_) | Json::Object(_) => Value::Json(value.clone()),
    };
    Ok(Operand::Bind(bound))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(doc: &str, dialect: Dialect) -> CompiledStatement {
        QueryDocument::parse(doc).unwrap().compile(dialect).unwrap()
    }

    #[test]
    fn select_with_conditions() {
        let stmt = compile(
            r#"{
                "table": "users",
                "columns": ["id", "email"],
                "where": [
                    { "column": "status", "value": "active" },
                    { "kind": "in", "column": "role", "values": ["admin", "owner"], "or": true },
                    { "column": "created_at", "op": "<", "value": { "raw": "NOW()" } }
                ],
                "order_by": [{ "column": "id", "direction": "desc" }],
                "limit": 10
            }"#,
            Dialect::MySql,
        );
        assert_eq!(
            stmt.sql,
            "SELECT id, email FROM `users` WHERE status = ? OR role IN (?, ?) AND created_at < NOW() ORDER BY id DESC LIMIT 10"
        );
        assert_eq!(stmt.params.len(), 3);
    }

    #[test]
    fn groups_between_null() {
        let stmt = compile(
            r#"{
                "table": "t",
                "where": [
                    { "kind": "null", "column": "deleted_at" },
                    { "kind": "group", "conditions": [
                        { "kind": "between", "column": "age", "low": 18, "high": 65 },
                        { "kind": "null", "column": "age", "or": true }
                    ]},
                    { "kind": "raw", "sql": "1 = 1" }
                ]
            }"#,
            Dialect::Generic,
        );
        assert_eq!(
            stmt.sql,
            "SELECT * FROM t WHERE deleted_at IS NULL AND (age BETWEEN ? AND ? OR age IS NULL) AND 1 = 1"
        );
    }

    #[test]
    fn joins_and_having() {
        let stmt = compile(
            r#"{
                "statement": "select",
                "table": "users",
                "columns": ["users.id", "COUNT(orders.id)"],
                "joins": [
                    { "table": "orders", "type": "left", "left": "users.id", "right": "orders.user_id" },
                    { "table": "regions", "type": "cross" }
                ],
                "group_by": ["users.id"],
                "having": [{ "column": "COUNT(orders.id)", "op": ">", "value": 2 }]
            }"#,
            Dialect::SqlServer,
        );
        assert_eq!(
            stmt.sql,
            "SELECT users.id, COUNT(orders.id) FROM [users] LEFT JOIN [orders] ON users.id = orders.user_id CROSS JOIN [regions] GROUP BY users.id HAVING COUNT(orders.id) > ?"
        );
        assert_eq!(stmt.params, vec![Value::Int(2)]);
    }

    #[test]
    fn writes() {
        let stmt = compile(
            r#"{ "statement": "insert", "table": "users",
                 "values": { "created_at": { "raw": "NOW()" }, "name": "alice" } }"#,
            Dialect::NuoDb,
        );
        assert_eq!(
            stmt.sql,
            r#"INSERT INTO "users" ("created_at", "name") VALUES (NOW(), ?)"#
        );

        let stmt = compile(
            r#"{ "statement": "delete", "table": "users",
                 "where": [{ "column": "id", "value": 3 }] }"#,
            Dialect::MySql,
        );
        assert_eq!(stmt.sql, "DELETE FROM `users` WHERE id = ?");
    }

    #[test]
    fn aggregates() {
        let stmt = compile(r#"{ "statement": "count", "table": "t" }"#, Dialect::Generic);
        assert_eq!(stmt.sql, "SELECT COUNT(*) FROM t");

        let doc = QueryDocument::parse(r#"{ "statement": "max", "table": "t" }"#).unwrap();
        assert!(doc.compile(Dialect::Generic).is_err());
    }

    #[test]
    fn operand_mapping() {
        use serde_json::json;
        assert_eq!(operand(&json!(5)).unwrap(), Operand::Bind(Value::Int(5)));
        assert_eq!(operand(&json!(1.5)).unwrap(), Operand::Bind(Value::Float(1.5)));
        assert_eq!(operand(&json!(null)).unwrap(), Operand::Bind(Value::Null));
        assert!(operand(&json!({ "raw": "NOW()" })).unwrap().is_raw());
        assert!(operand(&json!({ "raw": 1 })).is_err());
        assert_eq!(
            operand(&json!({ "a": 1 })).unwrap(),
            Operand::Bind(Value::Json(json!({ "a": 1 })))
        );
    }

    #[test]
    fn rejects_bad_documents() {
        assert!(QueryDocument::parse(r#"{ "table": "t", "bogus": 1 }"#).is_err());
        let doc = QueryDocument::parse(
            r#"{ "table": "t", "where": [{ "column": "a", "not": true }] }"#,
        )
        .unwrap();
        assert!(doc.compile(Dialect::Generic).is_err());
        let doc = QueryDocument::parse(
            r#"{ "table": "t", "joins": [{ "table": "u", "type": "outer" }] }"#,
        )
        .unwrap();
        assert!(doc.compile(Dialect::Generic).is_err());
    }
}
