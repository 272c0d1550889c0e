//! Dialect-aware SQL compiler.
//!
//! A [`Compiler`] renders one [`QueryBuilder`]'s state into a
//! [`CompiledStatement`]: SQL text with positional `?` placeholders plus the
//! bound values in placeholder order. Dialects differ only in their
//! [`DialectSpec`]: identifier quoting and SELECT pagination.
//!
//! Clause order for SELECT:
//! `SELECT [DISTINCT] columns FROM table [joins] [WHERE] [GROUP BY] [HAVING] [ORDER BY] [pagination]`

mod pagination;

pub use pagination::{MAX_ROW_BOUND, MYSQL_MAX_LIMIT, ROWNUM_ALIAS};

use crate::builder::{Join, JoinType, Predicate, Predicates, QueryBuilder, Values};
use crate::dialect::DialectSpec;
use crate::error::{QueryError, QueryResult};
use crate::statement::{CompiledStatement, StatementKind};
use crate::value::{Operand, Value};
use pagination::{SelectParts, Window};

/// Aggregate functions available as terminal operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Count,
    CountDistinct,
    Min,
    Max,
    Sum,
    Avg,
}

impl Aggregate {
    fn render(self, column: &str) -> String {
        match self {
            Aggregate::Count => format!("COUNT({column})"),
            Aggregate::CountDistinct => format!("COUNT(DISTINCT {column})"),
            Aggregate::Min => format!("MIN({column})"),
            Aggregate::Max => format!("MAX({column})"),
            Aggregate::Sum => format!("SUM({column})"),
            Aggregate::Avg => format!("AVG({column})"),
        }
    }
}

/// Renders one builder. Each terminal method consumes the compiler, so every
/// render pass starts from an empty parameter list.
#[derive(Debug)]
pub struct Compiler<'q> {
    query: &'q QueryBuilder,
    spec: DialectSpec,
    params: Vec<Value>,
}

impl<'q> Compiler<'q> {
    /// Create a compiler for `query` using the query's dialect.
    pub fn new(query: &'q QueryBuilder) -> Self {
        Self {
            query,
            spec: query.dialect.spec(),
            params: Vec::new(),
        }
    }

    // ==================== Statements ====================

    /// Compile a SELECT statement.
    pub fn select(mut self) -> QueryResult<CompiledStatement> {
        self.require_table()?;
        let q = self.query;

        let columns = q.columns.join(", ");
        let body = self.select_body()?;
        let order = self.orderings();
        let parts = SelectParts {
            distinct: q.distinct,
            columns: &columns,
            body: &body,
            order: &order,
        };

        let sql = pagination::render(
            self.spec.pagination,
            &parts,
            Window::new(q.limit, q.offset),
        );
        Ok(self.finish(StatementKind::Select, sql))
    }

    /// Compile `SELECT AGG(column) FROM ...` (no ordering or pagination).
    pub fn aggregate(mut self, func: Aggregate, column: &str) -> QueryResult<CompiledStatement> {
        self.require_table()?;
        if column.trim().is_empty() {
            return Err(QueryError::invalid_statement("aggregate requires a column"));
        }
        let body = self.select_body()?;
        let sql = format!("SELECT {} {}", func.render(column), body);
        Ok(self.finish(StatementKind::Select, sql))
    }

    /// Compile a single-row INSERT.
    pub fn insert(mut self, values: &Values) -> QueryResult<CompiledStatement> {
        self.require_table()?;
        require_values(values, "INSERT")?;

        let columns: Vec<String> = values.iter().map(|(c, _)| self.wrap(c)).collect();
        let placeholders: Vec<String> = values.iter().map(|(_, v)| self.operand(v)).collect();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.wrap(&self.query.table),
            columns.join(", "),
            placeholders.join(", ")
        );
        Ok(self.finish(StatementKind::Insert, sql))
    }

    /// Compile an UPDATE with the builder's WHERE clause.
    pub fn update(mut self, values: &Values) -> QueryResult<CompiledStatement> {
        self.require_table()?;
        require_values(values, "UPDATE")?;

        let assignments: Vec<String> = values
            .iter()
            .map(|(c, v)| format!("{} = {}", self.wrap(c), self.operand(v)))
            .collect();

        let mut sql = format!(
            "UPDATE {} SET {}",
            self.wrap(&self.query.table),
            assignments.join(", ")
        );
        self.push_wheres(&mut sql);
        Ok(self.finish(StatementKind::Update, sql))
    }

    /// Compile `UPDATE ... SET column = column <op> ?`.
    pub fn step(mut self, column: &str, op: &str, by: i64) -> QueryResult<CompiledStatement> {
        self.require_table()?;
        if column.trim().is_empty() {
            return Err(QueryError::invalid_statement("UPDATE requires a column"));
        }
        let wrapped = self.wrap(column);
        let placeholder = self.bind(Value::Int(by));
        let mut sql = format!(
            "UPDATE {} SET {wrapped} = {wrapped} {op} {placeholder}",
            self.wrap(&self.query.table)
        );
        self.push_wheres(&mut sql);
        Ok(self.finish(StatementKind::Update, sql))
    }

    /// Compile a DELETE with the builder's WHERE clause.
    pub fn delete(mut self) -> QueryResult<CompiledStatement> {
        self.require_table()?;
        let mut sql = format!("DELETE FROM {}", self.wrap(&self.query.table));
        self.push_wheres(&mut sql);
        Ok(self.finish(StatementKind::Delete, sql))
    }

    // ==================== Clauses ====================

    /// Quote an identifier with the dialect's quote style.
    pub fn wrap(&self, identifier: &str) -> String {
        crate::ident::wrap(identifier, self.spec.quote)
    }

    /// `FROM table [joins] [WHERE] [GROUP BY] [HAVING]`, collecting params in order.
    fn select_body(&mut self) -> QueryResult<String> {
        let q = self.query;
        let mut sql = format!("FROM {}", self.wrap(&q.table));

        for join in &q.joins {
            sql.push(' ');
            sql.push_str(&self.join(join)?);
        }

        self.push_wheres(&mut sql);

        if !q.groupings.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&q.groupings.join(", "));
        }

        if !q.havings.is_empty() {
            let having = self.predicates(&q.havings);
            sql.push_str(" HAVING ");
            sql.push_str(&having);
        }

        Ok(sql)
    }

    fn push_wheres(&mut self, sql: &mut String) {
        let q = self.query;
        if !q.wheres.is_empty() {
            let wheres = self.predicates(&q.wheres);
            sql.push_str(" WHERE ");
            sql.push_str(&wheres);
        }
    }

    fn join(&self, join: &Join) -> QueryResult<String> {
        if join.conditions.is_empty() && join.join_type != JoinType::Cross {
            return Err(QueryError::invalid_statement(format!(
                "{} {} requires an ON condition",
                join.join_type.as_sql(),
                join.table
            )));
        }
        let mut sql = format!("{} {}", join.join_type.as_sql(), self.wrap(&join.table));
        for (i, cond) in join.conditions.iter().enumerate() {
            if i == 0 {
                sql.push_str(" ON ");
            } else {
                sql.push(' ');
                sql.push_str(cond.separator.as_str());
                sql.push(' ');
            }
            sql.push_str(&format!("{} {} {}", cond.left, cond.operator, cond.right));
        }
        Ok(sql)
    }

    fn orderings(&self) -> String {
        let q = self.query;
        if q.orderings.is_empty() {
            return String::new();
        }
        let items: Vec<String> = q
            .orderings
            .iter()
            .map(|o| match o.direction {
                Some(direction) => format!("{} {}", o.column, direction.as_str()),
                None => o.column.clone(),
            })
            .collect();
        format!(" ORDER BY {}", items.join(", "))
    }

    /// Render a predicate list; the first rendered predicate drops its separator.
    fn predicates(&mut self, predicates: &Predicates) -> String {
        let mut sql = String::new();
        for clause in predicates.clauses() {
            let rendered = self.predicate(&clause.predicate);
            if rendered.is_empty() {
                continue;
            }
            if !sql.is_empty() {
                sql.push(' ');
                sql.push_str(clause.separator.as_str());
                sql.push(' ');
            }
            sql.push_str(&rendered);
        }
        sql
    }

    fn predicate(&mut self, predicate: &Predicate) -> String {
        match predicate {
            Predicate::Compare {
                column,
                operator,
                value,
            } => format!("{} {} {}", column, operator, self.operand(value)),
            Predicate::Between {
                column,
                low,
                high,
                negated,
            } => {
                let low = self.operand(low);
                let high = self.operand(high);
                let op = if *negated { "NOT BETWEEN" } else { "BETWEEN" };
                format!("{column} {op} {low} AND {high}")
            }
            Predicate::In {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    // `IN ()` is not valid SQL.
                    let constant = if *negated { "1 = 1" } else { "1 = 0" };
                    return constant.to_string();
                }
                let items: Vec<String> = values.iter().map(|v| self.operand(v)).collect();
                let op = if *negated { "NOT IN" } else { "IN" };
                format!("{} {} ({})", column, op, items.join(", "))
            }
            Predicate::Null { column, negated } => {
                if *negated {
                    format!("{column} IS NOT NULL")
                } else {
                    format!("{column} IS NULL")
                }
            }
            Predicate::Raw(sql) => sql.trim().to_string(),
            Predicate::Group(group) => {
                let inner = self.predicates(group);
                if inner.is_empty() {
                    inner
                } else {
                    format!("({inner})")
                }
            }
        }
    }

    // ==================== Parameters ====================

    fn operand(&mut self, operand: &Operand) -> String {
        match operand {
            Operand::Bind(value) => self.bind(value.clone()),
            Operand::Raw(expr) => expr.as_str().to_string(),
        }
    }

    fn bind(&mut self, value: Value) -> String {
        self.params.push(value);
        "?".to_string()
    }

    fn require_table(&self) -> QueryResult<()> {
        if self.query.table.trim().is_empty() {
            return Err(QueryError::invalid_statement("statement requires a table"));
        }
        Ok(())
    }

    fn finish(self, kind: StatementKind, sql: String) -> CompiledStatement {
        let stmt = CompiledStatement {
            kind,
            dialect: self.query.dialect,
            sql,
            params: self.params,
        };
        #[cfg(feature = "tracing")]
        trace_statement(&stmt);
        stmt
    }
}

fn require_values(values: &Values, statement: &str) -> QueryResult<()> {
    if values.is_empty() {
        return Err(QueryError::invalid_statement(format!(
            "{statement} requires at least one column"
        )));
    }
    if values.iter().any(|(c, _)| c.trim().is_empty()) {
        return Err(QueryError::invalid_statement(format!(
            "{statement} column names cannot be empty"
        )));
    }
    Ok(())
}

#[cfg(feature = "tracing")]
const MAX_TRACED_SQL: usize = 200;

#[cfg(feature = "tracing")]
fn trace_statement(stmt: &CompiledStatement) {
    let sql = truncate_sql_bytes(&stmt.sql, MAX_TRACED_SQL);
    tracing::debug!(
        target: "polysql.sql",
        kind = %stmt.kind,
        dialect = %stmt.dialect,
        param_count = stmt.params.len(),
        sql = %sql,
    );
}

/// Truncate to at most `max` bytes on a char boundary.
#[cfg(feature = "tracing")]
fn truncate_sql_bytes(sql: &str, max: usize) -> &str {
    if sql.len() <= max {
        return sql;
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
