//! # polysql
//!
//! A dialect-aware SQL query compiler.
//!
//! ## Features
//!
//! - **Fluent builder**: accumulate WHERE, JOIN, GROUP BY, HAVING, ORDER BY and pagination
//! - **Bound parameters**: every value becomes a positional `?`, collected in placeholder order
//! - **Raw expressions**: [`raw()`] inlines SQL fragments that are never bound
//! - **Dialects**: Generic, MySQL, SQL Server, Oracle, DB2, Firebird and NuoDB quoting and pagination
//! - **Pure compilation**: terminals borrow the builder; compiling twice yields identical output
//! - **Execution-agnostic**: [`Executor`] dispatches a [`CompiledStatement`] on its kind tag
//!
//! ## Example
//!
//! ```ignore
//! use polysql::{Dialect, Values, raw, table};
//!
//! // SELECT
//! let stmt = table("users", Dialect::MySql)
//!     .eq("email", "a@b.com")
//!     .order_by_asc("id")
//!     .limit(1)
//!     .select_all(&["*"])?;
//! assert_eq!(stmt.sql, "SELECT * FROM `users` WHERE email = ? ORDER BY id ASC LIMIT 1");
//!
//! // INSERT
//! let stmt = table("users", Dialect::SqlServer)
//!     .insert(Values::new().set("name", "alice").set("created_at", raw("GETDATE()")))?;
//! assert_eq!(stmt.sql, "INSERT INTO [users] ([name], [created_at]) VALUES (?, GETDATE())");
//!
//! // Paginated SELECT on SQL Server
//! let stmt = table("users", Dialect::SqlServer).limit(10).offset(20).select()?;
//! assert!(stmt.sql.contains("ROW_NUMBER() OVER (ORDER BY (SELECT 0))"));
//! # Ok::<(), polysql::QueryError>(())
//! ```
//!
//! ## Feature flags
//!
//! - `tracing`: emit a DEBUG event (target `polysql.sql`) for every compiled statement
//! - `rust_decimal`: add a `Value::Decimal` variant

pub mod builder;
pub mod compiler;
pub mod dialect;
pub mod error;
pub mod ident;
pub mod statement;
pub mod value;

pub use builder::{
    Direction, Join, JoinCondition, JoinType, Ordering, Predicate, Predicates, QueryBuilder,
    Separator, Values,
};
pub use compiler::{Aggregate, Compiler};
pub use dialect::{Dialect, DialectSpec, Pagination};
pub use error::{QueryError, QueryResult};
pub use ident::{Ident, QuoteStyle};
pub use statement::{CompiledStatement, Executor, Outcome, StatementKind};
pub use value::{Expression, Operand, Value, raw};

/// Start a query on `table` compiled with `dialect`.
pub fn table(name: &str, dialect: Dialect) -> QueryBuilder {
    QueryBuilder::new(name, dialect)
}

/// Start a query on `table`, resolving the dialect from a driver identifier
/// (`"mysql"`, `"sqlsrv"`, `"oci"`, ...). Unknown drivers fall back to
/// [`Dialect::Generic`].
pub fn query(name: &str, driver: &str) -> QueryBuilder {
    QueryBuilder::for_driver(name, driver)
}
