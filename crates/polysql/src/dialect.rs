//! Database dialects.
//!
//! A [`Dialect`] is resolved once (usually from a driver identifier) and maps,
//! through a static table, to a [`DialectSpec`]: the identifier quoting style
//! and the pagination strategy the compiler uses for SELECT statements.

use crate::error::{QueryError, QueryResult};
use crate::ident::{self, QuoteStyle};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// ANSI-ish fallback: no quoting, `LIMIT n OFFSET m`.
    #[default]
    Generic,
    MySql,
    SqlServer,
    Oracle,
    Db2,
    Firebird,
    NuoDb,
}

/// How a dialect expresses LIMIT/OFFSET on SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// ` LIMIT n OFFSET m`
    LimitOffset,
    /// ` LIMIT n OFFSET m`, with a maximal LIMIT when only OFFSET is set.
    MySqlLimit,
    /// `SELECT TOP n ...`, or ROW_NUMBER() nesting once an offset is set.
    TopOrRowNumber,
    /// Oracle `rownum` subqueries.
    RowNum,
    /// ROW_NUMBER() nesting whenever a limit or offset is set.
    RowNumber,
    /// Firebird ` ROWS a TO b`
    RowsTo,
    /// ` FETCH n OFFSET m`
    FetchOffset,
}

/// Per-dialect compile configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DialectSpec {
    pub quote: QuoteStyle,
    pub pagination: Pagination,
}

const fn spec(quote: QuoteStyle, pagination: Pagination) -> DialectSpec {
    DialectSpec { quote, pagination }
}

/// Indexed by `Dialect as usize`.
static SPECS: [DialectSpec; 7] = [
    spec(QuoteStyle::None, Pagination::LimitOffset),
    spec(QuoteStyle::Backtick, Pagination::MySqlLimit),
    spec(QuoteStyle::Bracket, Pagination::TopOrRowNumber),
    spec(QuoteStyle::None, Pagination::RowNum),
    spec(QuoteStyle::None, Pagination::RowNumber),
    spec(QuoteStyle::None, Pagination::RowsTo),
    spec(QuoteStyle::DoubleQuote, Pagination::FetchOffset),
];

/// Driver identifier -> dialect.
static DRIVERS: &[(&str, Dialect)] = &[
    ("mysql", Dialect::MySql),
    ("sqlsrv", Dialect::SqlServer),
    ("mssql", Dialect::SqlServer),
    ("dblib", Dialect::SqlServer),
    ("oci", Dialect::Oracle),
    ("ibm", Dialect::Db2),
    ("db2", Dialect::Db2),
    ("firebird", Dialect::Firebird),
    ("nuodb", Dialect::NuoDb),
];

impl Dialect {
    /// All dialects, in declaration order.
    pub const ALL: [Dialect; 7] = [
        Dialect::Generic,
        Dialect::MySql,
        Dialect::SqlServer,
        Dialect::Oracle,
        Dialect::Db2,
        Dialect::Firebird,
        Dialect::NuoDb,
    ];

    /// Resolve a driver identifier (`mysql`, `sqlsrv`, `oci`, ...).
    ///
    /// Unknown drivers fall back to [`Dialect::Generic`].
    pub fn from_driver(driver: &str) -> Self {
        Self::lookup_driver(driver).unwrap_or(Dialect::Generic)
    }

    fn lookup_driver(driver: &str) -> Option<Self> {
        let driver = driver.trim();
        DRIVERS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(driver))
            .map(|(_, dialect)| *dialect)
    }

    /// Driver identifiers that resolve to this dialect.
    pub fn drivers(self) -> impl Iterator<Item = &'static str> {
        DRIVERS
            .iter()
            .filter(move |(_, d)| *d == self)
            .map(|(name, _)| *name)
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Dialect::Generic => "generic",
            Dialect::MySql => "mysql",
            Dialect::SqlServer => "sqlserver",
            Dialect::Oracle => "oracle",
            Dialect::Db2 => "db2",
            Dialect::Firebird => "firebird",
            Dialect::NuoDb => "nuodb",
        }
    }

    /// Quoting style and pagination strategy.
    pub fn spec(self) -> DialectSpec {
        SPECS[self as usize]
    }

    /// Quote an identifier for this dialect (`a.b` quotes both segments).
    pub fn wrap(self, identifier: &str) -> String {
        ident::wrap(identifier, self.spec().quote)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = QueryError;

    /// Strict parsing: driver identifiers or dialect names, nothing else.
    fn from_str(s: &str) -> QueryResult<Self> {
        if let Some(dialect) = Self::lookup_driver(s) {
            return Ok(dialect);
        }
        Self::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QueryError::unsupported_dialect(format!("unknown driver '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_mapping() {
        assert_eq!(Dialect::from_driver("mysql"), Dialect::MySql);
        for d in ["mssql", "dblib", "sqlsrv"] {
            assert_eq!(Dialect::from_driver(d), Dialect::SqlServer);
        }
        assert_eq!(Dialect::from_driver("oci"), Dialect::Oracle);
        assert_eq!(Dialect::from_driver("ibm"), Dialect::Db2);
        assert_eq!(Dialect::from_driver("db2"), Dialect::Db2);
        assert_eq!(Dialect::from_driver("firebird"), Dialect::Firebird);
        assert_eq!(Dialect::from_driver("nuodb"), Dialect::NuoDb);
    }

    #[test]
    fn unknown_driver_falls_back_to_generic() {
        assert_eq!(Dialect::from_driver("pgsql"), Dialect::Generic);
        assert_eq!(Dialect::from_driver(""), Dialect::Generic);
    }

    #[test]
    fn driver_lookup_is_case_insensitive() {
        assert_eq!(Dialect::from_driver(" MySQL "), Dialect::MySql);
    }

    #[test]
    fn strict_parse() {
        assert_eq!("sqlserver".parse::<Dialect>().unwrap(), Dialect::SqlServer);
        assert_eq!("oci".parse::<Dialect>().unwrap(), Dialect::Oracle);
        assert_eq!("generic".parse::<Dialect>().unwrap(), Dialect::Generic);
        let err = "pgsql".parse::<Dialect>().unwrap_err();
        assert!(err.is_unsupported_dialect());
    }

    #[test]
    fn spec_table_is_aligned() {
        assert_eq!(Dialect::MySql.spec().quote, QuoteStyle::Backtick);
        assert_eq!(Dialect::SqlServer.spec().quote, QuoteStyle::Bracket);
        assert_eq!(Dialect::NuoDb.spec().quote, QuoteStyle::DoubleQuote);
        assert_eq!(Dialect::Oracle.spec().pagination, Pagination::RowNum);
        assert_eq!(Dialect::Db2.spec().pagination, Pagination::RowNumber);
        assert_eq!(Dialect::Firebird.spec().pagination, Pagination::RowsTo);
        assert_eq!(Dialect::Generic.spec().quote, QuoteStyle::None);
    }

    #[test]
    fn mysql_wrap_dotted() {
        assert_eq!(Dialect::MySql.wrap("a.b"), "`a`.`b`");
        assert_ne!(Dialect::MySql.wrap("a.b"), "`a.b`");
    }

    #[test]
    fn drivers_listing() {
        let drivers: Vec<_> = Dialect::SqlServer.drivers().collect();
        assert_eq!(drivers, vec!["sqlsrv", "mssql", "dblib"]);
        assert_eq!(Dialect::Generic.drivers().count(), 0);
    }

    #[test]
    fn serde_names() {
        let d: Dialect = serde_json::from_str(r#""nuodb""#).unwrap();
        assert_eq!(d, Dialect::NuoDb);
        assert_eq!(serde_json::to_string(&Dialect::SqlServer).unwrap(), r#""sqlserver""#);
    }
}
