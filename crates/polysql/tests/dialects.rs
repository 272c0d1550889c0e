use polysql::{Dialect, Direction, JoinType, StatementKind, Value, Values, query, raw, table};

fn users(dialect: Dialect) -> polysql::QueryBuilder {
    table("users", dialect)
        .join_on("orders", JoinType::Left, |j| {
            j.on("users.id", "=", "orders.user_id");
        })
        .eq("users.active", true)
        .where_group(|g| {
            g.gt("orders.total", 100).or_is_null("orders.total");
        })
        .group_by("users.id")
        .having("COUNT(orders.id)", ">=", 2)
        .order_by("users.id", Direction::Asc)
}

#[test]
fn same_builder_compiles_for_every_dialect() {
    for dialect in Dialect::ALL {
        let stmt = users(dialect)
            .limit(10)
            .offset(20)
            .select_all(&["users.id", "COUNT(orders.id)"])
            .unwrap();
        assert_eq!(stmt.kind, StatementKind::Select);
        assert_eq!(stmt.dialect, dialect);
        assert_eq!(
            stmt.params,
            vec![Value::Bool(true), Value::Int(100), Value::Int(2)],
            "{dialect}"
        );
        assert_eq!(stmt.placeholder_count(), 3, "{dialect}");
        assert!(stmt.sql.contains(&dialect.wrap("users")), "{dialect}: {}", stmt.sql);
    }
}

#[test]
fn pagination_shape_per_dialect() {
    let sql = |d: Dialect| users(d).limit(10).offset(20).select().unwrap().sql;

    assert!(sql(Dialect::Generic).ends_with(" LIMIT 10 OFFSET 20"));
    assert!(sql(Dialect::MySql).ends_with(" LIMIT 10 OFFSET 20"));
    assert!(sql(Dialect::SqlServer).ends_with(" AS m1 WHERE mako_rownum BETWEEN 21 AND 30"));
    assert!(sql(Dialect::Db2).ends_with(" AS m1 WHERE mako_rownum BETWEEN 21 AND 30"));
    assert!(sql(Dialect::Oracle).ends_with(" WHERE rownum <= 30) WHERE mako_rownum >= 21"));
    assert!(sql(Dialect::Firebird).ends_with(" ROWS 21 TO 30"));
    assert!(sql(Dialect::NuoDb).ends_with(" FETCH 10 OFFSET 20"));
}

#[test]
fn row_number_over_uses_builder_order() {
    let stmt = users(Dialect::SqlServer).limit(10).offset(20).select().unwrap();
    assert!(stmt.sql.contains("ROW_NUMBER() OVER (ORDER BY users.id ASC) AS mako_rownum"));
    assert!(stmt.sql.starts_with("SELECT * FROM (SELECT *, ROW_NUMBER()"));
}

#[test]
fn driver_identifiers_select_dialect() {
    let stmt = query("t", "sqlsrv").limit(3).select().unwrap();
    assert_eq!(stmt.sql, "SELECT TOP 3 * FROM [t]");

    let stmt = query("t", "oci").limit(3).select().unwrap();
    assert_eq!(stmt.sql, "SELECT m1.* FROM (SELECT * FROM t) m1 WHERE rownum <= 3");

    let stmt = query("t", "sqlite").limit(3).select().unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM t LIMIT 3");
}

#[test]
fn writes_quote_table_and_columns() {
    let values = || Values::new().set("email", "a@b.com").set("updated_at", raw("NOW()"));

    let stmt = table("users", Dialect::NuoDb).insert(values()).unwrap();
    assert_eq!(
        stmt.sql,
        r#"INSERT INTO "users" ("email", "updated_at") VALUES (?, NOW())"#
    );

    let stmt = table("app.users", Dialect::MySql).eq("id", 7).update(values()).unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE `app`.`users` SET `email` = ?, `updated_at` = NOW() WHERE id = ?"
    );
    assert_eq!(
        stmt.params,
        vec![Value::Text("a@b.com".into()), Value::Int(7)]
    );
}

#[test]
fn pagination_never_reaches_writes() {
    for dialect in Dialect::ALL {
        let stmt = table("t", dialect).eq("a", 1).limit(5).offset(5).delete().unwrap();
        assert_eq!(stmt.sql, format!("DELETE FROM {} WHERE a = ?", dialect.wrap("t")));
    }
}

#[test]
fn compiled_statement_serializes() {
    let stmt = table("t", Dialect::SqlServer).eq("id", 5).select().unwrap();
    let json = serde_json::to_value(&stmt).unwrap();
    assert_eq!(json["kind"], "select");
    assert_eq!(json["dialect"], "sqlserver");
    assert_eq!(json["sql"], "SELECT * FROM [t] WHERE id = ?");
    assert_eq!(json["params"], serde_json::json!([5]));
}
