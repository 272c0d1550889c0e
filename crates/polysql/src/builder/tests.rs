use super::*;
use crate::value::{Value, raw};

#[test]
fn test_new_defaults() {
    let qb = QueryBuilder::new("users", Dialect::MySql);
    assert_eq!(qb.table(), "users");
    assert_eq!(qb.dialect(), Dialect::MySql);
    assert_eq!(qb.get_columns(), ["*".to_string()]);
    assert!(!qb.is_distinct());
    assert!(qb.wheres().is_empty());
    assert!(qb.havings().is_empty());
    assert_eq!(qb.get_limit(), None);
    assert_eq!(qb.get_offset(), None);
}

#[test]
fn test_for_driver() {
    assert_eq!(QueryBuilder::for_driver("t", "sqlsrv").dialect(), Dialect::SqlServer);
    assert_eq!(QueryBuilder::for_driver("t", "OCI").dialect(), Dialect::Oracle);
    assert_eq!(QueryBuilder::for_driver("t", "pgsql").dialect(), Dialect::Generic);
}

#[test]
fn test_with_dialect_switches_output() {
    let qb = QueryBuilder::new("t", Dialect::Generic).limit(5);
    assert_eq!(qb.select().unwrap().sql, "SELECT * FROM t LIMIT 5");
    let qb = qb.with_dialect(Dialect::SqlServer);
    assert_eq!(qb.select().unwrap().sql, "SELECT TOP 5 * FROM [t]");
}

#[test]
fn test_columns() {
    let qb = QueryBuilder::new("t", Dialect::Generic).columns(&["id", "name AS n"]);
    assert_eq!(qb.select().unwrap().sql, "SELECT id, name AS n FROM t");

    let qb = qb.columns(&[]);
    assert_eq!(qb.get_columns(), ["*".to_string()]);
}

#[test]
fn test_select_all_does_not_touch_builder() {
    let qb = QueryBuilder::new("t", Dialect::Generic);
    let stmt = qb.select_all(&["id"]).unwrap();
    assert_eq!(stmt.sql, "SELECT id FROM t");
    assert_eq!(qb.get_columns(), ["*".to_string()]);

    let stmt = qb.select_all(&[]).unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM t");
}

#[test]
fn test_select_first_does_not_set_limit() {
    let qb = QueryBuilder::new("t", Dialect::Generic).limit(50);
    let stmt = qb.select_first(&["*"]).unwrap();
    assert!(stmt.sql.ends_with("LIMIT 1"));
    assert_eq!(qb.get_limit(), Some(50));
}

#[test]
fn test_where_accumulates_in_order() {
    let qb = QueryBuilder::new("t", Dialect::Generic)
        .eq("a", 1)
        .ne("b", 2)
        .gte("c", 3)
        .lte("d", 4)
        .like("e", "x%")
        .not_like("f", "%y");
    assert_eq!(qb.wheres().len(), 6);
    assert_eq!(
        qb.select().unwrap().sql,
        "SELECT * FROM t WHERE a = ? AND b != ? AND c >= ? AND d <= ? AND e LIKE ? AND f NOT LIKE ?"
    );
}

#[test]
fn test_limit_offset_clamp_and_replace() {
    let qb = QueryBuilder::new("t", Dialect::Generic).limit(-5).offset(-1);
    assert_eq!(qb.get_limit(), Some(0));
    assert_eq!(qb.get_offset(), Some(0));

    let qb = qb.limit(10).limit(20).offset(3);
    assert_eq!(qb.get_limit(), Some(20));
    assert_eq!(qb.get_offset(), Some(3));
}

#[test]
fn test_paginate() {
    let qb = QueryBuilder::new("t", Dialect::Generic).paginate(3, 25);
    assert_eq!(qb.get_limit(), Some(25));
    assert_eq!(qb.get_offset(), Some(50));

    let qb = QueryBuilder::new("t", Dialect::Generic).paginate(0, 0);
    assert_eq!(qb.get_limit(), Some(1));
    assert_eq!(qb.get_offset(), Some(0));
}

#[test]
fn test_order_by_variants() {
    let qb = QueryBuilder::new("t", Dialect::Generic)
        .order_by("a", Direction::Desc)
        .order_by_asc("b")
        .order_by_raw("FIELD(id, 3, 1, 2)");
    assert_eq!(qb.orderings().len(), 3);
    assert_eq!(qb.orderings()[2].direction, None);
    assert_eq!(
        qb.select().unwrap().sql,
        "SELECT * FROM t ORDER BY a DESC, b ASC, FIELD(id, 3, 1, 2)"
    );
}

#[test]
fn test_direction_from_str() {
    assert_eq!("desc".parse::<Direction>().unwrap(), Direction::Desc);
    assert_eq!(" ASC ".parse::<Direction>().unwrap(), Direction::Asc);
    assert!("sideways".parse::<Direction>().is_err());
}

#[test]
fn test_group_by_cols() {
    let qb = QueryBuilder::new("t", Dialect::Generic)
        .group_by("a")
        .group_by_cols(&["b", "c"]);
    assert_eq!(qb.groupings(), ["a", "b", "c"]);
}

#[test]
fn test_join_helpers() {
    let qb = QueryBuilder::new("a", Dialect::Generic)
        .inner_join("b", "a.id", "=", "b.a_id")
        .right_join("c", "a.id", "=", "c.a_id")
        .join("d", "a.id", "=", "d.a_id", JoinType::Left);
    let types: Vec<JoinType> = qb.joins().iter().map(|j| j.join_type).collect();
    assert_eq!(types, vec![JoinType::Inner, JoinType::Right, JoinType::Left]);
    assert_eq!(
        qb.select().unwrap().sql,
        "SELECT * FROM a INNER JOIN b ON a.id = b.a_id RIGHT JOIN c ON a.id = c.a_id LEFT JOIN d ON a.id = d.a_id"
    );
}

#[test]
fn test_values_replace_in_place() {
    let values = Values::new().set("a", 1).set("b", 2).set("a", 3);
    assert_eq!(values.len(), 2);
    let cols: Vec<&str> = values.iter().map(|(c, _)| c).collect();
    assert_eq!(cols, vec!["a", "b"]);
    assert_eq!(values.iter().next().map(|(_, v)| v.clone()), Some(Operand::Bind(Value::Int(3))));
}

#[test]
fn test_values_set_opt() {
    let values = Values::new()
        .set_opt("a", Some(1))
        .set_opt::<i32>("b", None)
        .set("c", raw("DEFAULT"));
    assert_eq!(values.len(), 2);
    assert!(values.iter().any(|(c, v)| c == "c" && v.is_raw()));
}

#[test]
fn test_values_from_iter() {
    let values: Values = [("x", 1), ("y", 2)].into_iter().collect();
    assert_eq!(values.len(), 2);
    assert!(!values.is_empty());
}

#[test]
fn test_option_value_binds_null() {
    let stmt = QueryBuilder::new("t", Dialect::Generic)
        .update(Values::new().set("note", None::<String>))
        .unwrap();
    assert_eq!(stmt.sql, "UPDATE t SET note = ?");
    assert_eq!(stmt.params, vec![Value::Null]);
}

#[test]
fn test_builder_clone_is_independent() {
    let base = QueryBuilder::new("t", Dialect::Generic).eq("a", 1);
    let narrowed = base.clone().eq("b", 2);
    assert_eq!(base.wheres().len(), 1);
    assert_eq!(narrowed.wheres().len(), 2);
}

#[test]
fn test_prebuilt_predicates() {
    let qb = QueryBuilder::new("t", Dialect::Generic)
        .where_predicate(
            Separator::And,
            Predicate::Null {
                column: "a".into(),
                negated: true,
            },
        )
        .group_by("a")
        .having_predicate(Separator::Or, Predicate::Raw("COUNT(*) > 1".into()));
    assert_eq!(
        qb.select().unwrap().sql,
        "SELECT * FROM t WHERE a IS NOT NULL GROUP BY a HAVING COUNT(*) > 1"
    );
}
