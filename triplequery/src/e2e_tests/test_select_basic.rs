//! Test projection and deduplication on a two-triple store.

use crate::e2e_tests::helpers::{engine, pattern, selection, stmt, t, tuples, v, values};
use crate::query::{SelectOptions, Variable};
use crate::testing::{ex, graph_of};

/// Store: (a p b), (a p c). Pattern: (?s p ?o).
fn setup() -> crate::storage::Graph {
    graph_of(&[("a", "p", "b"), ("a", "p", "c")])
}

#[test]
fn test_select_without_distinct_keeps_match_order() {
    let store = setup();
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let result = query
        .select(&SelectOptions::new(selection("?o")).distinct(false))
        .expect("select");
    assert_eq!(values(&result), vec![Some(ex("b")), Some(ex("c"))]);
}

#[test]
fn test_select_distinct_objects() {
    let store = setup();
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let result = query.select(&SelectOptions::new(selection("?o"))).expect("select");
    let mut found = values(&result);
    found.sort();
    assert_eq!(found, vec![Some(ex("b")), Some(ex("c"))]);
}

#[test]
fn test_distinct_collapses_repeated_subject() {
    let store = setup();
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let all = query
        .select(&SelectOptions::new(selection("?s")).distinct(false))
        .expect("select");
    assert_eq!(values(&all), vec![Some(ex("a")), Some(ex("a"))]);

    let distinct = query.select(&SelectOptions::new(selection("?s"))).expect("select");
    assert_eq!(values(&distinct), vec![Some(ex("a"))]);
}

#[test]
fn test_ask_is_true() {
    let store = setup();
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");
    assert!(query.ask());
}

#[test]
fn test_select_star_returns_all_variables() {
    let store = setup();
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let result = query.select(&SelectOptions::all()).expect("select");
    assert_eq!(result.columns, vec![Variable::new("s"), Variable::new("o")]);
    assert_eq!(
        tuples(&result),
        vec![
            vec![Some(ex("a")), Some(ex("b"))],
            vec![Some(ex("a")), Some(ex("c"))],
        ]
    );
}

#[test]
fn test_unknown_column_is_unset() {
    let store = setup();
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let result = query
        .select(&SelectOptions::new(selection("?o ?nothing")).distinct(false))
        .expect("select");
    assert_eq!(
        tuples(&result),
        vec![vec![Some(ex("b")), None], vec![Some(ex("c")), None]]
    );
}

#[test]
fn test_join_across_statements() {
    let store = graph_of(&[
        ("a", "knows", "b"),
        ("b", "knows", "c"),
        ("c", "knows", "d"),
        ("b", "likes", "x"),
    ]);
    let query = engine(&store)
        .build(
            &[pattern(vec![
                stmt(v("x"), t("knows"), v("y")),
                stmt(v("y"), t("knows"), v("z")),
            ])],
            &[],
        )
        .expect("build");

    let result = query.select(&SelectOptions::new(selection("?x ?z"))).expect("select");
    assert_eq!(
        tuples(&result),
        vec![vec![Some(ex("a")), Some(ex("c"))], vec![Some(ex("b")), Some(ex("d"))]]
    );
}

#[test]
fn test_repeated_variable_in_statement() {
    let store = graph_of(&[("a", "same", "a"), ("a", "same", "b"), ("c", "same", "c")]);
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("x"), t("same"), v("x"))])], &[])
        .expect("build");

    let result = query.select(&SelectOptions::new(selection("?x"))).expect("select");
    assert_eq!(values(&result), vec![Some(ex("a")), Some(ex("c"))]);
}

#[test]
fn test_select_is_repeatable() {
    let store = graph_of(&[("a", "p", "b"), ("b", "p", "c"), ("c", "p", "a")]);
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let options = SelectOptions::all().distinct(false);
    let first = query.select(&options).expect("select");
    let second = query.select(&options).expect("select");
    assert_eq!(first.rows, second.rows);

    let rebuilt = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build")
        .select(&options)
        .expect("select");
    assert_eq!(first.rows, rebuilt.rows);
}
