//! Test CONSTRUCT, with and without a template.

use std::collections::HashSet;

use crate::e2e_tests::helpers::{engine, fact, pattern, people, stmt, t, v};
use crate::query::Slot;
use crate::storage::Graph;
use crate::testing::{ex, ex_triple, graph_of};
use crate::types::{Term, Triple};

#[test]
fn test_construct_without_template_returns_matched_triples() {
    let store = graph_of(&[("a", "p", "b"), ("a", "p", "c"), ("a", "q", "d")]);
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let graph = query.construct(None);
    assert_eq!(graph.len(), 2);
    assert!(graph.contains(&ex_triple("a", "p", "b")));
    assert!(graph.contains(&ex_triple("a", "p", "c")));
}

#[test]
fn test_construct_without_template_follows_whole_branch() {
    let store = graph_of(&[
        ("a", "knows", "b"),
        ("b", "knows", "c"),
        ("x", "knows", "y"),
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

    let graph = query.construct(None);
    let expected: Graph = [ex_triple("a", "knows", "b"), ex_triple("b", "knows", "c")]
        .into_iter()
        .collect();
    assert_eq!(graph.len(), 2);
    assert!(graph.difference(&expected).is_empty());
}

#[test]
fn test_construct_excludes_optional_matches() {
    let store = people();
    let query = engine(&store)
        .build(
            &[pattern(vec![stmt(v("p"), t("name"), v("n"))])],
            &[pattern(vec![stmt(v("p"), t("age"), v("a"))])],
        )
        .expect("build");

    let graph = query.construct(None);
    assert_eq!(graph.len(), 4);
    assert!(graph.iter().all(|triple| triple.predicate == ex("name")));
}

#[test]
fn test_construct_template_skips_unresolved_statements() {
    let store = people();
    let query = engine(&store)
        .build(
            &[pattern(vec![stmt(v("p"), t("name"), v("n"))])],
            &[pattern(vec![stmt(v("p"), t("age"), v("a"))])],
        )
        .expect("build");

    let template = pattern(vec![
        stmt(v("p"), t("label"), v("n")),
        stmt(v("p"), t("years"), v("a")),
    ]);
    let graph = query.construct(Some(&template));

    // Four labels, three ages: dave has no ?a.
    assert_eq!(graph.len(), 7);
    assert!(graph.contains(&fact("dave", "label", Term::literal("Dave"))));
    assert!(graph.contains(&fact("bob", "years", Term::integer(25))));
    assert!(
        !graph
            .iter()
            .any(|triple| triple.subject == ex("dave") && triple.predicate == ex("years"))
    );
}

#[test]
fn test_construct_template_blank_nodes_are_fresh_per_row() {
    let store = graph_of(&[("a", "p", "b"), ("c", "p", "d")]);
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let template = pattern(vec![
        stmt(Slot::Term(Term::blank("edge")), t("from"), v("s")),
        stmt(Slot::Term(Term::blank("edge")), t("to"), v("o")),
    ])
    .with_blank_nodes(["edge"]);
    let graph = query.construct(Some(&template));
    assert_eq!(graph.len(), 4);

    let subjects: HashSet<&Term> = graph.iter().map(|triple| &triple.subject).collect();
    assert_eq!(subjects.len(), 2, "one blank node per row");
    assert!(subjects.iter().all(|subject| subject.is_blank_node()));

    // Within a row the same label maps to the same node.
    for subject in subjects {
        let outgoing = graph.iter().filter(|triple| &triple.subject == subject).count();
        assert_eq!(outgoing, 2);
    }

    // A second call mints different nodes.
    let again = query.construct(Some(&template));
    assert!(again.intersection(&graph).is_empty());
}

#[test]
fn test_construct_template_keeps_undeclared_blank_nodes() {
    let store = graph_of(&[("a", "p", "b"), ("c", "p", "d")]);
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");

    let mut template = pattern(vec![stmt(Slot::Term(Term::blank("shared")), t("seen"), v("s"))]);
    let local = template.blank_node("row");
    template.add_pattern(stmt(Slot::Term(local), t("of"), v("s")));

    let graph = query.construct(Some(&template));
    assert_eq!(graph.len(), 4);
    assert!(graph.contains(&Triple::new(Term::blank("shared"), ex("seen"), ex("a"))));
    assert!(graph.contains(&Triple::new(Term::blank("shared"), ex("seen"), ex("c"))));
    assert!(
        graph
            .iter()
            .filter(|triple| triple.predicate == ex("of"))
            .all(|triple| triple.subject != Term::blank("row"))
    );
}

#[test]
fn test_construct_template_drops_literal_subjects() {
    let store = people();
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("p"), t("name"), v("n"))])], &[])
        .expect("build");

    let template = pattern(vec![
        stmt(v("n"), t("nameOf"), v("p")),
        stmt(v("p"), t("named"), v("n")),
    ]);
    let graph = query.construct(Some(&template));
    assert_eq!(graph.len(), 4);
    assert!(graph.iter().all(|triple: &Triple| triple.subject.is_subject_capable()));
}

#[test]
fn test_construct_over_union_merges_both_sides() {
    let store = graph_of(&[("a", "p", "b"), ("c", "q", "d")]);
    let engine = engine(&store);
    let first = engine
        .build(&[pattern(vec![stmt(v("s"), t("p"), v("o"))])], &[])
        .expect("build");
    let second = engine
        .build(&[pattern(vec![stmt(v("s"), t("q"), v("o"))])], &[])
        .expect("build");

    let graph = (first + second).construct(None);
    assert_eq!(graph.len(), 2);
    assert!(graph.contains(&ex_triple("a", "p", "b")));
    assert!(graph.contains(&ex_triple("c", "q", "d")));
}

#[test]
fn test_construct_on_clash_is_empty() {
    let store = graph_of(&[("a", "p", "b")]);
    let query = engine(&store)
        .build(&[pattern(vec![stmt(v("s"), t("missing"), v("o"))])], &[])
        .expect("build");
    assert!(query.construct(None).is_empty());
    let template = pattern(vec![stmt(v("s"), t("p"), v("o"))]);
    assert!(query.construct(Some(&template)).is_empty());
}
