use std::collections::BTreeSet;

use num_bigint::BigUint;
use probreach::diagram::Diagram;
use probreach::error::Error;
use probreach::formula::{Formula, Term};
use probreach::graph::{Direction, EdgeFilter, NodeId, PathEnumerator, ProbGraph};
use probreach::named::{cost_to_probability, NamedGraph};
use probreach::query::{build_diagram, compile_and_evaluate, correlate, QueryOptions};
use probreach::types::{EdgeId, Variable};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use test_log::test;

const EPS: f64 = 1e-9;

fn var(id: u64, weight: f64) -> Variable {
    Variable::new(EdgeId::new(id), weight).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// A -KNOWS-> B -OWNS-> C, A -KNOWS-> D -KNOWS-> B, D -LIKES-> E -OWNS-> C.
///
/// Edge ids follow insertion order: ab = e1, bc = e2, ad = e3, db = e4, de = e5, ec = e6.
fn people() -> (ProbGraph, Vec<NodeId>) {
    let mut g = ProbGraph::new();
    let a = g.add_node("A", ["Person"]);
    let b = g.add_node("B", ["Person"]);
    let c = g.add_node("C", ["Dog"]);
    let d = g.add_node("D", ["Person"]);
    let e = g.add_node("E", ["Person"]);
    g.add_edge("KNOWS", a, b, 0.5).unwrap();
    g.add_edge("OWNS", b, c, 0.1).unwrap();
    g.add_edge("KNOWS", a, d, 0.4).unwrap();
    g.add_edge("KNOWS", d, b, 0.5).unwrap();
    g.add_edge("LIKES", d, e, 0.7).unwrap();
    g.add_edge("OWNS", e, c, 0.7).unwrap();
    (g, vec![a, b, c, d, e])
}

fn random_formula(rng: &mut ChaCha8Rng, num_vars: u64, num_terms: usize) -> Formula {
    let universe: Vec<Variable> = (1..=num_vars).map(|i| var(i, rng.gen_range(0.0..=1.0))).collect();
    let paths: Vec<Vec<Variable>> = (0..num_terms)
        .map(|_| {
            let len = rng.gen_range(1..=num_vars as usize);
            universe.choose_multiple(rng, len).copied().collect()
        })
        .collect();
    Formula::from_paths(paths).unwrap()
}

#[test]
fn test_single_path_is_product() {
    let formula = Formula::from_paths([vec![var(1, 0.3), var(2, 0.5), var(3, 0.2)]]).unwrap();
    let diagram = Diagram::compile(&formula);
    assert_close(diagram.probability(), 0.3 * 0.5 * 0.2);
    assert_eq!(diagram.node_count(), 3);
}

#[test]
fn test_disjoint_paths_union() {
    let p = compile_and_evaluate(
        [Term::new([EdgeId::new(1)]).unwrap(), Term::new([EdgeId::new(2)]).unwrap()],
        [var(1, 0.3), var(2, 0.6)],
    )
    .unwrap();
    assert_close(p, 1.0 - (1.0 - 0.3) * (1.0 - 0.6));
}

#[test]
fn test_universe_is_exactly_the_referenced_variables() {
    let e2 = Term::new([EdgeId::new(2)]).unwrap();

    // An extra declared variable would otherwise add its weight to the result.
    let result = compile_and_evaluate([e2.clone()], [var(1, 0.5), var(2, 0.3)]);
    assert_eq!(result, Err(Error::UnusedVariable(EdgeId::new(1))));
    assert!(matches!(
        Formula::new([e2.clone()], [var(1, 0.5), var(2, 0.3)]),
        Err(Error::UnusedVariable(_))
    ));

    let formula = Formula::new([e2.clone()], [var(2, 0.3)]).unwrap();
    let diagram = Diagram::compile(&formula);
    assert_eq!(diagram.variable_count(), 1);
    assert_close(diagram.probability(), 0.3);
    assert_close(compile_and_evaluate([e2], [var(2, 0.3)]).unwrap(), 0.3);

    // No terms at all.
    let result = compile_and_evaluate(Vec::<Term>::new(), [var(1, 0.5)]);
    assert_eq!(result, Err(Error::UnusedVariable(EdgeId::new(1))));
    let formula = Formula::new(Vec::<Term>::new(), Vec::<Variable>::new()).unwrap();
    assert_eq!(Diagram::compile(&formula).probability(), 0.0);
    assert_eq!(compile_and_evaluate(Vec::<Term>::new(), Vec::<Variable>::new()).unwrap(), 0.0);
}

#[test]
fn test_shared_edge() {
    // (e1 & e2) | (e2 & e3) = e2 & (e1 | e3)
    let formula = Formula::from_paths([vec![var(1, 0.5), var(2, 0.4)], vec![var(2, 0.4), var(3, 0.5)]]).unwrap();
    assert_close(Diagram::compile(&formula).probability(), 0.4 * 0.75);

    // (e1 & e2) | (e1 & e3) = e1 & (e2 | e3)
    let formula = Formula::from_paths([vec![var(1, 0.5), var(2, 0.5)], vec![var(1, 0.5), var(3, 0.5)]]).unwrap();
    assert_close(Diagram::compile(&formula).probability(), 0.5 * 0.75);
}

#[test]
fn test_worked_example_from_formula() {
    let (x2, x3, x4, x5) = (var(2, 0.5), var(3, 0.1), var(4, 0.4), var(5, 0.5));
    let formula = Formula::from_paths([vec![x2, x3], vec![x4, x5, x3]]).unwrap();
    assert_eq!(formula.to_string(), "(e2 & e3) | (e3 & e4 & e5)");

    let diagram = Diagram::compile(&formula);
    assert_close(diagram.probability(), 0.06);
    assert_eq!(diagram.node_count(), 5);
    assert_eq!(diagram.path_count(), BigUint::from(2u32));
}

#[test]
fn test_worked_example_from_graph() {
    let (g, n) = people();
    let (a, c) = (n[0], n[2]);

    // A -> B -> C and A -> D -> B -> C; the route through E needs LIKES.
    let filter = EdgeFilter::new()
        .allow("KNOWS", Direction::Outgoing)
        .allow("OWNS", Direction::Outgoing);
    let diagram = build_diagram(&g, a, c, &filter, &QueryOptions::default()).unwrap();
    assert_eq!(diagram.variable_count(), 4);
    assert_close(diagram.probability(), 0.06);

    // Too short for the three-edge path.
    let options = QueryOptions { max_length: Some(2) };
    let diagram = build_diagram(&g, a, c, &filter, &options).unwrap();
    assert_close(diagram.probability(), 0.5 * 0.1);
}

#[test]
fn test_filter_excludes_everything() {
    let (g, n) = people();
    let knows = EdgeFilter::new().allow("KNOWS", Direction::Outgoing);
    assert_eq!(correlate(&g, n[0], n[2], &knows).unwrap(), 0.0);
    assert_eq!(correlate(&g, n[0], n[2], &EdgeFilter::new()).unwrap(), 0.0);

    // Wrong direction.
    let incoming = EdgeFilter::new().allow("KNOWS", Direction::Incoming);
    assert_eq!(correlate(&g, n[0], n[1], &incoming).unwrap(), 0.0);
    assert_close(correlate(&g, n[1], n[0], &incoming).unwrap(), 1.0 - (1.0 - 0.5) * (1.0 - 0.4 * 0.5));
}

#[test]
fn test_reflexive() {
    let (g, n) = people();
    for &node in &n {
        assert_eq!(correlate(&g, node, node, &EdgeFilter::new()).unwrap(), 1.0);
    }
}

#[test]
fn test_unknown_node() {
    let (g, n) = people();
    let mut other = ProbGraph::new();
    for _ in 0..10 {
        other.add_node("x", ["x"]);
    }
    let stranger = other.add_node("y", ["x"]);
    let result = correlate(&g, n[0], stranger, &EdgeFilter::new());
    assert_eq!(result, Err(Error::UnknownNode(stranger)));
}

#[test]
fn test_idempotence() {
    let (g, n) = people();
    let filter = EdgeFilter::new()
        .allow("KNOWS", Direction::Both)
        .allow("OWNS", Direction::Both);
    let first = correlate(&g, n[0], n[2], &filter).unwrap();
    let second = correlate(&g, n[0], n[2], &filter).unwrap();
    assert_eq!(first, second);

    let diagram = build_diagram(&g, n[0], n[2], &filter, &QueryOptions::default()).unwrap();
    assert_eq!(diagram.probability(), diagram.probability());
    assert_eq!(diagram.probability(), first);
}

#[test]
fn test_duplicate_paths_collapse() {
    let path = vec![var(1, 0.3), var(2, 0.5)];
    let once = Formula::from_paths([path.clone()]).unwrap();
    let twice = Formula::from_paths([path.clone(), path.iter().rev().copied().collect()]).unwrap();
    assert_eq!(twice.num_terms(), 1);
    assert_eq!(
        Diagram::compile(&once).probability(),
        Diagram::compile(&twice).probability()
    );
}

#[test]
fn test_canonical_structure() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    for _ in 0..20 {
        let formula = random_formula(&mut rng, 6, 5);
        let d1 = Diagram::compile(&formula);
        let d2 = Diagram::compile(&formula);
        assert_eq!(d1.node_count(), d2.node_count());
        assert_eq!(d1.to_bracket_string(d1.root()), d2.to_bracket_string(d2.root()));

        // Reduced: no redundant node, no duplicated triple.
        let mut triples = BTreeSet::new();
        for node in d1.descendants() {
            if let Some(v) = d1.variable(node) {
                let (low, high) = (d1.low(node), d1.high(node));
                assert_ne!(low, high);
                assert!(triples.insert((v.id(), low, high)));
            }
        }
    }
}

#[test]
fn test_probability_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..50 {
        let num_vars = rng.gen_range(1..=8);
        let num_terms = rng.gen_range(1..=6);
        let formula = random_formula(&mut rng, num_vars, num_terms);
        let diagram = Diagram::compile(&formula);
        let p = diagram.probability();
        assert!((-EPS..=1.0 + EPS).contains(&p), "{} out of bounds for {}", p, formula);

        let total: f64 = diagram.paths().map(|path| path.weight).sum();
        assert!((total - p).abs() < EPS);
        for path in diagram.paths() {
            assert!(path.steps.len() <= diagram.max_depth());
        }
    }
}

#[test]
fn test_certain_edges() {
    let mut sure = ProbGraph::new();
    let a = sure.add_node("a", ["x"]);
    let b = sure.add_node("b", ["x"]);
    sure.add_edge("E", a, b, 1.0).unwrap();
    sure.add_edge("E", a, b, 0.0).unwrap();
    let filter = EdgeFilter::new().allow("E", Direction::Outgoing);
    assert_eq!(sure.edge_count(), 2);
    assert_close(correlate(&sure, a, b, &filter).unwrap(), 1.0);
    assert_eq!(correlate(&sure, b, a, &filter).unwrap(), 0.0);
}

#[test]
fn test_named_graph() {
    let mut g = NamedGraph::new();
    g.add("gene_1", "protein_1", 0).unwrap();
    g.add("protein_1", "gene_2", 693).unwrap();
    g.add("gene_2", "protein_1", 693).unwrap();
    assert_eq!(g.edge_count(), 2);

    assert_close(g.probability("gene_1", "gene_2").unwrap(), cost_to_probability(693));
    assert_close(g.probability("gene_2", "gene_1").unwrap(), cost_to_probability(693));
    assert_eq!(g.probability("gene_1", "gene_1").unwrap(), 1.0);
    assert_eq!(g.probability("gene_1", "missing").unwrap(), 0.0);
    assert!(matches!(g.probability(" ", "gene_1"), Err(Error::InvalidName(_))));
}

#[test]
fn test_dot_export() {
    let (x2, x3, x4, x5) = (var(2, 0.5), var(3, 0.1), var(4, 0.4), var(5, 0.5));
    let diagram = Diagram::compile(&Formula::from_paths([vec![x2, x3], vec![x4, x5, x3]]).unwrap());
    let dot = diagram.to_dot().unwrap();
    for edge in ["e2", "e3", "e4", "e5"] {
        assert!(dot.contains(&format!("[label=\"{}\"]", edge)), "missing {} in\n{}", edge, dot);
    }
    assert!(dot.contains(&format!("r -> {};", diagram.root().index())));
}
