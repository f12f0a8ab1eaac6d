//! Generated strings are members of their own grammar's language.
//!
//! The round-trip property holds for grammars whose alternatives never
//! shrink the derivation. An empty alternative lets `generate` emit
//! strings that `test` cannot follow, because the membership search
//! prunes candidates longer than the target; both grammars here are
//! free of empty alternatives.

use formlang::{GrammarDef, RegularGrammar};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn load(json: &str) -> RegularGrammar {
    let def: GrammarDef = serde_json::from_str(json).unwrap();
    RegularGrammar::try_from(def).unwrap()
}

fn a_n_b_n1() -> RegularGrammar {
    load(
        r#"{
            "nonterminals": ["S"],
            "terminals": ["a", "b"],
            "productions": {"S": ["aSb", "b"]},
            "start_symbol": "S"
        }"#,
    )
}

fn ends_in_d() -> RegularGrammar {
    load(
        r#"{
            "nonterminals": ["S"],
            "terminals": ["a", "b", "c", "d"],
            "productions": {"S": ["aS", "bS", "cS", "dS", "d"]},
            "start_symbol": "S"
        }"#,
    )
}

#[test]
fn generated_strings_are_accepted() {
    for (name, grammar) in [("a_n_b_n1", a_n_b_n1()), ("ends_in_d", ends_in_d())] {
        for seed in 0..8 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let string = grammar.generate(&mut rng).unwrap();
            assert!(
                string.chars().all(|c| grammar.terminals().contains(&c)),
                "{name}: {string:?} contains a nonterminal"
            );
            let derivation = grammar.test(&string).unwrap();
            assert!(
                derivation.accepted(),
                "{name}: generated {string:?} but test rejected it ({derivation})"
            );
        }
    }
}

#[test]
fn sampled_strings_are_distinct_and_accepted() {
    let grammar = ends_in_d();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let strings = grammar.sample(&mut rng, 6).unwrap();
    assert_eq!(strings.len(), 6);

    for (i, a) in strings.iter().enumerate() {
        for b in &strings[i + 1..] {
            assert_ne!(a, b);
        }
        assert!(grammar.test(a).unwrap().accepted(), "{a:?} rejected");
    }
}
