//! Regular grammar engine: heuristic derivation membership test and random
//! string generation.

use crate::error::{AlphabetError, ConfigError, GenerateError};
use crate::symbol::{render, symbols, Symbol};
use crate::validate::key_set_mismatch;
use indexmap::{IndexMap, IndexSet};
use rand::Rng;
use std::fmt;
use tracing::{debug, trace};

/// Substitution ceiling for a single random derivation.
const GENERATE_STEP_LIMIT: usize = 4096;

/// Attempt budget per requested sample string.
const ATTEMPTS_PER_SAMPLE: usize = 64;

/// A regular grammar: nonterminals, terminals, ordered production
/// alternatives per nonterminal, and a start symbol.
#[derive(Debug, Clone)]
pub struct RegularGrammar {
    /// Symbols that may be rewritten
    nonterminals: IndexSet<Symbol>,
    /// Symbols that may not
    terminals: IndexSet<Symbol>,
    /// Replacement alternatives per nonterminal, in declaration order
    productions: IndexMap<Symbol, Vec<Vec<Symbol>>>,
    /// Derivations begin here
    start_symbol: Symbol,
}

/// Terminal result of a derivation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The target string was derived.
    Accepted,
    /// No production alternative was compatible with the target; the
    /// derivation cannot move. An expected rejection, not an error.
    Stuck,
    /// The step ceiling was reached before the derivation converged; treated
    /// as a rejection so cyclic grammars terminate.
    StepLimit,
}

/// A derivation attempt: its outcome and the sequence of intermediate
/// strings visited, starting with the start symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Derivation {
    pub outcome: Outcome,
    pub trace: Vec<String>,
}

impl Derivation {
    /// Whether the target was derived.
    pub fn accepted(&self) -> bool {
        self.outcome == Outcome::Accepted
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.trace.join(" -> "))
    }
}

/// Replace the symbol at `position` with `replacement`.
fn splice(d: &[Symbol], position: usize, replacement: &[Symbol]) -> Vec<Symbol> {
    let mut next = Vec::with_capacity(d.len() - 1 + replacement.len());
    next.extend_from_slice(&d[..position]);
    next.extend_from_slice(replacement);
    next.extend_from_slice(&d[position + 1..]);
    next
}

impl RegularGrammar {
    /// Build a validated grammar.
    ///
    /// Alternatives are given as plain strings over the combined symbol
    /// sets, e.g. `S -> aSb | b` as `('S', ["aSb", "b"])`. The production
    /// key set must equal the nonterminal set exactly, every symbol used in
    /// an alternative must be declared, the symbol classes must be disjoint,
    /// and the start symbol must be a nonterminal. Any violation is a
    /// [`ConfigError`] naming the offending symbols. A nonterminal with an
    /// empty alternative list counts as having no rules.
    pub fn new(
        nonterminals: IndexSet<Symbol>,
        terminals: IndexSet<Symbol>,
        productions: IndexMap<Symbol, Vec<String>>,
        start_symbol: Symbol,
    ) -> Result<Self, ConfigError> {
        let overlap: Vec<Symbol> = nonterminals.intersection(&terminals).copied().collect();
        if !overlap.is_empty() {
            return Err(ConfigError::OverlappingSymbolClasses(overlap));
        }

        let keys: IndexSet<Symbol> = productions.keys().copied().collect();
        let (mut missing, extra) = key_set_mismatch(&nonterminals, &keys);
        if !extra.is_empty() {
            return Err(ConfigError::UndeclaredProductionKeys(extra));
        }
        for (&nonterminal, alternatives) in &productions {
            if alternatives.is_empty() {
                missing.push(nonterminal);
            }
        }
        if !missing.is_empty() {
            return Err(ConfigError::NonterminalsWithoutRules(missing));
        }

        let mut unseen: IndexSet<Symbol> = IndexSet::new();
        let productions: IndexMap<Symbol, Vec<Vec<Symbol>>> = productions
            .into_iter()
            .map(|(nonterminal, alternatives)| {
                let alternatives: Vec<Vec<Symbol>> =
                    alternatives.iter().map(|a| symbols(a)).collect();
                for symbol in alternatives.iter().flatten() {
                    if !nonterminals.contains(symbol) && !terminals.contains(symbol) {
                        unseen.insert(*symbol);
                    }
                }
                (nonterminal, alternatives)
            })
            .collect();
        if !unseen.is_empty() {
            return Err(ConfigError::UndeclaredProductionSymbols(
                unseen.into_iter().collect(),
            ));
        }

        if !nonterminals.contains(&start_symbol) {
            return Err(ConfigError::UndeclaredStartSymbol(start_symbol));
        }

        Ok(Self {
            nonterminals,
            terminals,
            productions,
            start_symbol,
        })
    }

    /// Get the nonterminal symbols.
    pub fn nonterminals(&self) -> &IndexSet<Symbol> {
        &self.nonterminals
    }

    /// Get the terminal symbols.
    pub fn terminals(&self) -> &IndexSet<Symbol> {
        &self.terminals
    }

    /// Get the start symbol.
    pub fn start_symbol(&self) -> Symbol {
        self.start_symbol
    }

    /// Step ceiling for deriving a target of the given length. Every
    /// accepted step keeps the derivation at or below the target length, so
    /// the bound only cuts off length-preserving nonterminal cycles.
    fn derivation_limit(&self, target_len: usize) -> usize {
        let alternatives: usize = self.productions.values().map(Vec::len).sum();
        (target_len + 1) * alternatives.max(1)
    }

    /// Heuristic membership test: try to derive `target` from the start
    /// symbol, taking at each step the first production alternative whose
    /// substitution stays compatible with the target.
    ///
    /// The search never backtracks. At each step the leftmost nonterminal is
    /// rewritten; an alternative is adopted if the substituted string is a
    /// purely terminal match of the target, or if it is no longer than the
    /// target and the target carries its terminal prefix and suffix (the
    /// symbols before the first and after the last remaining nonterminal).
    /// A step ceiling proportional to the target length turns
    /// non-terminating grammars into a [`Outcome::StepLimit`] rejection.
    ///
    /// The pruning assumes derivations never shrink. An empty-string
    /// alternative breaks that assumption: deriving `aa` from
    /// `S -> aS | ""` would have to pass through the overlong `aaS`,
    /// which the length prune discards, so any nonempty target whose
    /// derivation ends in an empty alternative is rejected as stuck.
    /// Only the empty target itself is derivable through one.
    /// [`Self::generate`] is unaffected.
    ///
    /// Fails with [`AlphabetError`] if `target` uses a symbol that is not a
    /// declared terminal.
    pub fn test(&self, target: &str) -> Result<Derivation, AlphabetError> {
        for symbol in target.chars() {
            if !self.terminals.contains(&symbol) {
                return Err(AlphabetError { symbol });
            }
        }

        let target = symbols(target);
        let limit = self.derivation_limit(target.len());
        let mut d = vec![self.start_symbol];
        let mut trace = vec![render(&d)];
        let mut steps = 0;

        let outcome = loop {
            if d == target {
                break Outcome::Accepted;
            }
            if steps == limit {
                trace!(limit, "derivation step ceiling reached");
                break Outcome::StepLimit;
            }
            steps += 1;

            let Some(position) = d.iter().position(|s| self.nonterminals.contains(s)) else {
                // Purely terminal but not the target: nothing left to rewrite.
                break Outcome::Stuck;
            };

            match self.try_alternatives(&d, position, &target) {
                Some(next) => {
                    trace!(derived = render(&next).as_str(), "step");
                    trace.push(render(&next));
                    d = next;
                }
                None => break Outcome::Stuck,
            }
        };

        debug!(?outcome, steps, "derivation finished");
        Ok(Derivation { outcome, trace })
    }

    /// Try the alternatives of the nonterminal at `position` in declaration
    /// order; return the first compatible substitution.
    fn try_alternatives(
        &self,
        d: &[Symbol],
        position: usize,
        target: &[Symbol],
    ) -> Option<Vec<Symbol>> {
        let is_nonterminal = |s: &Symbol| self.nonterminals.contains(s);

        for alternative in &self.productions[&d[position]] {
            let candidate = splice(d, position, alternative);

            if !alternative.iter().any(is_nonterminal) {
                // Terminal alternative: only an exact match finishes the
                // derivation, anything else is no use.
                if candidate == target {
                    return Some(candidate);
                }
                continue;
            }

            // Overlong candidates are discarded on the assumption that
            // derivations never shrink; see the empty-alternative caveat
            // on `test`.
            if candidate.len() > target.len() {
                continue;
            }

            let Some(first) = candidate.iter().position(is_nonterminal) else {
                continue;
            };
            let Some(last) = candidate.iter().rposition(is_nonterminal) else {
                continue;
            };
            let prefix = &candidate[..first];
            let suffix = &candidate[last + 1..];
            if target.starts_with(prefix) && target.ends_with(suffix) {
                return Some(candidate);
            }
        }

        None
    }

    /// Produce one random string of the grammar's language: repeatedly
    /// replace the leftmost nonterminal with a uniformly chosen alternative
    /// until only terminals remain.
    ///
    /// Randomness comes from the caller's `rng`, so a fixed seed yields a
    /// deterministic string. A grammar whose reachable alternatives never
    /// eliminate the nonterminals runs into the substitution ceiling and
    /// fails with [`GenerateError::StepLimitExceeded`].
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String, GenerateError> {
        let mut d = vec![self.start_symbol];
        let mut steps = 0;

        loop {
            let Some(position) = d.iter().position(|s| self.nonterminals.contains(s)) else {
                return Ok(render(&d));
            };
            if steps == GENERATE_STEP_LIMIT {
                return Err(GenerateError::StepLimitExceeded {
                    limit: GENERATE_STEP_LIMIT,
                });
            }
            steps += 1;

            let alternatives = &self.productions[&d[position]];
            let alternative = &alternatives[rng.gen_range(0..alternatives.len())];
            trace!(
                nonterminal = %d[position],
                replacement = render(alternative).as_str(),
                "substitute"
            );
            d = splice(&d, position, alternative);
        }
    }

    /// Generate `count` pairwise-distinct strings of the language.
    ///
    /// Draws are repeated until `count` unique strings have been seen. A
    /// bounded attempt budget keeps languages smaller than `count` from
    /// looping forever; exhausting it fails with
    /// [`GenerateError::SampleSpaceExhausted`].
    pub fn sample<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        count: usize,
    ) -> Result<Vec<String>, GenerateError> {
        let budget = ATTEMPTS_PER_SAMPLE * count;
        let mut seen: IndexSet<String> = IndexSet::with_capacity(count);
        let mut attempts = 0;

        while seen.len() < count {
            if attempts == budget {
                return Err(GenerateError::SampleSpaceExhausted {
                    wanted: count,
                    found: seen.len(),
                    attempts,
                });
            }
            attempts += 1;
            seen.insert(self.generate(rng)?);
        }

        Ok(seen.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn grammar(
        nonterminals: &[Symbol],
        terminals: &[Symbol],
        productions: &[(Symbol, &[&str])],
        start_symbol: Symbol,
    ) -> Result<RegularGrammar, ConfigError> {
        RegularGrammar::new(
            nonterminals.iter().copied().collect(),
            terminals.iter().copied().collect(),
            productions
                .iter()
                .map(|&(nt, alts)| (nt, alts.iter().map(|a| a.to_string()).collect()))
                .collect(),
            start_symbol,
        )
    }

    /// a^n b^(n+1), n >= 0
    fn a_n_b_n1() -> RegularGrammar {
        grammar(&['S'], &['a', 'b'], &[('S', &["aSb", "b"])], 'S').unwrap()
    }

    /// Strings over {a,b,c,d} ending in d.
    fn ends_in_d() -> RegularGrammar {
        grammar(
            &['S'],
            &['a', 'b', 'c', 'd'],
            &[('S', &["aS", "bS", "cS", "dS", "d"])],
            'S',
        )
        .unwrap()
    }

    #[test]
    fn test_a_n_b_n1_membership() {
        let g = a_n_b_n1();
        assert!(g.test("b").unwrap().accepted());
        assert!(g.test("abb").unwrap().accepted());
        assert!(g.test("aabbb").unwrap().accepted());
        assert!(!g.test("ab").unwrap().accepted());
        assert!(!g.test("ba").unwrap().accepted());
    }

    #[test]
    fn test_ends_in_d_membership() {
        let g = ends_in_d();
        assert!(g.test("d").unwrap().accepted());
        assert!(g.test("abd").unwrap().accepted());
        assert!(g.test("bad").unwrap().accepted());
        assert!(!g.test("ab").unwrap().accepted());
    }

    #[test]
    fn test_trace_records_each_step() {
        let derivation = a_n_b_n1().test("abb").unwrap();
        assert_eq!(derivation.trace, vec!["S", "aSb", "abb"]);
        assert_eq!(derivation.to_string(), "S -> aSb -> abb");
    }

    #[test]
    fn test_rejection_keeps_partial_trace() {
        let derivation = a_n_b_n1().test("ab").unwrap();
        assert_eq!(derivation.outcome, Outcome::Stuck);
        assert_eq!(derivation.trace, vec!["S"]);
    }

    #[test]
    fn test_foreign_target_symbol() {
        let err = a_n_b_n1().test("axb").unwrap_err();
        assert_eq!(err, AlphabetError { symbol: 'x' });
    }

    #[test]
    fn test_nonterminal_cycle_hits_step_limit() {
        // S and A rewrite into each other; every substitution passes the
        // prefix/suffix test (both are empty) but the derivation never
        // reaches a terminal string.
        let g = grammar(
            &['S', 'A'],
            &['a'],
            &[('S', &["A"]), ('A', &["S"])],
            'S',
        )
        .unwrap();
        let derivation = g.test("a").unwrap();
        assert_eq!(derivation.outcome, Outcome::StepLimit);
        assert!(!derivation.accepted());
    }

    #[test]
    fn test_empty_alternative_derives_only_epsilon() {
        // "aa" would have to pass through the overlong "aaS" before the
        // empty alternative shrinks it back, so the length prune leaves
        // the derivation stuck; only the empty target goes through.
        let g = grammar(&['S'], &['a'], &[('S', &["aS", ""])], 'S').unwrap();
        assert!(g.test("").unwrap().accepted());

        let derivation = g.test("aa").unwrap();
        assert_eq!(derivation.outcome, Outcome::Stuck);
        assert_eq!(derivation.trace, vec!["S", "aS"]);
    }

    #[test]
    fn test_missing_rules() {
        let err = grammar(&['S', 'A'], &['a'], &[('S', &["a"])], 'S').unwrap_err();
        assert_eq!(err, ConfigError::NonterminalsWithoutRules(vec!['A']));
    }

    #[test]
    fn test_empty_alternative_list_counts_as_missing() {
        let err = grammar(&['S', 'A'], &['a'], &[('S', &["a"]), ('A', &[])], 'S').unwrap_err();
        assert_eq!(err, ConfigError::NonterminalsWithoutRules(vec!['A']));
    }

    #[test]
    fn test_undeclared_production_key() {
        let err = grammar(&['S'], &['a'], &[('S', &["a"]), ('B', &["a"])], 'S').unwrap_err();
        assert_eq!(err, ConfigError::UndeclaredProductionKeys(vec!['B']));
    }

    #[test]
    fn test_undeclared_symbol_in_alternative() {
        let err = grammar(&['S'], &['a'], &[('S', &["aXa"])], 'S').unwrap_err();
        assert_eq!(err, ConfigError::UndeclaredProductionSymbols(vec!['X']));
    }

    #[test]
    fn test_overlapping_symbol_classes() {
        let err = grammar(&['S', 'a'], &['a'], &[('S', &["a"]), ('a', &["a"])], 'S').unwrap_err();
        assert_eq!(err, ConfigError::OverlappingSymbolClasses(vec!['a']));
    }

    #[test]
    fn test_undeclared_start_symbol() {
        let err = grammar(&['S'], &['a'], &[('S', &["a"])], 'T').unwrap_err();
        assert_eq!(err, ConfigError::UndeclaredStartSymbol('T'));
    }

    #[test]
    fn test_generate_single_string_language() {
        let g = grammar(&['S'], &['d'], &[('S', &["d"])], 'S').unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(g.generate(&mut rng).unwrap(), "d");
    }

    #[test]
    fn test_generate_output_is_terminal_only() {
        let g = ends_in_d();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..32 {
            let s = g.generate(&mut rng).unwrap();
            assert!(s.chars().all(|c| g.terminals().contains(&c)), "{s:?}");
        }
    }

    #[test]
    fn test_generate_without_base_case() {
        let g = grammar(&['S'], &['a'], &[('S', &["aS"])], 'S').unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert_eq!(
            g.generate(&mut rng).unwrap_err(),
            GenerateError::StepLimitExceeded {
                limit: GENERATE_STEP_LIMIT
            }
        );
    }

    #[test]
    fn test_sample_distinct() {
        let g = ends_in_d();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let strings = g.sample(&mut rng, 5).unwrap();
        assert_eq!(strings.len(), 5);
        let unique: IndexSet<&String> = strings.iter().collect();
        assert_eq!(unique.len(), 5);
    }

    #[test]
    fn test_sample_exhausts_small_language() {
        let g = grammar(&['S'], &['d'], &[('S', &["d"])], 'S').unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = g.sample(&mut rng, 3).unwrap_err();
        assert_eq!(
            err,
            GenerateError::SampleSpaceExhausted {
                wanted: 3,
                found: 1,
                attempts: 3 * ATTEMPTS_PER_SAMPLE,
            }
        );
    }
}
