//! Deterministic Finite Automaton (DFA) acceptor.

use crate::error::{AlphabetError, ConfigError};
use crate::symbol::Symbol;
use crate::validate::key_set_mismatch;
use indexmap::{IndexMap, IndexSet};
use std::fmt;
use tracing::{debug, trace};

/// A single recorded move: the state the automaton was in and the symbol it
/// consumed to leave it.
pub type Step = (String, Symbol);

/// Outgoing transitions of a single state.
///
/// Distinguishes "the state declares no transitions at all" from "the table
/// has no entry for this symbol": an elided state skips every input symbol
/// without moving, while a per-symbol gap in a `Table` skips only that
/// symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateTransitions {
    /// No outgoing transitions are defined; input is skipped, not rejected.
    NoTransitions,
    /// Symbol-to-successor table.
    Table(IndexMap<Symbol, String>),
}

/// A Deterministic Finite Automaton over named states.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// Declared states
    states: IndexSet<String>,
    /// Input alphabet
    alphabet: IndexSet<Symbol>,
    /// Per-state outgoing transitions; keys match `states` exactly
    transitions: IndexMap<String, StateTransitions>,
    /// Start state
    start_state: String,
    /// Accepting states
    accept_states: IndexSet<String>,
}

/// The path taken through the automaton: the `(state, symbol)` moves in
/// order, terminated by the state the automaton halted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    steps: Vec<Step>,
    final_state: String,
}

impl Path {
    /// The recorded `(state, symbol)` moves.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The state the automaton halted in.
    pub fn final_state(&self) -> &str {
        &self.final_state
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, symbol) in &self.steps {
            write!(f, "{state}, {symbol} -> ")?;
        }
        write!(f, "{}", self.final_state)
    }
}

/// Result of running an input through a DFA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Whether the automaton halted in an accepting state.
    pub accepted: bool,
    /// The path taken.
    pub path: Path,
}

impl Dfa {
    /// Build a validated DFA.
    ///
    /// The transition table's key set must equal the declared state set
    /// exactly, every transition symbol must be in the alphabet, and every
    /// transition target, the start state, and all accept states must be
    /// declared states. Any violation is a [`ConfigError`] naming the
    /// offending states or symbols.
    pub fn new(
        states: IndexSet<String>,
        alphabet: IndexSet<Symbol>,
        transitions: IndexMap<String, StateTransitions>,
        start_state: String,
        accept_states: IndexSet<String>,
    ) -> Result<Self, ConfigError> {
        let keys: IndexSet<String> = transitions.keys().cloned().collect();
        let (missing, extra) = key_set_mismatch(&states, &keys);
        if !missing.is_empty() {
            return Err(ConfigError::StatesWithoutTransitions(missing));
        }
        if !extra.is_empty() {
            return Err(ConfigError::UndeclaredTableStates(extra));
        }

        for (state, outgoing) in &transitions {
            let StateTransitions::Table(table) = outgoing else {
                continue;
            };
            for (&symbol, target) in table {
                if !alphabet.contains(&symbol) {
                    return Err(ConfigError::UndeclaredTransitionSymbol {
                        state: state.clone(),
                        symbol,
                    });
                }
                if !states.contains(target) {
                    return Err(ConfigError::UndeclaredTarget {
                        state: state.clone(),
                        symbol,
                        target: target.clone(),
                    });
                }
            }
        }

        if !states.contains(&start_state) {
            return Err(ConfigError::UndeclaredStartState(start_state));
        }

        let stray: Vec<String> = accept_states
            .iter()
            .filter(|s| !states.contains(*s))
            .cloned()
            .collect();
        if !stray.is_empty() {
            return Err(ConfigError::UndeclaredAcceptStates(stray));
        }

        Ok(Self {
            states,
            alphabet,
            transitions,
            start_state,
            accept_states,
        })
    }

    /// Get the declared states.
    pub fn states(&self) -> &IndexSet<String> {
        &self.states
    }

    /// Get the input alphabet.
    pub fn alphabet(&self) -> &IndexSet<Symbol> {
        &self.alphabet
    }

    /// Get the start state.
    pub fn start_state(&self) -> &str {
        &self.start_state
    }

    /// Get the accepting states.
    pub fn accept_states(&self) -> &IndexSet<String> {
        &self.accept_states
    }

    /// Run an input string through the automaton.
    ///
    /// Input symbols are validated against the alphabet up front; a foreign
    /// symbol fails with [`AlphabetError`] before any simulation.
    ///
    /// A symbol with no defined transition from the current state is
    /// skipped: the automaton stays put and the symbol leaves no trace
    /// entry. This matches the state-level `NoTransitions` elision and means
    /// undefined input never rejects by itself; only the halting state
    /// decides acceptance.
    pub fn check(&self, input: &str) -> Result<Run, AlphabetError> {
        for symbol in input.chars() {
            if !self.alphabet.contains(&symbol) {
                return Err(AlphabetError { symbol });
            }
        }

        let mut state = self.start_state.as_str();
        let mut steps = Vec::new();

        for symbol in input.chars() {
            match &self.transitions[state] {
                StateTransitions::NoTransitions => {
                    trace!(state, %symbol, "state elides transitions, symbol skipped");
                }
                StateTransitions::Table(table) => match table.get(&symbol) {
                    Some(next) => {
                        trace!(state, %symbol, next = next.as_str(), "transition");
                        steps.push((state.to_string(), symbol));
                        state = next.as_str();
                    }
                    None => {
                        trace!(state, %symbol, "no transition, symbol skipped");
                    }
                },
            }
        }

        let accepted = self.accept_states.contains(state);
        debug!(input, final_state = state, accepted, "run finished");
        let path = Path {
            steps,
            final_state: state.to_string(),
        };
        Ok(Run { accepted, path })
    }
}
