//! JSON model definitions and their conversion into validated models.
//!
//! The field names and shapes mirror the definition files consumed by the
//! CLI: a DFA state may map to `null` instead of a symbol table, which loads
//! as [`StateTransitions::NoTransitions`]. All validation lives in the model
//! constructors; conversion only reshapes the data.

use crate::dfa::{Dfa, StateTransitions};
use crate::error::ConfigError;
use crate::grammar::RegularGrammar;
use crate::symbol::Symbol;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A DFA definition as found in a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DfaDef {
    pub states: Vec<String>,
    pub alphabet: Vec<Symbol>,
    pub transition_function: IndexMap<String, Option<IndexMap<Symbol, String>>>,
    pub start_state: String,
    pub accept_states: Vec<String>,
}

impl TryFrom<DfaDef> for Dfa {
    type Error = ConfigError;

    fn try_from(def: DfaDef) -> Result<Self, Self::Error> {
        let transitions = def
            .transition_function
            .into_iter()
            .map(|(state, table)| {
                let outgoing = match table {
                    None => StateTransitions::NoTransitions,
                    Some(table) => StateTransitions::Table(table),
                };
                (state, outgoing)
            })
            .collect();

        Dfa::new(
            def.states.into_iter().collect(),
            def.alphabet.into_iter().collect(),
            transitions,
            def.start_state,
            def.accept_states.into_iter().collect(),
        )
    }
}

/// A regular grammar definition as found in a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarDef {
    pub nonterminals: Vec<Symbol>,
    pub terminals: Vec<Symbol>,
    pub productions: IndexMap<Symbol, Vec<String>>,
    pub start_symbol: Symbol,
}

impl TryFrom<GrammarDef> for RegularGrammar {
    type Error = ConfigError;

    fn try_from(def: GrammarDef) -> Result<Self, Self::Error> {
        RegularGrammar::new(
            def.nonterminals.into_iter().collect(),
            def.terminals.into_iter().collect(),
            def.productions,
            def.start_symbol,
        )
    }
}
