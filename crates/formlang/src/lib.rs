//! Formal language simulators.
//!
//! This crate provides two engines over immutable, validated models:
//! - A DFA acceptor: walks an input symbol by symbol and reports an
//!   accept/reject verdict together with the path taken.
//! - A regular grammar engine: a heuristic, non-backtracking derivation
//!   membership test with prefix/suffix compatibility pruning, plus random
//!   string generation from an explicit RNG.
//!
//! Model definitions can be loaded from JSON through [`DfaDef`] and
//! [`GrammarDef`]; all structural validation happens in the model
//! constructors before any simulation runs.

mod definition;
mod dfa;
mod error;
mod grammar;
mod symbol;
mod validate;

pub use definition::{DfaDef, GrammarDef};
pub use dfa::{Dfa, Path, Run, StateTransitions, Step};
pub use error::{AlphabetError, ConfigError, GenerateError};
pub use grammar::{Derivation, Outcome, RegularGrammar};
pub use symbol::Symbol;
