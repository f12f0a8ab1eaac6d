//! Error taxonomy shared by the DFA and grammar engines.

use crate::symbol::Symbol;
use thiserror::Error;

/// Model-definition inconsistency detected at construction time, before any
/// simulation or derivation runs. Always fatal to that model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("states {0:?} have no entry in the transition table")]
    StatesWithoutTransitions(Vec<String>),

    #[error("transition table keys {0:?} are not declared states")]
    UndeclaredTableStates(Vec<String>),

    #[error("transition '{state}' --{symbol}--> '{target}' leads to an undeclared state")]
    UndeclaredTarget {
        state: String,
        symbol: Symbol,
        target: String,
    },

    #[error("transition symbol '{symbol}' from state '{state}' is not in the alphabet")]
    UndeclaredTransitionSymbol { state: String, symbol: Symbol },

    #[error("start state '{0}' is not a declared state")]
    UndeclaredStartState(String),

    #[error("accept states {0:?} are not declared states")]
    UndeclaredAcceptStates(Vec<String>),

    #[error("symbols {0:?} are declared both terminal and nonterminal")]
    OverlappingSymbolClasses(Vec<Symbol>),

    #[error("nonterminals {0:?} have no production rules")]
    NonterminalsWithoutRules(Vec<Symbol>),

    #[error("production keys {0:?} are not declared nonterminals")]
    UndeclaredProductionKeys(Vec<Symbol>),

    #[error("symbols {0:?} appear in productions but are neither terminals nor nonterminals")]
    UndeclaredProductionSymbols(Vec<Symbol>),

    #[error("start symbol '{0}' is not a declared nonterminal")]
    UndeclaredStartSymbol(Symbol),
}

/// An input or target string contains a symbol outside the declared
/// alphabet/terminal set. Fatal to that single call; the model is unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("symbol '{symbol}' is not in the declared alphabet")]
pub struct AlphabetError {
    pub symbol: Symbol,
}

/// Failure of a random derivation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The derivation performed `limit` substitutions without eliminating
    /// every nonterminal. The grammar likely has no terminal base case
    /// reachable from the start symbol.
    #[error("derivation exceeded {limit} substitutions without terminating")]
    StepLimitExceeded { limit: usize },

    /// Sampling drew `attempts` strings but only `found` distinct ones; the
    /// language is probably smaller than the requested sample size.
    #[error("found only {found} distinct strings in {attempts} draws, wanted {wanted}")]
    SampleSpaceExhausted {
        wanted: usize,
        found: usize,
        attempts: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_names_offenders() {
        let err = ConfigError::NonterminalsWithoutRules(vec!['S', 'A']);
        assert!(err.to_string().contains("'S'"));
        assert!(err.to_string().contains("'A'"));
    }

    #[test]
    fn test_alphabet_error_display() {
        let err = AlphabetError { symbol: 'x' };
        assert_eq!(
            err.to_string(),
            "symbol 'x' is not in the declared alphabet"
        );
    }
}
