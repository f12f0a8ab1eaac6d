//! Symbol types for automata and grammars.

/// An atomic symbol. Both DFA alphabet symbols and grammar
/// terminals/nonterminals are single characters.
pub type Symbol = char;

/// Convert a string into its symbol sequence.
pub fn symbols(s: &str) -> Vec<Symbol> {
    s.chars().collect()
}

/// Render a symbol sequence back into a string.
pub fn render(symbols: &[Symbol]) -> String {
    symbols.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_roundtrip() {
        let s = "aSb";
        assert_eq!(symbols(s), vec!['a', 'S', 'b']);
        assert_eq!(render(&symbols(s)), s);
    }

    #[test]
    fn test_symbols_empty() {
        assert!(symbols("").is_empty());
        assert_eq!(render(&[]), "");
    }
}
