use crate::grammar::Rule;

/// Conditions that abort a grammar construction or a parse call before any
/// chart is built. A word that simply has no derivation is not an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Axiom or rule symbol outside the alphabet, or a builder inconsistency.
    #[error("Invalid Grammar: {0}")]
    InvalidGrammar(String),

    /// CYK requires every rule to be `A -> t` or `A -> B C`.
    #[error("Not in Chomsky Normal Form: {rule}")]
    NotInCnf { rule: Rule },

    #[error("Unknown Symbol: {symbol:?} at position {position}")]
    UnknownSymbol { symbol: String, position: usize },
}
