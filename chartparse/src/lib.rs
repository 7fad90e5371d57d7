//! Chart parsers for context-free grammars.
//!
//! * [`CykParser`]: bottom-up CYK over grammars in Chomsky Normal Form.
//! * [`EarleyParser`]: agenda driven Earley parser for any context-free
//!   grammar, including left-recursive, cyclic and epsilon ones.
//! * [`derecursify`]: left recursion detection and elimination.
//!
//! ```
//! use chartparse::{EarleyParser, GrammarBuilder};
//!
//! // S -> A S | b
//! // A -> a
//! let grammar = GrammarBuilder::default()
//!     .symbols(&["S", "A", "a", "b"])
//!     .rule("S", &["A", "S"])
//!     .rule("S", &["b"])
//!     .rule("A", &["a"])
//!     .into_grammar("S")
//!     .unwrap();
//! let trees = EarleyParser::new(grammar).parse(["a", "a", "b"]).unwrap().trees();
//! assert_eq!(trees[0].to_string(), "S(A(a), S(A(a), S(b)))");
//! ```

#![deny(warnings)]

mod error;
pub use crate::error::Error;

mod grammar;
pub use crate::grammar::{Grammar, GrammarBuilder, Rule, Symbol};

mod trees;
pub use crate::trees::{Retention, Tree};

pub mod derecursify;

mod cyk;
pub use crate::cyk::{check_cnf, CykParser, CykTable};

mod items;
mod chart;
mod forest;
mod parser;
pub use crate::items::{BackPointer, Item};
pub use crate::chart::ParseChart;
pub use crate::parser::{EarleyParser, ParseTrees};
