#![deny(warnings)]

use crate::error::Error;
use crate::grammar::{Grammar, Rule, Symbol};
use crate::trees::{Retention, Tree};
use std::collections::HashMap;
use std::fmt;
use tracing::Level;


/// Check every rule is `A -> t` with `t` a terminal, or `A -> B C` with both
/// non-terminals. Fails naming the first rule that isn't.
pub fn check_cnf(grammar: &Grammar) -> Result<(), Error> {
    for rule in grammar.rules() {
        let in_cnf = match rule.rhs.as_slice() {
            [t] => grammar.is_terminal(t),
            [b, c] => grammar.is_non_terminal(b) && grammar.is_non_terminal(c),
            _ => false,
        };
        if !in_cnf {
            return Err(Error::NotInCnf{rule: Rule::clone(rule)});
        }
    }
    Ok(())
}

/// Bottom-up CYK parser over a grammar in Chomsky Normal Form.
pub struct CykParser {
    grammar: Grammar,
    retention: Retention,
    // terminal -> heads of `A -> t`
    lexical: HashMap<Symbol, Vec<Symbol>>,
    // (B, C) -> heads of `A -> B C`
    binary: HashMap<(Symbol, Symbol), Vec<Symbol>>,
}

/// Closed CYK table for one word. Cell `(i, j)` holds the trees deriving the
/// `i + 1` symbols starting at position `j`.
pub struct CykTable {
    axiom: Symbol,
    cells: Vec<Vec<Vec<Tree>>>,
}

///////////////////////////////////////////////////////////////////////////////

impl CykParser {
    pub fn new(grammar: Grammar) -> Result<CykParser, Error> {
        check_cnf(&grammar)?;
        let mut lexical: HashMap<Symbol, Vec<Symbol>> = HashMap::new();
        let mut binary: HashMap<(Symbol, Symbol), Vec<Symbol>> = HashMap::new();
        for rule in grammar.rules() {
            let heads = match rule.rhs.as_slice() {
                [t] => lexical.entry(t.clone()).or_default(),
                [b, c] => binary.entry((b.clone(), c.clone())).or_default(),
                _ => unreachable!("BUG: rule passed the CNF check: {}", rule),
            };
            if !heads.contains(&rule.lhs) {
                heads.push(rule.lhs.clone());
            }
        }
        Ok(CykParser{grammar, retention: Retention::All, lexical, binary})
    }

    /// `First` keeps a single tree per label and cell.
    pub fn retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    fn admit(&self, cell: &mut Vec<Tree>, tree: Tree) {
        let known = match self.retention {
            Retention::First => cell.iter().any(|t| t.label() == tree.label()),
            Retention::All => cell.contains(&tree),
        };
        if !known {
            cell.push(tree);
        }
    }

    pub fn parse<I>(&self, word: I) -> Result<CykTable, Error>
            where I: IntoIterator, I::Item: AsRef<str> {
        let word = self.grammar.resolve(word)?;
        let n = word.len();
        let _span = tracing::span!(Level::DEBUG, "cyk", len = n).entered();
        let mut cells: Vec<Vec<Vec<Tree>>> = (0..n).map(|i| vec![Vec::new(); n - i]).collect();

        // Length 1 spans: lexical rules
        for (j, terminal) in word.iter().enumerate() {
            for head in self.lexical.get(terminal).into_iter().flatten() {
                let tree = Tree::Node(head.clone(), vec![Tree::Leaf(terminal.clone())]);
                self.admit(&mut cells[0][j], tree);
            }
        }

        // Longer spans by increasing length, trying every split point
        for i in 1..n {
            for j in 0..n - i {
                let mut cell = Vec::new();
                for k in 0..i {
                    let (left, right) = (&cells[k][j], &cells[i - 1 - k][j + 1 + k]);
                    for t1 in left {
                        for t2 in right {
                            let key = (t1.label().clone(), t2.label().clone());
                            for head in self.binary.get(&key).into_iter().flatten() {
                                let tree = Tree::Node(head.clone(), vec![t1.clone(), t2.clone()]);
                                self.admit(&mut cell, tree);
                            }
                        }
                    }
                }
                tracing::trace!(i, j, trees = cell.len(), "cell closed");
                cells[i][j] = cell;
            }
        }

        let table = CykTable{axiom: self.grammar.axiom().clone(), cells};
        if cfg!(feature="debug") {
            tracing::debug!("CYK table:\n{}", table);
        }
        tracing::debug!(accepted = table.accepted(), "parse done");
        Ok(table)
    }

    /// Whether the grammar derives `word`. The empty word never is.
    pub fn recognize<I>(&self, word: I) -> Result<bool, Error>
            where I: IntoIterator, I::Item: AsRef<str> {
        Ok(self.parse(word)?.accepted())
    }
}

impl CykTable {
    /// Length of the parsed word.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Trees for the `i + 1` symbols starting at `j`. Empty out of range.
    pub fn cell(&self, i: usize, j: usize) -> &[Tree] {
        self.cells.get(i).and_then(|row| row.get(j)).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Distinct labels of the trees in cell `(i, j)`.
    pub fn labels(&self, i: usize, j: usize) -> Vec<Symbol> {
        let mut labels: Vec<Symbol> = Vec::new();
        for tree in self.cell(i, j) {
            if !labels.contains(tree.label()) {
                labels.push(tree.label().clone());
            }
        }
        labels
    }

    pub fn accepted(&self) -> bool {
        self.top().iter().any(|t| *t.label() == self.axiom)
    }

    /// Axiom trees spanning the whole word.
    pub fn trees(&self) -> Vec<Tree> {
        self.top().iter().filter(|t| *t.label() == self.axiom).cloned().collect()
    }

    fn top(&self) -> &[Tree] {
        match self.len() {
            0 => &[],
            n => self.cell(n - 1, 0),
        }
    }
}

impl fmt::Display for CykTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            for j in 0..row.len() {
                let labels = self.labels(i, j).iter()
                    .map(|s| s.name()).collect::<Vec<_>>().join(", ");
                writeln!(f, "({}, {}): [{}]", i, j, labels)?;
            }
        }
        Ok(())
    }
}
