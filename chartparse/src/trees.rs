#![deny(warnings)]

use crate::grammar::Symbol;
use std::{fmt, hash, mem};

/// A parse tree. Leaves are matched terminals, nodes are labeled by the
/// non-terminal that derives their children.
///
/// Trees can be as deep as the input is long, so `Clone`, `Eq`, `Hash` and
/// `Drop` walk them with explicit stacks instead of recursing.
pub enum Tree {
    Leaf(Symbol),
    Node(Symbol, Vec<Tree>),
}

/// How many trees a parser keeps per span and label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Retention {
    /// The first derivation found wins, later ones are dropped.
    #[default]
    First,
    /// Every distinct derivation is kept.
    All,
}

// Rendering walks an explicit stack so deep derivations don't exhaust the
// call stack.
enum Step<'a> {
    Visit(&'a Tree),
    Text(&'static str),
}

impl Tree {
    pub fn label(&self) -> &Symbol {
        match self {
            Tree::Leaf(symbol) => symbol,
            Tree::Node(symbol, _) => symbol,
        }
    }

    pub fn children(&self) -> &[Tree] {
        match self {
            Tree::Leaf(_) => &[],
            Tree::Node(_, children) => children,
        }
    }

    /// Terminals covered by this tree, left to right.
    pub fn leaves(&self) -> Vec<Symbol> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            match tree {
                Tree::Leaf(symbol) => out.push(symbol.clone()),
                Tree::Node(_, children) => stack.extend(children.iter().rev()),
            }
        }
        out
    }

    /// Indented outline, one label per line.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(0, self)];
        while let Some((depth, tree)) = stack.pop() {
            out.push_str(&"  ".repeat(depth));
            out.push_str(tree.label().name());
            out.push('\n');
            stack.extend(tree.children().iter().rev().map(|c| (depth + 1, c)));
        }
        out
    }
}

impl Clone for Tree {
    fn clone(&self) -> Tree {
        // (tree, children already cloned)
        let mut stack = vec![(self, false)];
        let mut built: Vec<Tree> = Vec::new();
        while let Some((tree, ready)) = stack.pop() {
            match tree {
                Tree::Leaf(symbol) => built.push(Tree::Leaf(symbol.clone())),
                Tree::Node(symbol, children) if ready => {
                    let children = built.split_off(built.len() - children.len());
                    built.push(Tree::Node(symbol.clone(), children));
                }
                Tree::Node(_, children) => {
                    stack.push((tree, true));
                    stack.extend(children.iter().rev().map(|c| (c, false)));
                }
            }
        }
        built.pop().expect("BUG: clone built no tree")
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Tree) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            let same = match (a, b) {
                (Tree::Leaf(x), Tree::Leaf(y)) => x == y,
                (Tree::Node(x, xs), Tree::Node(y, ys)) => x == y && xs.len() == ys.len(),
                _ => false,
            };
            if !same {
                return false;
            }
            stack.extend(a.children().iter().zip(b.children()));
        }
        true
    }
}

impl Eq for Tree {}

impl hash::Hash for Tree {
    // Pre-order labels with arities identify a tree
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        let mut stack = vec![self];
        while let Some(tree) = stack.pop() {
            match tree {
                Tree::Leaf(symbol) => {
                    state.write_u8(0);
                    hash::Hash::hash(symbol, state);
                }
                Tree::Node(symbol, children) => {
                    state.write_u8(1);
                    hash::Hash::hash(symbol, state);
                    state.write_usize(children.len());
                    stack.extend(children.iter().rev());
                }
            }
        }
    }
}

impl Drop for Tree {
    fn drop(&mut self) {
        let Tree::Node(_, children) = self else { return };
        let mut pending = mem::take(children);
        while let Some(mut tree) = pending.pop() {
            // hand grandchildren over before `tree` goes, so it drops flat
            if let Tree::Node(_, children) = &mut tree {
                pending.append(children);
            }
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut stack = vec![Step::Visit(self)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Text(text) => f.write_str(text)?,
                Step::Visit(Tree::Leaf(symbol)) => write!(f, "{}", symbol)?,
                Step::Visit(Tree::Node(symbol, children)) => {
                    write!(f, "{}(", symbol)?;
                    stack.push(Step::Text(")"));
                    for (idx, child) in children.iter().enumerate().rev() {
                        stack.push(Step::Visit(child));
                        if idx > 0 {
                            stack.push(Step::Text(", "));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

///////////////////////////////////////////////////////////////////////////////
