//! Left recursion elimination.
//!
//! Every transform takes a grammar by reference and returns a new one, the
//! input is never modified. Non-terminals are processed in the order of their
//! first appearance as a rule head (see `Grammar::non_terminals`), which makes
//! the output reproducible. Fresh symbols are named by `Grammar::fresh_symbol`,
//! so `A` gets `A'` unless that name is already taken.

#![deny(warnings)]

use crate::grammar::{Grammar, Rule, Symbol};
use std::collections::{HashMap, HashSet};

/// Non-terminals having at least one rule `A -> A α`, in rule order.
pub fn directly_left_recursive(grammar: &Grammar) -> Vec<Symbol> {
    grammar.non_terminals().into_iter()
        .filter(|nt| grammar.rules_for(nt).any(|r| r.is_left_recursive()))
        .collect()
}

/// Whether some non-terminal left-derives itself, either through one rule or
/// a chain of rules. Nullable prefixes are skipped when looking for the
/// leftmost symbol, so `A -> B A` with `B -> <e>` counts too.
pub fn has_left_recursion(grammar: &Grammar) -> bool {
    let nullable = nullable_symbols(grammar);
    // lhs -> non-terminals that may start one of its expansions
    let mut leftmost: HashMap<&Symbol, Vec<&Symbol>> = HashMap::new();
    for rule in grammar.rules() {
        for symbol in &rule.rhs {
            if grammar.is_non_terminal(symbol) {
                leftmost.entry(&rule.lhs).or_default().push(symbol);
            }
            if !nullable.contains(symbol) {
                break;
            }
        }
    }
    grammar.non_terminals().iter().any(|start| {
        let mut seen = HashSet::new();
        let mut stack = leftmost.get(start).cloned().unwrap_or_default();
        while let Some(symbol) = stack.pop() {
            if symbol == start {
                return true;
            }
            if seen.insert(symbol) {
                if let Some(next) = leftmost.get(symbol) {
                    stack.extend(next.iter().copied());
                }
            }
        }
        false
    })
}

fn nullable_symbols(grammar: &Grammar) -> HashSet<Symbol> {
    let mut nullable = HashSet::new();
    loop {
        let before = nullable.len();
        for rule in grammar.rules() {
            if rule.rhs.iter().all(|s| nullable.contains(s)) {
                nullable.insert(rule.lhs.clone());
            }
        }
        if nullable.len() == before {
            return nullable;
        }
    }
}

fn push_unique(rules: &mut Vec<Rule>, rule: Rule) {
    if !rules.contains(&rule) {
        rules.push(rule);
    }
}

// Rules of `grammar` with those headed by `symbol` swapped for `replacement`,
// which lands where the first rule of `symbol` used to be.
fn splice(grammar: &Grammar, symbol: &Symbol, replacement: Vec<Rule>) -> Vec<Rule> {
    let mut rules = Vec::with_capacity(grammar.rules().len() + replacement.len());
    let mut replacement = Some(replacement);
    for rule in grammar.rules() {
        if rule.lhs != *symbol {
            push_unique(&mut rules, Rule::clone(rule));
        } else if let Some(replacement) = replacement.take() {
            for new_rule in replacement {
                push_unique(&mut rules, new_rule);
            }
        }
    }
    rules
}

// Drop the rules of `symbol`, which derives no word, and every rule using it.
// Heads left without rules derive nothing either and go the same way, so
// none of them turns into a terminal.
fn prune_barren(grammar: &Grammar, symbol: &Symbol) -> Vec<Rule> {
    let mut rules: Vec<Rule> = grammar.rules().iter().map(|r| Rule::clone(r)).collect();
    let mut barren = vec![symbol.clone()];
    while let Some(symbol) = barren.pop() {
        let heads: Vec<Symbol> = rules.iter().map(|r| r.lhs.clone()).collect();
        rules.retain(|r| r.lhs != symbol && !r.rhs.contains(&symbol));
        for head in heads {
            if head != symbol && !barren.contains(&head)
                    && !rules.iter().any(|r| r.lhs == head) {
                tracing::debug!(symbol = %head, "derives no word");
                barren.push(head);
            }
        }
    }
    rules
}

/// Remove direct left recursion of `symbol`:
///
/// ```text
/// A -> A α1 | ... | A αm | β1 | ... | βk
/// ```
/// becomes
/// ```text
/// A  -> β1 | β1 A' | ... | βk | βk A'
/// A' -> α1 | α1 A' | ... | αm | αm A'
/// ```
///
/// Self loops `A -> A` have an empty α, they're dropped since they add
/// nothing to the language. Rules of other symbols pass through untouched.
///
/// Without any β the recursion never ends and `A` derives no word. Its rules
/// are dropped along with every rule using `A`, and no `A'` is created.
/// Symbols that lose all their rules this way are pruned in turn.
pub fn remove_direct_recursion_for(grammar: &Grammar, symbol: &Symbol) -> Grammar {
    let (recursive, others): (Vec<_>, Vec<_>) = grammar.rules_for(symbol)
        .partition(|r| r.is_left_recursive());
    if recursive.is_empty() {
        return grammar.clone();
    }
    if others.is_empty() {
        let rules = prune_barren(grammar, symbol);
        return Grammar::derived(grammar.symbols().to_vec(), grammar.axiom().clone(), rules);
    }
    let alphas: Vec<&[Symbol]> = recursive.iter()
        .map(|r| &r.rhs[1..])
        .filter(|alpha| !alpha.is_empty())
        .collect();

    let mut symbols = grammar.symbols().to_vec();
    let mut rewritten = Vec::new();
    if alphas.is_empty() {
        rewritten.extend(others.iter().map(|r| Rule::clone(r)));
        tracing::debug!(symbol = %symbol, "dropped self loops");
    } else {
        let prime = grammar.fresh_symbol(symbol.name());
        for beta in &others {
            rewritten.push(Rule::new(symbol.clone(), beta.rhs.clone()));
            rewritten.push(Rule::new(symbol.clone(),
                beta.rhs.iter().cloned().chain([prime.clone()]).collect()));
        }
        for alpha in &alphas {
            rewritten.push(Rule::new(prime.clone(), alpha.to_vec()));
            rewritten.push(Rule::new(prime.clone(),
                alpha.iter().cloned().chain([prime.clone()]).collect()));
        }
        tracing::debug!(symbol = %symbol, prime = %prime, "removed direct left recursion");
        symbols.push(prime);
    }
    let rules = splice(grammar, symbol, rewritten);
    Grammar::derived(symbols, grammar.axiom().clone(), rules)
}

/// Remove all direct left recursion, one non-terminal at a time, until no
/// rule starts with its own head.
pub fn remove_direct_recursion(grammar: &Grammar) -> Grammar {
    let mut current = grammar.clone();
    while let Some(symbol) = directly_left_recursive(&current).into_iter().next() {
        current = remove_direct_recursion_for(&current, &symbol);
    }
    current
}

// Replace every `ai -> aj α` by `ai -> δ α` for each `aj -> δ`.
fn substitute(grammar: &Grammar, ai: &Symbol, aj: &Symbol) -> Grammar {
    let expansions: Vec<&[Symbol]> = grammar.rules_for(aj).map(|r| r.rhs.as_slice()).collect();
    let mut rules = Vec::with_capacity(grammar.rules().len());
    for rule in grammar.rules() {
        if rule.lhs == *ai && rule.rhs.first() == Some(aj) {
            for delta in &expansions {
                let rhs = delta.iter().chain(&rule.rhs[1..]).cloned().collect();
                push_unique(&mut rules, Rule::new(ai.clone(), rhs));
            }
        } else {
            push_unique(&mut rules, Rule::clone(rule));
        }
    }
    Grammar::derived(grammar.symbols().to_vec(), grammar.axiom().clone(), rules)
}

/// Remove direct and indirect left recursion (Paull's algorithm).
///
/// With the non-terminals ordered `A1 .. An`, each `Ai` first gets every rule
/// starting with an earlier `Aj` expanded by the current rules of `Aj`, then
/// its direct recursion removed. The result is free of left recursion for
/// grammars without epsilon rules or unit cycles; the language is preserved
/// in every case.
pub fn remove_left_recursion(grammar: &Grammar) -> Grammar {
    let _span = tracing::span!(tracing::Level::DEBUG, "remove_left_recursion").entered();
    let order = grammar.non_terminals();
    let mut current = grammar.clone();
    for (i, ai) in order.iter().enumerate() {
        for aj in &order[..i] {
            current = substitute(&current, ai, aj);
        }
        current = remove_direct_recursion_for(&current, ai);
    }
    tracing::debug!(rules = current.rules().len(), "left recursion removed");
    current
}

///////////////////////////////////////////////////////////////////////////////
