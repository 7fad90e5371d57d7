#![deny(warnings)]

use crate::chart::ParseChart;
use crate::error::Error;
use crate::forest;
use crate::grammar::{Grammar, Rule, Symbol};
use crate::items::Item;
use crate::trees::{Retention, Tree};
use std::rc::Rc;
use tracing::Level;


/// Agenda driven Earley parser. Accepts any context-free grammar, including
/// left-recursive, cyclic and epsilon ones.
pub struct EarleyParser {
    pub grammar: Grammar,
    retention: Retention,
}

/// Outcome of a parse: the closed chart and the complete axiom items that
/// span the whole input. Holds no roots if the word was rejected.
pub struct ParseTrees {
    roots: Vec<Rc<Item>>,
    chart: ParseChart,
    retention: Retention,
}

///////////////////////////////////////////////////////////////////////////////

impl EarleyParser {
    pub fn new(grammar: Grammar) -> EarleyParser {
        EarleyParser{grammar, retention: Retention::default()}
    }

    /// Trees handed out by `ParseTrees::trees`.
    pub fn retention(mut self, retention: Retention) -> Self {
        self.retention = retention;
        self
    }

    /// Build new `Prediction` items for every rule of `symbol`. `X -> X`
    /// rules are skipped, they add no derivation.
    fn predictions<'r>(
        rules: impl Iterator<Item=&'r Rc<Rule>> + 'r,
        start_pos: usize,
    ) -> impl Iterator<Item=Item> + 'r
    {
        rules.filter(|rule| !rule.is_self_loop())
            .map(move |rule| Item::predict_new(rule, start_pos))
    }

    /// Build new `Completion` items involving `item`. A complete item advances
    /// the charted items waiting on its lhs where it starts. An active item
    /// advances over the charted completions of its next symbol where it ends.
    fn completions(chart: &ParseChart, item: &Rc<Item>) -> Vec<Item> {
        match item.next_symbol() {
            None => chart.waiting_on(item.start, item.lhs()).iter()
                .map(|source| Item::complete_new(source, item))
                .collect(),
            Some(next) => chart.completed_at(item.end, next).iter()
                .map(|trigger| Item::complete_new(item, trigger))
                .collect(),
        }
    }

    /// Build a `Scan` item advancing `item` over every consecutive expected
    /// terminal that matches the input ahead.
    fn scan(&self, item: &Rc<Item>, word: &[Symbol]) -> Option<Item> {
        let ahead = word.get(item.end..).unwrap_or_default();
        let terminals: Vec<Symbol> = item.remaining().iter()
            .zip(ahead)
            .take_while(|(expected, input)|
                expected == input && !self.grammar.is_non_terminal(expected))
            .map(|(expected, _)| expected.clone())
            .collect();
        if terminals.is_empty() {
            return None;
        }
        Some(Item::scan_new(item, terminals))
    }

    pub fn parse<I>(&self, word: I) -> Result<ParseTrees, Error>
            where I: IntoIterator, I::Item: AsRef<str> {
        let word = self.grammar.resolve(word)?;
        let _span = tracing::span!(Level::DEBUG, "earley", len = word.len()).entered();

        // Seed the agenda with an item for each rule of the axiom
        let mut chart = ParseChart::new();
        for rule in self.grammar.rules_for(self.grammar.axiom()) {
            chart.enqueue(Item::predict_new(rule, 0));
        }

        while let Some(item) = chart.pop() {
            if !chart.insert(item.clone()) {
                continue;
            }
            tracing::trace!(?item, "charted");
            // Prediction and scanning only happen if no completion applied
            let completions = EarleyParser::completions(&chart, &item);
            if !completions.is_empty() {
                for new_item in completions {
                    chart.enqueue(new_item);
                }
                continue;
            }
            match item.next_symbol() {
                Some(next) if self.grammar.is_non_terminal(next) => {
                    let rules = self.grammar.rules_for(next);
                    for new_item in EarleyParser::predictions(rules, item.end) {
                        chart.enqueue(new_item);
                    }
                }
                Some(_) => {
                    if let Some(new_item) = self.scan(&item, &word) {
                        chart.enqueue(new_item);
                    }
                }
                None => (),
            }
        }

        // debug chart
        if cfg!(feature="debug") {
            for (idx, item) in chart.items().iter().enumerate() {
                let src = item.sources().iter()
                    .map(|bp| format!("{:?}", bp))
                    .collect::<Vec<_>>().join(", ");
                tracing::debug!("{:>4} {:?} -- SRC: {}", idx, item, src);
            }
        }

        // Roots are a. complete, b. start at 0 and end at the input end,
        // and c. the lhs of the rule is the axiom.
        let roots: Vec<_> = chart.items().iter()
            .filter(|item| item.start == 0 && item.end == word.len() &&
                           item.complete() && item.lhs() == self.grammar.axiom())
            .cloned()
            .collect();
        tracing::debug!(items = chart.len(), roots = roots.len(), "parse done");
        Ok(ParseTrees{roots, chart, retention: self.retention})
    }

    /// Whether the grammar derives `word`.
    pub fn recognize<I>(&self, word: I) -> Result<bool, Error>
            where I: IntoIterator, I::Item: AsRef<str> {
        Ok(self.parse(word)?.accepted())
    }
}

impl ParseTrees {
    pub fn accepted(&self) -> bool {
        !self.roots.is_empty()
    }

    /// Complete axiom items spanning the whole input, in chart order. More
    /// than one root means the input is ambiguous.
    pub fn roots(&self) -> &[Rc<Item>] {
        &self.roots
    }

    pub fn chart(&self) -> &ParseChart {
        &self.chart
    }

    /// Trees per the parser's `Retention`: the first derivation of each root,
    /// or every derivation.
    pub fn trees(&self) -> Vec<Tree> {
        match self.retention {
            Retention::First => self.roots.iter().map(forest::first_tree).collect(),
            Retention::All => self.all_trees(),
        }
    }

    /// Every distinct cycle-free derivation of the input.
    pub fn all_trees(&self) -> Vec<Tree> {
        let mut trees = Vec::new();
        for root in &self.roots {
            for tree in forest::all_trees(root) {
                if !trees.contains(&tree) {
                    trees.push(tree);
                }
            }
        }
        trees
    }
}
