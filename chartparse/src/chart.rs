#![deny(warnings)]

use crate::grammar::Symbol;
use crate::items::Item;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;


/// Storage for an Earley parse: a FIFO agenda of items waiting to be
/// processed and the chart of items already processed.
///
/// An item is admitted to the agenda at most once. Re-deriving an item that
/// was already queued only adds its derivation to the existing item.
#[derive(Default)]
pub struct ParseChart {
    agenda: VecDeque<Rc<Item>>,
    queued: HashSet<Rc<Item>>,
    chart: Vec<Rc<Item>>,
    charted: HashSet<Rc<Item>>,
    // active items by (end, next symbol), in chart order
    waiting: HashMap<(usize, Symbol), Vec<Rc<Item>>>,
    // complete items by (start, lhs), in chart order
    completed: HashMap<(usize, Symbol), Vec<Rc<Item>>>,
}

impl ParseChart {
    pub fn new() -> ParseChart {
        ParseChart::default()
    }

    /// Queue an item unless an equal one was seen before, in which case
    /// its backpointers are merged into the existing item. Returns whether
    /// the item was new.
    pub fn enqueue(&mut self, item: Item) -> bool {
        if let Some(existent) = self.queued.get(&item) {
            existent.merge_sources(item);
            return false;
        }
        let item = Rc::new(item);
        self.queued.insert(item.clone());
        self.agenda.push_back(item);
        true
    }

    /// Next item in FIFO order.
    pub fn pop(&mut self) -> Option<Rc<Item>> {
        self.agenda.pop_front()
    }

    /// Append an item to the chart, indexing it for completion lookups.
    /// Returns false (and does nothing) if it was already charted.
    pub fn insert(&mut self, item: Rc<Item>) -> bool {
        if !self.charted.insert(item.clone()) {
            return false;
        }
        match item.next_symbol() {
            Some(next) => self.waiting
                .entry((item.end, next.clone()))
                .or_default()
                .push(item.clone()),
            None => self.completed
                .entry((item.start, item.lhs().clone()))
                .or_default()
                .push(item.clone()),
        }
        self.chart.push(item);
        true
    }

    /// Charted items ending at `pos` whose next symbol is `symbol`.
    pub fn waiting_on(&self, pos: usize, symbol: &Symbol) -> &[Rc<Item>] {
        self.waiting.get(&(pos, symbol.clone())).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Charted complete items for `symbol` starting at `pos`.
    pub fn completed_at(&self, pos: usize, symbol: &Symbol) -> &[Rc<Item>] {
        self.completed.get(&(pos, symbol.clone())).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Charted items in insertion order.
    pub fn items(&self) -> &[Rc<Item>] {
        &self.chart
    }

    pub fn len(&self) -> usize {
        self.chart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chart.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.agenda.len()
    }
}

///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ParseChart;
    use crate::grammar::{Rule, Symbol};
    use crate::items::Item;
    use std::rc::Rc;

    fn sym(name: &str) -> Symbol { Symbol::new(name) }

    fn rule(lhs: &str, rhs: &[&str]) -> Rc<Rule> {
        Rc::new(Rule::new(sym(lhs), rhs.iter().map(|s| sym(s)).collect()))
    }

    #[test]
    fn enqueue_dedups() {
        let mut chart = ParseChart::new();
        let r = rule("S", &["A", "b"]);
        assert!(chart.enqueue(Item::predict_new(&r, 0)));
        assert!(!chart.enqueue(Item::predict_new(&r, 0)));
        assert!(chart.enqueue(Item::predict_new(&r, 1)));
        assert_eq!(chart.pending(), 2);
        // FIFO order
        assert_eq!(chart.pop().map(|it| it.start), Some(0));
        assert_eq!(chart.pop().map(|it| it.start), Some(1));
        assert!(chart.pop().is_none());
        // popped items still count as seen
        assert!(!chart.enqueue(Item::predict_new(&r, 0)));
    }

    #[test]
    fn enqueue_merges_derivations() {
        let mut chart = ParseChart::new();
        let source = Rc::new(Item::predict_new(&rule("S", &["A"]), 0));
        let t1 = Rc::new(Item::predict_new(&rule("A", &[]), 0));
        let t2 = Rc::new(Item::predict_new(&rule("A", &["B"]), 0));
        assert!(chart.enqueue(Item::complete_new(&source, &t1)));
        // different derivation of the same item
        let t2 = Rc::new(Item::complete_new(&t2, &Rc::new(Item::predict_new(&rule("B", &[]), 0))));
        assert!(!chart.enqueue(Item::complete_new(&source, &t2)));
        let item = chart.pop().unwrap();
        assert_eq!(item.sources().len(), 2);
    }

    #[test]
    fn insert_indexes() {
        let mut chart = ParseChart::new();
        let active = Rc::new(Item::predict_new(&rule("S", &["A", "b"]), 2));
        let done = Rc::new(Item::predict_new(&rule("A", &[]), 2));
        assert!(chart.insert(active.clone()));
        assert!(!chart.insert(active.clone()));
        assert!(chart.insert(done.clone()));
        assert_eq!(chart.len(), 2);
        assert_eq!(chart.waiting_on(2, &sym("A")), &[active]);
        assert!(chart.waiting_on(2, &sym("b")).is_empty());
        assert_eq!(chart.completed_at(2, &sym("A")), &[done]);
        assert!(chart.completed_at(0, &sym("A")).is_empty());
    }
}
