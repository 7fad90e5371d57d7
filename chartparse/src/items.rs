#![deny(warnings)]

use crate::grammar::{Rule, Symbol};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::{fmt, hash, mem};


/// Derivation step that produced an Item.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub enum BackPointer {
    /// `.0` advanced over the run of input terminals `.1`
    Scan(Rc<Item>, Vec<Symbol>),
    /// `.0` advanced over its next symbol, completed by `.1`
    Complete(Rc<Item>, Rc<Item>),
}

/// A dotted rule anchored on the input: `rhs[..dot]` matched `[start, end)`.
pub struct Item {
    pub rule: Rc<Rule>,
    pub dot: usize,
    pub start: usize,
    pub end: usize,
    // Other items hold Rc's to this one, so new derivations of the same item
    // are added in place. Index 0 is the derivation it was created with.
    backpointers: RefCell<Vec<BackPointer>>,
}

impl Item {
    // Identity of an Item, derivations aside.
    fn key(&self) -> (&Rule, usize, usize, usize) {
        (&*self.rule, self.dot, self.start, self.end)
    }
}

impl hash::Hash for Item {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Item) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Item {}

// Derivation chains grow with the input. Items only reachable through the
// one being dropped are unlinked here, one at a time, not recursively.
impl Drop for Item {
    fn drop(&mut self) {
        let mut pending = mem::take(self.backpointers.get_mut());
        while let Some(backpointer) = pending.pop() {
            let linked = match backpointer {
                BackPointer::Scan(source, _) => [Some(source), None],
                BackPointer::Complete(source, trigger) => [Some(source), Some(trigger)],
            };
            for mut item in linked.into_iter().flatten().filter_map(Rc::into_inner) {
                pending.append(item.backpointers.get_mut());
            }
        }
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let names = |symbols: &[Symbol]| symbols.iter()
            .map(|s| s.name()).collect::<Vec<_>>().join(" ");
        write!(f, "({} - {}) {} -> {} \u{00b7} {} #bp: {}",
               self.start, self.end, self.rule.lhs,
               names(self.matched()), names(self.remaining()),
               self.backpointers.borrow().len())
    }
}

impl Item {
    pub fn lhs(&self) -> &Symbol {
        &self.rule.lhs
    }

    /// Inactive item: nothing left to match.
    pub fn complete(&self) -> bool {
        self.dot >= self.rule.rhs.len()
    }

    pub fn matched(&self) -> &[Symbol] {
        &self.rule.rhs[..self.dot]
    }

    pub fn remaining(&self) -> &[Symbol] {
        &self.rule.rhs[self.dot..]
    }

    /// Symbol right after the dot, None once complete.
    pub fn next_symbol(&self) -> Option<&Symbol> {
        self.rule.rhs.get(self.dot)
    }

    /// Every known derivation of this item, oldest first.
    pub fn sources(&self) -> Ref<'_, Vec<BackPointer>> {
        self.backpointers.borrow()
    }

    /// Absorb the derivations of an equal item, skipping known ones.
    pub fn merge_sources(&self, mut other: Item) {
        assert_eq!(*self, other, "BUG: merging different items");
        let mut known = self.backpointers.borrow_mut();
        for bp in mem::take(other.backpointers.get_mut()) {
            if !known.contains(&bp) {
                known.push(bp);
            }
        }
    }

    /// Zero-width item for `rule` at `start`.
    pub fn predict_new(rule: &Rc<Rule>, start: usize) -> Item {
        Item {
            rule: Rc::clone(rule),
            dot: 0,
            start,
            end: start,
            backpointers: RefCell::default(),
        }
    }

    /// `source` moved past `terminals`, one input position each.
    pub fn scan_new(source: &Rc<Item>, terminals: Vec<Symbol>) -> Item {
        let width = terminals.len();
        Item {
            rule: Rc::clone(&source.rule),
            dot: source.dot + width,
            start: source.start,
            end: source.end + width,
            backpointers: RefCell::new(vec![BackPointer::Scan(Rc::clone(source), terminals)]),
        }
    }

    /// `source` moved past its next symbol, which `trigger` completed.
    pub fn complete_new(source: &Rc<Item>, trigger: &Rc<Item>) -> Item {
        debug_assert!(trigger.complete() && source.next_symbol() == Some(trigger.lhs()));
        Item {
            rule: Rc::clone(&source.rule),
            dot: source.dot + 1,
            start: source.start,
            end: trigger.end,
            backpointers: RefCell::new(vec![
                BackPointer::Complete(Rc::clone(source), Rc::clone(trigger))]),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////
