#![deny(warnings)]

use crate::items::{BackPointer, Item};
use crate::trees::Tree;
use std::collections::HashSet;
use std::rc::Rc;


/*
## S -> S + N | N
## N -> [0-9]
## "1 + 2"

             S -> S + N.
                /  \
               /    \
          S +.N     N -> [0-9].
           / \             / \
          /   \           /   \
       S.+ N   "+"    .[0-9]   "2"
         /\
        /  \
   .S + N   S -> N.
              /\
             /  \
           .N    N -> [0-9].
                   / \
                  /   \
              .[0-9]   "1"
*/
// Follow the first backpointer of each item: the derivation that created it.
// First backpointers always point at older items so the walk terminates even
// on cyclic grammars. Builds the tree with explicit stacks, children are
// collected right to left and reversed on reduction.
pub fn first_tree(root: &Rc<Item>) -> Tree {
    let mut args: Vec<Tree> = Vec::new();
    let mut completions = Vec::new();
    let mut items = vec![root.clone()];

    while let Some(cursor) = items.pop() {
        // As the chart is unwound keep a record of rules to reduce
        if cursor.complete() {
            completions.push(cursor.clone());
        }
        let sources = cursor.sources();
        match sources.first() {
            // Back at the start of a rule, build its node out of args
            None => {
                let completed: Rc<Item> = completions.pop()
                    .expect("BUG: item rule never completed");
                debug_assert_eq!(cursor.rule, completed.rule);
                let arity = completed.rule.rhs.len();
                let children = args.split_off(args.len() - arity).into_iter().rev().collect();
                args.push(Tree::Node(completed.lhs().clone(), children));
            }
            Some(BackPointer::Complete(source, trigger)) => {
                items.push(source.clone());
                items.push(trigger.clone());
            }
            Some(BackPointer::Scan(source, terminals)) => {
                args.extend(terminals.iter().rev().map(|t| Tree::Leaf(t.clone())));
                items.push(source.clone());
            }
        }
    }
    args.pop().expect("BUG: no tree built for root")
}

/// Every distinct tree rooted at a complete item. Derivations where an item
/// shows up inside its own subtree are cut, so the result is finite.
pub fn all_trees(root: &Rc<Item>) -> Vec<Tree> {
    let mut trees = Vec::new();
    for children in walker_all(root) {
        let tree = Tree::Node(root.lhs().clone(), children);
        if !trees.contains(&tree) {
            trees.push(tree);
        }
    }
    trees
}

// A pending walk over the derivations of one item. `next` is the backpointer
// being expanded; for a completion the trigger is walked first and its trees
// wait in `tails` while the source is walked.
struct Walk {
    item: Rc<Item>,
    next: usize,
    tails: Option<Vec<Vec<Tree>>>,
    prefixes: Vec<Vec<Tree>>,
}

enum Step {
    Descend(Rc<Item>),
    Continue,
    Done,
}

impl Walk {
    fn backpointer(&self) -> Option<BackPointer> {
        self.item.sources().get(self.next).cloned()
    }

    fn start(&self) -> Step {
        match self.backpointer() {
            None => Step::Done,
            Some(BackPointer::Complete(_, trigger)) => Step::Descend(trigger),
            Some(BackPointer::Scan(source, _)) => Step::Descend(source),
        }
    }

    // Take the lists of children a nested walk produced
    fn resume(&mut self, walked: Vec<Vec<Tree>>) -> Step {
        let backpointer = self.backpointer().expect("BUG: walk resumed past its sources");
        match (backpointer, self.tails.take()) {
            (BackPointer::Complete(source, trigger), None) => {
                if walked.is_empty() {
                    self.next += 1;
                    return Step::Continue;
                }
                self.tails = Some(walked.into_iter()
                    .map(|children| vec![Tree::Node(trigger.lhs().clone(), children)])
                    .collect());
                Step::Descend(source)
            }
            (BackPointer::Complete(..), Some(tails)) => {
                join(&mut self.prefixes, walked, tails);
                self.next += 1;
                Step::Continue
            }
            (BackPointer::Scan(_, terminals), _) => {
                let leaves = terminals.into_iter().map(Tree::Leaf).collect();
                join(&mut self.prefixes, walked, vec![leaves]);
                self.next += 1;
                Step::Continue
            }
        }
    }
}

// Every head followed by every tail, skipping lists already known.
fn join(prefixes: &mut Vec<Vec<Tree>>, heads: Vec<Vec<Tree>>, tails: Vec<Vec<Tree>>) {
    let mut push = |args: Vec<Tree>| if !prefixes.contains(&args) {
        prefixes.push(args);
    };
    // A single derivation on each side moves instead of copying subtrees
    if heads.len() == 1 && tails.len() == 1 {
        let args = heads.into_iter().flatten().chain(tails.into_iter().flatten()).collect();
        push(args);
        return;
    }
    for head in &heads {
        for tail in &tails {
            push(head.iter().chain(tail).cloned().collect());
        }
    }
}

// Open a walk over `item`, unless it is already being walked: that path is
// a cycle and yields nothing.
fn enter(item: &Rc<Item>, visiting: &mut HashSet<Rc<Item>>, walks: &mut Vec<Walk>)
        -> Option<Vec<Vec<Tree>>> {
    if !visiting.insert(item.clone()) {
        return Some(Vec::new());
    }
    let prefixes = if item.sources().is_empty() { vec![Vec::new()] } else { Vec::new() };
    walks.push(Walk{item: item.clone(), next: 0, tails: None, prefixes});
    None
}

// Every list of children the matched prefix of `root` can stand for. Nested
// walks live on an explicit stack, deep derivations don't grow the call stack.
fn walker_all(root: &Rc<Item>) -> Vec<Vec<Tree>> {
    let mut visiting = HashSet::new();
    let mut walks = Vec::new();
    // result of the innermost walk that just finished
    let mut walked = enter(root, &mut visiting, &mut walks);
    while let Some(walk) = walks.last_mut() {
        let step = match walked.take() {
            Some(children) => walk.resume(children),
            None => walk.start(),
        };
        match step {
            Step::Descend(item) => walked = enter(&item, &mut visiting, &mut walks),
            Step::Continue => (),
            Step::Done => {
                let walk = walks.pop().expect("BUG: no walk to close");
                visiting.remove(&walk.item);
                walked = Some(walk.prefixes);
            }
        }
    }
    walked.unwrap_or_default()
}
