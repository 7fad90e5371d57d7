#![deny(warnings)]

use crate::error::Error;
use std::borrow::Borrow;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// A grammar label, terminal or non-terminal. Symbols are interned names:
/// two symbols with the same name are the same symbol.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(Rc<str>);

/// A production `lhs -> rhs`. An empty `rhs` is an epsilon production.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    pub lhs: Symbol,
    pub rhs: Vec<Symbol>,
}

/// An immutable context-free grammar. Non-terminals are derived from the
/// rules: a symbol is a non-terminal iff it heads at least one rule.
#[derive(Clone, Debug)]
pub struct Grammar {
    symbols: Vec<Symbol>,
    alphabet: HashSet<Symbol>,
    axiom: Symbol,
    rules: Vec<Rc<Rule>>,
    nonterms: HashSet<Symbol>,
}

#[derive(Default)]
pub struct GrammarBuilder {
    symbols: Vec<Symbol>,
    rules: Vec<Rule>,
    error: Option<String>,
}


impl Symbol {
    pub fn new(name: impl AsRef<str>) -> Self {
        Symbol(Rc::from(name.as_ref()))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self { Symbol(Rc::from(name)) }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self { Symbol(Rc::from(name)) }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str { &self.0 }
}

// Hash/Eq of Symbol are those of its name, so lookups by &str are coherent.
impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str { &self.0 }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

impl Rule {
    pub fn new(lhs: Symbol, rhs: Vec<Symbol>) -> Self {
        Rule { lhs, rhs }
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }

    /// `A -> A α`
    pub fn is_left_recursive(&self) -> bool {
        self.rhs.first() == Some(&self.lhs)
    }

    /// `X -> X`, which derives nothing new and would loop forever if predicted.
    pub fn is_self_loop(&self) -> bool {
        self.rhs.len() == 1 && self.rhs[0] == self.lhs
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs.iter()
               .map(|s| s.name()).collect::<Vec<_>>().join(" "))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Grammar {
    /// Build a grammar checking that the axiom and every rule symbol belong to
    /// the alphabet. Repeated names in `symbols` collapse to one.
    pub fn new<S, R>(symbols: S, axiom: Symbol, rules: R) -> Result<Grammar, Error>
        where S: IntoIterator<Item=Symbol>, R: IntoIterator<Item=Rule>
    {
        let grammar = Grammar::derived(
            symbols.into_iter().collect(), axiom, rules.into_iter().collect());
        if !grammar.alphabet.contains(&grammar.axiom) {
            return Err(Error::InvalidGrammar(
                format!("Missing Symbol: {}", grammar.axiom)));
        }
        for rule in &grammar.rules {
            let missing = std::iter::once(&rule.lhs).chain(rule.rhs.iter())
                .find(|s| !grammar.alphabet.contains(*s));
            if let Some(s) = missing {
                return Err(Error::InvalidGrammar(
                    format!("Missing Symbol: {} in {}", s, rule)));
            }
        }
        Ok(grammar)
    }

    /// Assemble a grammar out of parts already known to be consistent, as
    /// transforms of a valid grammar are.
    pub(crate) fn derived(symbols: Vec<Symbol>, axiom: Symbol, rules: Vec<Rule>) -> Grammar {
        let mut alphabet = HashSet::new();
        let symbols: Vec<_> = symbols.into_iter()
            .filter(|s| alphabet.insert(s.clone()))
            .collect();
        let nonterms = rules.iter().map(|r| r.lhs.clone()).collect();
        Grammar {
            symbols,
            alphabet,
            axiom,
            rules: rules.into_iter().map(Rc::new).collect(),
            nonterms,
        }
    }

    /// Alphabet in declaration order.
    pub fn symbols(&self) -> &[Symbol] { &self.symbols }

    pub fn axiom(&self) -> &Symbol { &self.axiom }

    pub fn rules(&self) -> &[Rc<Rule>] { &self.rules }

    pub fn contains(&self, name: &str) -> bool {
        self.alphabet.contains(name)
    }

    pub fn is_non_terminal(&self, symbol: &Symbol) -> bool {
        self.nonterms.contains(symbol)
    }

    pub fn is_terminal(&self, symbol: &Symbol) -> bool {
        self.alphabet.contains(symbol) && !self.nonterms.contains(symbol)
    }

    /// Rules headed by `symbol`, in grammar order.
    pub fn rules_for<'a>(&'a self, symbol: &'a Symbol) -> impl Iterator<Item=&'a Rc<Rule>> + 'a {
        self.rules.iter().filter(move |r| r.lhs == *symbol)
    }

    /// Non-terminals in order of first appearance as a rule head.
    pub fn non_terminals(&self) -> Vec<Symbol> {
        let mut seen = HashSet::new();
        self.rules.iter()
            .filter(|r| seen.insert(&r.lhs))
            .map(|r| r.lhs.clone())
            .collect()
    }

    /// Alphabet symbols that head no rule, in declaration order.
    pub fn terminals(&self) -> Vec<Symbol> {
        self.symbols.iter()
            .filter(|s| !self.nonterms.contains(*s))
            .cloned()
            .collect()
    }

    /// A symbol named after `base` that isn't in the alphabet yet: `base`
    /// itself if free, else `base'`, `base''`, ... Doesn't modify the grammar.
    pub fn fresh_symbol(&self, base: &str) -> Symbol {
        let mut name = base.to_string();
        while self.alphabet.contains(name.as_str()) {
            name.push('\'');
        }
        Symbol::from(name)
    }

    /// Map input names to grammar symbols, failing at the first unknown one.
    pub fn resolve<I>(&self, word: I) -> Result<Vec<Symbol>, Error>
        where I: IntoIterator, I::Item: AsRef<str>
    {
        word.into_iter().enumerate().map(|(position, name)| {
            self.alphabet.get(name.as_ref()).cloned().ok_or_else(||
                Error::UnknownSymbol { symbol: name.as_ref().to_string(), position })
        }).collect()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "symbols = [{}]", self.symbols.iter()
                 .map(|s| s.name()).collect::<Vec<_>>().join(", "))?;
        writeln!(f, "axiom = {}", self.axiom)?;
        writeln!(f, "rules = [")?;
        for rule in &self.rules {
            writeln!(f, "    {}", rule)?;
        }
        write!(f, "]")
    }
}

/// Builds a Grammar while validating existence of Symbols and checking rules.
impl GrammarBuilder {
    fn add_symbol(&mut self, name: &str, quiet: bool) {
        // Check for duplicate symbols to avoid overwriting by mistake
        if !self.symbols.iter().any(|s| s.name() == name) {
            self.symbols.push(Symbol::new(name));
        } else if !quiet && self.error.is_none() {
            self.error = Some(format!("Duplicate Symbol: {}", name));
        }
    }

    pub fn symbol(mut self, name: impl AsRef<str>) -> Self {
        self.add_symbol(name.as_ref(), false);
        self
    }

    pub fn symbols<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        for name in names {
            self.add_symbol(name.as_ref(), false);
        }
        self
    }

    // Quiet silently ignores adding pre-existent symbols to the grammar.
    // Also quiet versions don't use chaining to be invoked in loops.

    pub fn quiet_symbol(&mut self, name: impl AsRef<str>) {
        self.add_symbol(name.as_ref(), true);
    }

    fn add_rule<S, S2>(&mut self, lhs: S, rhs: &[S2], quiet: bool)
        where S: AsRef<str>, S2: AsRef<str>
    {
        if self.error.is_some() {
            return;
        }
        let lookup = |name: &str| self.symbols.iter().find(|s| s.name() == name).cloned();
        let Some(lhs_sym) = lookup(lhs.as_ref()) else {
            self.error = Some(format!("Missing Symbol: {}", lhs.as_ref()));
            return;
        };
        let mut rhs_syms = Vec::with_capacity(rhs.len());
        for name in rhs {
            match lookup(name.as_ref()) {
                Some(s) => rhs_syms.push(s),
                None => {
                    self.error = Some(format!("Missing Symbol: {}", name.as_ref()));
                    return;
                }
            }
        }
        let rule = Rule::new(lhs_sym, rhs_syms);
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        } else if !quiet {
            self.error = Some(format!("Duplicate Rule: {}", rule));
        }
    }

    pub fn rule<S, S2>(mut self, lhs: S, rhs: &[S2]) -> Self
        where S: AsRef<str>, S2: AsRef<str>
    {
        self.add_rule(lhs, rhs, false);
        self
    }

    pub fn quiet_rule<S, S2>(&mut self, lhs: S, rhs: &[S2])
        where S: AsRef<str>, S2: AsRef<str>
    {
        self.add_rule(lhs, rhs, true)
    }

    pub fn into_grammar(self, axiom: impl AsRef<str>) -> Result<Grammar, Error> {
        if let Some(error) = self.error {
            return Err(Error::InvalidGrammar(error));
        }
        Grammar::new(self.symbols, Symbol::new(axiom), self.rules)
    }
}


///////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{Error, Grammar, GrammarBuilder, Rule, Symbol};
    use std::collections::HashSet;

    fn g1() -> Grammar {
        // S -> A S | b ; A -> a
        GrammarBuilder::default()
            .symbols(&["S", "A", "a", "b"])
            .rule("S", &["A", "S"])
            .rule("S", &["b"])
            .rule("A", &["a"])
            .into_grammar("S")
            .expect("Bad grammar")
    }

    #[test]
    fn symbol_eq_hash() {
        assert_eq!(Symbol::new("X"), Symbol::from("X".to_string()));
        assert_ne!(Symbol::new("X"), Symbol::new("X'"));
        let mut m = HashSet::new();
        m.insert(Symbol::new("X"));
        m.insert(Symbol::from("X"));
        assert_eq!(m.len(), 1);
        assert!(m.contains("X"));
    }

    #[test]
    fn rule_display() {
        let r = Rule::new(Symbol::new("S"), vec![Symbol::new("A"), Symbol::new("b")]);
        assert_eq!(r.to_string(), "S -> A b");
        let e = Rule::new(Symbol::new("A"), vec![]);
        assert_eq!(e.to_string(), "A -> ");
        assert!(e.is_epsilon());
        assert!(Rule::new(Symbol::new("A"), vec![Symbol::new("A")]).is_self_loop());
        assert!(Rule::new(Symbol::new("A"), vec![Symbol::new("A"), Symbol::new("a")])
                .is_left_recursive());
    }

    #[test]
    fn build_grammar() {
        let g = g1();
        assert_eq!(g.axiom(), &Symbol::new("S"));
        assert_eq!(g.rules().len(), 3);
        assert!(g.is_non_terminal(&Symbol::new("S")));
        assert!(g.is_non_terminal(&Symbol::new("A")));
        assert!(!g.is_non_terminal(&Symbol::new("a")));
        assert!(g.is_terminal(&Symbol::new("b")));
        assert!(!g.is_terminal(&Symbol::new("z")));
        assert_eq!(g.non_terminals(), vec![Symbol::new("S"), Symbol::new("A")]);
        assert_eq!(g.terminals(), vec![Symbol::new("a"), Symbol::new("b")]);
        assert_eq!(g.rules_for(&Symbol::new("S")).count(), 2);
    }

    #[test]
    fn dup_symbol() {
        let g = GrammarBuilder::default()
            .symbol("Sum")
            .symbol("Sum")
            .into_grammar("Sum");
        assert_eq!(g.unwrap_err(), Error::InvalidGrammar("Duplicate Symbol: Sum".to_string()));
    }

    #[test]
    fn dup_rule() {
        let g = GrammarBuilder::default()
            .symbols(&["Sum", "Num", "+"])
            .rule("Sum", &["Sum", "+", "Num"])
            .rule("Sum", &["Sum", "+", "Num"])
            .rule("Sum", &["Num"])
            .into_grammar("Sum");
        assert_eq!(g.unwrap_err().to_string(),
                   "Invalid Grammar: Duplicate Rule: Sum -> Sum + Num");
    }

    #[test]
    fn missing_symbol() {
        let g = GrammarBuilder::default()
            .symbols(&["Sum", "Num"])
            .rule("Sum", &["Num"])
            .into_grammar("Xum");
        assert_eq!(g.unwrap_err(), Error::InvalidGrammar("Missing Symbol: Xum".to_string()));

        let g = GrammarBuilder::default()
            .symbol("Sum")
            .rule("Sum", &["Num"])
            .into_grammar("Sum");
        assert_eq!(g.unwrap_err(), Error::InvalidGrammar("Missing Symbol: Num".to_string()));
    }

    #[test]
    fn invalid_rule_symbol() {
        let s = Symbol::new("S");
        let g = Grammar::new(
            vec![s.clone(), Symbol::new("a")],
            s.clone(),
            vec![Rule::new(s.clone(), vec![Symbol::new("b")])]);
        assert_eq!(g.unwrap_err(),
                   Error::InvalidGrammar("Missing Symbol: b in S -> b".to_string()));
        let g = Grammar::new(vec![Symbol::new("a")], s, vec![]);
        assert!(matches!(g, Err(Error::InvalidGrammar(_))));
    }

    #[test]
    fn repeated_symbols_collapse() {
        let s = Symbol::new("S");
        let g = Grammar::new(
            vec![s.clone(), Symbol::new("a"), s.clone()],
            s.clone(),
            vec![Rule::new(s, vec![Symbol::new("a")])]).unwrap();
        assert_eq!(g.symbols().len(), 2);
    }

    #[test]
    fn fresh_symbol() {
        let g = GrammarBuilder::default()
            .symbols(&["A", "A'", "a"])
            .rule("A", &["a"])
            .into_grammar("A")
            .unwrap();
        assert_eq!(g.fresh_symbol("A"), Symbol::new("A''"));
        // pure: asking again gives the same candidate
        assert_eq!(g.fresh_symbol("A"), Symbol::new("A''"));
        assert_eq!(g.fresh_symbol("B"), Symbol::new("B"));
        assert_eq!(g.fresh_symbol("A'"), Symbol::new("A''"));
    }

    #[test]
    fn resolve_word() {
        let g = g1();
        let w = g.resolve("aab".chars().map(|c| c.to_string())).unwrap();
        assert_eq!(w, vec![Symbol::new("a"), Symbol::new("a"), Symbol::new("b")]);
        assert_eq!(g.resolve(["a", "c", "b"]).unwrap_err(),
                   Error::UnknownSymbol { symbol: "c".to_string(), position: 1 });
        assert!(g.resolve(Vec::<String>::new()).unwrap().is_empty());
    }

    #[test]
    fn grammar_display() {
        let g = g1();
        assert_eq!(g.to_string(),
                   "symbols = [S, A, a, b]\naxiom = S\nrules = [\n    S -> A S\n    S -> b\n    A -> a\n]");
    }
}
