use chartparse::{CykParser, GrammarBuilder};

fn main() {
    // S -> S A | a;  A -> B S | C S;  B -> b;  C -> c;
    let grammar = GrammarBuilder::default()
      .symbols(&["S", "A", "B", "C", "a", "b", "c"])
      .rule("S", &["S", "A"])
      .rule("S", &["a"])
      .rule("A", &["B", "S"])
      .rule("A", &["C", "S"])
      .rule("B", &["b"])
      .rule("C", &["c"])
      .into_grammar("S")
      .unwrap();

    let word = std::env::args().nth(1).unwrap_or_else(|| "abaca".to_string());
    let parser = CykParser::new(grammar).unwrap();
    let table = parser.parse(word.chars().map(|c| c.to_string())).unwrap();
    print!("{}", table);
    if !table.accepted() {
        println!("{:?} rejected", word);
    }
    for tree in table.trees() {
        println!("{}", tree);
    }
}
