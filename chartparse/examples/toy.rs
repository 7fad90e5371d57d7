fn main() {
    // Gramar:  S -> S + N | N;  N -> 1 | 2 | 3;
    let grammar = chartparse::GrammarBuilder::default()
      .symbols(&["S", "N", "+", "1", "2", "3"])
      .rule("S", &["S", "+", "N"])
      .rule("S", &["N"])
      .rule("N", &["1"])
      .rule("N", &["2"])
      .rule("N", &["3"])
      .into_grammar("S")
      .unwrap();

    // Parse some sum
    let input = "1 + 2 + 3".split_whitespace();
    let trees = chartparse::EarleyParser::new(grammar)
        .parse(input)
        .unwrap()
        .trees();

    for tree in &trees {
        println!("{}", tree);
        print!("{}", tree.pretty());
    }
}
