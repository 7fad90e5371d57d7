use chartparse::derecursify::{has_left_recursion, remove_left_recursion};
use chartparse::{EarleyParser, GrammarBuilder};

fn main() {
    // E -> E + T | T;  T -> T * F | F;  F -> ( E ) | a;
    let grammar = GrammarBuilder::default()
      .symbols(&["E", "T", "F", "+", "*", "(", ")", "a"])
      .rule("E", &["E", "+", "T"])
      .rule("E", &["T"])
      .rule("T", &["T", "*", "F"])
      .rule("T", &["F"])
      .rule("F", &["(", "E", ")"])
      .rule("F", &["a"])
      .into_grammar("E")
      .unwrap();

    let fixed = remove_left_recursion(&grammar);
    println!("{}\n", grammar);
    println!("{}\n", fixed);
    println!("left recursive: {} -> {}",
             has_left_recursion(&grammar), has_left_recursion(&fixed));

    let input: Vec<String> = "a+(a*a)".chars().map(|c| c.to_string()).collect();
    for g in [grammar, fixed] {
        for tree in EarleyParser::new(g).parse(&input).unwrap().trees() {
            println!("{}", tree);
        }
    }
}
