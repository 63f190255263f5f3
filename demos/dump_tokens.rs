use pest::Parser;
use pixpath::{PathDataParser, Rule};

fn main() {
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "M0,0 L10-5.5.5 q1,1 2,2 Zx".to_string());

    println!("Tokenizing: {}", input);
    println!();

    match PathDataParser::parse(Rule::path_data, &input) {
        Ok(pairs) => match pest_ascii_tree::into_ascii_tree(pairs) {
            Ok(tree) => println!("{}", tree),
            Err(e) => eprintln!("Tree error: {}", e),
        },
        Err(e) => eprintln!("Tokenize error: {}", e),
    }

    let parsed = pixpath::parse_path_data(&input);
    println!("{:#?}", parsed.path.commands());
    for report in parsed.reports("<arg>", &input) {
        eprintln!("{report:?}");
    }
}
