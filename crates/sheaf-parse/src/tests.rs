use std::fs;
use std::path::{Path, PathBuf};

use expect_test::expect_file;
use sheaf_ast::walk::walk_post;
use sheaf_ast::{Node, dump};
use sheaf_translate::translate;

use crate::{ConfigError, Context, Error, ParseOptions, parse, parse_in};

#[derive(PartialEq, Eq, PartialOrd, Ord)]
struct TestCase {
    input: PathBuf,
    expected: PathBuf,
    text: String,
}

impl TestCase {
    fn list() -> Vec<Self> {
        let test_data_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test_data");

        let mut cases = fs::read_dir(&test_data_dir)
            .unwrap_or_else(|err| {
                panic!("Cannot read directory {}: {err}", test_data_dir.display())
            })
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? == "css" {
                    let expected = path.with_extension("ast");
                    let text = fs::read_to_string(&path).ok()?;
                    Some(Self { input: path, expected, text })
                } else {
                    None
                }
            })
            .collect::<Vec<_>>();

        cases.sort();
        cases
    }
}

#[test]
fn snapshots() {
    let test_cases = TestCase::list();
    assert!(!test_cases.is_empty());

    for case in test_cases {
        let actual = match parse(&case.text, &ParseOptions::default()) {
            Ok(ast) => format!("{}---\n{}\n", dump(&ast), translate(&ast)),
            Err(error) => format!("error: {error}\n"),
        };
        expect_file![&case.expected].assert_eq(&actual);
    }
}

fn positions(text: &str, options: ParseOptions) -> Vec<(&'static str, u32, u32)> {
    let ast = parse(text, &options.positions(true)).unwrap();
    let mut out = Vec::new();
    walk_post(&ast, &mut |node: &Node| {
        if let Some(info) = &node.info {
            out.push((node.name(), info.line, info.column));
        }
    });
    out
}

const POSITIONED: &str = ".foo.bar {\n  property: value;\n}";

#[test]
fn node_positions() {
    assert_eq!(
        positions(POSITIONED, ParseOptions::default()),
        [
            ("Class", 1, 1),
            ("Class", 1, 5),
            ("SimpleSelector", 1, 1),
            ("Selector", 1, 1),
            ("Property", 2, 3),
            ("Identifier", 2, 13),
            ("Value", 2, 12),
            ("Declaration", 2, 3),
            ("Block", 1, 10),
            ("Ruleset", 1, 1),
            ("StyleSheet", 1, 1),
        ]
    );
}

#[test]
fn byte_order_mark_does_not_shift_positions() {
    let with_bom = format!("\u{feff}{POSITIONED}");
    assert_eq!(
        positions(&with_bom, ParseOptions::default()),
        positions(POSITIONED, ParseOptions::default())
    );
}

#[test]
fn column_bias_applies_to_first_line() {
    let biased = positions(POSITIONED, ParseOptions::default().column(5));
    let expected = positions(POSITIONED, ParseOptions::default())
        .into_iter()
        .map(|(name, line, column)| (name, line, if line == 1 { column + 4 } else { column }))
        .collect::<Vec<_>>();

    assert_eq!(biased, expected);
}

#[test]
fn line_bias_applies_to_every_line() {
    let biased = positions(POSITIONED, ParseOptions::default().line(3));
    let expected = positions(POSITIONED, ParseOptions::default())
        .into_iter()
        .map(|(name, line, column)| (name, line + 2, column))
        .collect::<Vec<_>>();

    assert_eq!(biased, expected);
}

#[test]
fn positions_carry_filename() {
    let options = ParseOptions::default().positions(true).filename("main.css");
    let ast = parse("a{}", &options).unwrap();
    assert_eq!(ast.info.as_ref().map(|info| &*info.source), Some("main.css"));

    let ast = parse("a{}", &ParseOptions::default()).unwrap();
    assert_eq!(ast.info, None);
}

#[test]
fn context_names() {
    for context in Context::ALL {
        assert_eq!(context.as_str().parse::<Context>(), Ok(context));
    }

    assert_eq!("rule".parse::<Context>(), Err(ConfigError::UnknownContext("rule".to_owned())));
    assert_eq!(
        "Stylesheet".parse::<Context>().unwrap_err().to_string(),
        "Unknown context `Stylesheet`"
    );
}

#[test]
fn parse_in_named_context() {
    let cases = [
        ("value", "1px  solid red", "1px solid red"),
        ("property", "*zoom", "*zoom"),
        ("declaration", "color : red", "color:red"),
        ("block", "a:1;;b:2", "a:1;b:2"),
        ("selector", "a , .b", "a,.b"),
        ("simpleSelector", "ul > li", "ul>li"),
        ("atrule", "@page :first{margin:0}", "@page :first{margin:0}"),
        ("atruleExpression", "screen and (color)", "screen and (color)"),
        ("ruleset", "a{b:c}", "a{b:c}"),
    ];

    for (context, text, expected) in cases {
        let ast = parse_in(text, context, ParseOptions::default()).unwrap();
        assert_eq!(translate(&ast), expected, "{context}: {text:?}");
    }

    let error = parse_in("a", "rule", ParseOptions::default()).unwrap_err();
    assert_eq!(error, Error::Config(ConfigError::UnknownContext("rule".to_owned())));
}

#[test]
fn syntax_errors() {
    let cases = [
        ("a{b:c)}", "Unexpected input", 1, 6),
        ("a>>b{}", "Unexpected combinator", 1, 3),
        ("@media screen)", "Unexpected input", 1, 14),
        ("a{color:red !imp}", "Identifier `important` is expected", 1, 14),
        ("li:nth-child(foo){}", "Unexpected identifier", 1, 14),
        ("a{color:#}", "Number or identifier is expected", 1, 10),
        ("a{color red}", "`:` is expected", 1, 9),
        ("a{\n  b: c;\n  d e", "`:` is expected", 3, 5),
        ("a{b:c", "`}` is expected", 1, 6),
        ("a{b:f(,a)}", "Unexpected input", 1, 7),
        ("a{b:f(a,,b)}", "Unexpected input", 1, 9),
        ("a{b:f(a,)}", "Unexpected input", 1, 9),
        ("a{b:f(a, /* x */ )}", "Unexpected input", 1, 18),
        ("a:lang(en,){}", "Unexpected input", 1, 11),
    ];

    for (text, message, line, column) in cases {
        let error = parse(text, &ParseOptions::default()).unwrap_err();
        let location = error.location();
        assert_eq!(
            (error.message(), location.line, location.column),
            (message, line, column),
            "{text:?}"
        );
    }
}

#[test]
fn line_comment_inside_block_is_an_identifier() {
    let options = ParseOptions::default().context(Context::Block);
    let ast = parse("//color:red;b:c", &options).unwrap();

    assert_eq!(translate(&ast), "//color:red;b:c");
}
