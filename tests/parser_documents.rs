//! Scenario tests for whole parses: document shapes, diagnostic wording and
//! the golden tree fixture.

use fastup::fastup::arena::Arena;
use fastup::fastup::parse::parse;
use fastup::fastup::render::{PlainRenderer, Renderer, TreeRenderer};
use fastup::fastup::store::TokenStore;
use fastup::fastup::token::TokenKind;
use rstest::rstest;

fn render_plain(source: &str) -> String {
    let mut store = TokenStore::new();
    let root = parse(&mut store, source);
    let mut out = Arena::new();
    let span = PlainRenderer.render(&mut out, &store, root);
    out.text(span).to_string()
}

fn render_tree(source: &str) -> String {
    let mut store = TokenStore::new();
    let root = parse(&mut store, source);
    let mut out = Arena::new();
    let span = TreeRenderer.render(&mut out, &store, root);
    out.text(span).to_string()
}

#[test]
fn the_golden_document_parses_to_the_expected_tree() {
    let source = r"
            {    Hello \(w{orl}d (ff0000:  Wow) \)
              |  [003333:\  This is (333333: So) (443333:great)!  ] < gradient | ffff00 | 00ffff >  {}}
        ";
    let expected = r#"mark <>
├─ mark ^$
└─ mark ^$
   └─ mark {}
      ├─ mark ^$
      │  ├─ text "    Hello "
      │  ├─ text "("
      │  ├─ text "w"
      │  ├─ mark {}
      │  │  └─ mark ^$
      │  │     └─ text "orl"
      │  ├─ text "d "
      │  ├─ mark ()
      │  │  ├─ text "ff0000"
      │  │  └─ mark ^$
      │  │     └─ text "Wow"
      │  ├─ text " "
      │  └─ text ")"
      └─ mark ^$
         ├─ mark []
         │  ├─ text "003333"
         │  └─ mark ^$
         │     ├─ text " "
         │     ├─ text " This is "
         │     ├─ mark ()
         │     │  ├─ text "333333"
         │     │  └─ mark ^$
         │     │     └─ text "So"
         │     ├─ text " "
         │     ├─ mark ()
         │     │  ├─ text "443333"
         │     │  └─ mark ^$
         │     │     └─ text "great"
         │     └─ text "!  "
         ├─ text " "
         ├─ mark <>
         │  ├─ text "gradient"
         │  ├─ mark ^$
         │  │  └─ text "ffff00"
         │  └─ mark ^$
         │     └─ text "00ffff"
         └─ text "  ""#;
    assert_eq!(render_tree(source), expected);
}

#[rstest]
#[case("(bad:x)", "expecting hex color in rrggbb format, but got \"bad:x)\".")]
#[case("(", "expecting hex color in rrggbb format.")]
#[case("(ff0000x:", "missing colon \":\" after the color \"ff0000\".")]
#[case("<", "missing widget name.")]
#[case("<time", "expecting \"|\" or \">\" after the widget name \"time\".")]
#[case("<foo bar>", "invalid widget name \"foo b\".")]
#[case("(ff0000:x", "missing leaving token for \"^\".")]
#[case("{)", "token \"{\" and \")\" is not a pair.")]
#[case("a>", "missing entering token for \">\".")]
fn syntax_errors_render_their_message(#[case] source: &str, #[case] message: &str) {
    let rendered = render_plain(source);
    assert!(
        rendered.contains("ERROR: "),
        "no error prefix in {rendered:?}"
    );
    assert!(
        rendered.contains(message),
        "expected {message:?} in {rendered:?}"
    );
}

#[test]
fn diagnostics_are_fully_paired_documents() {
    let mut store = TokenStore::new();
    let root = parse(&mut store, "(bad:x)");

    let doc = store.at(root);
    assert!(doc.pair().is_some());
    for index in doc.tree() {
        let tk = store.at_index(index);
        if tk.kind() == TokenKind::Mark {
            let pair = tk.pair().expect("every mark of a diagnostic is paired");
            assert_eq!(pair.pair().map(|p| p.id()), Some(tk.id()));
        }
    }
}

#[test]
fn a_top_level_pipe_stays_one_text_token() {
    let mut store = TokenStore::new();
    let root = parse(&mut store, "a|b");

    let content = store.at(root).children().nth(1).expect("content branch");
    let texts: Vec<&str> = content.children().map(|c| c.text()).collect();
    assert_eq!(texts, vec!["a|b"]);
    assert_eq!(render_plain("a|b"), "a|b");
}

#[test]
fn whitespace_rules_across_features() {
    assert_eq!(render_plain("  lead and trail   "), "lead and trail");
    assert_eq!(render_plain("{}  kept"), "  kept");
    assert_eq!(render_plain(r"kept\  too  "), "kept  too");
    assert_eq!(render_plain("{a }b"), "a b");
}

#[test]
fn escaped_magicals_are_plain_text() {
    assert_eq!(render_plain(r"\<\|\>\(\)\[\]\{\}\\"), "<|>()[]{}\\");
}
