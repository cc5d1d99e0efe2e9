use super::render_script;
use crate::parser::parse_scripts;
use std::fs;
use std::path::PathBuf;

fn render_first(source: &str) -> String {
    let scripts = parse_scripts(source).expect("source must parse");
    render_script(scripts.first().expect("one script"))
}

#[test]
fn renders_statements_with_indentation() {
    let rendered = render_first("SCRIPT Home\n state=BLOCK_STATE(); x+=1;\n");
    assert_eq!(rendered, "SCRIPT HOME\n  STATE = BLOCK_STATE ();\n  X += 1;\n");
}

#[test]
fn renders_conditional_chain() {
    let rendered = render_first(
        "SCRIPT T\nIF (A == 1) X = 1; ELSE IF (B) { X = 2; Y = 3; } ELSE X = 4;\n",
    );
    let expected = "\
SCRIPT T
  IF (A == 1)
    X = 1;
  ELSE IF (B)
  {
    X = 2;
    Y = 3;
  }
  ELSE
    X = 4;
";
    assert_eq!(rendered, expected);
}

#[test]
fn renders_nested_conditional_and_empty_body() {
    let rendered = render_first("SCRIPT T\nIF (A) IF (B) ; ELSE C = 1;\n");
    let expected = "\
SCRIPT T
  IF (A)
    IF (B)
      ;
    ELSE
      C = 1;
";
    assert_eq!(rendered, expected);
}

#[test]
fn rendering_is_stable_across_reparse() {
    let sources = [
        "SCRIPT T\nIF (A) IF (B) S1; ELSE S2; ELSE S3;\n",
        "SCRIPT T\n{ IF (NOT A AND (B OR C)) { X = F (1, 2); } }\nY = 2;\n",
        "SCRIPT T\nIF (A) { } ELSE IF (B) ; ELSE { IF (C) D = 1; }\n",
    ];
    for source in sources {
        let first = render_first(source);
        let second = render_first(&first);
        assert_eq!(first, second, "render must be stable for {source:?}");
    }
}

#[test]
fn fixture_scripts_survive_render_and_reparse() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../fixtures/scripts/uk_signals.dat");
    let source = fs::read_to_string(path).expect("read fixture");
    let scripts = parse_scripts(&source).expect("fixture must parse");

    let rendered = scripts.iter().map(render_script).collect::<String>();
    let reparsed = parse_scripts(&rendered).expect("rendering must parse");
    assert_eq!(reparsed.len(), scripts.len());
    for (original, again) in scripts.iter().zip(&reparsed) {
        assert_eq!(original.name(), again.name());
        assert_eq!(original.node_count(), again.node_count());
        assert_eq!(render_script(original), render_script(again));
    }
}
