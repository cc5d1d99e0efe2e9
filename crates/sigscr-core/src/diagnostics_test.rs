use super::{Diagnostic, DiagnosticSeverity};
use serde_json::json;

#[test]
fn diagnostics_are_sorted_by_severity_then_line() {
    let mut diagnostics = vec![
        Diagnostic::warning("sigscr.operator.unknown", 3, "second"),
        Diagnostic::warning("sigscr.operator.unknown", 1, "first warning"),
        Diagnostic::error("sigscr.options.schema", 0, "first"),
    ];

    Diagnostic::sort_stable(&mut diagnostics);

    assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Error);
    assert_eq!(diagnostics[1].line, 1);
    assert_eq!(diagnostics[2].line, 3);
}

#[test]
fn diagnostic_serializes_without_empty_optionals() {
    let diagnostic = Diagnostic::warning("sigscr.operator.unknown", 12, "invalid operator token ~");
    let value = serde_json::to_value(&diagnostic).expect("serialize");
    assert_eq!(
        value,
        json!({
            "kind": "sigscr.operator.unknown",
            "severity": "warning",
            "line": 12,
            "message": "invalid operator token ~"
        })
    );
}

#[test]
fn diagnostic_display_names_severity_and_line() {
    let diagnostic = Diagnostic::error("sigscr.options.max_depth", 0, "max_depth must be > 0")
        .with_reference("max_depth")
        .with_related(json!({"max_depth": 0}));
    assert!(diagnostic.is_error());
    assert_eq!(
        diagnostic.to_string(),
        "error [sigscr.options.max_depth] line 0: max_depth must be > 0"
    );
}
