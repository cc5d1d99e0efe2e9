use super::{
    load_parse_options, parse_options_str, validate_parse_options, OptionsError, OptionsFormat,
    ParseOptions,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[test]
fn loads_yaml_options() {
    let path = write_temp_file(
        "options-ok.yaml",
        r#"
schema: sigscr-syntax/0.1.0
line_offset: 120
strict_operators: true
max_depth: 16
"#,
    );

    let options = load_parse_options(path.as_path())
        .expect("options must load");
    assert_eq!(options.line_offset, 120);
    assert!(options.strict_operators);
    assert_eq!(options.max_depth, Some(16));
}

#[test]
fn loads_json_options_with_defaults() {
    let path = write_temp_file("options-defaults.json", r#"{"line_offset": 3}"#);
    let options = load_parse_options(path.as_path())
        .expect("options must load");
    assert_eq!(
        options,
        ParseOptions {
            line_offset: 3,
            ..ParseOptions::default()
        }
    );
}

#[test]
fn format_follows_extension() {
    assert_eq!(
        OptionsFormat::from_path(Path::new("route/sigscr.yml")),
        Some(OptionsFormat::Yaml)
    );
    assert_eq!(
        OptionsFormat::from_path(Path::new("sigscr.json")),
        Some(OptionsFormat::Json)
    );
    assert_eq!(OptionsFormat::from_path(Path::new("sigscr.dat")), None);
    assert_eq!(OptionsFormat::from_path(Path::new("sigscr")), None);
}

#[test]
fn unsupported_extension_is_rejected_before_reading() {
    let path = std::env::temp_dir().join("sigscr-options-never-written.toml");
    assert!(matches!(
        load_parse_options(path.as_path()),
        Err(OptionsError::UnsupportedFormat { .. })
    ));
}

#[test]
fn misspelled_option_is_a_decode_error() {
    let error = parse_options_str("strict_operator: true\n", OptionsFormat::Yaml)
        .expect_err("unknown field must fail");
    assert!(matches!(error, OptionsError::Parse(message) if message.starts_with("yaml:")));
}

#[test]
fn parses_options_from_memory() {
    let options = parse_options_str(r#"{"max_depth": 8}"#, OptionsFormat::Json)
        .expect("options must parse");
    assert_eq!(options.max_depth, Some(8));
    assert!(!options.strict_operators);
}

#[test]
fn rejects_invalid_options() {
    let path = write_temp_file(
        "options-invalid.yaml",
        "schema: sigscr-syntax/9.9.9\nmax_depth: 0\n",
    );
    let diagnostics = match load_parse_options(path.as_path()) {
        Err(OptionsError::Validation(diagnostics)) => diagnostics,
        other => panic!("expected validation error, got {other:?}"),
    };
    let kinds = diagnostics
        .iter()
        .map(|diagnostic| diagnostic.kind.as_str())
        .collect::<Vec<_>>();
    assert_eq!(kinds, vec!["sigscr.options.max_depth", "sigscr.options.schema"]);
}

#[test]
fn missing_file_is_read_error() {
    let path = std::env::temp_dir().join("sigscr-options-does-not-exist.yaml");
    assert!(matches!(
        load_parse_options(path.as_path()),
        Err(OptionsError::ReadFile { .. })
    ));
}

#[test]
fn default_options_are_valid() {
    assert!(validate_parse_options(&ParseOptions::default()).is_empty());
}

fn write_temp_file(name: &str, contents: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = std::env::temp_dir().join(format!("sigscr-{nanos}-{name}"));
    fs::write(&path, contents).expect("write temp file");
    path
}
