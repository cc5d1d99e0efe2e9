use super::{tokenize, Lexer, Token, TokenKind};

fn words(tokens: &[Token]) -> Vec<&str> {
    tokens
        .iter()
        .filter(|token| matches!(token.kind, TokenKind::Value | TokenKind::Operator))
        .map(|token| token.text.as_str())
        .collect()
}

fn without_blanks(tokens: Vec<Token>) -> Vec<(TokenKind, String)> {
    tokens
        .into_iter()
        .filter(|token| !matches!(token.kind, TokenKind::Separator | TokenKind::Tab))
        .map(|token| (token.kind, token.text))
        .collect()
}

#[test]
fn tokenizes_assignment_statement() {
    let tokens = tokenize("state = sig_stop + 1;");
    let kinds = tokens.iter().map(|token| token.kind).collect::<Vec<_>>();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Value,
            TokenKind::Separator,
            TokenKind::Operator,
            TokenKind::Separator,
            TokenKind::Value,
            TokenKind::Separator,
            TokenKind::Operator,
            TokenKind::Separator,
            TokenKind::Value,
            TokenKind::StatementEnd,
            TokenKind::LineEnd,
        ]
    );
    assert_eq!(words(&tokens), vec!["STATE", "=", "SIG_STOP", "+", "1"]);
}

#[test]
fn punctuation_carries_its_character() {
    let tokens = tokenize("{(a,b)}");
    let pairs = tokens
        .into_iter()
        .map(|token| (token.kind, token.text))
        .collect::<Vec<_>>();
    assert_eq!(
        pairs,
        vec![
            (TokenKind::BlockOpen, "{".to_string()),
            (TokenKind::BracketOpen, "(".to_string()),
            (TokenKind::Value, "A".to_string()),
            (TokenKind::Comma, ",".to_string()),
            (TokenKind::Value, "B".to_string()),
            (TokenKind::BracketClose, ")".to_string()),
            (TokenKind::BlockClose, "}".to_string()),
            (TokenKind::LineEnd, "\n".to_string()),
        ]
    );
}

#[test]
fn matches_multi_character_operators_greedily() {
    let tokens = tokenize("a>=#b !=c /#= d<#e x||y");
    assert_eq!(
        words(&tokens),
        vec!["A", ">=#", "B", "!=", "C", "/#=", "D", "<#", "E", "X", "||", "Y"]
    );
}

#[test]
fn splits_operators_that_do_not_combine() {
    assert_eq!(words(&tokenize("a=-1")), vec!["A", "=", "-", "1"]);
    assert_eq!(words(&tokenize("a++")), vec!["A", "+", "+"]);
    assert_eq!(words(&tokenize("a/b")), vec!["A", "/", "B"]);
    assert_eq!(words(&tokenize("a^=b")), vec!["A", "^", "=", "B"]);
}

#[test]
fn line_comment_drops_rest_of_line() {
    let tokens = tokenize("a = 1; // set b = 2;\nc;");
    assert_eq!(words(&tokens), vec!["A", "=", "1", "C"]);
    let line_ends = tokens
        .iter()
        .filter(|token| token.kind == TokenKind::LineEnd)
        .count();
    assert_eq!(line_ends, 2);
}

#[test]
fn block_comment_spans_lines() {
    let source = "x /* start\n still ; comment {\n end */ y;";
    let tokens = tokenize(source);
    assert_eq!(words(&tokens), vec!["X", "Y"]);
    assert!(!tokens.iter().any(|token| token.kind == TokenKind::BlockOpen));
    let last = tokens.last().expect("tokens");
    assert_eq!(last.kind, TokenKind::LineEnd);
    assert_eq!(last.line, 3);
}

#[test]
fn star_inside_comment_only_closes_before_slash() {
    assert_eq!(words(&tokenize("/* a * b */ c")), vec!["C"]);
    assert_eq!(words(&tokenize("/* a **/ c")), vec!["C"]);
    assert_eq!(words(&tokenize("/* a *\n/ b */ c")), vec!["C"]);
}

#[test]
fn text_after_closed_comment_is_tokenized() {
    let tokens = tokenize("/* note */state=1;");
    assert_eq!(words(&tokens), vec!["STATE", "=", "1"]);
}

#[test]
fn comment_only_lines_emit_no_line_end() {
    let tokens = tokenize("// header\n\n/* one */\nstate;");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0].line, 4);
    assert_eq!(tokens[2].kind, TokenKind::LineEnd);
}

#[test]
fn letters_are_upper_cased() {
    let lower = tokenize("if (next_sig_lr(sig_fn_normal) ==# sigasp_stop)");
    let mixed = tokenize("If (Next_Sig_LR(SIG_FN_Normal) ==# SigAsp_Stop)");
    assert_eq!(words(&lower), words(&mixed));
    assert_eq!(words(&lower)[0], "IF");
}

#[test]
fn blanks_do_not_change_other_tokens() {
    let tight = without_blanks(tokenize("a=b+c;"));
    let loose = without_blanks(tokenize("a \t = \t b  +   c ;"));
    assert_eq!(tight, loose);
}

#[test]
fn tracks_line_numbers_with_offset() {
    let mut lexer = Lexer::with_line_offset(vec!["", "a;"], 10);
    let first = lexer.next().expect("token");
    assert_eq!(first.text, "A");
    assert_eq!(first.line, 12);
    assert_eq!(lexer.line_number(), 12);
}

#[test]
fn strips_carriage_returns() {
    let tokens = tokenize("a;\r\nb;\r\n");
    assert_eq!(words(&tokens), vec!["A", "B"]);
}
