use crate::ast::Script;
use crate::builder::{Closer, ScriptBuilder};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::operator::OperatorToken;
use crate::options::ParseOptions;
use serde_json::json;
use sigscr_core::Diagnostic;

pub const UNKNOWN_OPERATOR_KIND: &str = "sigscr.operator.unknown";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("matching element not found at line {line}: expected `{expected}`, got `{found}`")]
    MismatchedClose {
        expected: &'static str,
        found: &'static str,
        line: usize,
    },
    #[error("`{found}` without an opening element at line {line}")]
    UnmatchedClose { found: &'static str, line: usize },
    #[error("script `{script}` ends at line {line} with an open {open}")]
    UnclosedScript {
        script: String,
        open: &'static str,
        line: usize,
    },
    #[error("ELSE without a matching IF at line {line}")]
    ElseWithoutIf { line: usize },
    #[error("IF without a condition at line {line}")]
    MissingCondition { line: usize },
    #[error("`{construct}` is not allowed inside a statement at line {line}")]
    MisplacedBlock {
        construct: &'static str,
        line: usize,
    },
    #[error("unexpected {found} at line {line}")]
    Unexpected { found: String, line: usize },
    #[error("nesting depth {depth} exceeds the configured maximum at line {line}")]
    NestingTooDeep { depth: usize, line: usize },
    #[error("no alternate attachment point found at line {line}")]
    MissingAlternateReturn { line: usize },
    #[error("invalid operator `{operator}` at line {line}")]
    InvalidOperator { operator: String, line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::MismatchedClose { line, .. }
            | Self::UnmatchedClose { line, .. }
            | Self::UnclosedScript { line, .. }
            | Self::ElseWithoutIf { line }
            | Self::MissingCondition { line }
            | Self::MisplacedBlock { line, .. }
            | Self::Unexpected { line, .. }
            | Self::NestingTooDeep { line, .. }
            | Self::MissingAlternateReturn { line }
            | Self::InvalidOperator { line, .. } => *line,
        }
    }
}

/// Pulls tokens from a [`Lexer`] and yields one [`Script`] per `SCRIPT`
/// region. Stops for good after the first error.
pub struct Parser<I> {
    lexer: Lexer<I>,
    builder: Option<ScriptBuilder>,
    remark: bool,
    strict_operators: bool,
    max_depth: Option<usize>,
    diagnostics: Vec<Diagnostic>,
    finished: bool,
}

pub fn parse_scripts(source: &str) -> Result<Vec<Script>, ParseError> {
    Parser::new(Lexer::from_source(source)).collect()
}

pub fn parse_scripts_with_options(
    source: &str,
    options: &ParseOptions,
) -> Result<Vec<Script>, ParseError> {
    Parser::with_options(source.lines(), options).collect()
}

impl<I> Parser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new(lexer: Lexer<I>) -> Self {
        Self::from_lexer(lexer, &ParseOptions::default())
    }

    /// Parses `lines` with every option applied, `line_offset` included.
    pub fn with_options<L>(lines: L, options: &ParseOptions) -> Self
    where
        L: IntoIterator<IntoIter = I>,
    {
        Self::from_lexer(Lexer::with_line_offset(lines, options.line_offset), options)
    }

    fn from_lexer(lexer: Lexer<I>, options: &ParseOptions) -> Self {
        Self {
            lexer,
            builder: None,
            remark: false,
            strict_operators: options.strict_operators,
            max_depth: options.max_depth,
            diagnostics: Vec::new(),
            finished: false,
        }
    }

    pub fn line_number(&self) -> usize {
        self.lexer.line_number()
    }

    /// Warnings raised so far, in source order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn consume(&mut self, token: Token) -> Result<Option<Script>, ParseError> {
        let Some(builder) = self.builder.as_mut() else {
            self.consume_outside_script(&token);
            return Ok(None);
        };
        let line = token.line;

        if builder.reading_name() {
            match token.kind {
                TokenKind::Value | TokenKind::Operator => {
                    builder.push_name(&token.text);
                    return Ok(None);
                }
                TokenKind::Separator | TokenKind::Tab | TokenKind::Comma => return Ok(None),
                TokenKind::LineEnd | TokenKind::StatementEnd => {
                    builder.end_name();
                    return Ok(None);
                }
                _ => builder.end_name(),
            }
        }

        match token.kind {
            TokenKind::StatementEnd => builder.end_statement(line)?,
            TokenKind::LineEnd | TokenKind::Separator | TokenKind::Tab | TokenKind::Comma => {}
            TokenKind::BlockOpen => builder.open_block(line)?,
            TokenKind::BracketOpen => builder.open_enclosure(line)?,
            TokenKind::BlockClose => builder.close(Closer::Brace, line)?,
            TokenKind::BracketClose => builder.close(Closer::Bracket, line)?,
            TokenKind::Operator => {
                let operator = classify_operator(
                    token.text,
                    line,
                    self.strict_operators,
                    &mut self.diagnostics,
                )?;
                builder.add_operator(operator, line)?;
            }
            TokenKind::Value => match token.text.as_str() {
                "REM" => {
                    let script = self.close_script(line)?;
                    self.remark = true;
                    return Ok(Some(script));
                }
                "SCRIPT" => {
                    let script = self.close_script(line)?;
                    self.open_script(line);
                    return Ok(Some(script));
                }
                "IF" => builder.open_conditional(line)?,
                "ELSE" => builder.open_alternate(line)?,
                "AND" | "OR" | "NOT" | "MOD" | "DIV" | "EOR" => {
                    let operator = classify_operator(
                        token.text,
                        line,
                        self.strict_operators,
                        &mut self.diagnostics,
                    )?;
                    builder.add_operator(operator, line)?;
                }
                _ => builder.add_value(token.text, line)?,
            },
        }
        Ok(None)
    }

    /// Between scripts only `REM` and `SCRIPT` matter; a `REM` makes the next
    /// `SCRIPT` part of the remark.
    fn consume_outside_script(&mut self, token: &Token) {
        if token.kind != TokenKind::Value {
            return;
        }
        match token.text.as_str() {
            "REM" => self.remark = !self.remark,
            "SCRIPT" if self.remark => self.remark = false,
            "SCRIPT" => self.open_script(token.line),
            _ => {}
        }
    }

    fn open_script(&mut self, line: usize) {
        tracing::debug!(target: "sigscr", line, "script started");
        self.builder = Some(ScriptBuilder::new(line, self.max_depth));
    }

    fn close_script(&mut self, line: usize) -> Result<Script, ParseError> {
        let Some(builder) = self.builder.take() else {
            return Err(ParseError::Unexpected {
                found: "script boundary".to_string(),
                line,
            });
        };
        let name = builder.name().to_string();
        let script = builder.finish(line)?;
        tracing::debug!(
            target: "sigscr",
            script = %name,
            line,
            nodes = script.node_count(),
            "script parsed"
        );
        Ok(script)
    }
}

/// Unknown operators are kept as `Other` with a warning, or rejected when
/// `strict` is set.
fn classify_operator(
    text: String,
    line: usize,
    strict: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<OperatorToken, ParseError> {
    let operator = OperatorToken::new(text);
    if operator.kind.is_known() {
        return Ok(operator);
    }
    if strict {
        return Err(ParseError::InvalidOperator {
            operator: operator.text,
            line,
        });
    }
    tracing::warn!(target: "sigscr", operator = %operator.text, line, "invalid operator token");
    diagnostics.push(
        Diagnostic::warning(
            UNKNOWN_OPERATOR_KIND,
            line,
            format!("invalid operator token {} in line number {}", operator.text, line),
        )
        .with_related(json!({ "operator": operator.text })),
    );
    Ok(operator)
}

impl<I> Iterator for Parser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Result<Script, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        while let Some(token) = self.lexer.next() {
            match self.consume(token) {
                Ok(Some(script)) => return Some(Ok(script)),
                Ok(None) => {}
                Err(error) => {
                    self.finished = true;
                    return Some(Err(error));
                }
            }
        }
        self.finished = true;
        if self.builder.is_none() {
            return None;
        }
        let line = self.lexer.line_number();
        Some(self.close_script(line))
    }
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;
