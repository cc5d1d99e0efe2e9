use serde::Serialize;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    Value,
    Operator,
    Tab,
    LineEnd,
    Separator,
    BracketOpen,
    BracketClose,
    Comma,
    StatementEnd,
    BlockOpen,
    BlockClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    None,
    Operator,
    OpenComment,
    EndComment,
}

/// Line-driven tokenizer for signal scripts.
///
/// Lines are pulled from the source only when the queue of pending tokens
/// runs dry, so a parser driving this iterator never reads further ahead than
/// the line it is working on.
pub struct Lexer<I> {
    lines: I,
    line_number: usize,
    state: LexState,
    pending: String,
    line_content: bool,
    queue: VecDeque<Token>,
    exhausted: bool,
}

pub fn tokenize(source: &str) -> Vec<Token> {
    Lexer::from_source(source).collect()
}

impl<'a> Lexer<std::str::Lines<'a>> {
    pub fn from_source(source: &'a str) -> Self {
        Self::new(source.lines())
    }
}

impl<I> Lexer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub fn new<L>(lines: L) -> Self
    where
        L: IntoIterator<IntoIter = I>,
    {
        Self::with_line_offset(lines, 0)
    }

    /// Starts numbering after `offset`, for scripts embedded further down a
    /// larger file.
    pub fn with_line_offset<L>(lines: L, offset: usize) -> Self
    where
        L: IntoIterator<IntoIter = I>,
    {
        Self {
            lines: lines.into_iter(),
            line_number: offset,
            state: LexState::None,
            pending: String::new(),
            line_content: false,
            queue: VecDeque::new(),
            exhausted: false,
        }
    }

    /// 1-based number of the last line read (plus any offset).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn lex_line(&mut self, line: &str) {
        self.line_number += 1;
        self.line_content = false;
        let line = line.strip_suffix('\r').unwrap_or(line);

        for ch in line.chars() {
            match ch {
                '/' => match self.state {
                    LexState::None => self.start_operator(ch),
                    LexState::Operator if self.pending == "/" => {
                        // line comment: drop the rest of the physical line
                        self.pending.clear();
                        self.state = LexState::None;
                        break;
                    }
                    LexState::Operator => self.extend_operator(ch),
                    LexState::EndComment => self.state = LexState::None,
                    LexState::OpenComment => {}
                },
                '*' => match self.state {
                    LexState::OpenComment | LexState::EndComment => {
                        self.state = LexState::EndComment
                    }
                    LexState::Operator if self.pending == "/" => {
                        self.pending.clear();
                        self.state = LexState::OpenComment;
                    }
                    LexState::Operator => self.extend_operator(ch),
                    LexState::None => self.start_operator(ch),
                },
                _ if self.in_comment() => self.state = LexState::OpenComment,
                _ => {
                    if let Some(kind) = punctuation_kind(ch) {
                        self.flush_pending();
                        self.state = LexState::None;
                        self.emit(kind, ch.to_string());
                    } else if is_operator_char(ch) {
                        match self.state {
                            LexState::Operator => self.extend_operator(ch),
                            _ => self.start_operator(ch),
                        }
                    } else {
                        if self.state == LexState::Operator {
                            self.flush(TokenKind::Operator);
                            self.state = LexState::None;
                        }
                        self.pending.extend(ch.to_uppercase());
                    }
                }
            }
        }

        if self.in_comment() {
            // a `*` at the end of a line does not pair with a `/` on the next one
            self.state = LexState::OpenComment;
            return;
        }
        self.flush_pending();
        if self.line_content {
            self.emit(TokenKind::LineEnd, "\n".to_string());
        }
        self.state = LexState::None;
    }

    fn finish(&mut self) {
        self.exhausted = true;
        if !self.in_comment() {
            self.flush(TokenKind::Value);
        }
    }

    fn in_comment(&self) -> bool {
        matches!(self.state, LexState::OpenComment | LexState::EndComment)
    }

    fn start_operator(&mut self, ch: char) {
        self.flush(TokenKind::Value);
        self.pending.push(ch);
        self.state = LexState::Operator;
    }

    fn extend_operator(&mut self, ch: char) {
        if !extends_operator(&self.pending, ch) {
            self.flush(TokenKind::Operator);
        }
        self.pending.push(ch);
    }

    fn flush_pending(&mut self) {
        let kind = if self.state == LexState::Operator {
            TokenKind::Operator
        } else {
            TokenKind::Value
        };
        self.flush(kind);
    }

    fn flush(&mut self, kind: TokenKind) {
        if !self.pending.is_empty() {
            let text = std::mem::take(&mut self.pending);
            self.emit(kind, text);
        }
    }

    fn emit(&mut self, kind: TokenKind, text: String) {
        if kind != TokenKind::LineEnd {
            self.line_content = true;
        }
        tracing::trace!(target: "sigscr", ?kind, text = %text, line = self.line_number, "token");
        self.queue.push_back(Token {
            kind,
            text,
            line: self.line_number,
        });
    }
}

impl<I> Iterator for Lexer<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            if let Some(token) = self.queue.pop_front() {
                return Some(token);
            }
            if self.exhausted {
                return None;
            }
            match self.lines.next() {
                Some(line) => self.lex_line(line.as_ref()),
                None => self.finish(),
            }
        }
    }
}

fn punctuation_kind(ch: char) -> Option<TokenKind> {
    let kind = match ch {
        ';' => TokenKind::StatementEnd,
        '{' => TokenKind::BlockOpen,
        '}' => TokenKind::BlockClose,
        '(' => TokenKind::BracketOpen,
        ')' => TokenKind::BracketClose,
        '\t' => TokenKind::Tab,
        ' ' => TokenKind::Separator,
        ',' => TokenKind::Comma,
        _ => return None,
    };
    Some(kind)
}

fn is_operator_char(ch: char) -> bool {
    matches!(
        ch,
        '|' | '&' | '^' | '!' | '+' | '-' | '%' | '#' | '<' | '>' | '='
    )
}

/// Whether `pending` followed by `next` still spells a known multi-character
/// operator.
fn extends_operator(pending: &str, next: char) -> bool {
    matches!(
        (pending, next),
        ("|", '|')
            | ("&", '&')
            | ("!" | "=" | "<" | ">", '=')
            | ("==" | "!=" | "<=" | ">=", '#')
            | ("<" | ">", '#')
            | ("+" | "-" | "*" | "%" | "#", '=')
            | ("/", '=' | '#')
            | ("/#", '=')
    )
}

#[cfg(test)]
#[path = "lexer_test.rs"]
mod tests;
