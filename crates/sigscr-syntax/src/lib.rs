pub mod ast;
mod builder;
pub mod lexer;
pub mod operator;
pub mod options;
pub mod parser;
pub mod render;

pub use ast::{ConditionalBlock, ConditionalPhase, Node, NodeId, NodeKind, Script};
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use operator::{OperatorKind, OperatorToken};
pub use options::{
    load_parse_options, parse_options_str, validate_parse_options, OptionsError, OptionsFormat,
    ParseOptions, PARSE_OPTIONS_SCHEMA,
};
pub use parser::{
    parse_scripts, parse_scripts_with_options, ParseError, Parser, UNKNOWN_OPERATOR_KIND,
};
pub use render::render_script;
