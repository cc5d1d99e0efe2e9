use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Negator,
    Logical,
    Assignment,
    Operation,
    Equality,
    Other,
}

impl OperatorKind {
    /// Classifies an upper-cased operator text. Anything unrecognized is
    /// `Other`; callers decide whether that is worth a warning.
    pub fn classify(text: &str) -> Self {
        match text {
            "NOT" | "!" => Self::Negator,
            "AND" | "OR" | "||" | "&&" | "EOR" | "^" => Self::Logical,
            "=" | "+=" | "-=" | "*=" | "/=" | "%=" | "#=" | "/#=" => Self::Assignment,
            "+" | "-" | "*" | "/" | "%" | "DIV" | "MOD" | "/#" => Self::Operation,
            "==" | "!=" | "<=" | ">=" | "<" | ">" | "==#" | "!=#" | "<=#" | ">=#" | "<#" | ">#" => {
                Self::Equality
            }
            _ => Self::Other,
        }
    }

    pub fn is_known(self) -> bool {
        self != Self::Other
    }
}

/// An operator leaf together with its classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorToken {
    pub text: String,
    pub kind: OperatorKind,
}

impl OperatorToken {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = OperatorKind::classify(&text);
        Self { text, kind }
    }
}

#[cfg(test)]
#[path = "operator_test.rs"]
mod tests;
