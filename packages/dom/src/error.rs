use thiserror::Error;

pub type SelectorResult<T> = Result<T, SelectorError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("Empty selector")]
    Empty,

    #[error("Unexpected character at {pos} in {selector:?}")]
    Lexer { pos: usize, selector: String },

    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of selector at {pos}: expected {expected}")]
    UnexpectedEnd { pos: usize, expected: String },

    #[error("Unsupported pseudo-class :{0}")]
    UnsupportedPseudo(String),
}

impl SelectorError {
    pub fn lexer(pos: usize, selector: impl Into<String>) -> Self {
        Self::Lexer {
            pos,
            selector: selector.into(),
        }
    }

    pub fn unexpected_token(pos: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_end(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEnd {
            pos,
            expected: expected.into(),
        }
    }
}
