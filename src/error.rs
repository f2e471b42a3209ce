use thiserror::Error;


/// Every way reading or evaluating a line can fail.
///
/// Parse errors leave the environment untouched. Evaluation errors abort the
/// current line only; definitions made earlier on that line are kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LispleError {
    #[error("blank input string")]
    EmptyInput,

    #[error("unmatched (")]
    UnmatchedOpenParen,

    #[error("unmatched )")]
    UnmatchedCloseParen,

    #[error("unmatched \"")]
    UnterminatedQuotedString,

    #[error("left over text: {0}")]
    TrailingInput(String),

    #[error("expression nested deeper than {0} levels")]
    TooDeeplyNested(usize),

    #[error("{0}")]
    Arity(String),

    #[error("unknown apply method: {0}")]
    UnknownOperator(String),

    #[error("{0}")]
    TypeMismatch(String),

    #[error("evaluation nested deeper than {0} calls")]
    RecursionLimit(usize),

    #[error("closure environment has already been released")]
    ReleasedFrame,
}

impl LispleError {
    /// Name of the error's category, stable across message changes.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyInput => "EmptyInput",
            Self::UnmatchedOpenParen => "UnmatchedOpenParen",
            Self::UnmatchedCloseParen => "UnmatchedCloseParen",
            Self::UnterminatedQuotedString => "UnterminatedQuotedString",
            Self::TrailingInput(_) => "TrailingInput",
            Self::TooDeeplyNested(_) => "TooDeeplyNested",
            Self::Arity(_) => "ArityError",
            Self::UnknownOperator(_) => "UnknownOperator",
            Self::TypeMismatch(_) => "TypeMismatch",
            Self::RecursionLimit(_) => "RecursionLimit",
            Self::ReleasedFrame => "ReleasedFrame",
        }
    }
}
