use crate::parse::Rule;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] Box<pest::error::Error<Rule>>),
    #[error("line {line}: closing tag </{close}> does not match <{open}>")]
    MismatchedTag {
        open: String,
        close: String,
        line: usize,
    },
    #[error("line {line}: attribute `{name}` has an empty expression")]
    EmptyAttributeExpression { name: String, line: usize },
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<pest::error::Error<Rule>> for Error {
    fn from(value: pest::error::Error<Rule>) -> Self {
        Self::Parse(Box::new(value))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
