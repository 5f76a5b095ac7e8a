use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("'{0}' is neither an assignment nor a calculation")]
    unparsable(String),
}

pub type Result<T> = std::result::Result<T, CalcError>;
