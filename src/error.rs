use crate::bundle::BundleError;
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};
use tokio::{io, task::JoinError};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ApplicationError {
    Build,
    Bundle(BundleError),
    FatalWarning(String),
    Other(String),
}

impl Error for ApplicationError {}

impl Display for ApplicationError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::Build => write!(formatter, "build failed"),
            Self::Bundle(error) => write!(formatter, "{}", error),
            Self::FatalWarning(message) => write!(formatter, "\n{}\n", message),
            Self::Other(message) => write!(formatter, "{}", message),
        }
    }
}

impl From<Box<dyn Error>> for ApplicationError {
    fn from(error: Box<dyn Error>) -> Self {
        Self::Other(error.to_string())
    }
}

impl From<BundleError> for ApplicationError {
    fn from(error: BundleError) -> Self {
        Self::Bundle(error)
    }
}

impl From<io::Error> for ApplicationError {
    fn from(error: io::Error) -> Self {
        Self::Other(error.to_string())
    }
}

impl From<JoinError> for ApplicationError {
    fn from(error: JoinError) -> Self {
        Self::Other(error.to_string())
    }
}

impl From<notify::Error> for ApplicationError {
    fn from(error: notify::Error) -> Self {
        Self::Other(error.to_string())
    }
}
