use crate::ir::StageKind;
use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    path::PathBuf,
};
use tokio::sync::AcquireError;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BundleError {
    EntryNotFound(PathBuf),
    Stage {
        stage: StageKind,
        path: PathBuf,
        message: String,
    },
    Other(String),
}

impl Error for BundleError {}

impl Display for BundleError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::EntryNotFound(path) => {
                write!(formatter, "entry \"{}\" not found", path.display())
            }
            Self::Stage {
                stage,
                path,
                message,
            } => write!(
                formatter,
                "{} stage failed on \"{}\": {}",
                stage,
                path.display(),
                message
            ),
            Self::Other(message) => write!(formatter, "{}", message),
        }
    }
}

impl From<AcquireError> for BundleError {
    fn from(error: AcquireError) -> Self {
        Self::Other(error.to_string())
    }
}

impl From<Box<dyn Error>> for BundleError {
    fn from(error: Box<dyn Error>) -> Self {
        Self::Other(error.to_string())
    }
}
