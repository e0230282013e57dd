use std::fmt::{self, Display, Formatter};

pub const CIRCULAR_DEPENDENCY: &str = "CIRCULAR_DEPENDENCY";
pub const UNRESOLVED_IMPORT: &str = "UNRESOLVED_IMPORT";

/// A warning raised while compiling a target.
///
/// Warnings from the linker itself carry a code. Warnings from individual stages do not.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Warning {
    Classified { code: String, message: String },
    Unclassified { message: String },
}

impl Warning {
    pub fn classified(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Classified {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unclassified(message: impl Into<String>) -> Self {
        Self::Unclassified {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Classified { message, .. } | Self::Unclassified { message } => message,
        }
    }
}

impl Display for Warning {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        match self {
            Self::Classified { code, message } => write!(formatter, "{} ({})", message, code),
            Self::Unclassified { message } => write!(formatter, "{}", message),
        }
    }
}
