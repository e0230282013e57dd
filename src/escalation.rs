use crate::ir::{CIRCULAR_DEPENDENCY, Warning};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Escalation {
    /// Aborts the whole process.
    Fatal,
    /// Logged with the target name; the build still succeeds.
    Informational,
    Suppressed,
}

/// Classifies a compilation warning.
///
/// Coded warnings come from the linker and usually mean corrupted output, such as clashing
/// exports. Circular dependencies are the one coded warning known to be harmless.
pub fn escalate(warning: &Warning) -> Escalation {
    match warning {
        Warning::Classified { code, .. } if code == CIRCULAR_DEPENDENCY => Escalation::Suppressed,
        Warning::Classified { .. } => Escalation::Fatal,
        Warning::Unclassified { .. } => Escalation::Informational,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::UNRESOLVED_IMPORT;

    #[test]
    fn suppress_circular_dependency() {
        assert_eq!(
            escalate(&Warning::classified(CIRCULAR_DEPENDENCY, "a -> b -> a")),
            Escalation::Suppressed
        );
    }

    #[test]
    fn escalate_coded_warnings() {
        assert_eq!(
            escalate(&Warning::classified(UNRESOLVED_IMPORT, "foo")),
            Escalation::Fatal
        );
        assert_eq!(
            escalate(&Warning::classified("NAMESPACE_CONFLICT", "foo")),
            Escalation::Fatal
        );
    }

    #[test]
    fn log_uncoded_warnings() {
        assert_eq!(
            escalate(&Warning::unclassified("foo")),
            Escalation::Informational
        );
    }
}
