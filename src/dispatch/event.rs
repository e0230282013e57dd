use crate::{context::Context, error::ApplicationError, ir::BuildTarget, log, log_error};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BuildEventKind {
    Started,
    Completed,
    Failed(String),
    Warning(String),
    /// A fatal warning. Watching stops for good.
    Fatal(String),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildEvent {
    target: Arc<BuildTarget>,
    kind: BuildEventKind,
}

impl BuildEvent {
    pub fn new(target: Arc<BuildTarget>, kind: BuildEventKind) -> Self {
        Self { target, kind }
    }

    pub fn target(&self) -> &BuildTarget {
        &self.target
    }

    pub fn kind(&self) -> &BuildEventKind {
        &self.kind
    }
}

/// Logs watch events until every sender is gone or a fatal warning arrives.
pub async fn report_events(
    context: &Context,
    mut events: UnboundedReceiver<BuildEvent>,
) -> Result<(), ApplicationError> {
    while let Some(event) = events.recv().await {
        let name = event.target().name();

        match event.kind() {
            BuildEventKind::Started => log!(context, "Building {}...", name),
            BuildEventKind::Completed => log!(context, "Built {}", name),
            BuildEventKind::Failed(message) => {
                log_error!(context, "Build failed for {}:\n\n{}", name, message)
            }
            BuildEventKind::Warning(message) => log!(context, "{}: {}", name, message),
            BuildEventKind::Fatal(message) => {
                return Err(ApplicationError::FatalWarning(message.clone()));
            }
        }
    }

    Ok(())
}
