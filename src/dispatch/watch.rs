use super::{
    build::{triage, write_output},
    event::{BuildEvent, BuildEventKind},
};
use crate::{
    bundle::Bundler,
    context::Context,
    infrastructure::FileWatcher,
    ir::{BuildTarget, PipelineSpec},
};
use std::{path::PathBuf, sync::Arc};
use tokio::{spawn, sync::mpsc::UnboundedSender, task::JoinHandle};

/// A target rebuilt on every change of its source files.
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl WatchHandle {
    /// Stops watching, abandoning a build in progress.
    pub async fn stop(self) {
        self.task.abort();
        let _ = self.task.await;
    }
}

/// Starts rebuilding a target on changes.
///
/// A failed build keeps the watcher on the files of the last successful one, or on the entry
/// if none succeeded yet. Only a fatal warning ends the loop.
pub fn watch_target(
    context: Arc<Context>,
    bundler: Arc<dyn Bundler + Send + Sync>,
    target: Arc<BuildTarget>,
    pipeline: Arc<PipelineSpec>,
    mut watcher: Box<dyn FileWatcher + Send>,
    events: UnboundedSender<BuildEvent>,
) -> WatchHandle {
    let task = spawn(async move {
        let notify = |kind| {
            // The receiver is gone only while the process shuts down.
            let _ = events.send(BuildEvent::new(target.clone(), kind));
        };
        let mut files = vec![PathBuf::from(pipeline.input())];

        loop {
            notify(BuildEventKind::Started);

            match bundler.bundle(&pipeline).await {
                Ok(bundle) => match triage(&bundle.warnings) {
                    Ok(warnings) => {
                        for warning in warnings {
                            notify(BuildEventKind::Warning(warning.to_string()));
                        }

                        notify(match write_output(&context, &pipeline, &bundle.code).await {
                            Ok(()) => BuildEventKind::Completed,
                            Err(error) => BuildEventKind::Failed(error.to_string()),
                        });

                        files = bundle.watch_files;
                    }
                    Err(warning) => {
                        notify(BuildEventKind::Fatal(warning.message().into()));
                        return;
                    }
                },
                Err(error) => notify(BuildEventKind::Failed(error.to_string())),
            }

            let result = watcher.watch(&files).map_err(|error| error.to_string());

            if let Err(message) = result {
                notify(BuildEventKind::Failed(message));
            }

            if watcher.changed().await.is_none() {
                return;
            }
        }
    });

    WatchHandle { task }
}
