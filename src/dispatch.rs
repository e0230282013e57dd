mod build;
mod event;
mod watch;

use self::{
    build::build_target,
    event::report_events,
    watch::watch_target,
};
use crate::{
    bundle::Bundler,
    context::Context,
    debug,
    error::ApplicationError,
    infrastructure::FileWatcher,
    ir::{BuildTarget, ModeFlags, PipelineSpec},
    log_error,
};
use futures::{StreamExt, stream::FuturesUnordered};
use std::{path::Path, sync::Arc};
use tokio::{spawn, sync::mpsc::unbounded_channel};

pub type Build = (Arc<BuildTarget>, Arc<PipelineSpec>);

pub type WatcherFactory<'a> =
    &'a (dyn Fn() -> Result<Box<dyn FileWatcher + Send>, ApplicationError> + Sync);

/// Runs all builds once, or keeps rebuilding them on changes in watch mode.
///
/// In single-shot mode, every target is attempted even if some fail. A fatal warning aborts
/// immediately in either mode.
pub async fn run(
    context: &Arc<Context>,
    bundler: Arc<dyn Bundler + Send + Sync>,
    builds: Vec<Build>,
    flags: &ModeFlags,
    clean_directory: &Path,
    create_watcher: WatcherFactory<'_>,
) -> Result<(), ApplicationError> {
    if flags.clean_first {
        debug!(context, "removing {}", clean_directory.display());

        context
            .file_system()
            .remove_directory(clean_directory)
            .await?;
    }

    if flags.watch {
        run_watch(context, bundler, builds, create_watcher).await
    } else {
        run_once(context, bundler, builds).await
    }
}

async fn run_once(
    context: &Arc<Context>,
    bundler: Arc<dyn Bundler + Send + Sync>,
    builds: Vec<Build>,
) -> Result<(), ApplicationError> {
    let mut futures = builds
        .into_iter()
        .map(|(target, pipeline)| {
            let context = context.clone();
            let bundler = bundler.clone();
            let handle = spawn({
                let target = target.clone();

                async move { build_target(&context, &*bundler, &target, &pipeline).await }
            });

            async move { (target, handle.await) }
        })
        .collect::<FuturesUnordered<_>>();
    let mut failed = false;

    while let Some((target, result)) = futures.next().await {
        match result? {
            Ok(()) => debug!(context, "built {}", target.name()),
            Err(error @ ApplicationError::FatalWarning(_)) => return Err(error),
            Err(error) => {
                failed = true;
                log_error!(context, "Build failed for {}:\n\n{}", target.name(), error);
            }
        }
    }

    if failed {
        Err(ApplicationError::Build)
    } else {
        Ok(())
    }
}

async fn run_watch(
    context: &Arc<Context>,
    bundler: Arc<dyn Bundler + Send + Sync>,
    builds: Vec<Build>,
    create_watcher: WatcherFactory<'_>,
) -> Result<(), ApplicationError> {
    let (sender, receiver) = unbounded_channel();
    let mut handles = vec![];

    for (target, pipeline) in builds {
        handles.push(watch_target(
            context.clone(),
            bundler.clone(),
            target,
            pipeline,
            create_watcher()?,
            sender.clone(),
        ));
    }

    drop(sender);

    let result = report_events(context, receiver).await;

    for handle in handles {
        handle.stop().await;
    }

    result
}
