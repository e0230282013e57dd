mod arguments;
mod bundle;
mod context;
mod discover;
mod dispatch;
mod error;
mod escalation;
mod external;
mod infrastructure;
mod ir;
mod layout;
mod log;
mod options;
mod pipeline;

use self::{
    arguments::Arguments,
    bundle::ModuleBundler,
    context::Context,
    discover::{build_targets, discover_modules},
    error::ApplicationError,
    external::compute_external_table,
    infrastructure::{FileWatcher, OsCommandRunner, OsConsole, OsFileSystem, OsFileWatcher},
    ir::ModeFlags,
    layout::{CACHE_DIRECTORY, Layout},
    options::Options,
    pipeline::build_pipeline,
};
use clap::Parser;
use itertools::Itertools;
use std::{env::set_current_dir, path::Path, process::exit, sync::Arc, time::Duration};
use tokio::time::sleep;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let arguments = Arguments::parse();
    let context = Arc::new(Context::new(
        OsCommandRunner::new(),
        OsConsole::new(),
        OsFileSystem::new(),
        Options {
            debug: arguments.debug,
            job_limit: arguments.job_limit,
            babel_command: split_command(&arguments.babel),
            closure_command: split_command(&arguments.closure),
        },
    ));

    if let Err(error) = execute(&context, &arguments).await {
        // Nothing is left to report a console failure to.
        let _ = context
            .console()
            .lock()
            .await
            .write_stderr(format!("{}\n", error).as_bytes())
            .await;

        // Delay for the error message to be written completely hopefully.
        sleep(Duration::from_millis(1)).await;

        exit(1)
    }
}

async fn execute(context: &Arc<Context>, arguments: &Arguments) -> Result<(), ApplicationError> {
    if let Some(directory) = &arguments.directory {
        set_current_dir(directory)?;
    }

    let root = context
        .file_system()
        .canonicalize_path(Path::new("."))
        .await?;
    let layout = Layout::outline(&root);
    let modules = discover_modules(context, &layout).await?;
    let externals = Arc::new(compute_external_table(&layout, &modules));
    let flags = ModeFlags {
        watch: arguments.watch,
        production: arguments.prod,
        library_deployment: arguments.www,
        clean_first: arguments.clean,
    };

    debug!(
        context,
        "externals: {}",
        externals.externals().iter().sorted().join(", ")
    );
    debug!(
        context,
        "global names: {}",
        externals
            .mapping()
            .iter()
            .sorted()
            .map(|(id, name)| format!("{} -> {}", id, name))
            .join(", ")
    );

    let mut builds = vec![];

    for target in build_targets(&layout, &modules) {
        let pipeline = Arc::new(build_pipeline(&target, &externals, &flags));

        debug!(context, "pipeline of {}: {}", target.name(), pipeline);

        builds.push((target, pipeline));
    }

    dispatch::run(
        context,
        Arc::new(ModuleBundler::new(
            context.clone(),
            root.join(CACHE_DIRECTORY),
        )),
        builds,
        &flags,
        &layout.main_distribution_directory(),
        &|| -> Result<Box<dyn FileWatcher + Send>, ApplicationError> {
            Ok(Box::new(OsFileWatcher::new()?))
        },
    )
    .await
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(String::from).collect()
}
