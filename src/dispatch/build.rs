use crate::{
    bundle::Bundler,
    context::Context,
    error::ApplicationError,
    escalation::{Escalation, escalate},
    ir::{BuildTarget, PipelineSpec, Warning},
    log,
};

/// Compiles a target once and writes its output file.
pub async fn build_target(
    context: &Context,
    bundler: &(dyn Bundler + Send + Sync),
    target: &BuildTarget,
    pipeline: &PipelineSpec,
) -> Result<(), ApplicationError> {
    let bundle = bundler.bundle(pipeline).await?;

    for warning in triage(&bundle.warnings)
        .map_err(|warning| ApplicationError::FatalWarning(warning.message().into()))?
    {
        log!(context, "{}: {}", target.name(), warning);
    }

    write_output(context, pipeline, &bundle.code).await
}

/// Returns warnings to be shown, or the first fatal one as an error.
pub fn triage(warnings: &[Warning]) -> Result<Vec<&Warning>, &Warning> {
    let mut informational = vec![];

    for warning in warnings {
        match escalate(warning) {
            Escalation::Fatal => return Err(warning),
            Escalation::Informational => informational.push(warning),
            Escalation::Suppressed => {}
        }
    }

    Ok(informational)
}

pub async fn write_output(
    context: &Context,
    pipeline: &PipelineSpec,
    code: &str,
) -> Result<(), ApplicationError> {
    let path = pipeline.output().file();

    if let Some(directory) = path.parent() {
        context.file_system().create_directory(directory).await?;
    }

    context
        .file_system()
        .write_file(path, code.as_bytes())
        .await?;

    Ok(())
}
