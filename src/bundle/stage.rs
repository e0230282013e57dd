use super::{error::BundleError, scan::rewrite_requires};
use crate::{
    context::Context,
    ir::{ExternalTable, StageKind, Warning},
};
use serde_json::Value;
use std::path::Path;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transformed {
    pub code: String,
    pub warnings: Vec<Warning>,
}

/// Pipes code through an external tool.
///
/// Anything the tool prints on standard error while succeeding becomes a warning.
pub async fn run_tool(
    context: &Context,
    stage: StageKind,
    command: &[String],
    arguments: Vec<String>,
    path: &Path,
    code: &str,
) -> Result<Transformed, BundleError> {
    let command = command.iter().cloned().chain(arguments).collect::<Vec<_>>();
    let stage_error = |message: String| BundleError::Stage {
        stage,
        path: path.into(),
        message,
    };

    let output = {
        let _permit = context.job_semaphore().acquire().await?;

        context
            .command_runner()
            .run(&command, code.as_bytes())
            .await
            .map_err(|error| stage_error(error.to_string()))?
    };

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();

    if !output.success() {
        return Err(stage_error(if stderr.is_empty() {
            match output.status {
                Some(code) => format!("exited with status code {}", code),
                None => "terminated by signal".into(),
            }
        } else {
            stderr
        }));
    }

    Ok(Transformed {
        code: String::from_utf8_lossy(&output.stdout).into_owned(),
        warnings: if stderr.is_empty() {
            vec![]
        } else {
            vec![Warning::unclassified(stderr)]
        },
    })
}

/// Replaces external module identifiers with their global-safe names.
pub fn remap_externals(code: &str, externals: &ExternalTable) -> String {
    rewrite_requires(code, |call| {
        if !externals.is_external(call.specifier) {
            return None;
        }

        externals
            .global_name(call.specifier)
            .map(|name| format!("require({})", Value::from(name)))
    })
}

pub fn prepend_banner(code: &str, banner: &str) -> String {
    format!("{}{}", banner, code)
}
