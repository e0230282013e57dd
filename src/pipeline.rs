use crate::ir::{
    BuildTarget, DowngradeOptions, ExternalTable, LICENSE_BANNER, ModeFlags, OptimizerOptions,
    OutputOptions, PipelineSpec, Stage,
};
use std::sync::Arc;

/// Assembles the stages compiling a target, in their fixed relative order.
pub fn build_pipeline(
    target: &BuildTarget,
    externals: &Arc<ExternalTable>,
    flags: &ModeFlags,
) -> PipelineSpec {
    let mut stages = vec![
        Stage::Resolve(externals.clone()),
        Stage::Downgrade(DowngradeOptions::DEFAULT),
        Stage::Interop,
    ];

    if flags.library_deployment {
        stages.push(Stage::Remap(externals.clone()));
    }

    if flags.production {
        stages.push(Stage::Optimize(OptimizerOptions::DEFAULT));
    }

    if flags.library_deployment {
        stages.push(Stage::Banner(LICENSE_BANNER));
    }

    PipelineSpec::new(target.input(), stages, OutputOptions::new(target.output()))
}
