use super::{DowngradeOptions, ExternalTable, OptimizerOptions, OutputOptions};
use itertools::Itertools;
use std::{
    fmt::{self, Display, Formatter},
    path::Path,
    sync::Arc,
};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageKind {
    Resolve,
    Downgrade,
    Interop,
    Remap,
    Optimize,
    Banner,
}

impl StageKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Resolve => "resolve",
            Self::Downgrade => "downgrade",
            Self::Interop => "interop",
            Self::Remap => "remap",
            Self::Optimize => "optimize",
            Self::Banner => "banner",
        }
    }

    /// Whether the stage runs on each linked module rather than on the rendered output.
    pub fn is_module_phase(self) -> bool {
        matches!(self, Self::Resolve | Self::Downgrade | Self::Interop)
    }
}

impl Display for StageKind {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", self.name())
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Stage {
    Resolve(Arc<ExternalTable>),
    Downgrade(DowngradeOptions),
    Interop,
    Remap(Arc<ExternalTable>),
    Optimize(OptimizerOptions),
    Banner(&'static str),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Self::Resolve(_) => StageKind::Resolve,
            Self::Downgrade(_) => StageKind::Downgrade,
            Self::Interop => StageKind::Interop,
            Self::Remap(_) => StageKind::Remap,
            Self::Optimize(_) => StageKind::Optimize,
            Self::Banner(_) => StageKind::Banner,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PipelineSpec {
    input: Arc<Path>,
    stages: Vec<Stage>,
    output: OutputOptions,
}

impl PipelineSpec {
    pub fn new(input: impl Into<Arc<Path>>, stages: Vec<Stage>, output: OutputOptions) -> Self {
        Self {
            input: input.into(),
            stages,
            output,
        }
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn output(&self) -> &OutputOptions {
        &self.output
    }

    pub fn kinds(&self) -> Vec<StageKind> {
        self.stages.iter().map(Stage::kind).collect()
    }

    pub fn externals(&self) -> Option<&ExternalTable> {
        self.stages.iter().find_map(|stage| match stage {
            Stage::Resolve(externals) => Some(&**externals),
            _ => None,
        })
    }

    pub fn module_stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages
            .iter()
            .filter(|stage| stage.kind().is_module_phase())
    }

    pub fn chunk_stages(&self) -> impl Iterator<Item = &Stage> {
        self.stages
            .iter()
            .filter(|stage| !stage.kind().is_module_phase())
    }
}

impl Display for PipelineSpec {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}", self.kinds().iter().join(" -> "))
    }
}
