use crate::{
    context::Context,
    error::ApplicationError,
    ir::BuildTarget,
    layout::{Layout, PluginPackage},
};
use futures::future::try_join_all;
use itertools::Itertools;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PluginModule {
    stem: String,
    path: PathBuf,
}

impl PluginModule {
    pub fn new(stem: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            stem: stem.into(),
            path: path.into(),
        }
    }

    pub fn stem(&self) -> &str {
        &self.stem
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Source files found in one plugin package, sorted by stem.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PluginModules<'a> {
    package: &'a PluginPackage,
    modules: Vec<PluginModule>,
}

impl<'a> PluginModules<'a> {
    pub fn new(package: &'a PluginPackage, modules: Vec<PluginModule>) -> Self {
        Self { package, modules }
    }

    pub fn package(&self) -> &'a PluginPackage {
        self.package
    }

    pub fn modules(&self) -> &[PluginModule] {
        &self.modules
    }
}

/// Lists the source files of every plugin package.
///
/// Any unreadable source root fails the whole discovery.
pub async fn discover_modules<'a>(
    context: &Context,
    layout: &'a Layout,
) -> Result<Vec<PluginModules<'a>>, ApplicationError> {
    try_join_all(
        layout
            .plugins
            .iter()
            .map(|package| discover_package(context, package)),
    )
    .await
}

async fn discover_package<'a>(
    context: &Context,
    package: &'a PluginPackage,
) -> Result<PluginModules<'a>, ApplicationError> {
    let mut modules = vec![];

    for path in context
        .file_system()
        .read_directory(&package.source_directory())
        .await?
    {
        if is_source_file(&path) && context.file_system().is_file(&path).await {
            if let Some(stem) = path.file_stem() {
                modules.push(PluginModule::new(stem.to_string_lossy(), path.clone()));
            }
        }
    }

    Ok(PluginModules::new(
        package,
        modules
            .into_iter()
            .sorted_by(|one, other| one.stem.cmp(&other.stem))
            .collect(),
    ))
}

fn is_source_file(path: &Path) -> bool {
    path.extension()
        .map(|extension| SOURCE_EXTENSIONS.iter().any(|source| extension == *source))
        .unwrap_or(false)
}

/// Builds one target per plugin module plus the main library target.
///
/// The main library comes right after the first plugin package.
pub fn build_targets(layout: &Layout, modules: &[PluginModules]) -> Vec<Arc<BuildTarget>> {
    let mut targets = vec![];

    for (index, modules) in modules.iter().enumerate() {
        let package = modules.package();

        for module in modules.modules() {
            targets.push(Arc::new(BuildTarget::new(
                format!("{} - {}", package.label, module.stem()),
                module.path(),
                package
                    .distribution_directory()
                    .join(format!("{}.js", module.stem())),
            )));
        }

        if index == 0 {
            targets.push(main_target(layout));
        }
    }

    if modules.is_empty() {
        targets.push(main_target(layout));
    }

    targets
}

fn main_target(layout: &Layout) -> Arc<BuildTarget> {
    Arc::new(BuildTarget::new(
        &layout.main.label,
        layout.main_input(),
        layout.main_output(),
    ))
}
