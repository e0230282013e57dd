mod error;
mod graph;
mod render;
mod resolve;
mod scan;
mod stage;

pub use self::error::BundleError;
use self::{
    graph::find_cycles,
    render::render_chunk,
    resolve::{Resolution, resolve},
    scan::{rewrite_requires, scan_requires},
    stage::{prepend_banner, remap_externals, run_tool},
};
use crate::{
    context::Context,
    debug,
    ir::{
        CIRCULAR_DEPENDENCY, DowngradeOptions, ExternalTable, PipelineSpec, Stage, StageKind,
        UNRESOLVED_IMPORT, Warning,
    },
};
use async_trait::async_trait;
use itertools::Itertools;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::OnceCell;

const BABEL_CONFIG_FILE: &str = "babel.config.json";

/// Result of compiling a target.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Bundle {
    pub code: String,
    pub warnings: Vec<Warning>,
    /// Files read while linking, starting with the entry.
    pub watch_files: Vec<PathBuf>,
}

/// Compiles a pipeline into a single output file.
#[async_trait]
pub trait Bundler {
    async fn bundle(&self, pipeline: &PipelineSpec) -> Result<Bundle, BundleError>;
}

/// Links CommonJS modules reachable from an entry into one file.
pub struct ModuleBundler {
    context: Arc<Context>,
    cache_directory: PathBuf,
    babel_config: OnceCell<PathBuf>,
}

impl ModuleBundler {
    pub fn new(context: Arc<Context>, cache_directory: impl Into<PathBuf>) -> Self {
        Self {
            context,
            cache_directory: cache_directory.into(),
            babel_config: OnceCell::new(),
        }
    }

    /// Writes the Babel configuration file on first use and returns its path.
    ///
    /// All pipelines share one downgrade configuration.
    async fn babel_config(&self, options: &DowngradeOptions) -> Result<&Path, BundleError> {
        let path = self
            .babel_config
            .get_or_try_init(|| async {
                let path = self.cache_directory.join(BABEL_CONFIG_FILE);

                self.context
                    .file_system()
                    .create_directory(&self.cache_directory)
                    .await?;
                self.context
                    .file_system()
                    .write_file(&path, options.config().to_string().as_bytes())
                    .await?;

                Ok::<_, BundleError>(path)
            })
            .await?;

        Ok(path)
    }

    async fn link_module(
        &self,
        pipeline: &PipelineSpec,
        externals: &ExternalTable,
        linker: &mut Linker,
        path: &Path,
    ) -> Result<LinkedModule, BundleError> {
        let context = &*self.context;
        let mut code = context.file_system().read_file_to_string(path).await?;
        let mut warnings = vec![];

        for stage in pipeline.module_stages() {
            match stage {
                Stage::Downgrade(options) => {
                    if options.excludes(path) {
                        continue;
                    }

                    let transformed = run_tool(
                        context,
                        StageKind::Downgrade,
                        &context.options().babel_command,
                        options.arguments(self.babel_config(options).await?, path),
                        path,
                        &code,
                    )
                    .await?;

                    code = transformed.code;
                    warnings.extend(transformed.warnings);
                }
                Stage::Interop => {
                    code = link_requires(context, externals, linker, path, &code, &mut warnings)
                        .await?
                }
                // Resolution is applied to each require the interop stage links.
                Stage::Resolve(_) | Stage::Remap(_) | Stage::Optimize(_) | Stage::Banner(_) => {}
            }
        }

        Ok(LinkedModule { code, warnings })
    }
}

#[async_trait]
impl Bundler for ModuleBundler {
    async fn bundle(&self, pipeline: &PipelineSpec) -> Result<Bundle, BundleError> {
        let context = &*self.context;
        let default_externals = ExternalTable::default();
        let externals = pipeline.externals().unwrap_or(&default_externals);

        let entry = context
            .file_system()
            .canonicalize_path(pipeline.input())
            .await
            .map_err(|_| BundleError::EntryNotFound(pipeline.input().into()))?;

        let mut linker = Linker::new(entry);
        let mut warnings = vec![];
        let mut modules = vec![];

        while let Some(path) = linker.next_path() {
            let module = self
                .link_module(pipeline, externals, &mut linker, &path)
                .await?;

            warnings.extend(module.warnings);
            modules.push(module.code);
        }

        for cycle in find_cycles(&linker.dependencies) {
            warnings.push(Warning::classified(
                CIRCULAR_DEPENDENCY,
                format!(
                    "Circular dependency: {}",
                    cycle
                        .iter()
                        .chain(cycle.first())
                        .map(|&index| linker.paths[index].display())
                        .join(" -> ")
                ),
            ));
        }

        let mut code = render_chunk(&modules, pipeline.output());

        for stage in pipeline.chunk_stages() {
            match stage {
                Stage::Remap(externals) => code = remap_externals(&code, externals),
                Stage::Optimize(options) => {
                    let transformed = run_tool(
                        context,
                        StageKind::Optimize,
                        &context.options().closure_command,
                        options.arguments(),
                        pipeline.output().file(),
                        &code,
                    )
                    .await?;

                    code = transformed.code;
                    warnings.extend(transformed.warnings);
                }
                Stage::Banner(banner) => code = prepend_banner(&code, banner),
                Stage::Resolve(_) | Stage::Downgrade(_) | Stage::Interop => {}
            }
        }

        Ok(Bundle {
            code,
            warnings,
            watch_files: linker.paths,
        })
    }
}

/// Module table of a bundle under construction. Indices are module ids.
struct Linker {
    paths: Vec<PathBuf>,
    ids: HashMap<PathBuf, usize>,
    dependencies: Vec<Vec<usize>>,
}

impl Linker {
    fn new(entry: PathBuf) -> Self {
        Self {
            ids: [(entry.clone(), 0)].into_iter().collect(),
            paths: vec![entry],
            dependencies: vec![],
        }
    }

    fn next_path(&mut self) -> Option<PathBuf> {
        let path = self.paths.get(self.dependencies.len()).cloned();

        if path.is_some() {
            self.dependencies.push(vec![]);
        }

        path
    }

    /// Registers a dependency of the module being linked and returns its id.
    fn add_dependency(&mut self, path: PathBuf) -> usize {
        let id = match self.ids.get(&path) {
            Some(&id) => id,
            None => {
                let id = self.paths.len();
                self.ids.insert(path.clone(), id);
                self.paths.push(path);
                id
            }
        };

        if let Some(dependencies) = self.dependencies.last_mut() {
            if !dependencies.contains(&id) {
                dependencies.push(id);
            }
        }

        id
    }
}

struct LinkedModule {
    code: String,
    warnings: Vec<Warning>,
}

/// Rewrites requires of bundled modules into module table lookups.
async fn link_requires(
    context: &Context,
    externals: &ExternalTable,
    linker: &mut Linker,
    path: &Path,
    code: &str,
    warnings: &mut Vec<Warning>,
) -> Result<String, BundleError> {
    let mut replacements = HashMap::<&str, Option<String>>::new();

    for call in scan_requires(code) {
        if replacements.contains_key(call.specifier) {
            continue;
        }

        let resolution = resolve(context, externals, call.specifier, path).await?;

        debug!(
            context,
            "resolved \"{}\" in {}: {:?}",
            call.specifier,
            path.display(),
            resolution
        );

        let replacement = match resolution {
            Resolution::Bundled(resolved) => {
                Some(format!("__require({})", linker.add_dependency(resolved)))
            }
            Resolution::External(_) => None,
            Resolution::Unresolved(specifier) => {
                warnings.push(Warning::classified(
                    UNRESOLVED_IMPORT,
                    format!(
                        "\"{}\" is imported by \"{}\", but could not be resolved; \
                         treating it as an external dependency",
                        specifier,
                        path.display()
                    ),
                ));

                None
            }
        };

        replacements.insert(call.specifier, replacement);
    }

    Ok(rewrite_requires(code, |call| {
        replacements.get(call.specifier).cloned().flatten()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        context::test::context,
        infrastructure::{CommandOutput, FakeCommandRunner},
        ir::{
            BuildTarget, DowngradeOptions, LICENSE_BANNER, ModeFlags, OptimizerOptions,
            OutputOptions,
        },
        pipeline::build_pipeline,
    };
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn identity() -> FakeCommandRunner {
        FakeCommandRunner::new(|_, input| CommandOutput {
            status: Some(0),
            stdout: input.as_bytes().to_vec(),
            stderr: vec![],
        })
    }

    fn pipeline(root: &Path, externals: ExternalTable, flags: ModeFlags) -> PipelineSpec {
        build_pipeline(
            &BuildTarget::new("Foo", root.join("src/index.js"), root.join("dist/Foo.js")),
            &Arc::new(externals),
            &flags,
        )
    }

    fn react() -> ExternalTable {
        ExternalTable::new(["react".to_owned()], Default::default())
    }

    fn create_sources(files: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf) {
        let directory = tempdir().unwrap();
        let root = fs::canonicalize(directory.path()).unwrap();

        for (path, source) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, source).unwrap();
        }

        (directory, root)
    }

    #[tokio::test]
    async fn link_relative_modules() {
        let (_directory, root) = create_sources(&[
            (
                "src/index.js",
                "var foo = require('./foo');\n\
                 var React = require('react');\n\
                 module.exports = foo;\n",
            ),
            ("src/foo.js", "module.exports = 42;\n"),
        ]);
        let (context, _) = context(identity());

        let bundle = ModuleBundler::new(context, root.join(".cache"))
            .bundle(&pipeline(&root, react(), Default::default()))
            .await
            .unwrap();

        assert!(bundle.code.contains("var foo = __require(1);"));
        assert!(bundle.code.contains("var React = require('react');"));
        assert!(bundle.code.contains("module.exports = 42;"));
        assert!(bundle.code.contains("var __entry = __require(0);"));
        assert_eq!(bundle.warnings, vec![]);
        assert_eq!(
            bundle.watch_files,
            vec![root.join("src/index.js"), root.join("src/foo.js")]
        );
    }

    #[tokio::test]
    async fn link_shared_module_once() {
        let (_directory, root) = create_sources(&[
            ("src/index.js", "require('./foo'); require('./bar');"),
            ("src/foo.js", "require('./bar.js');"),
            ("src/bar.js", ""),
        ]);
        let (context, _) = context(identity());

        let bundle = ModuleBundler::new(context, root.join(".cache"))
            .bundle(&pipeline(&root, react(), Default::default()))
            .await
            .unwrap();

        assert_eq!(bundle.watch_files.len(), 3);
        assert!(bundle.code.contains("__require(1); __require(2);"));
        assert!(bundle.code.contains("\n__require(2);\n"));
    }

    #[tokio::test]
    async fn downgrade_modules_outside_node_modules() {
        let (_directory, root) = create_sources(&[
            ("src/index.js", "require('foo');"),
            ("node_modules/foo/index.js", ""),
        ]);
        let runner = identity();
        let (context, _) = context(runner.clone());

        ModuleBundler::new(context, root.join(".cache"))
            .bundle(&pipeline(&root, react(), Default::default()))
            .await
            .unwrap();

        let config_file = root.join(".cache/babel.config.json");

        assert_eq!(
            runner.invocations(),
            vec![
                ["babel".to_owned()]
                    .into_iter()
                    .chain(
                        DowngradeOptions::DEFAULT
                            .arguments(&config_file, &root.join("src/index.js"))
                    )
                    .collect::<Vec<_>>()
            ]
        );
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&fs::read_to_string(config_file).unwrap())
                .unwrap(),
            DowngradeOptions::DEFAULT.config()
        );
    }

    #[tokio::test]
    async fn warn_on_circular_dependency() {
        let (_directory, root) = create_sources(&[
            ("src/index.js", "require('./foo');"),
            ("src/foo.js", "require('./bar');"),
            ("src/bar.js", "require('./foo');"),
        ]);
        let (context, _) = context(identity());

        let bundle = ModuleBundler::new(context, root.join(".cache"))
            .bundle(&pipeline(&root, react(), Default::default()))
            .await
            .unwrap();

        assert_eq!(
            bundle.warnings,
            vec![Warning::classified(
                CIRCULAR_DEPENDENCY,
                format!(
                    "Circular dependency: {} -> {} -> {}",
                    root.join("src/foo.js").display(),
                    root.join("src/bar.js").display(),
                    root.join("src/foo.js").display(),
                )
            )]
        );
    }

    #[tokio::test]
    async fn warn_on_unresolved_import() {
        let (_directory, root) = create_sources(&[("src/index.js", "require('missing');")]);
        let (context, _) = context(identity());

        let bundle = ModuleBundler::new(context, root.join(".cache"))
            .bundle(&pipeline(&root, react(), Default::default()))
            .await
            .unwrap();

        assert!(bundle.code.contains("require('missing');"));
        assert!(matches!(
            &bundle.warnings[..],
            [Warning::Classified { code, .. }] if code == UNRESOLVED_IMPORT
        ));
    }

    #[tokio::test]
    async fn collect_tool_warnings() {
        let (_directory, root) = create_sources(&[("src/index.js", "")]);
        let (context, _) = context(FakeCommandRunner::new(|_, input| CommandOutput {
            status: Some(0),
            stdout: input.as_bytes().to_vec(),
            stderr: b"foo".to_vec(),
        }));

        let bundle = ModuleBundler::new(context, root.join(".cache"))
            .bundle(&pipeline(&root, react(), Default::default()))
            .await
            .unwrap();

        assert_eq!(bundle.warnings, vec![Warning::unclassified("foo")]);
    }

    #[tokio::test]
    async fn fail_on_stage_failure() {
        let (_directory, root) = create_sources(&[("src/index.js", "")]);
        let (context, _) = context(FakeCommandRunner::new(|_, _| CommandOutput {
            status: Some(1),
            stdout: vec![],
            stderr: b"SyntaxError".to_vec(),
        }));

        assert_eq!(
            ModuleBundler::new(context, root.join(".cache"))
                .bundle(&pipeline(&root, react(), Default::default()))
                .await,
            Err(BundleError::Stage {
                stage: StageKind::Downgrade,
                path: root.join("src/index.js"),
                message: "SyntaxError".into(),
            })
        );
    }

    #[tokio::test]
    async fn fail_on_missing_entry() {
        let directory = tempdir().unwrap();
        let (context, _) = context(identity());
        let pipeline = pipeline(directory.path(), react(), Default::default());

        assert_eq!(
            ModuleBundler::new(context, directory.path().join(".cache"))
                .bundle(&pipeline)
                .await,
            Err(BundleError::EntryNotFound(pipeline.input().into()))
        );
    }

    #[tokio::test]
    async fn build_library_deployment() {
        let (_directory, root) = create_sources(&[(
            "src/index.js",
            "var Outline = require('outline');\nvar Foo = require('outline-react/useFoo');\n",
        )]);
        let runner = FakeCommandRunner::echo();
        let (context, _) = context(runner.clone());
        let externals = ExternalTable::new(
            ["outline".to_owned()],
            HashMap::from([
                ("outline".to_owned(), "Outline".to_owned()),
                ("outline-react/useFoo".to_owned(), "useFoo".to_owned()),
            ]),
        );

        let bundle = ModuleBundler::new(context, root.join(".cache"))
            .bundle(&pipeline(
                &root,
                externals,
                ModeFlags {
                    production: true,
                    library_deployment: true,
                    ..Default::default()
                },
            ))
            .await
            .unwrap();

        assert!(bundle.code.starts_with(LICENSE_BANNER));
        assert!(bundle.code.contains("var Outline = require(\"Outline\");"));
        assert!(bundle.code.contains("var Foo = require(\"useFoo\");"));
        assert_eq!(
            runner.invocations()[1],
            ["closure".to_owned()]
                .into_iter()
                .chain(OptimizerOptions::DEFAULT.arguments())
                .collect::<Vec<_>>()
        );
        assert!(bundle.code.ends_with(&format!(
            "// closure {}\n",
            OptimizerOptions::DEFAULT.arguments().join(" ")
        )));
    }

    #[tokio::test]
    async fn export_default_only_entry_as_value() {
        let (_directory, root) = create_sources(&[
            (
                "src/index.js",
                "Object.defineProperty(exports, \"__esModule\", { value: true });\n\
                 exports.default = useFoo;\n\
                 function useFoo() {}\n",
            ),
            ("src/named.js", "exports.default = 1;\nexports.bar = 2;\n"),
        ]);
        let (context, _) = context(identity());
        let bundler = ModuleBundler::new(context, root.join(".cache"));
        let mut outputs = vec![];

        for (name, entry) in [("Foo", "src/index.js"), ("Named", "src/named.js")] {
            let output = root.join(format!("dist/{name}.js"));
            let bundle = bundler
                .bundle(&PipelineSpec::new(
                    root.join(entry),
                    vec![Stage::Resolve(Default::default()), Stage::Interop],
                    OutputOptions::new(output.clone()),
                ))
                .await
                .unwrap();

            fs::create_dir_all(output.parent().unwrap()).unwrap();
            fs::write(&output, bundle.code).unwrap();
            outputs.push(output);
        }

        let Ok(output) = std::process::Command::new("node")
            .arg("-e")
            .arg(
                "const foo = require(process.argv[1]);\
                 const named = require(process.argv[2]);\
                 console.log(typeof foo, Object.keys(named).sort().join());",
            )
            .args(&outputs)
            .output()
        else {
            // Node.js is not installed.
            return;
        };

        assert_eq!(String::from_utf8_lossy(&output.stderr), "");
        assert_eq!(String::from_utf8_lossy(&output.stdout), "function bar,default\n");
    }
}
