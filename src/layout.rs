use std::path::{Path, PathBuf};

const SOURCE_DIRECTORY: &str = "src";
const DISTRIBUTION_DIRECTORY: &str = "dist";
/// Directory under a source tree root where generated tool configuration is kept.
pub const CACHE_DIRECTORY: &str = "node_modules/.cache/outline-build";

/// The package whose single entry file is built as the main library.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MainPackage {
    pub label: String,
    pub directory: PathBuf,
    pub entry: String,
    pub output: String,
    pub namespace: String,
    pub global_name: String,
}

/// A package whose every source file is built as its own target.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PluginPackage {
    pub label: String,
    pub directory: PathBuf,
    pub namespace: String,
    /// Fragment removed from file stems when deriving external names.
    pub strip: Option<String>,
}

impl PluginPackage {
    pub fn source_directory(&self) -> PathBuf {
        self.directory.join(SOURCE_DIRECTORY)
    }

    pub fn distribution_directory(&self) -> PathBuf {
        self.directory.join(DISTRIBUTION_DIRECTORY)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    pub main: MainPackage,
    pub plugins: Vec<PluginPackage>,
    pub framework_externals: Vec<String>,
}

impl Layout {
    pub fn outline(root: &Path) -> Self {
        let packages = root.join("packages");

        Self {
            main: MainPackage {
                label: "Outline".into(),
                directory: packages.join("outline"),
                entry: "index.js".into(),
                output: "Outline.js".into(),
                namespace: "outline".into(),
                global_name: "Outline".into(),
            },
            plugins: vec![
                PluginPackage {
                    label: "Outline Extensions".into(),
                    directory: packages.join("outline-extensions"),
                    namespace: "outline-extensions".into(),
                    strip: Some("Outline".into()),
                },
                PluginPackage {
                    label: "Outline React".into(),
                    directory: packages.join("outline-react"),
                    namespace: "outline-react".into(),
                    strip: None,
                },
            ],
            framework_externals: vec!["react-dom".into(), "react".into()],
        }
    }

    pub fn main_input(&self) -> PathBuf {
        self.main
            .directory
            .join(SOURCE_DIRECTORY)
            .join(&self.main.entry)
    }

    pub fn main_output(&self) -> PathBuf {
        self.main_distribution_directory().join(&self.main.output)
    }

    /// The directory removed by a clean build.
    pub fn main_distribution_directory(&self) -> PathBuf {
        self.main.directory.join(DISTRIBUTION_DIRECTORY)
    }
}
