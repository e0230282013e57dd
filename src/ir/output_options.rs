use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModuleFormat {
    CommonJs,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportMode {
    /// A lone default export of the entry module becomes the file's exports. Otherwise, the
    /// entry module's exports object does.
    Auto,
}

/// Output settings of a linked file. Exports are never frozen, and externals are required as
/// they are without interop helpers.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputOptions {
    pub file: PathBuf,
    pub format: ModuleFormat,
    pub exports: ExportMode,
}

impl OutputOptions {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            format: ModuleFormat::CommonJs,
            exports: ExportMode::Auto,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}
