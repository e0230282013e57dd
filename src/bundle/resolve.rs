use super::error::BundleError;
use crate::{context::Context, ir::ExternalTable};
use serde::Deserialize;
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

const EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];
const PACKAGE_DIRECTORY: &str = "node_modules";
const PACKAGE_MANIFEST: &str = "package.json";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Resolution {
    /// A module file linked into the output.
    Bundled(PathBuf),
    /// A module left as a runtime `require`.
    External(String),
    Unresolved(String),
}

#[derive(Deserialize)]
struct PackageManifest {
    main: Option<String>,
}

/// Resolves a require specifier of a module at `importer`.
///
/// Externals are matched by exact identifier before the file system is consulted.
pub async fn resolve(
    context: &Context,
    externals: &ExternalTable,
    specifier: &str,
    importer: &Path,
) -> Result<Resolution, BundleError> {
    if externals.is_external(specifier) {
        return Ok(Resolution::External(specifier.into()));
    }

    let path = if is_relative(specifier) {
        match importer.parent() {
            Some(directory) => resolve_file(context, &directory.join(specifier)).await,
            None => None,
        }
    } else if Path::new(specifier).is_absolute() {
        resolve_file(context, Path::new(specifier)).await
    } else {
        resolve_package(context, specifier, importer).await?
    };

    Ok(match path {
        Some(path) => Resolution::Bundled(context.file_system().canonicalize_path(&path).await?),
        None => Resolution::Unresolved(specifier.into()),
    })
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

async fn resolve_file(context: &Context, path: &Path) -> Option<PathBuf> {
    let file_system = context.file_system();

    if file_system.is_file(path).await {
        return Some(path.into());
    }

    for extension in EXTENSIONS {
        let mut name = OsString::from(path.as_os_str());
        name.push(".");
        name.push(extension);
        let path = PathBuf::from(name);

        if file_system.is_file(&path).await {
            return Some(path);
        }
    }

    for extension in EXTENSIONS {
        let path = path.join(format!("index.{}", extension));

        if file_system.is_file(&path).await {
            return Some(path);
        }
    }

    None
}

async fn resolve_package(
    context: &Context,
    specifier: &str,
    importer: &Path,
) -> Result<Option<PathBuf>, BundleError> {
    let (name, subpath) = split_package_specifier(specifier);

    for directory in importer.ancestors().skip(1) {
        let package = directory.join(PACKAGE_DIRECTORY).join(name);

        let path = match subpath {
            Some(subpath) => resolve_file(context, &package.join(subpath)).await,
            None => match read_package_main(context, &package).await? {
                Some(main) => match resolve_file(context, &package.join(main)).await {
                    Some(path) => Some(path),
                    None => resolve_file(context, &package.join("index")).await,
                },
                None => resolve_file(context, &package.join("index")).await,
            },
        };

        if path.is_some() {
            return Ok(path);
        }
    }

    Ok(None)
}

async fn read_package_main(
    context: &Context,
    package: &Path,
) -> Result<Option<String>, BundleError> {
    let path = package.join(PACKAGE_MANIFEST);

    if !context.file_system().is_file(&path).await {
        return Ok(None);
    }

    let source = context.file_system().read_file_to_string(&path).await?;

    Ok(serde_json::from_str::<PackageManifest>(&source)
        .map_err(|error| BundleError::Other(format!("{}: {}", path.display(), error)))?
        .main)
}

fn split_package_specifier(specifier: &str) -> (&str, Option<&str>) {
    let name_length = if specifier.starts_with('@') {
        specifier
            .match_indices('/')
            .nth(1)
            .map(|(index, _)| index)
            .unwrap_or(specifier.len())
    } else {
        specifier.find('/').unwrap_or(specifier.len())
    };

    let (name, rest) = specifier.split_at(name_length);

    (name, rest.strip_prefix('/').filter(|subpath| !subpath.is_empty()))
}
