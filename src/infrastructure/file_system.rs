use async_trait::async_trait;
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
};
use std::{
    io,
    path::{Path, PathBuf},
};
use tokio::fs;

#[async_trait]
pub trait FileSystem: Debug {
    async fn read_file_to_string(&self, path: &Path) -> Result<String, Box<dyn Error>>;
    async fn read_directory(&self, path: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>>;
    async fn is_file(&self, path: &Path) -> bool;
    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), Box<dyn Error>>;
    async fn create_directory(&self, path: &Path) -> Result<(), Box<dyn Error>>;
    /// Removes a directory recursively. A missing directory is not an error.
    async fn remove_directory(&self, path: &Path) -> Result<(), Box<dyn Error>>;
    async fn canonicalize_path(&self, path: &Path) -> Result<PathBuf, Box<dyn Error>>;
}

#[derive(Debug, Default)]
pub struct OsFileSystem {}

impl OsFileSystem {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileSystem for OsFileSystem {
    async fn read_file_to_string(&self, path: &Path) -> Result<String, Box<dyn Error>> {
        Ok(fs::read_to_string(path)
            .await
            .map_err(|error| OsFileSystemError::new(error, path))?)
    }

    async fn read_directory(&self, path: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
        let mut entries = fs::read_dir(path)
            .await
            .map_err(|error| OsFileSystemError::new(error, path))?;
        let mut paths = vec![];

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|error| OsFileSystemError::new(error, path))?
        {
            paths.push(entry.path());
        }

        Ok(paths)
    }

    async fn is_file(&self, path: &Path) -> bool {
        fs::metadata(path)
            .await
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
    }

    async fn write_file(&self, path: &Path, contents: &[u8]) -> Result<(), Box<dyn Error>> {
        fs::write(path, contents)
            .await
            .map_err(|error| OsFileSystemError::new(error, path))?;

        Ok(())
    }

    async fn create_directory(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        fs::create_dir_all(path)
            .await
            .map_err(|error| OsFileSystemError::new(error, path))?;

        Ok(())
    }

    async fn remove_directory(&self, path: &Path) -> Result<(), Box<dyn Error>> {
        match fs::remove_dir_all(path).await {
            Err(error) if error.kind() != io::ErrorKind::NotFound => {
                Err(OsFileSystemError::new(error, path).into())
            }
            _ => Ok(()),
        }
    }

    async fn canonicalize_path(&self, path: &Path) -> Result<PathBuf, Box<dyn Error>> {
        Ok(fs::canonicalize(path)
            .await
            .map_err(|error| OsFileSystemError::new(error, path))?)
    }
}

#[derive(Debug)]
pub struct OsFileSystemError {
    error: io::Error,
    path: String,
}

impl OsFileSystemError {
    pub fn new(error: io::Error, path: &Path) -> Self {
        Self {
            error,
            path: path.display().to_string(),
        }
    }
}

impl Error for OsFileSystemError {}

impl Display for OsFileSystemError {
    fn fmt(&self, formatter: &mut Formatter) -> fmt::Result {
        write!(formatter, "{}: {}", &self.error, &self.path)
    }
}
