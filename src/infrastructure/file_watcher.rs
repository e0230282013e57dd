use async_trait::async_trait;
use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use std::{
    collections::HashSet,
    error::Error,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

const DEBOUNCE_DURATION: Duration = Duration::from_millis(100);

/// Watches a changing set of files and reports batches of changed paths.
#[async_trait]
pub trait FileWatcher {
    /// Replaces the watched set with `paths`.
    fn watch(&mut self, paths: &[PathBuf]) -> Result<(), Box<dyn Error>>;
    /// Waits for the next batch of changes. `None` means the watcher is gone.
    async fn changed(&mut self) -> Option<Vec<PathBuf>>;
}

/// Watches the parent directories of files so that files replaced by renames stay watched.
pub struct OsFileWatcher {
    debouncer: Debouncer<RecommendedWatcher>,
    receiver: UnboundedReceiver<Vec<PathBuf>>,
    files: Arc<Mutex<HashSet<PathBuf>>>,
    directories: HashSet<PathBuf>,
}

impl OsFileWatcher {
    pub fn new() -> Result<Self, notify::Error> {
        let (sender, receiver) = unbounded_channel();
        let files = Arc::new(Mutex::new(HashSet::<PathBuf>::new()));

        let debouncer = new_debouncer(DEBOUNCE_DURATION, {
            let files = files.clone();

            move |result: DebounceEventResult| {
                // Watch errors are transient; the next change is reported normally.
                let (Ok(events), Ok(watched)) = (result, files.lock()) else {
                    return;
                };
                let paths = events
                    .into_iter()
                    .map(|event| event.path)
                    .filter(|path| watched.contains(path))
                    .collect::<Vec<_>>();

                if !paths.is_empty() {
                    let _ = sender.send(paths);
                }
            }
        })?;

        Ok(Self {
            debouncer,
            receiver,
            files,
            directories: Default::default(),
        })
    }

    fn unwatch(&mut self, path: &Path) -> Result<(), notify::Error> {
        match self.debouncer.watcher().unwatch(path) {
            // Deleted directories drop out of the watch set on their own.
            Err(notify::Error {
                kind: notify::ErrorKind::WatchNotFound,
                ..
            }) => Ok(()),
            result => result,
        }
    }
}

#[async_trait]
impl FileWatcher for OsFileWatcher {
    fn watch(&mut self, paths: &[PathBuf]) -> Result<(), Box<dyn Error>> {
        let directories = paths
            .iter()
            .filter_map(|path| path.parent())
            .map(Path::to_path_buf)
            .collect::<HashSet<_>>();

        for directory in self
            .directories
            .difference(&directories)
            .cloned()
            .collect::<Vec<_>>()
        {
            self.unwatch(&directory)?;
            self.directories.remove(&directory);
        }

        for directory in directories {
            if !self.directories.contains(&directory) {
                self.debouncer
                    .watcher()
                    .watch(&directory, RecursiveMode::NonRecursive)?;
                self.directories.insert(directory);
            }
        }

        *self.files.lock().map_err(|error| error.to_string())? = paths.iter().cloned().collect();

        Ok(())
    }

    async fn changed(&mut self) -> Option<Vec<PathBuf>> {
        self.receiver.recv().await
    }
}

#[cfg(test)]
pub use fake::FakeFileWatcher;

#[cfg(test)]
mod fake {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc::UnboundedSender;

    /// File watcher driven by a channel from tests.
    pub struct FakeFileWatcher {
        receiver: UnboundedReceiver<Vec<PathBuf>>,
        watched: Arc<Mutex<Vec<PathBuf>>>,
    }

    impl FakeFileWatcher {
        pub fn new() -> (Self, UnboundedSender<Vec<PathBuf>>, Arc<Mutex<Vec<PathBuf>>>) {
            let (sender, receiver) = unbounded_channel();
            let watched = Arc::new(Mutex::new(vec![]));

            (
                Self {
                    receiver,
                    watched: watched.clone(),
                },
                sender,
                watched,
            )
        }
    }

    #[async_trait]
    impl FileWatcher for FakeFileWatcher {
        fn watch(&mut self, paths: &[PathBuf]) -> Result<(), Box<dyn Error>> {
            *self.watched.lock().unwrap() = paths.to_vec();

            Ok(())
        }

        async fn changed(&mut self) -> Option<Vec<PathBuf>> {
            self.receiver.recv().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;
    use tokio::time::timeout;

    const CHANGE_TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn replace_watched_files() {
        let directory = tempdir().unwrap();
        let foo = directory.path().join("foo/foo.js");
        let bar = directory.path().join("bar/bar.js");
        fs::create_dir_all(foo.parent().unwrap()).unwrap();
        fs::create_dir_all(bar.parent().unwrap()).unwrap();

        let mut watcher = OsFileWatcher::new().unwrap();

        watcher.watch(&[foo.clone()]).unwrap();
        watcher.watch(&[bar.clone()]).unwrap();

        assert_eq!(
            watcher.directories,
            [directory.path().join("bar")].into_iter().collect()
        );
        assert_eq!(*watcher.files.lock().unwrap(), [bar].into_iter().collect());
    }

    #[test]
    fn fail_to_watch_file_in_missing_directory() {
        let directory = tempdir().unwrap();
        let mut watcher = OsFileWatcher::new().unwrap();

        assert!(watcher.watch(&[directory.path().join("foo/foo.js")]).is_err());
    }

    #[tokio::test]
    async fn report_changes_after_rename_save() {
        let directory = tempdir().unwrap();
        let root = fs::canonicalize(directory.path()).unwrap();
        let foo = root.join("foo.js");
        fs::write(&foo, "").unwrap();

        let mut watcher = OsFileWatcher::new().unwrap();
        watcher.watch(&[foo.clone()]).unwrap();

        fs::write(root.join("foo.js.tmp"), "1").unwrap();
        fs::rename(root.join("foo.js.tmp"), &foo).unwrap();

        assert_eq!(
            timeout(CHANGE_TIMEOUT, watcher.changed()).await.unwrap(),
            Some(vec![foo.clone()])
        );

        watcher.watch(&[foo.clone()]).unwrap();
        fs::write(&foo, "2").unwrap();

        assert_eq!(
            timeout(CHANGE_TIMEOUT, watcher.changed()).await.unwrap(),
            Some(vec![foo])
        );
    }
}
