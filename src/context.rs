use crate::{
    infrastructure::{CommandRunner, Console, FileSystem},
    options::Options,
};
use tokio::sync::{Mutex, Semaphore};

pub struct Context {
    command_runner: Box<dyn CommandRunner + Send + Sync + 'static>,
    console: Mutex<Box<dyn Console + Send + Sync + 'static>>,
    file_system: Box<dyn FileSystem + Send + Sync + 'static>,
    job_semaphore: Semaphore,
    options: Options,
}

impl Context {
    pub fn new(
        command_runner: impl CommandRunner + Send + Sync + 'static,
        console: impl Console + Send + Sync + 'static,
        file_system: impl FileSystem + Send + Sync + 'static,
        options: Options,
    ) -> Self {
        Self {
            command_runner: Box::new(command_runner),
            console: Mutex::new(Box::new(console)),
            file_system: Box::new(file_system),
            job_semaphore: Semaphore::new(options.job_limit.unwrap_or_else(num_cpus::get).max(1)),
            options,
        }
    }

    pub fn command_runner(&self) -> &(dyn CommandRunner + Send + Sync) {
        &*self.command_runner
    }

    pub fn console(&self) -> &Mutex<Box<dyn Console + Send + Sync>> {
        &self.console
    }

    pub fn file_system(&self) -> &(dyn FileSystem + Send + Sync) {
        &*self.file_system
    }

    /// Bounds the number of concurrent tool processes.
    pub fn job_semaphore(&self) -> &Semaphore {
        &self.job_semaphore
    }

    pub fn options(&self) -> &Options {
        &self.options
    }
}
