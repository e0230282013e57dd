mod command_runner;
mod console;
mod file_system;
mod file_watcher;

pub use command_runner::*;
pub use console::*;
pub use file_system::*;
pub use file_watcher::*;
