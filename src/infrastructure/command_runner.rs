use async_trait::async_trait;
use std::{error::Error, process::Stdio};
use tokio::{io::AsyncWriteExt, process::Command, spawn};

/// Output of a tool process fed through standard input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandOutput {
    pub status: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

#[async_trait]
pub trait CommandRunner {
    async fn run(
        &self,
        command: &[String],
        input: &[u8],
    ) -> Result<CommandOutput, Box<dyn Error>>;
}

#[derive(Debug)]
pub struct OsCommandRunner {}

impl OsCommandRunner {
    pub fn new() -> Self {
        Self {}
    }
}

#[async_trait]
impl CommandRunner for OsCommandRunner {
    async fn run(
        &self,
        command: &[String],
        input: &[u8],
    ) -> Result<CommandOutput, Box<dyn Error>> {
        let (program, arguments) = command.split_first().ok_or("empty command")?;

        let mut child = Command::new(program)
            .args(arguments)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|error| format!("{}: {}", program, error))?;

        // Feed stdin concurrently so that a tool filling its stdout pipe cannot deadlock us.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_vec();

            spawn(async move {
                stdin.write_all(&input).await?;
                stdin.shutdown().await
            })
        });

        let output = child.wait_with_output().await?;

        if let Some(writer) = writer {
            writer.await??;
        }

        Ok(CommandOutput {
            status: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
pub use fake::FakeCommandRunner;
