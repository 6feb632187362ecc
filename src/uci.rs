use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use log::{debug, info, warn};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use crate::error::DriverError;
use crate::types::EngineConfig;

/// A running engine process and its stdio pipes.
///
/// The child is spawned with `kill_on_drop`, so a session that is dropped
/// without [`Session::close`] still takes the process down with it.
pub struct Session {
    child: Child,
    stdin: BufWriter<ChildStdin>,
    stdout: Lines<BufReader<ChildStdout>>,
    read_timeout: Option<Duration>,
}

impl Session {
    pub async fn spawn(config: &EngineConfig) -> Result<Self, DriverError> {
        let mut cmd = Command::new(&config.path);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &config.working_directory {
            cmd.current_dir(dir);
        }

        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x08000000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        let mut child = cmd
            .spawn()
            .map_err(|source| DriverError::Spawn { path: config.path.clone(), source })?;
        let stdin = child.stdin.take().ok_or(DriverError::MissingPipe("stdin"))?;
        let stdout = child.stdout.take().ok_or(DriverError::MissingPipe("stdout"))?;
        info!("spawned engine {} (pid {:?})", config.path, child.id());

        Ok(Self {
            child,
            stdin: BufWriter::new(stdin),
            stdout: BufReader::new(stdout).lines(),
            read_timeout: None,
        })
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Next line of engine output, or `None` once the engine closed stdout.
    pub async fn read_line(&mut self) -> Result<Option<String>, DriverError> {
        let next = match self.read_timeout {
            Some(limit) => tokio::time::timeout(limit, self.stdout.next_line())
                .await
                .map_err(|_| DriverError::Timeout(limit))?,
            None => self.stdout.next_line().await,
        };
        let line = next.map_err(DriverError::Read)?;
        if let Some(ref l) = line {
            debug!("<< {}", l);
        }
        Ok(line)
    }

    pub async fn write_line(&mut self, text: &str) -> Result<(), DriverError> {
        debug!(">> {}", text);
        let write_err =
            |source: std::io::Error| DriverError::Write { command: text.to_string(), source };
        self.stdin.write_all(text.as_bytes()).await.map_err(write_err)?;
        self.stdin.write_all(b"\n").await.map_err(write_err)?;
        self.stdin.flush().await.map_err(write_err)?;
        Ok(())
    }

    /// Closes stdin, gives the engine `grace` to exit on its own, then kills it.
    /// The child is reaped on every path.
    pub async fn close(self, grace: Duration) -> std::io::Result<ExitStatus> {
        let Session { mut child, stdin, .. } = self;
        drop(stdin);

        match tokio::time::timeout(grace, child.wait()).await {
            Ok(status) => {
                let status = status?;
                info!("engine exited with {}", status);
                Ok(status)
            }
            Err(_) => {
                warn!("engine still running after {:?}, killing it", grace);
                child.kill().await?;
                child.wait().await
            }
        }
    }
}
