//! Invocation of the trajectory executable.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::control::ControlFile;
use crate::error::{RunnerError, RunnerResult};

/// Where and how to run the model. Every path is explicit; nothing relies
/// on the process working directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Executable name (looked up on PATH) or path
    #[serde(default = "default_executable")]
    pub executable: PathBuf,

    /// Extra arguments; HYSPLIT itself takes none
    #[serde(default)]
    pub args: Vec<String>,

    /// Directory holding the CONTROL file and receiving the output
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,

    #[serde(default = "default_control_file_name")]
    pub control_file_name: String,

    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,

    /// Kill the model after this many seconds (no limit when unset)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_executable() -> PathBuf {
    PathBuf::from("hyts_std")
}

fn default_working_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_control_file_name() -> String {
    "CONTROL".to_string()
}

fn default_output_file_name() -> String {
    "tdump".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            args: Vec::new(),
            working_dir: default_working_dir(),
            control_file_name: default_control_file_name(),
            output_file_name: default_output_file_name(),
            timeout_secs: None,
        }
    }
}

impl RunnerConfig {
    pub fn control_path(&self) -> PathBuf {
        self.working_dir.join(&self.control_file_name)
    }

    pub fn output_path(&self) -> PathBuf {
        self.working_dir.join(&self.output_file_name)
    }
}

/// Result of a successful model run.
#[derive(Debug, Clone)]
pub struct ModelRun {
    pub control_path: PathBuf,
    pub output_path: PathBuf,
    /// Output file contents as written by the model. Decoding (and the
    /// UTF-8 check) is left to the parser.
    pub tdump: Vec<u8>,
    pub stdout: String,
    pub stderr: String,
    pub elapsed: Duration,
}

/// Runs the external trajectory model.
#[derive(Debug, Clone)]
pub struct HysplitRunner {
    config: RunnerConfig,
}

impl HysplitRunner {
    pub fn new(config: RunnerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Write the CONTROL file, run the model and read back its dump.
    pub async fn run(&self, control: &ControlFile) -> RunnerResult<ModelRun> {
        control.validate()?;

        let control_path = self.config.control_path();
        let output_path = self.config.output_path();

        control.write_to(&control_path).await?;
        debug!(path = %control_path.display(), "Wrote CONTROL file");

        remove_stale_output(&output_path).await?;

        let started = Instant::now();
        let output = self.execute().await?;
        let elapsed = started.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            warn!(
                code = ?output.status.code(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Model exited with failure"
            );
            return Err(RunnerError::NonZeroExit {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        let tdump = match tokio::fs::read(&output_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(RunnerError::MissingOutput(output_path));
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            output = %output_path.display(),
            bytes = tdump.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "Model run completed"
        );

        Ok(ModelRun {
            control_path,
            output_path,
            tdump,
            stdout,
            stderr,
            elapsed,
        })
    }

    async fn execute(&self) -> RunnerResult<std::process::Output> {
        let executable = &self.config.executable;

        let child = Command::new(executable)
            .args(&self.config.args)
            .current_dir(&self.config.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => RunnerError::ExecutableNotFound(executable.clone()),
                _ => RunnerError::Spawn {
                    executable: executable.clone(),
                    source: e,
                },
            })?;

        info!(
            executable = %executable.display(),
            working_dir = %self.config.working_dir.display(),
            "Started model"
        );

        let wait = child.wait_with_output();
        match self.config.timeout_secs {
            // dropping the timed-out future drops the child, which kills it
            Some(secs) => tokio::time::timeout(Duration::from_secs(secs), wait)
                .await
                .map_err(|_| RunnerError::TimedOut(secs))?
                .map_err(RunnerError::from),
            None => wait.await.map_err(RunnerError::from),
        }
    }
}

async fn remove_stale_output(path: &Path) -> RunnerResult<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed stale output file");
            Ok(())
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_model_conventions() {
        let config = RunnerConfig::default();
        assert_eq!(config.executable, PathBuf::from("hyts_std"));
        assert_eq!(config.control_path(), PathBuf::from("./CONTROL"));
        assert_eq!(config.output_path(), PathBuf::from("./tdump"));
        assert!(config.timeout_secs.is_none());
    }

    #[test]
    fn test_paths_follow_working_dir() {
        let config = RunnerConfig {
            working_dir: PathBuf::from("/data/run1"),
            output_file_name: "traj.out".to_string(),
            ..Default::default()
        };
        assert_eq!(config.control_path(), PathBuf::from("/data/run1/CONTROL"));
        assert_eq!(config.output_path(), PathBuf::from("/data/run1/traj.out"));
    }

    #[tokio::test]
    async fn test_remove_stale_output_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tdump");
        assert!(remove_stale_output(&path).await.is_ok());

        std::fs::write(&path, "old").unwrap();
        remove_stale_output(&path).await.unwrap();
        assert!(!path.exists());
    }
}
