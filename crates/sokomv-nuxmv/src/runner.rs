//! nuXmv subprocess driver.
//!
//! The runner writes the model to `<name>.smv` in its configured working
//! directory, starts nuXmv in interactive mode, feeds it a fixed command
//! script on stdin, and captures stdout in full. The raw text is
//! persisted as `<name>.out` beside the model before being returned, so
//! the trace artifact survives for inspection.

use crate::{CheckMode, Engine, EngineError};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Check whether a nuXmv executable can be started at all. A bare name
/// resolves through PATH.
pub fn nuxmv_available(executable: &Path) -> bool {
    Command::new(executable)
        .arg("-help")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .is_ok()
}

/// Explicit checker configuration. The executable location and the
/// artifact directory travel with the runner; no process-wide working
/// directory is ever touched.
#[derive(Debug, Clone)]
pub struct NuxmvConfig {
    /// nuXmv executable (a bare name resolves via PATH).
    pub executable: PathBuf,
    /// Directory where the `.smv` model and `.out` trace are written.
    pub work_dir: PathBuf,
    /// File stem for both artifacts.
    pub model_name: String,
}

impl NuxmvConfig {
    pub fn new(executable: impl Into<PathBuf>, work_dir: impl Into<PathBuf>) -> NuxmvConfig {
        NuxmvConfig {
            executable: executable.into(),
            work_dir: work_dir.into(),
            model_name: "sokoban_model".to_string(),
        }
    }
}

/// Runs nuXmv over a serialized model and captures its stdout.
#[derive(Debug, Clone)]
pub struct NuxmvRunner {
    config: NuxmvConfig,
}

impl NuxmvRunner {
    pub fn new(config: NuxmvConfig) -> NuxmvRunner {
        NuxmvRunner { config }
    }

    pub fn config(&self) -> &NuxmvConfig {
        &self.config
    }

    /// The interactive command script for one check mode.
    fn command_script(mode: CheckMode) -> String {
        match mode {
            CheckMode::Bounded { k } => {
                format!("go_bmc\ncheck_ltlspec_bmc -k {k}\nquit\n")
            }
            CheckMode::Exhaustive => "go\ncheck_ltlspec\nquit\n".to_string(),
        }
    }
}

impl Engine for NuxmvRunner {
    fn run(&self, model: &str, mode: CheckMode) -> Result<String, EngineError> {
        let model_file = format!("{}.smv", self.config.model_name);
        let model_path = self.config.work_dir.join(&model_file);

        fs::create_dir_all(&self.config.work_dir).map_err(|source| EngineError::Artifact {
            path: self.config.work_dir.clone(),
            source,
        })?;
        fs::write(&model_path, model).map_err(|source| EngineError::Artifact {
            path: model_path.clone(),
            source,
        })?;

        info!(model = %model_path.display(), ?mode, "invoking nuXmv");

        let mut child = Command::new(&self.config.executable)
            .arg("-int")
            .arg(&model_file)
            .current_dir(&self.config.work_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| EngineError::Launch {
                path: self.config.executable.clone(),
                source,
            })?;

        let script = Self::command_script(mode);
        debug!(script = %script.trim(), "checker command script");
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(script.as_bytes())
                .map_err(|source| EngineError::Subprocess { source })?;
        }

        let output = child
            .wait_with_output()
            .map_err(|source| EngineError::Subprocess { source })?;
        let raw = String::from_utf8_lossy(&output.stdout).into_owned();

        if raw.trim().is_empty() {
            return Err(EngineError::NoOutput);
        }

        let out_path = self
            .config
            .work_dir
            .join(format!("{}.out", self.config.model_name));
        fs::write(&out_path, &raw).map_err(|source| EngineError::Artifact {
            path: out_path.clone(),
            source,
        })?;
        info!(trace = %out_path.display(), bytes = raw.len(), "checker output captured");

        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_script_carries_the_bound() {
        assert_eq!(
            NuxmvRunner::command_script(CheckMode::Bounded { k: 25 }),
            "go_bmc\ncheck_ltlspec_bmc -k 25\nquit\n"
        );
    }

    #[test]
    fn exhaustive_script() {
        assert_eq!(
            NuxmvRunner::command_script(CheckMode::Exhaustive),
            "go\ncheck_ltlspec\nquit\n"
        );
    }
}
