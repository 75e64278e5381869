use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Output};

use crate::errors::{KpubError, KpubResult};

/// Runs external programs (the signing backend, primarily) behind a small
/// builder so call sites stay declarative.
pub struct ExternalCommand {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
}

impl ExternalCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    /// Add one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments at once.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Run the child from `dir` instead of the current directory.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Execute the command and return its raw output.
    pub fn output(&self) -> KpubResult<Output> {
        tracing::debug!("Running command: {} {:?}", self.program, self.args);
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        cmd.output().map_err(KpubError::Io).map_err(Into::into)
    }

    /// Execute the command, requiring a zero exit status.
    ///
    /// On a non-zero exit the error message carries the program name and a
    /// trimmed excerpt of stderr.
    pub fn checked_output(&self) -> KpubResult<Output> {
        let output = self.output()?;
        if output.status.success() {
            return Ok(output);
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let excerpt: String = stderr
            .lines()
            .rev()
            .take(8)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n");
        Err(KpubError::Generic {
            message: format!(
                "`{}` exited with {}:\n{}",
                self.program,
                output.status,
                excerpt.trim()
            ),
        }
        .into())
    }
}
