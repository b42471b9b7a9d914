use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("git program not found: {0}")]
    ProgramNotFound(#[from] which::Error),
    #[error("failed to run {program} {args}: {source}")]
    Spawn {
        program: String,
        args: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} {args} exited with {status}: {stderr}")]
    Failed {
        program: String,
        args: String,
        status: String,
        stderr: String,
    },
    #[error("{args} produced non-UTF-8 output")]
    NonUtf8 { args: String },
    #[error("{0} produced no output")]
    Empty(&'static str),
    #[error("malformed short hash: {0:?}")]
    MalformedHash(String),
}

/// The three source-control queries a version is derived from.
///
/// Each method returns the raw captured stdout of the query, or the reason it
/// could not be obtained.
pub trait VcsBackend {
    /// Nearest tag reachable from HEAD.
    fn describe_tags(&self) -> Result<String, ResolveError>;
    /// Abbreviated revision id of HEAD.
    fn short_head(&self) -> Result<String, ResolveError>;
    /// Summary of unstaged working-tree changes; empty when the tree is clean.
    fn diff_stat(&self) -> Result<String, ResolveError>;
}

#[derive(Debug, Clone)]
pub struct GitBackend {
    program: PathBuf,
    repo: Option<PathBuf>,
}

impl GitBackend {
    /// Uses the `git` found on `PATH`.
    pub fn discover() -> Result<Self, ResolveError> {
        let program = which::which("git")?;
        Ok(Self::with_program(program))
    }

    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            repo: None,
        }
    }

    /// Runs every query against `repo` (`git -C <repo>`) instead of the
    /// current directory.
    pub fn in_repo(mut self, repo: impl Into<PathBuf>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn repo(&self) -> Option<&Path> {
        self.repo.as_deref()
    }

    fn git(&self, args: &[&str]) -> Result<String, ResolveError> {
        let mut command = Command::new(&self.program);
        if let Some(repo) = &self.repo {
            command.arg("-C").arg(repo);
        }
        command.args(args);

        let program = self.program.display().to_string();
        let joined = args.join(" ");
        tracing::debug!(program = %program, args = %joined, "running git query");

        let output = command.output().map_err(|source| ResolveError::Spawn {
            program: program.clone(),
            args: joined.clone(),
            source,
        })?;
        if !output.status.success() {
            return Err(ResolveError::Failed {
                program,
                args: joined,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout).map_err(|_| ResolveError::NonUtf8 { args: joined })
    }
}

impl VcsBackend for GitBackend {
    fn describe_tags(&self) -> Result<String, ResolveError> {
        self.git(&["describe", "--tags"])
    }

    fn short_head(&self) -> Result<String, ResolveError> {
        self.git(&["rev-parse", "--short", "HEAD"])
    }

    fn diff_stat(&self) -> Result<String, ResolveError> {
        self.git(&["diff", "--stat"])
    }
}
