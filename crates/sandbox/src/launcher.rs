// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sandbox Launcher (§4.1): materializes a session's files into a fresh
//! workdir and builds the spawn spec(s) the supervisor/adapter layer will
//! actually execute.
//!
//! This crate only builds specs; it never spawns a process itself. Running
//! the compile step and checking its exit code is the caller's job (the
//! supervisor for run-mode sessions, the relevant adapter's `launch` for
//! debug-mode sessions) because only the caller knows how to read and
//! surface that process's stderr as client-visible diagnostics (§4.1
//! "Failure modes").

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use xrun_core::{Language, Mode, SessionDescriptor};

use crate::bootstrap::{render_dynamic_bootstrap, BOOTSTRAP_FILENAME};
use crate::error::SandboxError;
use crate::limits::{MountMode, ResourceLimits};
use crate::spawn_spec::{SpawnSpec, TerminalMode};

/// The in-container path a session's workdir is always mounted at (§4.1).
pub const WORKDIR_MOUNT: &str = "/work";

/// Compiled output filename for a C++ session, shared with whatever launches
/// `xrun_adapters::GdbAdapter` for debug-mode sessions of this language.
pub const CPP_BINARY: &str = "xrun_cpp_bin";
/// Compiled output filename for a Go session, shared with whatever launches
/// `xrun_adapters::DelveAdapter` for debug-mode sessions of this language.
pub const GO_BINARY: &str = "xrun_go_bin";

/// A materialized, ready-to-spawn session.
pub struct PreparedSandbox {
    /// Kept alive for the session's lifetime; dropping it removes the
    /// workdir from disk (§3 invariant: "workdir owned, removed on close").
    pub workdir: TempDir,
    pub workdir_mount: String,
    pub mount_mode: MountMode,
    /// Present for languages that need a build step before running
    /// (§4.1 "two spawn specs in sequence").
    pub compile_spec: Option<SpawnSpec>,
    /// The run-mode invocation. For debug-mode sessions this is informational
    /// only — the debug adapter launches its own backend process instead.
    pub run_spec: SpawnSpec,
}

pub struct SandboxLauncher {
    /// Path to the external sandboxing helper (e.g. a thin wrapper around
    /// namespaces/cgroups) that every spawn is delegated through. `None`
    /// means run unsandboxed, which callers should only use in tests.
    sandbox_exe: Option<PathBuf>,
}

impl SandboxLauncher {
    pub fn new(sandbox_exe: Option<PathBuf>) -> Self {
        Self { sandbox_exe }
    }

    /// Materialize `session`'s files and build its spawn spec(s).
    pub async fn prepare(&self, session: &SessionDescriptor) -> Result<PreparedSandbox, SandboxError> {
        if let Some(exe) = &self.sandbox_exe {
            if !tokio::fs::try_exists(exe).await.unwrap_or(false) {
                return Err(SandboxError::BinaryUnavailable(exe.display().to_string()));
            }
        }

        let workdir = tempfile::tempdir()?;
        self.materialize_files(session, workdir.path()).await?;

        let mount_mode = if session.language.is_compiled() || session.mode == Mode::Debug {
            MountMode::ReadWrite
        } else {
            MountMode::ReadOnly
        };

        let (compile_spec, run_spec) = match (session.language, session.mode) {
            (Language::Dynamic, Mode::Run) => {
                let bootstrap = render_dynamic_bootstrap(&session.entry, &session.args);
                tokio::fs::write(workdir.path().join(BOOTSTRAP_FILENAME), bootstrap).await?;
                let spec = self
                    .wrap(
                        "python3",
                        vec!["-u".to_string(), BOOTSTRAP_FILENAME.to_string()],
                        workdir.path(),
                        ResourceLimits::default(),
                    )
                    .with_env("PYTHONUNBUFFERED", "1");
                (None, spec)
            }
            (Language::Dynamic, Mode::Debug) => {
                // The shim is spawned directly by `xrun_adapters::DynamicAdapter`;
                // this run_spec exists only so every branch returns one.
                let spec = self.wrap("python3", vec![session.entry.clone()], workdir.path(), ResourceLimits::default());
                (None, spec)
            }
            (Language::Script, _) => {
                let mut args = vec![session.entry.clone()];
                args.extend(session.args.iter().cloned());
                let spec = self.wrap("node", args, workdir.path(), ResourceLimits::default());
                (None, spec)
            }
            (Language::SystemsCpp, _) => {
                let compile = self.wrap(
                    "g++",
                    vec!["-g".to_string(), "-O0".to_string(), "-o".to_string(), CPP_BINARY.to_string(), session.entry.clone()],
                    workdir.path(),
                    ResourceLimits::default(),
                );
                let mut run = self.wrap(
                    format!("./{CPP_BINARY}"),
                    session.args.clone(),
                    workdir.path(),
                    ResourceLimits::default(),
                );
                run.terminal_mode = TerminalMode::Pty;
                (Some(compile), run)
            }
            (Language::Jvm, _) => {
                let main_class = main_class_from_entry(&session.entry);
                let compile = self.wrap(
                    "javac",
                    vec!["-g".to_string(), session.entry.clone()],
                    workdir.path(),
                    ResourceLimits::default(),
                );
                let mut args = vec![main_class];
                args.extend(session.args.iter().cloned());
                let run = self.wrap("java", args, workdir.path(), ResourceLimits::default());
                (Some(compile), run)
            }
            (Language::CompiledGo, _) => {
                let compile = self.wrap(
                    "go",
                    vec![
                        "build".to_string(),
                        "-gcflags=all=-N -l".to_string(),
                        "-o".to_string(),
                        GO_BINARY.to_string(),
                        session.entry.clone(),
                    ],
                    workdir.path(),
                    ResourceLimits::default(),
                );
                let mut run = self.wrap(format!("./{GO_BINARY}"), session.args.clone(), workdir.path(), ResourceLimits::default());
                run.terminal_mode = TerminalMode::Pty;
                (Some(compile), run)
            }
        };

        Ok(PreparedSandbox {
            workdir,
            workdir_mount: WORKDIR_MOUNT.to_string(),
            mount_mode,
            compile_spec,
            run_spec,
        })
    }

    async fn materialize_files(&self, session: &SessionDescriptor, workdir: &Path) -> Result<(), SandboxError> {
        for (name, content) in session.files.iter() {
            let normalized = content.replace("\r\n", "\n");
            tokio::fs::write(workdir.join(name), normalized).await?;
        }
        Ok(())
    }

    fn wrap(&self, program: impl Into<String>, args: Vec<String>, cwd: &Path, limits: ResourceLimits) -> SpawnSpec {
        let program = program.into();
        match &self.sandbox_exe {
            None => SpawnSpec::new(program, args, cwd.to_path_buf(), limits),
            Some(exe) => {
                let mut wrapped_args = vec![
                    format!("--cpu={}", limits.cpu_cores),
                    format!("--memory={}", limits.memory_bytes),
                    format!("--pids={}", limits.pid_cap),
                    format!("--network={}", limits.network),
                    format!("--mount={}:{}", cwd.display(), WORKDIR_MOUNT),
                    "--".to_string(),
                    program,
                ];
                wrapped_args.extend(args);
                SpawnSpec::new(exe.display().to_string(), wrapped_args, cwd.to_path_buf(), limits)
            }
        }
    }
}

/// Derive a Java main-class name from a `.java` entry filename, shared with
/// whatever launches `xrun_adapters::JdbAdapter` for debug-mode sessions.
pub fn main_class_from_entry(entry: &str) -> String {
    entry.strip_suffix(".java").unwrap_or(entry).to_string()
}

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;
