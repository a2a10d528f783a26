use std::io::{self, Write};
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("failed to start sound player `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to ring terminal bell: {0}")]
    Terminal(#[source] io::Error),

    #[error("empty alert command")]
    EmptyCommand,
}

pub trait Alert: Send + Sync {
    fn play(&self) -> Result<(), AlertError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Alert for TerminalBell {
    fn play(&self) -> Result<(), AlertError> {
        let mut stderr = io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(AlertError::Terminal)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Alert for Silent {
    fn play(&self) -> Result<(), AlertError> {
        Ok(())
    }
}

/// Plays a sound by launching an external player, e.g. `paplay /usr/share/sounds/bell.oga`.
#[derive(Debug, Clone)]
pub struct CommandAlert {
    program: String,
    args: Vec<String>,
}

impl CommandAlert {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Splits a command line on whitespace. No shell quoting is applied.
    pub fn parse(command_line: &str) -> Result<Self, AlertError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(AlertError::EmptyCommand)?;
        Ok(Self::new(program, parts.collect()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Alert for CommandAlert {
    fn play(&self) -> Result<(), AlertError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AlertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Reap in the background so playback never blocks the countdown
        std::thread::spawn(move || {
            if let Err(e) = child.wait() {
                tracing::debug!("Sound player wait failed: {}", e);
            }
        });
        Ok(())
    }
}

pub fn play_best_effort(alert: &dyn Alert) -> bool {
    match alert.play() {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Rest timer alert failed: {}", e);
            false
        }
    }
}
