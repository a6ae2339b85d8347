// Speech command announcer
// reason: tokio for async process management, narration runs out of process
use async_trait::async_trait;
use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use walkin_core::port::announcer::{AnnounceError, Announcer};

/// Default narration timeout (30 seconds)
pub const DEFAULT_SPEECH_TIMEOUT_MS: u64 = 30_000;

/// Announcer that hands the text to a text-to-speech program
/// (e.g. `espeak`, `say`, `spd-say`). The text is passed as the last
/// argument; the child only sees allowlisted environment variables.
pub struct CommandAnnouncer {
    program: String,
    args: Vec<String>,
    env_allowlist: Vec<String>,
    timeout_ms: u64,
}

impl CommandAnnouncer {
    /// Create a new speech command announcer
    ///
    /// # Arguments
    /// * `command_line` - Program and leading arguments, whitespace separated
    /// * `env_allowlist` - Environment variables passed through to the child
    ///
    /// # Example
    /// ```ignore
    /// let announcer = CommandAnnouncer::new(
    ///     "espeak -s 140",
    ///     vec!["PATH".to_string(), "HOME".to_string()],
    /// )?;
    /// ```
    pub fn new(command_line: &str, env_allowlist: Vec<String>) -> Result<Self, AnnounceError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| AnnounceError::Unavailable("empty speech command".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
            env_allowlist,
            timeout_ms: DEFAULT_SPEECH_TIMEOUT_MS,
        })
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Filter environment variables to allowlist only
    fn filter_env(&self, env: &HashMap<String, String>) -> HashMap<String, String> {
        env.iter()
            .filter(|(k, _)| self.env_allowlist.contains(k))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Spawn the speech program and wait for it to finish narrating
    async fn spawn_and_wait(&self, text: &str) -> Result<std::process::Output, AnnounceError> {
        let env: HashMap<String, String> = std::env::vars().collect();
        let filtered_env = self.filter_env(&env);

        let child = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .env_clear()
            .envs(&filtered_env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AnnounceError::Unavailable(format!("{}: {}", self.program, e)))?;

        match timeout(Duration::from_millis(self.timeout_ms), child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(e)) => Err(AnnounceError::Failed(e.to_string())),
            Err(_) => Err(AnnounceError::Timeout(self.timeout_ms)),
        }
    }
}

#[async_trait]
impl Announcer for CommandAnnouncer {
    async fn speak(&self, text: &str, counter_name: Option<&str>) -> Result<(), AnnounceError> {
        info!(
            program = %self.program,
            counter = ?counter_name,
            "Starting narration"
        );

        let output = self.spawn_and_wait(text).await?;

        if !output.status.success() {
            return Err(AnnounceError::Failed(format!(
                "{} exited with {:?}: {}",
                self.program,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        debug!(program = %self.program, "Narration finished");
        Ok(())
    }
}
