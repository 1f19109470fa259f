//! Speech-to-text engines.
//!
//! `CommandEngine` runs an external recognizer once per listening segment.
//! Contract with the program:
//!
//! - each stdout line is the full transcript of the segment so far
//!   (interim hypotheses simply print a longer line)
//! - exit status 0 ends the segment normally
//! - a non-zero exit reports an error code on the last stderr line
//!   (`network`, `not-allowed`, `service-not-allowed`, anything else)
//!
//! The recognition language is passed as `JARVIS_SPEECH_LANG`.

use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc::Sender;

use super::SpeechError;

#[derive(Debug)]
pub enum ListenError {
    /// The engine cannot run at all (binary missing).
    Unavailable(String),
    Engine(SpeechError),
}

impl fmt::Display for ListenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListenError::Unavailable(msg) => write!(f, "speech engine unavailable: {msg}"),
            ListenError::Engine(e) => write!(f, "speech engine error: {e}"),
        }
    }
}

impl std::error::Error for ListenError {}

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn name(&self) -> &str;

    /// Listen for a single segment, sending transcript updates as they
    /// arrive. Returns once the segment is over.
    async fn listen(&self, transcripts: Sender<String>) -> Result<(), ListenError>;
}

pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    language: String,
}

impl CommandEngine {
    pub fn new(program: String, args: Vec<String>, language: String) -> Self {
        Self {
            program,
            args,
            language,
        }
    }
}

#[async_trait]
impl SpeechEngine for CommandEngine {
    fn name(&self) -> &str {
        &self.program
    }

    async fn listen(&self, transcripts: Sender<String>) -> Result<(), ListenError> {
        debug!("Starting speech segment: {} {:?}", self.program, self.args);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("JARVIS_SPEECH_LANG", &self.language)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ListenError::Unavailable(e.to_string()),
                std::io::ErrorKind::PermissionDenied => {
                    ListenError::Engine(SpeechError::NotAllowed)
                }
                _ => ListenError::Engine(SpeechError::Other(e.to_string())),
            })?;

        let stderr_task = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf).await;
                buf
            })
        });

        if let Some(stdout) = child.stdout.take() {
            let mut lines = BufReader::new(stdout).lines();
            while let Some(line) = lines
                .next_line()
                .await
                .map_err(|e| ListenError::Engine(SpeechError::Other(e.to_string())))?
            {
                let line = line.trim_end();
                if line.is_empty() {
                    continue;
                }
                if transcripts.send(line.to_string()).await.is_err() {
                    // Nobody is listening any more; stop the recognizer.
                    break;
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| ListenError::Engine(SpeechError::Other(e.to_string())))?;

        let stderr = match stderr_task {
            Some(task) => task.await.unwrap_or_default(),
            None => String::new(),
        };

        if status.success() {
            return Ok(());
        }

        let code = stderr
            .lines()
            .rev()
            .find(|l| !l.trim().is_empty())
            .unwrap_or("aborted");
        info!("Speech segment failed ({status}): {code}");
        Err(ListenError::Engine(SpeechError::from_code(code)))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn sh(script: &str) -> CommandEngine {
        CommandEngine::new(
            "sh".to_string(),
            vec!["-c".to_string(), script.to_string()],
            "en-US".to_string(),
        )
    }

    #[tokio::test]
    async fn streams_each_line_as_transcript() {
        let engine = sh("echo hello; echo; echo hello world");
        let (tx, mut rx) = mpsc::channel(8);
        engine.listen(tx).await.unwrap();

        let mut seen = Vec::new();
        while let Some(line) = rx.recv().await {
            seen.push(line);
        }
        assert_eq!(seen, vec!["hello", "hello world"]);
    }

    #[tokio::test]
    async fn language_is_exported() {
        let engine = sh("echo $JARVIS_SPEECH_LANG");
        let (tx, mut rx) = mpsc::channel(8);
        engine.listen(tx).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("en-US"));
    }

    #[tokio::test]
    async fn exit_code_reports_stderr_error_code() {
        let engine = sh("echo not-allowed >&2; exit 1");
        let (tx, _rx) = mpsc::channel(8);
        let result = engine.listen(tx).await;
        assert!(matches!(
            result,
            Err(ListenError::Engine(SpeechError::NotAllowed))
        ));
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let engine = CommandEngine::new(
            "jarvis-no-such-recognizer".to_string(),
            Vec::new(),
            "en-US".to_string(),
        );
        let (tx, _rx) = mpsc::channel(8);
        assert!(matches!(
            engine.listen(tx).await,
            Err(ListenError::Unavailable(_))
        ));
    }
}
