//! External OCR command runner.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use spoolscan_core::{OcrConfig, OcrError};

/// Turns an image into text by running a configured OCR program.
pub struct CommandRecognizer {
    config: OcrConfig,
}

impl CommandRecognizer {
    pub fn new(config: OcrConfig) -> Self {
        Self { config }
    }

    /// Run OCR on `image`, returning its recognized text.
    pub async fn recognize(&self, image: &Path) -> Result<String, OcrError> {
        let args = self.config.args_for(image);
        debug!("Running OCR: {} {}", self.config.command, args.join(" "));

        let mut command = Command::new(&self.config.command);
        command.args(&args).stdin(Stdio::null()).kill_on_drop(true);

        let output = timeout(Duration::from_secs(self.config.timeout_secs), command.output())
            .await
            .map_err(|_| OcrError::Timeout(self.config.timeout_secs))?
            .map_err(|e| OcrError::Spawn {
                command: self.config.command.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8(output.stdout)
            .map_err(|e| OcrError::InvalidOutput(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(OcrError::NoText);
        }

        debug!("OCR returned {} chars", text.len());
        Ok(text)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn shell(script: &str, timeout_secs: u64) -> CommandRecognizer {
        CommandRecognizer::new(OcrConfig {
            command: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string(), "{input}".to_string()],
            timeout_secs,
            ..OcrConfig::default()
        })
    }

    #[tokio::test]
    async fn test_recognize_stdout() {
        let recognizer = shell("echo \"Weight: 25g from $0\"", 5);
        let text = recognizer.recognize(&PathBuf::from("shot.png")).await.unwrap();
        assert_eq!(text.trim(), "Weight: 25g from shot.png");
    }

    #[tokio::test]
    async fn test_failure_status() {
        let recognizer = shell("echo broken >&2; exit 3", 5);
        let err = recognizer.recognize(&PathBuf::from("x.png")).await.unwrap_err();
        match err {
            OcrError::Failed { stderr, .. } => assert_eq!(stderr, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_output() {
        let recognizer = shell("true", 5);
        let err = recognizer.recognize(&PathBuf::from("x.png")).await.unwrap_err();
        assert!(matches!(err, OcrError::NoText));
    }

    #[tokio::test]
    async fn test_timeout() {
        let recognizer = shell("sleep 5", 1);
        let err = recognizer.recognize(&PathBuf::from("x.png")).await.unwrap_err();
        assert!(matches!(err, OcrError::Timeout(1)));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let recognizer = CommandRecognizer::new(OcrConfig {
            command: "spoolscan-no-such-ocr".to_string(),
            ..OcrConfig::default()
        });
        let err = recognizer.recognize(&PathBuf::from("x.png")).await.unwrap_err();
        assert!(matches!(err, OcrError::Spawn { .. }));
    }
}
