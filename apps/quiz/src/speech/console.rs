//! Terminal stand-ins for speech: lines out, lines in.

use super::{SpeechError, SpeechIn, SpeechOut};
use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

/// Writes each utterance as a line.
pub struct ConsoleVoice<W> {
    out: W,
}

impl<W> ConsoleVoice<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleVoice<Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> SpeechOut for ConsoleVoice<W> {
    async fn speak(&mut self, text: &str) -> Result<(), SpeechError> {
        let line = format!("» {text}\n");
        self.out
            .write_all(line.as_bytes())
            .await
            .map_err(|e| SpeechError::Unavailable(e.to_string()))?;
        self.out
            .flush()
            .await
            .map_err(|e| SpeechError::Unavailable(e.to_string()))
    }
}

/// Reads each utterance as a line; end of input closes the device.
pub struct ConsoleEars<R> {
    input: R,
    line: String,
}

impl<R> ConsoleEars<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            line: String::new(),
        }
    }
}

impl ConsoleEars<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SpeechIn for ConsoleEars<R> {
    async fn listen(&mut self) -> Result<String, SpeechError> {
        self.line.clear();
        let read = self
            .input
            .read_line(&mut self.line)
            .await
            .map_err(|e| SpeechError::Unavailable(e.to_string()))?;
        if read == 0 {
            return Err(SpeechError::Closed);
        }
        Ok(self.line.trim().to_string())
    }
}
