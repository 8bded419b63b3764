use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

const PROMPT: &str = ">>> ";

/// Line-oriented user I/O for the chat loop.
#[async_trait]
pub trait Console: Send {
    /// Prompts and reads one line. `None` once input is closed.
    async fn read_user_input(&mut self) -> Result<Option<String>>;

    async fn write_line(&mut self, text: &str) -> Result<()>;
}

pub struct Terminal {
    lines: Lines<BufReader<Stdin>>,
    output: Stdout,
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            output: tokio::io::stdout(),
        }
    }
}

#[async_trait]
impl Console for Terminal {
    async fn read_user_input(&mut self) -> Result<Option<String>> {
        self.output.write_all(PROMPT.as_bytes()).await?;
        self.output.flush().await?;
        Ok(self.lines.next_line().await?)
    }

    async fn write_line(&mut self, text: &str) -> Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;
        Ok(())
    }
}
