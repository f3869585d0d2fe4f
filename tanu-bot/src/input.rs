//! Interactive text input.
//!
//! Reads one utterance per line and hands it to the [`Agent`]. The session
//! ends on an exit word, at end of input, or when the shutdown future
//! resolves (Ctrl+C for the terminal session).

use crate::config::InputConfig;
use crate::error::{InputError, InputResult};
use std::future::Future;
use tanu::Agent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

/// Text input configuration.
#[derive(Debug, Clone)]
pub struct TextInputConfig {
    /// Prompt written before each line is read.
    pub prompt: String,
    /// Words that end the session, lowercase.
    pub exit_words: Vec<String>,
}

impl Default for TextInputConfig {
    fn default() -> Self {
        Self::from(&InputConfig::default())
    }
}

impl From<&InputConfig> for TextInputConfig {
    fn from(config: &InputConfig) -> Self {
        Self {
            prompt: config.prompt.clone(),
            exit_words: config.exit_words.iter().map(|w| w.trim().to_lowercase()).collect(),
        }
    }
}

impl TextInputConfig {
    /// Create a text input config with the default prompt and exit words.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prompt string.
    #[must_use]
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Replace the exit words.
    #[must_use]
    pub fn exit_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exit_words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .collect();
        self
    }

    /// Whether `line` asks to end the session.
    #[must_use]
    pub fn is_exit_command(&self, line: &str) -> bool {
        let line = line.trim().to_lowercase();
        self.exit_words.iter().any(|word| *word == line)
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user typed an exit word.
    ExitWord,
    /// The input source was closed.
    EndOfInput,
    /// The shutdown signal fired.
    Interrupted,
}

impl SessionEnd {
    /// Message printed when the session ends.
    #[must_use]
    pub const fn farewell(self) -> &'static str {
        match self {
            Self::ExitWord => "Goodbye.",
            Self::EndOfInput | Self::Interrupted => "Exiting.",
        }
    }
}

/// Run a session over arbitrary reader and writer.
///
/// Blank lines are skipped without dispatching. Other lines are dispatched
/// exactly as typed. The farewell message is written before returning.
///
/// # Errors
///
/// Returns an [`InputError`] if reading a line or writing the prompt fails.
pub async fn run_session<R, W, S>(
    agent: &Agent,
    config: &TextInputConfig,
    reader: R,
    writer: &mut W,
    shutdown: S,
) -> InputResult<SessionEnd>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    S: Future<Output = ()>,
{
    let mut lines = reader.lines();
    tokio::pin!(shutdown);

    let end = loop {
        writer
            .write_all(config.prompt.as_bytes())
            .await
            .map_err(InputError::write)?;
        writer.flush().await.map_err(InputError::write)?;

        let line = tokio::select! {
            biased;
            () = &mut shutdown => break SessionEnd::Interrupted,
            line = lines.next_line() => line.map_err(InputError::read)?,
        };

        let Some(line) = line else {
            break SessionEnd::EndOfInput;
        };
        if line.trim().is_empty() {
            continue;
        }
        if config.is_exit_command(&line) {
            break SessionEnd::ExitWord;
        }

        debug!(input = %line, "dispatching");
        agent.dispatch(&line);
    };

    let farewell = match end {
        SessionEnd::ExitWord => format!("{}\n", end.farewell()),
        SessionEnd::EndOfInput | SessionEnd::Interrupted => format!("\n{}\n", end.farewell()),
    };
    writer
        .write_all(farewell.as_bytes())
        .await
        .map_err(InputError::write)?;
    writer.flush().await.map_err(InputError::write)?;

    info!(?end, "session ended");
    Ok(end)
}

/// Run an interactive session on stdin and stdout until an exit word, end of
/// input, or Ctrl+C.
///
/// # Errors
///
/// Returns an [`InputError`] if the terminal cannot be read or written.
pub async fn run_interactive(agent: &Agent, config: &TextInputConfig) -> InputResult<SessionEnd> {
    let reader = BufReader::new(tokio::io::stdin());
    let mut writer = tokio::io::stdout();

    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            debug!(error = %e, "cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    run_session(agent, config, reader, &mut writer, ctrl_c).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXIT_WORDS;
    use std::future;
    use std::sync::Arc;
    use tanu::loader::{SkillManifest, SkillUnit};
    use tanu::observer::RecordingObserver;
    use tanu::{BoxedSkill, HandlerResult, Skill, SkillResult};

    struct Echo(Vec<String>);

    impl Skill for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn intent_phrases(&self) -> &[String] {
            &self.0
        }

        fn handle_intent(&self, text: &str) -> SkillResult<HandlerResult> {
            Ok(HandlerResult::handled(text))
        }
    }

    fn agent(observer: Arc<RecordingObserver>) -> Agent {
        Agent::builder()
            .factory("echo", |_| Ok(Box::new(Echo(vec!["hello".into()])) as BoxedSkill))
            .unit(SkillUnit::inline("echo", SkillManifest::new("echo")))
            .observer(observer)
            .build()
    }

    async fn session(
        input: &str,
        config: &TextInputConfig,
    ) -> (SessionEnd, String, Arc<RecordingObserver>) {
        let observer = Arc::new(RecordingObserver::new());
        let agent = agent(Arc::clone(&observer));
        let mut out = Vec::new();
        let end = run_session(&agent, config, input.as_bytes(), &mut out, future::pending())
            .await
            .unwrap();
        (end, String::from_utf8(out).unwrap(), observer)
    }

    #[test]
    fn test_exit_commands() {
        let config = TextInputConfig::new();
        assert!(config.is_exit_command("exit"));
        assert!(config.is_exit_command("  QUIT "));
        assert!(config.is_exit_command("Stop"));
        assert!(!config.is_exit_command("stop the music"));

        let config = config.exit_words(["Bye"]);
        assert!(config.is_exit_command("bye"));
        assert!(!config.is_exit_command("exit"));
    }

    #[test]
    fn test_config_builder() {
        let config = TextInputConfig::new().prompt(">> ");
        assert_eq!(config.prompt, ">> ");
        assert_eq!(config.exit_words, DEFAULT_EXIT_WORDS);
    }

    #[tokio::test]
    async fn test_exit_word_says_goodbye() {
        let config = TextInputConfig::new().prompt("> ");
        let (end, out, observer) =
            session("hello there\n\n   \nexit\nhello again\n", &config).await;

        assert_eq!(end, SessionEnd::ExitWord);
        assert!(out.ends_with("Goodbye.\n"));
        // One prompt per line read, blank lines included.
        assert_eq!(out.matches("> ").count(), 4);

        let results = observer.results();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1, HandlerResult::handled("hello there"));
    }

    #[tokio::test]
    async fn test_lines_are_dispatched_as_typed() {
        let config = TextInputConfig::new();
        let (end, _, observer) = session("  Hello there \n  EXIT \n", &config).await;

        assert_eq!(end, SessionEnd::ExitWord);
        assert_eq!(
            observer.results(),
            [(
                "  Hello there ".to_string(),
                HandlerResult::handled("  Hello there ")
            )]
        );
    }

    #[tokio::test]
    async fn test_end_of_input_exits() {
        let (end, out, observer) = session("nothing matches\n", &TextInputConfig::new()).await;
        assert_eq!(end, SessionEnd::EndOfInput);
        assert!(out.ends_with("\nExiting.\n"));
        assert_eq!(observer.no_match_count(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_interrupts() {
        let observer = Arc::new(RecordingObserver::new());
        let agent = agent(Arc::clone(&observer));
        let mut out = Vec::new();
        let end = run_session(
            &agent,
            &TextInputConfig::new(),
            "hello\n".as_bytes(),
            &mut out,
            future::ready(()),
        )
        .await
        .unwrap();

        assert_eq!(end, SessionEnd::Interrupted);
        assert!(observer.results().is_empty());
        assert!(String::from_utf8(out).unwrap().ends_with("Exiting.\n"));
    }
}
