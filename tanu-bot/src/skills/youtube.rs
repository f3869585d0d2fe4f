//! Play songs and videos by opening a YouTube search.

use super::launcher::Launcher;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tanu::{BoxedSkill, HandlerResult, Skill, SkillResult};
use tracing::debug;

/// Factory name.
pub const FACTORY: &str = "youtube";

const DEFAULT_PHRASES: [&str; 10] = [
    "play song",
    "play music",
    "play video",
    "play on youtube",
    "youtube play",
    "open youtube",
    "youtube song",
    "play audio",
    "youtube",
    "play movie",
];

const SEARCH_URL: &str = "https://www.youtube.com/results?search_query=";

const FILLER_WORDS: [&str; 6] = ["the", "a", "an", "on", "please", "now"];

/// Shortest query accepted from the generic `play <x>` pattern.
const MIN_LOOSE_QUERY_LEN: usize = 3;

struct QueryPatterns {
    /// Patterns in priority order; `true` marks patterns specific enough to
    /// accept any non-empty query.
    ordered: Vec<(Regex, bool)>,
    trailing: Regex,
}

impl QueryPatterns {
    fn new() -> Self {
        let ordered = [
            (r"youtube\s+(.+)", true),
            (r"play\s+(?:song|music|video|audio|movie)\s+(.+)", true),
            (r"play\s+on\s+youtube\s+(.+)", true),
            (r"play\s+(.+)\s+youtube", true),
            (r"play\s+(.+)", false),
        ]
        .into_iter()
        .map(|(pattern, strict)| (Regex::new(pattern).expect("valid regex"), strict))
        .collect();

        Self {
            ordered,
            trailing: Regex::new(r"\s+(?:song|music|video|audio|movie|on|youtube)$")
                .expect("valid regex"),
        }
    }

    fn get() -> &'static Self {
        static PATTERNS: OnceLock<QueryPatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::new)
    }
}

/// Extract what to play from an utterance.
#[must_use]
pub fn extract_query(text: &str) -> Option<String> {
    let text = text.to_lowercase();
    let patterns = QueryPatterns::get();

    for (pattern, strict) in &patterns.ordered {
        let Some(caps) = pattern.captures(&text) else {
            continue;
        };

        let words: Vec<&str> = caps[1]
            .split_whitespace()
            .filter(|word| !FILLER_WORDS.contains(word))
            .collect();
        let query = patterns.trailing.replace(&words.join(" "), "").into_owned();

        if query.is_empty() || (!strict && query.chars().count() < MIN_LOOSE_QUERY_LEN) {
            continue;
        }
        return Some(query);
    }
    None
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default)]
    phrases: Option<Vec<String>>,
}

/// Opens a YouTube search for the requested song or video.
#[derive(Debug)]
pub struct YouTubeSkill {
    phrases: Vec<String>,
    launcher: Arc<dyn Launcher>,
}

impl YouTubeSkill {
    /// Build from manifest settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings do not deserialize.
    pub fn from_settings(settings: &Value, launcher: Arc<dyn Launcher>) -> SkillResult<BoxedSkill> {
        let settings: Settings = if settings.is_null() {
            Settings::default()
        } else {
            serde_json::from_value(settings.clone())?
        };
        let phrases = settings
            .phrases
            .unwrap_or_else(|| DEFAULT_PHRASES.iter().map(ToString::to_string).collect());
        Ok(Box::new(Self { phrases, launcher }))
    }
}

impl Skill for YouTubeSkill {
    fn name(&self) -> &str {
        FACTORY
    }

    fn intent_phrases(&self) -> &[String] {
        &self.phrases
    }

    fn handle_intent(&self, text: &str) -> SkillResult<HandlerResult> {
        let Some(query) = extract_query(text) else {
            debug!("could not extract song or video name");
            return Ok(HandlerResult::NotHandled);
        };
        let url = format!("{SEARCH_URL}{}", urlencoding::encode(&query));
        self.launcher.open_url(&url)?;
        Ok(HandlerResult::handled(format!("Searching YouTube: {query}")))
    }
}
