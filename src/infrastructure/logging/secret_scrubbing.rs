use regex::Regex;
use std::borrow::Cow;
use std::fmt;

/// Redacts credentials from text before it is logged.
///
/// HTTP client errors embed request URLs, and Telegram puts the bot token in
/// the URL path, so transport and backend errors go through this first.
#[derive(Clone)]
pub struct SecretScrubber {
    bot_token_pattern: Regex,
    api_key_pattern: Regex,
    bearer_pattern: Regex,
}

impl SecretScrubber {
    pub fn new() -> Self {
        Self {
            // Telegram bot tokens: <bot id>:<35 char secret>
            bot_token_pattern: Regex::new(r"\d{5,}:[A-Za-z0-9_-]{30,}")
                .expect("bot token pattern is a valid literal"),
            // OpenAI-style keys: sk-..., sk-proj-...
            api_key_pattern: Regex::new(r"sk-[A-Za-z0-9_-]{16,}")
                .expect("api key pattern is a valid literal"),
            bearer_pattern: Regex::new(r"Bearer\s+[A-Za-z0-9_.\-]+")
                .expect("bearer pattern is a valid literal"),
        }
    }

    /// Returns `message` with every recognised secret replaced.
    pub fn scrub<'a>(&self, message: &'a str) -> Cow<'a, str> {
        let mut scrubbed = Cow::Borrowed(message);
        for (pattern, replacement) in [
            (&self.bot_token_pattern, "[BOT_TOKEN_REDACTED]"),
            (&self.api_key_pattern, "[API_KEY_REDACTED]"),
            (&self.bearer_pattern, "Bearer [TOKEN_REDACTED]"),
        ] {
            let replaced = match pattern.replace_all(&scrubbed, replacement) {
                Cow::Owned(replaced) => Some(replaced),
                Cow::Borrowed(_) => None,
            };
            if let Some(replaced) = replaced {
                scrubbed = Cow::Owned(replaced);
            }
        }
        scrubbed
    }
}

impl Default for SecretScrubber {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
