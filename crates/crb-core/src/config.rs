use std::{env, fs, path::Path, time::Duration};

use crate::{errors::Error, Result};

pub const DEFAULT_CHAI_API_URL: &str =
    "http://guanaco-submitter.guanaco-backend.k2.chaiverse.com/endpoints/onsite/chat";

/// Value shipped in `.env.example`; treated the same as an unset token.
pub const TELEGRAM_TOKEN_PLACEHOLDER: &str = "YOUR_TELEGRAM_BOT_TOKEN";

/// Names and prompt the relay presents to the remote model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Persona {
    pub bot_name: String,
    pub user_name: String,
    pub prompt: String,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            bot_name: "ChaiBot".to_string(),
            user_name: "User".to_string(),
            prompt: "A helpful and engaging conversation with ChaiBot.".to_string(),
        }
    }
}

/// Typed configuration for the relay.
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    telegram_bot_token: Option<String>,
    pub command_prefix: String,
    pub presence: String,

    // Chai endpoint
    pub chai_api_url: String,
    pub chai_api_key: Option<String>,
    pub chai_timeout: Option<Duration>,

    // Conversation
    pub persona: Persona,
}

impl Config {
    /// Load from the process environment, after merging an optional `.env`.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let telegram_bot_token = lookup("TELEGRAM_BOT_TOKEN").and_then(non_empty);

        let command_prefix = lookup("COMMAND_PREFIX")
            .and_then(non_empty)
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| "/".to_string());
        if command_prefix.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!(
                "COMMAND_PREFIX must not contain whitespace: {command_prefix:?}"
            )));
        }
        let presence = lookup("BOT_PRESENCE")
            .and_then(non_empty)
            .unwrap_or_else(|| "Chat with me!".to_string());

        let chai_api_url = lookup("CHAI_API_URL")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_CHAI_API_URL.to_string());
        if !(chai_api_url.starts_with("http://") || chai_api_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "CHAI_API_URL must be an http(s) URL: {chai_api_url}"
            )));
        }
        let chai_api_key = lookup("CHAI_API_KEY").and_then(non_empty);
        let chai_timeout = match lookup("CHAI_TIMEOUT_SECS").and_then(non_empty) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    Error::Config(format!("CHAI_TIMEOUT_SECS is not a number: {raw}"))
                })?;
                Some(Duration::from_secs(secs)).filter(|d| !d.is_zero())
            }
            None => None,
        };

        let defaults = Persona::default();
        let persona = Persona {
            bot_name: lookup("BOT_NAME")
                .and_then(non_empty)
                .unwrap_or(defaults.bot_name),
            user_name: lookup("USER_NAME")
                .and_then(non_empty)
                .unwrap_or(defaults.user_name),
            prompt: lookup("BOT_PROMPT")
                .and_then(non_empty)
                .unwrap_or(defaults.prompt),
        };

        Ok(Self {
            telegram_bot_token,
            command_prefix,
            presence,
            chai_api_url,
            chai_api_key,
            chai_timeout,
            persona,
        })
    }

    /// The Telegram token, or a config error when it is unset or still the
    /// placeholder. Checked before the bot connects.
    pub fn telegram_bot_token(&self) -> Result<&str> {
        match self.telegram_bot_token.as_deref() {
            Some(token) if token.trim() != TELEGRAM_TOKEN_PLACEHOLDER => Ok(token),
            _ => Err(Error::Config(
                "Please set your Telegram bot token in the TELEGRAM_BOT_TOKEN environment variable \
                 (example: export TELEGRAM_BOT_TOKEN=your_token_here)"
                    .to_string(),
            )),
        }
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        env::set_var(key, unquote(v.trim()));
    }
}

/// Strip optional surrounding quotes.
fn unquote(val: &str) -> &str {
    if val.len() >= 2
        && ((val.starts_with('"') && val.ends_with('"'))
            || (val.starts_with('\'') && val.ends_with('\'')))
    {
        &val[1..val.len() - 1]
    } else {
        val
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_the_hosted_bot() {
        let cfg = config_from(&[]).unwrap();
        assert_eq!(cfg.command_prefix, "/");
        assert_eq!(cfg.presence, "Chat with me!");
        assert_eq!(cfg.chai_api_url, DEFAULT_CHAI_API_URL);
        assert_eq!(cfg.chai_api_key, None);
        assert_eq!(cfg.chai_timeout, None);
        assert_eq!(cfg.persona, Persona::default());
        assert_eq!(cfg.persona.user_name, "User");
    }

    #[test]
    fn missing_token_is_a_config_error() {
        let cfg = config_from(&[]).unwrap();
        assert!(matches!(cfg.telegram_bot_token(), Err(Error::Config(_))));
    }

    #[test]
    fn placeholder_token_is_rejected() {
        let cfg = config_from(&[("TELEGRAM_BOT_TOKEN", TELEGRAM_TOKEN_PLACEHOLDER)]).unwrap();
        let err = cfg.telegram_bot_token().unwrap_err();
        assert!(err.to_string().contains("TELEGRAM_BOT_TOKEN"));
    }

    #[test]
    fn real_token_passes() {
        let cfg = config_from(&[("TELEGRAM_BOT_TOKEN", "123:abc")]).unwrap();
        assert_eq!(cfg.telegram_bot_token().unwrap(), "123:abc");
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = config_from(&[
            ("CHAI_API_URL", "https://example.test/chat"),
            ("CHAI_API_KEY", "CR_test"),
            ("CHAI_TIMEOUT_SECS", "30"),
            ("BOT_NAME", "Nova"),
            ("USER_NAME", "Human"),
            ("BOT_PROMPT", "Nova chats."),
            ("COMMAND_PREFIX", "!"),
        ])
        .unwrap();
        assert_eq!(cfg.chai_api_url, "https://example.test/chat");
        assert_eq!(cfg.chai_api_key.as_deref(), Some("CR_test"));
        assert_eq!(cfg.chai_timeout, Some(Duration::from_secs(30)));
        assert_eq!(cfg.persona.bot_name, "Nova");
        assert_eq!(cfg.persona.user_name, "Human");
        assert_eq!(cfg.persona.prompt, "Nova chats.");
        assert_eq!(cfg.command_prefix, "!");
    }

    #[test]
    fn zero_timeout_means_transport_default() {
        let cfg = config_from(&[("CHAI_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(cfg.chai_timeout, None);
    }

    #[test]
    fn bad_timeout_is_rejected() {
        assert!(config_from(&[("CHAI_TIMEOUT_SECS", "soon")]).is_err());
    }

    #[test]
    fn non_http_url_is_rejected() {
        assert!(config_from(&[("CHAI_API_URL", "ftp://nope")]).is_err());
    }

    #[test]
    fn unquote_strips_matching_quotes_only() {
        assert_eq!(unquote("\"abc\""), "abc");
        assert_eq!(unquote("'abc'"), "abc");
        assert_eq!(unquote("\"abc'"), "\"abc'");
        assert_eq!(unquote("abc"), "abc");
    }
}
