// config.rs

use std::io::IsTerminal;

use crate::history::CAPACITY;

pub const DEFAULT_PROMPT: &str = "[mysh v0.1] $ ";

/// Startup settings, read from `MYSH_PROMPT` and `MYSH_HISTSIZE`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub prompt: String,
    pub history_capacity: usize,
    pub interactive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            history_capacity: CAPACITY,
            interactive: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok());
        config.interactive = std::io::stdin().is_terminal();
        config
    }

    /// Builds a config from an arbitrary variable lookup. Bad values are
    /// logged and replaced by the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(prompt) = lookup("MYSH_PROMPT") {
            config.prompt = prompt;
        }
        if let Some(raw) = lookup("MYSH_HISTSIZE") {
            match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => config.history_capacity = n,
                _ => log::warn!("ignoring MYSH_HISTSIZE={:?}, using {}", raw, CAPACITY),
            }
        }
        config
    }
}
