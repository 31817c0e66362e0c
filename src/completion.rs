// completion.rs

use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use itertools::Itertools;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::builtins;

/// Completes the command word from the builtin table and `PATH`.
pub struct CommandCompleter;

impl CommandCompleter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

fn path_executables(prefix: &str) -> Vec<String> {
    let Some(path_var) = std::env::var_os("PATH") else {
        return Vec::new();
    };
    let mut names = Vec::new();
    for dir in std::env::split_paths(&path_var) {
        let Ok(entries) = std::fs::read_dir(Path::new(&dir)) else {
            continue;
        };
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if !name.starts_with(prefix) {
                continue;
            }
            // metadata() follows symlinks
            let is_exec = std::fs::metadata(entry.path())
                .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
                .unwrap_or(false);
            if is_exec {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Candidates for the first word of a line, sorted and deduplicated.
pub fn command_candidates(prefix: &str) -> Vec<String> {
    builtins::names()
        .filter(|b| b.starts_with(prefix))
        .map(str::to_string)
        .chain(path_executables(prefix))
        .sorted()
        .dedup()
        .collect()
}

impl Completer for CommandCompleter {
    type Candidate = Pair;
    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>), ReadlineError> {
        let before = &line[..pos];
        let start = before.len() - before.trim_start().len();
        let word = &before[start..];
        if word.contains(char::is_whitespace) {
            // only the command word is completed
            return Ok((pos, Vec::new()));
        }
        let completions = command_candidates(word)
            .into_iter()
            .map(|n| Pair {
                replacement: format!("{} ", n),
                display: n,
            })
            .collect();
        Ok((start, completions))
    }
}

impl Hinter for CommandCompleter {
    type Hint = String;
    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CommandCompleter {}

impl Validator for CommandCompleter {
    fn validate(&self, _ctx: &mut ValidationContext) -> Result<ValidationResult, ReadlineError> {
        Ok(ValidationResult::Valid(None))
    }
}

impl Helper for CommandCompleter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_candidates() {
        let found = command_candidates("hist");
        assert!(found.contains(&"history".to_string()));
        assert!(!found.contains(&"help".to_string()));
    }

    #[test]
    fn candidates_are_sorted_and_unique() {
        let found = command_candidates("");
        let mut expected = found.clone();
        expected.sort();
        expected.dedup();
        assert_eq!(found, expected);
        for name in builtins::names() {
            assert!(found.contains(&name.to_string()));
        }
    }
}
