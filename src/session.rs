// session.rs

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::builtins::{self, Context, ExitSignal};
use crate::config::Config;
use crate::history::HistoryRing;
use crate::input::{LineSource, ReadOutcome};
use crate::launcher;
use crate::parser::tokenize;
use crate::util::writeln_ignore_broken_pipe;

pub const FAREWELL: &str = "Exiting mysh";

/// One interactive shell: the prompt loop and the history it owns.
pub struct Session {
    history: HistoryRing,
    prompt: String,
}

impl Session {
    pub fn new(config: &Config) -> Self {
        Self {
            history: HistoryRing::with_capacity(config.history_capacity),
            prompt: config.prompt.clone(),
        }
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    /// Prompts and dispatches lines until `exit` or end of input, then says
    /// goodbye.
    pub fn run(&mut self, input: &mut dyn LineSource, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<()> {
        loop {
            match input.read_line(&self.prompt, out)? {
                ReadOutcome::Line(line) => {
                    if self.step(&line, out, err) == ExitSignal::Terminate {
                        break;
                    }
                }
                ReadOutcome::Interrupted => continue,
                ReadOutcome::Eof => {
                    log::debug!("end of input");
                    writeln_ignore_broken_pipe(&mut *out, "")?;
                    break;
                }
            }
        }
        writeln_ignore_broken_pipe(&mut *out, FAREWELL)?;
        out.flush()
    }

    /// Handles one raw input line. Every line is recorded, blank or not.
    pub fn step(&mut self, line: &str, out: &mut dyn Write, err: &mut dyn Write) -> ExitSignal {
        self.history.record(line);
        let tokens = tokenize(line);
        if tokens.is_empty() {
            return ExitSignal::Continue;
        }
        self.dispatch(&tokens, out, err)
    }

    pub fn dispatch(&mut self, tokens: &[String], out: &mut dyn Write, err: &mut dyn Write) -> ExitSignal {
        let Some(name) = tokens.first() else {
            return ExitSignal::Continue;
        };
        match builtins::resolve(name) {
            Some(builtin) => {
                log::debug!("builtin {}: {:?}", builtin.name, &tokens[1..]);
                let mut ctx = Context {
                    history: &self.history,
                    stdout: &mut *out,
                    stderr: &mut *err,
                    home: env::var_os("HOME").map(PathBuf::from),
                };
                let signal = builtin.invoke(tokens, &mut ctx);
                out.flush().ok();
                signal
            }
            None => {
                log::debug!("external command {:?}", tokens);
                out.flush().ok();
                launcher::launch(tokens, err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::ReaderSource;
    use std::io::Cursor;

    fn session() -> Session {
        Session::new(&Config::default())
    }

    fn drive(session: &mut Session, script: &str) -> (String, String) {
        let mut src = ReaderSource::new(Cursor::new(script.to_string()));
        let mut out = Vec::new();
        let mut err = Vec::new();
        session.run(&mut src, &mut out, &mut err).unwrap();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn exit_stops_the_loop() {
        let mut s = session();
        let (out, err) = drive(&mut s, "exit\nhelp\n");
        assert_eq!(out, format!("{}{}\n", crate::config::DEFAULT_PROMPT, FAREWELL));
        assert!(err.is_empty());
        assert_eq!(s.history().total_seen(), 1);
    }

    #[test]
    fn end_of_input_terminates_cleanly() {
        let mut s = session();
        let (out, _) = drive(&mut s, "");
        assert!(out.ends_with(&format!("\n{}\n", FAREWELL)));
        assert!(s.history().is_empty());
    }

    #[test]
    fn blank_and_unknown_lines_are_recorded() {
        let mut s = session();
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert_eq!(s.step("\n", &mut out, &mut err), ExitSignal::Continue);
        assert_eq!(s.step("   \t\n", &mut out, &mut err), ExitSignal::Continue);
        assert_eq!(
            s.step("mysh-no-such-program-here\n", &mut out, &mut err),
            ExitSignal::Continue
        );
        let texts: Vec<&str> = s.history().list(None).into_iter().map(|e| e.text()).collect();
        assert_eq!(texts, vec!["", "   \t", "mysh-no-such-program-here"]);
    }

    #[test]
    fn exit_with_arguments_terminates() {
        let mut s = session();
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert_eq!(s.step("exit now please\n", &mut out, &mut err), ExitSignal::Terminate);
    }

    #[test]
    fn history_includes_the_history_command_itself() {
        let mut s = session();
        let (out, _) = drive(&mut s, "help -a\nhelp -b\nhelp -c\nhelp -d\nhistory 2\nexit\n");
        assert!(out.contains("  4 help -d\n  5 history 2\n"));
        assert!(!out.contains("  3 help -c"));
    }

    #[test]
    fn history_after_overflow() {
        let mut s = session();
        let mut out = Vec::new();
        let mut err = Vec::new();
        for line in ["help -x\n", "help -y\n", "help -z\n", "help -w\n", "help -v\n", "help -u\n"] {
            s.step(line, &mut out, &mut err);
        }
        let numbers: Vec<usize> = s.history().list(None).into_iter().map(|e| e.number()).collect();
        assert_eq!(numbers, vec![2, 3, 4, 5, 6]);
    }

    #[test]
    fn builtin_errors_do_not_end_the_session() {
        let mut s = session();
        let (out, err) = drive(&mut s, "help nosuch\nhistory x\nhelp exit\nexit\n");
        assert!(err.contains("help: no help topics match 'nosuch'."));
        assert!(err.contains("history: x: numeric argument required"));
        assert!(out.contains("exit       : Exit the shell"));
        assert!(out.ends_with(&format!("{}\n", FAREWELL)));
    }

    #[test]
    fn invalid_utf8_line_does_not_end_the_session() {
        let mut s = session();
        let mut src = ReaderSource::new(Cursor::new(b"echo \xff\nhelp cd\nexit\n".to_vec()));
        let mut out = Vec::new();
        let mut err = Vec::new();
        s.run(&mut src, &mut out, &mut err).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert_eq!(s.history().total_seen(), 3);
        assert_eq!(s.history().list(None)[0].text(), "echo \u{FFFD}");
        assert!(out.contains("cd         : Change the working directory\n"));
        assert!(out.ends_with(&format!("{}\n", FAREWELL)));
    }

    #[test]
    fn dispatch_of_nothing_continues() {
        let mut s = session();
        let mut out = Vec::new();
        let mut err = Vec::new();
        assert_eq!(s.dispatch(&[], &mut out, &mut err), ExitSignal::Continue);
        assert!(out.is_empty() && err.is_empty());
    }

    #[test]
    fn configured_prompt_and_capacity() {
        let config = Config {
            prompt: "% ".to_string(),
            history_capacity: 2,
            interactive: false,
        };
        let mut s = Session::new(&config);
        let (out, _) = drive(&mut s, "help -a\nhelp -b\nhelp -c\n");
        assert!(out.starts_with("% % % % "));
        assert_eq!(s.history().len(), 2);
    }
}
