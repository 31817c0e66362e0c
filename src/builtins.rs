// builtins.rs

use std::env;
use std::io::Write;
use std::path::PathBuf;

use crate::error::{Result, ShellError};
use crate::history::HistoryRing;
use crate::util::writeln_ignore_broken_pipe;

/// What the session loop should do after a command has been dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitSignal {
    Continue,
    Terminate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Cd,
    Pwd,
    Exit,
    Help,
    History,
}

pub struct BuiltinDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub builtin: Builtin,
}

/// Registration order is the order `help` lists them in.
pub static BUILTINS: [BuiltinDescriptor; 5] = [
    BuiltinDescriptor {
        name: "cd",
        description: "Change the working directory",
        builtin: Builtin::Cd,
    },
    BuiltinDescriptor {
        name: "pwd",
        description: "Print the current working directory",
        builtin: Builtin::Pwd,
    },
    BuiltinDescriptor {
        name: "exit",
        description: "Exit the shell",
        builtin: Builtin::Exit,
    },
    BuiltinDescriptor {
        name: "help",
        description: "Show help for builtin commands",
        builtin: Builtin::Help,
    },
    BuiltinDescriptor {
        name: "history",
        description: "Show recently entered commands",
        builtin: Builtin::History,
    },
];

pub fn resolve(name: &str) -> Option<&'static BuiltinDescriptor> {
    BUILTINS.iter().find(|b| b.name == name)
}

pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().map(|b| b.name)
}

/// Everything a builtin may touch while it runs.
pub struct Context<'a> {
    pub history: &'a HistoryRing,
    pub stdout: &'a mut dyn Write,
    pub stderr: &'a mut dyn Write,
    /// Value of `HOME` at dispatch time.
    pub home: Option<PathBuf>,
}

impl Context<'_> {
    pub fn report(&mut self, err: &ShellError) {
        let _ = writeln_ignore_broken_pipe(&mut *self.stderr, err.to_string());
    }

    fn print<S: AsRef<str>>(&mut self, line: S) -> Result<()> {
        writeln_ignore_broken_pipe(&mut *self.stdout, line)?;
        Ok(())
    }
}

impl BuiltinDescriptor {
    /// Runs the builtin with the full token sequence (`args[0]` is the name).
    /// Failures are reported on the error stream and never end the session.
    pub fn invoke(&self, args: &[String], ctx: &mut Context<'_>) -> ExitSignal {
        let operands = args.get(1..).unwrap_or(&[]);
        let outcome = match self.builtin {
            Builtin::Cd => cd(operands, ctx),
            Builtin::Pwd => pwd(operands, ctx),
            Builtin::Exit => Ok(ExitSignal::Terminate),
            Builtin::Help => help(operands, ctx),
            Builtin::History => history(operands, ctx),
        };
        outcome.unwrap_or_else(|err| {
            log::debug!("{} failed: {:?}", self.name, err);
            ctx.report(&err);
            ExitSignal::Continue
        })
    }
}

fn is_option(arg: &str) -> bool {
    arg.starts_with('-')
}

fn cd(operands: &[String], ctx: &mut Context<'_>) -> Result<ExitSignal> {
    let target = match operands {
        [] => ctx.home.clone().ok_or(ShellError::HomeNotSet)?,
        [arg] if is_option(arg) => {
            return Err(ShellError::UnsupportedOption {
                command: "cd",
                option: arg.clone(),
            })
        }
        [arg] => PathBuf::from(arg),
        _ => return Err(ShellError::TooManyArguments { command: "cd" }),
    };
    env::set_current_dir(&target).map_err(|source| ShellError::ChangeDir {
        path: target.clone(),
        source,
    })?;
    Ok(ExitSignal::Continue)
}

// An option argument is reported and the directory is not printed.
fn pwd(operands: &[String], ctx: &mut Context<'_>) -> Result<ExitSignal> {
    if let Some(opt) = operands.iter().find(|a| is_option(a)) {
        return Err(ShellError::UnsupportedOption {
            command: "pwd",
            option: opt.clone(),
        });
    }
    let cwd = env::current_dir().map_err(ShellError::CurrentDir)?;
    ctx.print(cwd.display().to_string())?;
    Ok(ExitSignal::Continue)
}

fn help_line(b: &BuiltinDescriptor) -> String {
    format!("{:<10.10} : {}", b.name, b.description)
}

fn help(operands: &[String], ctx: &mut Context<'_>) -> Result<ExitSignal> {
    if operands.is_empty() {
        for b in BUILTINS.iter() {
            ctx.print(help_line(b))?;
        }
        return Ok(ExitSignal::Continue);
    }
    for topic in operands.iter().filter(|a| !is_option(a)) {
        let mut matched = false;
        for b in BUILTINS.iter().filter(|b| b.name.starts_with(topic.as_str())) {
            matched = true;
            ctx.print(help_line(b))?;
        }
        if !matched {
            ctx.report(&ShellError::NoHelpTopic(topic.clone()));
        }
    }
    Ok(ExitSignal::Continue)
}

fn history(operands: &[String], ctx: &mut Context<'_>) -> Result<ExitSignal> {
    let limit = match operands {
        [] => None,
        [arg] if is_option(arg) => {
            return Err(ShellError::UnsupportedOption {
                command: "history",
                option: arg.clone(),
            })
        }
        [arg] if !arg.is_empty() && arg.bytes().all(|b| b.is_ascii_digit()) => {
            // too large for usize still means "everything"
            Some(arg.parse::<usize>().unwrap_or(usize::MAX))
        }
        [arg] => {
            return Err(ShellError::NotANumber {
                command: "history",
                arg: arg.clone(),
            })
        }
        _ => return Err(ShellError::TooManyArguments { command: "history" }),
    };
    let lines: Vec<String> = ctx
        .history
        .list(limit)
        .into_iter()
        .map(|e| format!("{:>3} {}", e.number(), e.text()))
        .collect();
    for line in lines {
        ctx.print(line)?;
    }
    Ok(ExitSignal::Continue)
}
