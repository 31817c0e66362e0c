use std::io;

use anyhow::Context;
use env_logger::Env;
use mysh::input::{EditorSource, ReaderSource};
use mysh::{Config, Session};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().filter_or("MYSH_LOG", "warn")).init();

    let config = Config::from_env();
    log::debug!("starting with {:?}", config);
    let mut session = Session::new(&config);
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();

    let result = if config.interactive {
        let mut editor = EditorSource::new().context("failed to create line editor")?;
        session.run(&mut editor, &mut stdout, &mut stderr)
    } else {
        let mut reader = ReaderSource::new(io::stdin().lock());
        session.run(&mut reader, &mut stdout, &mut stderr)
    };
    result.context("reading input")?;
    Ok(())
}
