use anyhow::{Context, Result};
use argh::FromArgs;
use minish::{DEFAULT_PROMPT, Interpreter};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(FromArgs)]
/// A small interactive shell with parameter expansion, redirection and
/// background commands.
struct Args {
    #[argh(positional)]
    /// file to read commands from instead of the terminal.
    script: Option<PathBuf>,

    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    /// prompt shown before each interactive line.
    prompt: String,

    #[argh(switch, short = 'v')]
    /// log debug information to standard error.
    verbose: bool,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let default_filter = if args.verbose { "debug" } else { "off" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    #[cfg(unix)]
    minish::signal::install_handlers().context("cannot install signal handlers")?;

    let mut sh = Interpreter::default().with_prompt(args.prompt);
    match args.script {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("cannot open input file {}", path.display()))?;
            sh.run_script(BufReader::new(file))
        }
        None => sh.repl(),
    }
}
