use argh::FromArgs;
use simple_shell::Interpreter;
use simple_shell::config::ShellConfig;
use simple_shell::env::Environment;
use simple_shell::input::LineSource;
use simple_shell::io_adapters::Output;
use simple_shell::session::Session;
use std::io::IsTerminal;
use std::path::Path;

#[derive(FromArgs)]
/// Line-oriented command interpreter. Reads commands from SCRIPT when given,
/// otherwise from standard input, interactively when it is a terminal.
struct Args {
    #[argh(positional)]
    /// file to run commands from
    script: Option<String>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "simple_shell".to_string());

    let mut interactive = false;
    let source = match &args.script {
        Some(script) => match LineSource::script(Path::new(script)) {
            Ok(source) => source,
            Err(e) => {
                eprintln!("{program}: 0: {e}");
                std::process::exit(e.status());
            }
        },
        None if std::io::stdin().is_terminal() => match LineSource::terminal() {
            Ok(source) => {
                interactive = true;
                source
            }
            Err(e) => {
                log::warn!("line editing unavailable, reading plain standard input: {e}");
                interactive = true;
                LineSource::stdin()
            }
        },
        None => LineSource::stdin(),
    };

    let mut session = Session::new(program, ShellConfig::default(), Environment::from_process());
    session.interactive = interactive;
    let status = Interpreter::new(session, source, Output::stdio()).run();
    std::process::exit(status);
}
