use anyhow::Result;
use argh::FromArgs;
use pipesh::{DEFAULT_PROMPT, Interpreter};

#[derive(FromArgs)]
/// A line-oriented command interpreter with pipes (`|`), output redirection
/// (`>`), and background execution (`&`).
struct Options {
    /// run a single command line and exit instead of reading interactively
    #[argh(option, short = 'c')]
    command: Option<String>,

    /// prompt text printed before each input line
    #[argh(option, default = "DEFAULT_PROMPT.to_string()")]
    prompt: String,
}

fn main() -> Result<()> {
    let options: Options = argh::from_env();
    let mut shell = Interpreter::new(options.prompt);

    match options.command {
        Some(line) => {
            if let Err(err) = shell.execute_line(&line) {
                eprintln!("{err}");
            }
            // One-shot mode still owns whatever it backgrounded.
            shell.reap_background()?;
        }
        None => shell.repl()?,
    }

    Ok(())
}
