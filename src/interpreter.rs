use crate::executor::Executor;
use crate::parser::{self, CommandLine};
use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

/// Prompt printed before each input line unless overridden.
pub const DEFAULT_PROMPT: &str = "pipesh> ";

/// The read-parse-execute loop.
///
/// Reads lines through `rustyline`, classifies each with [`parser::parse_line`]
/// and hands it to the [`Executor`]. No command failure is fatal to the loop;
/// only the `exit` builtin and end-of-input stop it.
///
/// Example
/// ```no_run
/// use pipesh::Interpreter;
/// let mut sh = Interpreter::default();
/// sh.execute_line("echo hello | wc -c").unwrap();
/// ```
pub struct Interpreter {
    prompt: String,
    executor: Executor,
    should_exit: bool,
}

impl Interpreter {
    /// Create an interpreter with a custom prompt.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            executor: Executor::new(),
            should_exit: false,
        }
    }

    /// Parse and execute one input line.
    ///
    /// The `exit` builtin drains all outstanding background children and
    /// raises the [`Interpreter::should_exit`] flag instead of terminating
    /// the process itself, so the caller decides how to stop.
    pub fn execute_line(&mut self, line: &str) -> Result<()> {
        let command = parser::parse_line(line)?;
        let exiting = matches!(command, CommandLine::Exit);
        self.executor.run(command)?;
        if exiting {
            self.should_exit = true;
        }
        Ok(())
    }

    /// Whether a previously executed line asked the shell to terminate.
    pub fn should_exit(&self) -> bool {
        self.should_exit
    }

    /// Block until every outstanding background child has terminated.
    pub fn reap_background(&mut self) -> Result<()> {
        self.executor.reap_background()
    }

    /// Number of background children not yet reaped.
    pub fn outstanding_background(&self) -> usize {
        self.executor.outstanding()
    }

    /// Run the interactive loop until `exit` or end-of-input.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;

        loop {
            match rl.readline(&self.prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        // Blank input just reprints the prompt.
                        continue;
                    }
                    rl.add_history_entry(line.as_str())?;
                    if let Err(err) = self.execute_line(&line) {
                        eprintln!("{err}");
                    }
                    if self.should_exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl-C abandons the current line, not the shell.
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(DEFAULT_PROMPT)
    }
}
