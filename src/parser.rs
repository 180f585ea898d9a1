use crate::lexer::Tokenizer;
use std::fmt;

/// Name of the single builtin. It is resolved before any operator scanning,
/// so `exit` followed by anything (including pipes) still terminates.
const EXIT_BUILTIN: &str = "exit";

/// Trailing token marking a background command.
const BACKGROUND_MARKER: &str = "&";

const PIPE: &str = "|";
const REDIRECT: &str = ">";

/// One classified input line, ready for execution.
///
/// Argument vectors borrow from the line they were parsed from and are
/// non-empty; the parser rejects every shape that would leave a command
/// without a program name.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandLine<'a> {
    /// A single command, optionally backgrounded.
    Plain { argv: Vec<&'a str>, background: bool },

    /// A single command whose standard output is rewired into the file at
    /// `target` (created or truncated), optionally backgrounded.
    Redirected {
        argv: Vec<&'a str>,
        target: &'a str,
        background: bool,
    },

    /// Commands connected standard-output-to-standard-input, left to right.
    /// Pipelines always run in the foreground.
    Pipeline(Vec<Vec<&'a str>>),

    /// The terminating builtin.
    Exit,
}

/// Malformed line shapes that are rejected outright instead of being passed
/// on to an executor.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The line contained no tokens at all.
    EmptyLine,
    /// `>` with no file name after it.
    MissingRedirectTarget,
    /// `>` with no command in front of it.
    MissingCommand,
    /// `|` and `>` on the same line.
    RedirectInPipeline,
    /// A `|`-separated segment with no tokens in it.
    EmptyPipelineStage,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            ParseError::EmptyLine => "empty command line",
            ParseError::MissingRedirectTarget => "missing file name after '>'",
            ParseError::MissingCommand => "missing command before '>'",
            ParseError::RedirectInPipeline => {
                "cannot combine '|' and '>' on one command line"
            }
            ParseError::EmptyPipelineStage => "empty command between '|'",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ParseError {}

/// Classify one input line (trailing newline already stripped).
///
/// The steps mirror how the line is executed: strip a trailing `&`, resolve
/// the `exit` builtin, then scan the whitespace tokens for a standalone `|`
/// (pipeline) or `>` (redirection); everything else is a plain command.
pub fn parse_line(line: &str) -> Result<CommandLine<'_>, ParseError> {
    let mut tokens: Vec<&str> = Tokenizer::whitespace(line).collect();
    if tokens.is_empty() {
        return Err(ParseError::EmptyLine);
    }

    let background = tokens.last().copied() == Some(BACKGROUND_MARKER);
    if background {
        tokens.pop();
        if tokens.is_empty() {
            return Err(ParseError::EmptyLine);
        }
    }

    if tokens[0] == EXIT_BUILTIN {
        return Ok(CommandLine::Exit);
    }

    if tokens.contains(&PIPE) {
        if tokens.contains(&REDIRECT) {
            return Err(ParseError::RedirectInPipeline);
        }
        // Re-split the original line on '|'; a stripped trailing '&' must
        // not end up inside the last stage.
        let body = if background {
            let trimmed = line.trim_end();
            trimmed.strip_suffix(BACKGROUND_MARKER).unwrap_or(trimmed)
        } else {
            line
        };
        return parse_pipeline(body);
    }

    if let Some(pos) = tokens.iter().position(|t| *t == REDIRECT) {
        if pos == 0 {
            return Err(ParseError::MissingCommand);
        }
        let target = *tokens
            .get(pos + 1)
            .ok_or(ParseError::MissingRedirectTarget)?;
        // Tokens beyond the target are ignored.
        tokens.truncate(pos);
        return Ok(CommandLine::Redirected {
            argv: tokens,
            target,
            background,
        });
    }

    Ok(CommandLine::Plain {
        argv: tokens,
        background,
    })
}

/// Split a pipeline body into stages, each whitespace-tokenized into its own
/// argument vector.
fn parse_pipeline(body: &str) -> Result<CommandLine<'_>, ParseError> {
    let mut stages = Vec::new();
    for segment in body.split('|') {
        let argv: Vec<&str> = Tokenizer::whitespace(segment).collect();
        if argv.is_empty() {
            return Err(ParseError::EmptyPipelineStage);
        }
        stages.push(argv);
    }
    Ok(CommandLine::Pipeline(stages))
}
