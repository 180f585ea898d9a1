use crate::parser::CommandLine;
use anyhow::{Context, Result};
use std::fs::File;
use std::process::{Child, ChildStdout, Command, Stdio};

/// Runs classified command lines and keeps hold of the children the shell
/// has not waited for yet.
///
/// There is no job table. A background child is pushed onto the list at
/// spawn time, reported once by pid, and only looked at again when
/// [`Executor::reap_background`] drains the list for the `exit` builtin.
#[derive(Default)]
pub struct Executor {
    background: Vec<Child>,
}

impl Executor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one classified line. Child exit statuses are discarded; a
    /// command that runs and fails is not an error at this level.
    pub fn run(&mut self, line: CommandLine<'_>) -> Result<()> {
        match line {
            CommandLine::Plain { argv, background } => {
                self.run_single(&argv, None, background)
            }
            CommandLine::Redirected {
                argv,
                target,
                background,
            } => {
                let file = File::create(target)
                    .with_context(|| format!("Cannot open file {target}"))?;
                self.run_single(&argv, Some(file), background)
            }
            CommandLine::Pipeline(stages) => self.run_pipeline(&stages),
            CommandLine::Exit => self.reap_background(),
        }
    }

    /// Spawn one command, with its standard output optionally replaced by an
    /// already-opened file.
    ///
    /// The file handle moves into the spawned child; the parent's copy is
    /// closed as soon as the `Command` goes out of scope, right after the
    /// spawn.
    fn run_single(
        &mut self,
        argv: &[&str],
        stdout: Option<File>,
        background: bool,
    ) -> Result<()> {
        let mut command = Command::new(argv[0]);
        command.args(&argv[1..]);
        if let Some(file) = stdout {
            command.stdout(Stdio::from(file));
        }
        let child = command
            .spawn()
            .with_context(|| format!("Cannot run this command {}", argv[0]))?;
        // The child holds its own copy of the file descriptor now.
        drop(command);
        self.finish(child, background)
    }

    /// Spawn every stage left to right, then wait once per stage.
    ///
    /// `input` carries the read end of the pipe behind the previous stage
    /// boundary. Moving it into the next command closes the parent's handle
    /// on spawn, and the matching write end only ever exists inside the
    /// producing child, so no stray descriptor can hold a pipe open once
    /// its two owners are done.
    ///
    /// A stage that fails to spawn abandons the rest of the pipeline.
    /// Stages spawned before the failure keep running unreaped; their pipe
    /// peers are gone, so they see end-of-stream or a broken pipe and
    /// unwind on their own.
    fn run_pipeline(&mut self, stages: &[Vec<&str>]) -> Result<()> {
        let mut children: Vec<Child> = Vec::with_capacity(stages.len());
        let mut input: Option<ChildStdout> = None;

        for (i, argv) in stages.iter().enumerate() {
            let last = i == stages.len() - 1;
            let mut command = Command::new(argv[0]);
            command.args(&argv[1..]);
            if let Some(source) = input.take() {
                command.stdin(Stdio::from(source));
            }
            if !last {
                command.stdout(Stdio::piped());
            }
            let mut child = command
                .spawn()
                .with_context(|| format!("Cannot run this command {}", argv[0]))?;
            if !last {
                input = child.stdout.take();
            }
            children.push(child);
        }

        // One wait per spawned stage. The children may terminate in any
        // order; all that matters is that every one of them is reaped
        // before the prompt comes back.
        for child in &mut children {
            child.wait().context("wait for pipeline stage")?;
        }
        Ok(())
    }

    fn finish(&mut self, mut child: Child, background: bool) -> Result<()> {
        if background {
            println!("[pid {}] runs as a background process", child.id());
            self.background.push(child);
        } else {
            child.wait().context("wait for foreground child")?;
        }
        Ok(())
    }

    /// Block until every outstanding background child has terminated.
    pub fn reap_background(&mut self) -> Result<()> {
        for mut child in self.background.drain(..) {
            child.wait().context("wait for background child")?;
        }
        Ok(())
    }

    /// Number of background children not yet reaped.
    pub fn outstanding(&self) -> usize {
        self.background.len()
    }
}

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn tmp_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pipesh_executor_{}_{}", std::process::id(), tag))
    }

    #[test]
    fn plain_foreground_command_runs_to_completion() {
        let mut exec = Executor::new();
        exec.run(CommandLine::Plain {
            argv: vec!["true"],
            background: false,
        })
        .unwrap();
        assert_eq!(exec.outstanding(), 0);
    }

    #[test]
    fn redirected_output_lands_in_the_target_file() {
        let path = tmp_path("redirect");
        let path_str = path.to_str().unwrap();

        let mut exec = Executor::new();
        exec.run(CommandLine::Redirected {
            argv: vec!["echo", "redirected"],
            target: path_str,
            background: false,
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "redirected\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn redirection_truncates_an_existing_file() {
        let path = tmp_path("truncate");
        fs::write(&path, "previous contents, long enough to notice").unwrap();
        let path_str = path.to_str().unwrap();

        let mut exec = Executor::new();
        exec.run(CommandLine::Redirected {
            argv: vec!["echo", "short"],
            target: path_str,
            background: false,
        })
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn pipeline_feeds_each_stage_into_the_next() {
        let path = tmp_path("pipeline");
        let path_str = path.to_str().unwrap();

        // `tee` writes what reached the final stage into the file, which is
        // the only stdout the test can observe.
        let mut exec = Executor::new();
        exec.run(CommandLine::Pipeline(vec![
            vec!["echo", "a b c"],
            vec!["tr", " ", "\n"],
            vec!["tee", path_str],
        ]))
        .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\nc\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn single_stage_pipeline_degenerates_to_a_plain_command() {
        let mut exec = Executor::new();
        exec.run(CommandLine::Pipeline(vec![vec!["true"]])).unwrap();
        assert_eq!(exec.outstanding(), 0);
    }

    #[test]
    fn background_child_is_deferred_until_reaped() {
        let mut exec = Executor::new();
        exec.run(CommandLine::Plain {
            argv: vec!["sleep", "0.2"],
            background: true,
        })
        .unwrap();
        assert_eq!(exec.outstanding(), 1);

        exec.reap_background().unwrap();
        assert_eq!(exec.outstanding(), 0);
    }

    #[test]
    fn spawn_failure_reports_the_command_name() {
        let mut exec = Executor::new();
        let err = exec
            .run(CommandLine::Plain {
                argv: vec!["pipesh-no-such-program"],
                background: false,
            })
            .unwrap_err();
        assert!(err.to_string().contains("pipesh-no-such-program"));
    }

    #[test]
    fn pipeline_spawn_failure_aborts_the_remaining_stages() {
        let mut exec = Executor::new();
        let err = exec
            .run(CommandLine::Pipeline(vec![
                vec!["echo", "hi"],
                vec!["pipesh-no-such-program"],
                vec!["wc"],
            ]))
            .unwrap_err();
        assert!(err.to_string().contains("pipesh-no-such-program"));
    }

    #[test]
    fn open_failure_aborts_before_any_spawn() {
        let mut exec = Executor::new();
        let err = exec
            .run(CommandLine::Redirected {
                argv: vec!["echo", "hi"],
                target: "/nonexistent-dir/out.txt",
                background: false,
            })
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent-dir/out.txt"));
        assert_eq!(exec.outstanding(), 0);
    }
}
