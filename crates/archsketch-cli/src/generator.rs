//! Text generators available from the command line.
//!
//! - [`ReplayGenerator`] streams a recorded model response from a file.
//! - [`CommandGenerator`] runs an external program and streams its stdout.
//!
//! Both yield one fragment per line, line endings included, so the
//! accumulated response is byte-for-byte the source text.

use std::{
    env,
    fs::File,
    io::{self, BufRead, BufReader, Write},
    iter,
    path::PathBuf,
    process::{Child, Command, Stdio},
    thread::{self, JoinHandle},
};

use log::{debug, info, warn};

use archsketch::{FragmentStream, GenerationError, GenerationRequest, Generator};

use crate::config::{ConfigError, GeneratorConfig};

/// Environment variable carrying the requested model to the generator command.
pub const MODEL_ENV: &str = "ARCHSKETCH_MODEL";

/// Environment variable carrying the model provider to the generator command.
pub const PROVIDER_ENV: &str = "ARCHSKETCH_PROVIDER";

/// Stream the lines of `reader` as fragments.
fn line_fragments<'a, R>(mut reader: R) -> impl Iterator<Item = Result<String, GenerationError>> + 'a
where
    R: BufRead + 'a,
{
    iter::from_fn(move || {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(Ok(line)),
            Err(err) => Some(Err(GenerationError::Io(err))),
        }
    })
}

/// Replays a recorded model response.
#[derive(Debug, Clone)]
pub struct ReplayGenerator {
    path: PathBuf,
}

impl ReplayGenerator {
    /// Creates a generator replaying the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Generator for ReplayGenerator {
    fn generate(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream<'_>, GenerationError> {
        info!(
            path = self.path.display().to_string(),
            provider = request.provider(),
            model = request.model();
            "Replaying recorded response"
        );
        let file = File::open(&self.path).map_err(|err| {
            GenerationError::Start(format!("cannot open {}: {err}", self.path.display()))
        })?;

        Ok(Box::new(line_fragments(BufReader::new(file))))
    }
}

/// Runs an external program per request.
///
/// The requirements are written to the program's stdin from a separate
/// thread while stdout is read, so large prompts cannot deadlock against a
/// program that streams as it reads. Each stdout line is a fragment. A
/// non-zero exit status or a failed stdin write is reported as a stream
/// failure once stdout is exhausted.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: String,
    args: Vec<String>,
}

impl CommandGenerator {
    /// Creates a generator from the `[generator]` configuration section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no command is configured or a required
    /// environment variable is unset or empty.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        let program = config.command().ok_or_else(|| {
            ConfigError::Validation(
                "no generator command configured; set [generator] command or pass --replay"
                    .to_string(),
            )
        })?;

        let missing: Vec<String> = config
            .required_env()
            .iter()
            .filter(|name| env::var_os(name).is_none_or(|value| value.is_empty()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::MissingEnv(missing));
        }

        Ok(Self {
            program: program.to_string(),
            args: config.args().to_vec(),
        })
    }
}

impl Generator for CommandGenerator {
    fn generate(
        &mut self,
        request: &GenerationRequest,
    ) -> Result<FragmentStream<'_>, GenerationError> {
        info!(
            program = self.program.as_str(),
            provider = request.provider(),
            model = request.model();
            "Starting generator command"
        );

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env(PROVIDER_ENV, request.provider())
            .env(MODEL_ENV, request.model())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|err| GenerationError::Start(format!("{}: {err}", self.program)))?;

        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let mut guard = ChildGuard::new(self.program.clone(), child);

        let stdout = stdout.ok_or_else(|| {
            GenerationError::Start(format!("{}: stdout not captured", self.program))
        })?;

        if let Some(mut stdin) = stdin {
            let requirements = request.requirements().to_string();
            guard.writer = Some(thread::spawn(move || {
                match stdin.write_all(requirements.as_bytes()) {
                    Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
                        debug!("Generator command closed stdin early");
                        Ok(())
                    }
                    result => result,
                }
            }));
        }

        let exit_status = iter::once_with(move || guard.finish()).flatten();

        Ok(Box::new(
            line_fragments(BufReader::new(stdout)).chain(exit_status),
        ))
    }
}

/// Owns a spawned generator process until it has been reaped.
///
/// Dropping the guard before [`ChildGuard::finish`] kills the process and
/// waits for it, so an abandoned stream leaves no zombie behind.
struct ChildGuard {
    program: String,
    child: Option<Child>,
    writer: Option<JoinHandle<io::Result<()>>>,
}

impl ChildGuard {
    fn new(program: String, child: Child) -> Self {
        Self {
            program,
            child: Some(child),
            writer: None,
        }
    }

    /// Wait for the process and the stdin writer.
    ///
    /// Returns `None` on success, otherwise the failure as a stream item.
    fn finish(&mut self) -> Option<Result<String, GenerationError>> {
        let mut child = self.child.take()?;
        let status = match child.wait() {
            Ok(status) => status,
            Err(err) => return Some(Err(GenerationError::Io(err))),
        };

        if let Some(writer) = self.writer.take() {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => return Some(Err(GenerationError::Io(err))),
                Err(_) => {
                    return Some(Err(GenerationError::Stream(format!(
                        "{}: stdin writer panicked",
                        self.program
                    ))));
                }
            }
        }

        if status.success() {
            None
        } else {
            Some(Err(GenerationError::Stream(format!(
                "{} exited with {status}",
                self.program
            ))))
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };

        debug!(program = self.program.as_str(); "Stopping abandoned generator command");
        if let Err(err) = child.kill() {
            debug!(err:% = err; "Generator command already exited");
        }
        if let Err(err) = child.wait() {
            warn!(program = self.program.as_str(), err:% = err; "Failed to reap generator command");
        }
    }
}
