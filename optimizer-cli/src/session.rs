//! Interactive line-oriented session over the wizard.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use optimizer_core::notifications::RecordingSink;
use optimizer_core::wizard::steps::field_spec;
use optimizer_core::{
    DocumentRef, FieldError, FieldName, TaxBackend, WizardController, WizardError, WizardState,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::logging;
use crate::render::{render_notification, render_state};

pub const HELP: &str = "\
Commands:
  next, n                 validate this step and move forward
  back, b                 return to the previous step
  submit                  validate the last step and calculate
  reset                   start a new calculation from the results view
  upload <path>           send a document for processing (first step only)
  set <field> <value>     change a field, e.g. `set annual_income 85000`
  show                    print the current step again
  log <filter>            change the log filter, e.g. `log debug`
  help                    print this list
  quit, q                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Back,
    Submit,
    Reset,
    Upload(PathBuf),
    Set { field: FieldName, value: String },
    Show,
    Log(String),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type `help` for a list")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// Parses one input line. An empty line re-displays the current step.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()));

    match word.to_ascii_lowercase().as_str() {
        "" | "show" => Ok(Command::Show),
        "next" | "n" => Ok(Command::Next),
        "back" | "b" | "previous" => Ok(Command::Back),
        "submit" | "calculate" => Ok(Command::Submit),
        "reset" | "new" => Ok(Command::Reset),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "upload" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "upload",
                    argument: "a file path",
                });
            }
            Ok(Command::Upload(PathBuf::from(rest)))
        }
        "log" => {
            if rest.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "log",
                    argument: "a level or filter",
                });
            }
            Ok(Command::Log(rest.to_string()))
        }
        "set" => {
            let (name, value) = rest
                .split_once(char::is_whitespace)
                .map_or((rest, ""), |(name, value)| (name, value.trim()));
            if name.is_empty() {
                return Err(CommandError::MissingArgument {
                    command: "set",
                    argument: "a field name",
                });
            }
            Ok(Command::Set {
                field: FieldName::parse(name)?,
                value: value.to_string(),
            })
        }
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Reads commands from `input` and writes everything the user sees to
/// `output`. Logs never go to `output`.
pub struct Session<R, W> {
    wizard: WizardController,
    notifications: Arc<RecordingSink>,
    input: R,
    output: W,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(
        backend: Arc<dyn TaxBackend>,
        upload_limit_bytes: u64,
        input: R,
        output: W,
    ) -> Self {
        let notifications = Arc::new(RecordingSink::new());
        let wizard = WizardController::with_state(
            WizardState::with_upload_limit(upload_limit_bytes),
            backend,
            notifications.clone(),
        );
        Self {
            wizard,
            notifications,
            input,
            output,
        }
    }

    pub fn state(&self) -> &WizardState {
        self.wizard.state()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until `quit` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        info!(backend = self.wizard.backend_name(), "session started");
        writeln!(self.output, "Tax Return Optimizer (type `help` for commands)")?;
        self.show()?;

        let mut line = String::new();
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            let read = self
                .input
                .read_line(&mut line)
                .await
                .context("Failed to read command")?;
            if read == 0 {
                debug!("input closed");
                break;
            }

            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await?,
                Err(error) => writeln!(self.output, "[error] {error}")?,
            }
        }

        info!("session finished");
        Ok(())
    }

    async fn execute(
        &mut self,
        command: Command,
    ) -> Result<()> {
        debug!(?command, "executing");

        match command {
            Command::Show => return self.show(),
            Command::Help => {
                let fields: Vec<&str> = FieldName::all().iter().map(FieldName::as_str).collect();
                writeln!(self.output, "{HELP}")?;
                writeln!(self.output, "Fields: {}", fields.join(", "))?;
                return Ok(());
            }
            Command::Log(filter) => {
                match logging::set_log_level(&filter) {
                    Ok(()) => writeln!(self.output, "log filter set to '{filter}'")?,
                    Err(error) => writeln!(self.output, "[error] {error}")?,
                }
                return Ok(());
            }
            Command::Set { field, value } => {
                let outcome = self.wizard.edit_field(field, value).await;
                self.report(outcome)?;
                let label = field_spec(field).map_or(field.as_str(), |spec| spec.label);
                let current = self.wizard.state().input.display_value(field);
                writeln!(self.output, "  {label} = {current}")?;
                return Ok(());
            }
            Command::Quit => return Ok(()),
            Command::Next => {
                let outcome = self.wizard.next().await;
                self.report(outcome)?;
            }
            Command::Back => {
                let outcome = self.wizard.previous().await;
                self.report(outcome)?;
            }
            Command::Submit => {
                writeln!(self.output, "Calculating...")?;
                let outcome = self.wizard.submit().await;
                self.report(outcome)?;
            }
            Command::Reset => {
                let outcome = self.wizard.reset().await;
                self.report(outcome)?;
            }
            Command::Upload(path) => match document_for(&path).await {
                Ok(document) => {
                    writeln!(self.output, "Processing {}...", document.name)?;
                    let outcome = self.wizard.select_file(document).await;
                    self.report(outcome)?;
                }
                Err(error) => {
                    writeln!(self.output, "[error] {error:#}")?;
                    return Ok(());
                }
            },
        }

        self.show()
    }

    fn show(&mut self) -> Result<()> {
        write!(self.output, "{}", render_state(self.wizard.state()))?;
        if self.wizard.state().is_showing_results() {
            writeln!(self.output, "Type `reset` to start a new calculation.")?;
        }
        Ok(())
    }

    /// Prints queued notifications, then the rejection if there was one.
    /// Oversized files are already announced through a notification.
    fn report(
        &mut self,
        outcome: Result<(), WizardError>,
    ) -> Result<()> {
        for notification in self.notifications.take() {
            writeln!(self.output, "{}", render_notification(&notification))?;
        }

        match outcome {
            Ok(()) | Err(WizardError::OversizedFile { .. }) => {}
            Err(error) => writeln!(self.output, "[error] {error}")?,
        }
        Ok(())
    }
}

async fn document_for(path: &Path) -> Result<DocumentRef> {
    let metadata = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    if !metadata.is_file() {
        anyhow::bail!("{} is not a file", path.display());
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(DocumentRef::new(name, metadata.len()))
}
