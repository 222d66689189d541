use crate::controller::{Controller, NoticeLevel, Outcome};
use crate::error::{CommandError, PlacementError};
use regex::Regex;
use std::io::{self, BufRead, Write};
use tracing::{debug, error, info, warn};

/// A parsed line of input.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// `PLACE X,Y,F`. The arguments are kept as text and validated by the controller.
    Place { x: String, y: String, facing: String },
    Move,
    Left,
    Right,
    Report,
    Exit,
    Unknown(String),
}

/// What executing a command produced.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Response {
    Outcome(Outcome),
    Report(String),
    Exit,
    Unknown(String),
}

/// Reads text commands and applies them to a [`Controller`].
pub struct CommandProcessor {
    line: Regex,
}

impl Default for CommandProcessor {
    fn default() -> Self {
        CommandProcessor::new()
    }
}

impl CommandProcessor {
    const COMMANDS: [&'static str; 6] = ["`PLACE X,Y,F`", "MOVE", "LEFT", "RIGHT", "REPORT", "EXIT"];

    pub fn new() -> CommandProcessor {
        CommandProcessor {
            line: Regex::new(r"^(\S+)(?:\s+(.*))?$").expect("command pattern is valid"),
        }
    }

    /// The commands understood by the processor, in display form.
    pub fn list_commands(&self) -> Vec<&'static str> {
        Self::COMMANDS.to_vec()
    }

    /// Parses a single line of input.
    ///
    /// The first word names the command and the second word holds its arguments. Anything
    /// after that is ignored. Command names are case sensitive.
    pub fn parse(&self, input: &str) -> Result<Command, CommandError> {
        let input = input.trim();
        let Some(captures) = self.line.captures(input) else {
            return Ok(Command::Unknown(input.to_string()));
        };

        let name = captures.get(1).map_or("", |m| m.as_str());
        let args = captures
            .get(2)
            .and_then(|m| m.as_str().split_whitespace().next());

        let command = match name {
            "PLACE" => {
                let Some(args) = args else {
                    return Err(CommandError::MissingArguments);
                };
                let mut parts = args.split(',').map(str::trim);
                Command::Place {
                    x: parts.next().unwrap_or_default().to_string(),
                    y: parts.next().unwrap_or_default().to_string(),
                    facing: parts.next().unwrap_or_default().to_string(),
                }
            }
            "MOVE" => Command::Move,
            "LEFT" => Command::Left,
            "RIGHT" => Command::Right,
            "REPORT" => Command::Report,
            "EXIT" => Command::Exit,
            _ => Command::Unknown(input.to_string()),
        };

        Ok(command)
    }

    /// Applies a command to the controller.
    pub fn execute(
        &self,
        command: Command,
        controller: &mut Controller,
    ) -> Result<Response, CommandError> {
        let response = match command {
            Command::Place { x, y, facing } => {
                let (Some(x_value), Some(y_value)) = (coordinate(&x), coordinate(&y)) else {
                    return Err(CommandError::InvalidCoordinates { x, y });
                };
                controller.place(x_value, y_value, &facing)?;
                Response::Outcome(Outcome::Applied)
            }
            Command::Move => Response::Outcome(controller.move_forward()),
            Command::Left => Response::Outcome(controller.rotate_left()),
            Command::Right => Response::Outcome(controller.rotate_right()),
            Command::Report => Response::Report(controller.report()),
            Command::Exit => Response::Exit,
            Command::Unknown(input) => Response::Unknown(input),
        };

        Ok(response)
    }

    /// Parses and executes a single line of input.
    pub fn process(&self, input: &str, controller: &mut Controller) -> Result<Response, CommandError> {
        let command = self.parse(input)?;
        debug!(?command, "processing command");
        self.execute(command, controller)
    }

    /// Processes commands line by line until the input ends or `EXIT` is read.
    ///
    /// Reports are written to `output` as `Output: <report>`. Failed commands are logged and
    /// skipped, so the remaining lines still run.
    pub fn run<R: BufRead, W: Write>(
        &self,
        controller: &mut Controller,
        input: R,
        mut output: W,
    ) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match self.process(&line, controller) {
                Ok(Response::Outcome(outcome)) => {
                    if let Some(notice) = outcome.notice() {
                        match notice.level {
                            NoticeLevel::Info => info!("{}", notice.message),
                            NoticeLevel::Warn => warn!("{}", notice.message),
                        }
                    }
                }
                Ok(Response::Report(report)) => {
                    writeln!(output, "Output: {report}")?;
                    output.flush()?;
                }
                Ok(Response::Exit) => break,
                Ok(Response::Unknown(input)) => warn!("Invalid command: {input}"),
                Err(e) => error!("{e}"),
            }

            controller.actuator_mut().drain();
        }

        Ok(())
    }
}

// Whole numbers written as decimals (`1.0`) are accepted too.
fn coordinate(text: &str) -> Option<i32> {
    text.parse::<i32>().ok().or_else(|| {
        let value = text.parse::<f64>().ok()?;
        (value.fract() == 0.0 && value >= i32::MIN as f64 && value <= i32::MAX as f64)
            .then_some(value as i32)
    })
}
