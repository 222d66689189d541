use clap::Parser;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use table_robot::{create_actuator, ActuatorKind, CommandProcessor, Config, Controller};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Simulates a toy robot on a tabletop, driven by commands read from stdin.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Configuration file; defaults are used when it does not exist.
    #[arg(short, long, value_name = "PATH", default_value = "table_robot.toml")]
    config: PathBuf,
    /// Width of the table, overriding the configuration.
    #[arg(long, value_name = "CELLS", requires = "height")]
    width: Option<i32>,
    /// Height of the table, overriding the configuration.
    #[arg(long, value_name = "CELLS", requires = "width")]
    height: Option<i32>,
    /// How state changes are reflected: none, log, replay or animated.
    #[arg(short, long, value_name = "KIND")]
    actuator: Option<ActuatorKind>,
    /// Where the replay is written when the replay actuator is used.
    #[arg(long, value_name = "PATH")]
    replay: Option<String>,
}

fn init_logging() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(d) = "table_robot=info".parse() {
        filter = filter.add_directive(d);
    }

    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();
    let args = CliArgs::parse();

    let mut config = Config::load(&args.config)?;
    if let (Some(width), Some(height)) = (args.width, args.height) {
        config.table.width = width;
        config.table.height = height;
    }
    if let Some(kind) = args.actuator {
        config.actuator.kind = kind;
    }
    if let Some(replay) = args.replay {
        config.actuator.replay_path = replay;
    }
    config.validate()?;

    let actuator = create_actuator(&config);
    let mut controller = Controller::new(config.table.width, config.table.height, actuator);
    let processor = CommandProcessor::new();

    let mut stdout = io::stdout();
    writeln!(stdout, "==== Robot Simulator ====")?;
    writeln!(stdout, "Commands: {}", processor.list_commands().join(", "))?;
    stdout.flush()?;

    processor.run(&mut controller, io::stdin().lock(), stdout)?;

    if let Err(e) = controller.actuator().save() {
        error!("Could not save the replay: {e}");
        return Err(e.into());
    }
    info!(report = %controller.report(), "simulation finished");

    Ok(())
}
