use crate::animation::AnimatedActuator;
use crate::bearing::Bearing;
use crate::config::Config;
use crate::replay::ReplayActuator;
use serde::{Deserialize, Serialize};
use std::io::{self, stdout};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Creates the actuator selected in the configuration.
pub fn create_actuator(config: &Config) -> Box<dyn Actuator> {
    match config.actuator.kind {
        ActuatorKind::None => Box::new(NoOpActuator),
        ActuatorKind::Log => Box::new(TracingActuator),
        ActuatorKind::Replay => Box::new(ReplayActuator::new(
            config.actuator.replay_path.clone(),
            config.table.width,
            config.table.height,
        )),
        ActuatorKind::Animated => Box::new(AnimatedActuator::new(
            stdout(),
            config.table.width,
            config.table.height,
            config.animation.step_secs,
            Duration::from_millis(config.animation.frame_millis),
        )),
    }
}

/// The direction of a quarter turn.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Left,
    Right,
}

/// The available actuator implementations.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorKind {
    /// Accepts every notification and does nothing.
    #[default]
    None,
    /// Reports every notification as a log event.
    Log,
    /// Records every notification and saves them as a JSON replay.
    Replay,
    /// Animates the robot on a terminal rendering of the table.
    Animated,
}

impl FromStr for ActuatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(ActuatorKind::None),
            "log" => Ok(ActuatorKind::Log),
            "replay" => Ok(ActuatorKind::Replay),
            "animated" => Ok(ActuatorKind::Animated),
            _ => Err(format!(
                "unknown actuator {s:?}, expected one of none, log, replay, animated"
            )),
        }
    }
}

/// Reflects the robot's state changes outside of the controller.
///
/// The controller calls the notification methods after every successful state change and
/// never waits for their effect, so implementations must only schedule their work and
/// return. [`drain`](Actuator::drain) and [`save`](Actuator::save) are for the host.
pub trait Actuator: Send {
    #[allow(unused_variables)]
    fn set_position(&mut self, x: i32, y: i32) {}

    #[allow(unused_variables)]
    fn set_heading(&mut self, bearing: Bearing) {}

    fn step_forward(&mut self) {}

    #[allow(unused_variables)]
    fn quarter_turn(&mut self, turn: Turn) {}

    /// Blocks until every scheduled effect has played out.
    fn drain(&mut self) {}

    /// Persists whatever the actuator recorded.
    fn save(&self) -> io::Result<()> {
        Ok(())
    }
}

/// An actuator without any observable effect, for tests and headless runs.
pub struct NoOpActuator;
impl Actuator for NoOpActuator {}

/// Reports every notification as a `tracing` event.
pub struct TracingActuator;

impl Actuator for TracingActuator {
    fn set_position(&mut self, x: i32, y: i32) {
        info!(target: "table_robot::actuator", x, y, "set position");
    }

    fn set_heading(&mut self, bearing: Bearing) {
        info!(
            target: "table_robot::actuator",
            bearing = bearing.name(),
            heading = bearing.heading(),
            "set heading"
        );
    }

    fn step_forward(&mut self) {
        info!(target: "table_robot::actuator", "step forward");
    }

    fn quarter_turn(&mut self, turn: Turn) {
        info!(target: "table_robot::actuator", ?turn, "quarter turn");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[test]
    fn when_parsing_actuator_kinds_the_correct_kind_is_returned() {
        assert_eq!("none".parse::<ActuatorKind>(), Ok(ActuatorKind::None));
        assert_eq!("log".parse::<ActuatorKind>(), Ok(ActuatorKind::Log));
        assert_eq!("replay".parse::<ActuatorKind>(), Ok(ActuatorKind::Replay));
        assert_eq!("animated".parse::<ActuatorKind>(), Ok(ActuatorKind::Animated));
    }

    #[test]
    fn when_parsing_an_unknown_actuator_kind_an_error_is_returned() {
        assert!("3d".parse::<ActuatorKind>().is_err());
    }

    #[test]
    fn when_using_the_no_op_actuator_every_call_is_accepted() {
        let mut actuator = NoOpActuator;

        actuator.set_position(1, 1);
        actuator.set_heading(Bearing::North);
        actuator.step_forward();
        actuator.quarter_turn(Turn::Left);
        actuator.drain();

        assert!(actuator.save().is_ok());
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn when_using_the_tracing_actuator_every_call_is_logged() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_target(true)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut actuator = TracingActuator;
            actuator.set_position(2, 3);
            actuator.set_heading(Bearing::West);
            actuator.step_forward();
            actuator.quarter_turn(Turn::Right);
        });

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|line| line.contains("table_robot::actuator")));
        assert!(lines[0].contains("set position") && lines[0].contains("x=2 y=3"));
        assert!(lines[1].contains("set heading") && lines[1].contains("bearing=\"WEST\""));
        assert!(lines[2].contains("step forward"));
        assert!(lines[3].contains("quarter turn") && lines[3].contains("turn=Right"));
    }
}
