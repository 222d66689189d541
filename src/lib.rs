//! # table_robot
//!
//! A toy robot moving on a square tabletop.
//! The robot can be placed, moved one cell forward and rotated, but it is never allowed to fall
//! off the table or to teeter on its edge.

pub mod actuator;
pub use actuator::create_actuator;
pub use actuator::Actuator;
pub use actuator::ActuatorKind;
pub use actuator::NoOpActuator;
pub use actuator::TracingActuator;
pub use actuator::Turn;

pub mod animation;
pub use animation::AnimatedActuator;

pub mod bearing;
pub use bearing::Bearing;

pub mod command;
pub use command::Command;
pub use command::CommandProcessor;
pub use command::Response;

pub mod config;
pub use config::Config;

pub mod controller;
pub use controller::AgentState;
pub use controller::Controller;
pub use controller::Notice;
pub use controller::NoticeLevel;
pub use controller::Outcome;

pub mod error;
pub use error::CommandError;
pub use error::ConfigError;
pub use error::PlacementError;

pub mod replay;
pub use replay::ReplayActuator;
