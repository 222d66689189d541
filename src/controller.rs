use crate::actuator::{Actuator, Turn};
use crate::bearing::Bearing;
use crate::error::PlacementError;

/// Returned by [`Controller::report`] while the robot has not been placed.
pub const NOT_PLACED: &str = "Robot has not been placed";

/// Notice attached to a move that would take the robot off the table.
pub const WOULD_FALL: &str = "Robot would fall off the table";

/// The state of the robot.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AgentState {
    /// The robot is not on the table yet.
    #[default]
    Unplaced,
    /// The robot is on the table, always strictly inside its edges.
    Placed { x: i32, y: i32, bearing: Bearing },
}

/// How serious a [`Notice`] is.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum NoticeLevel {
    Info,
    Warn,
}

/// A human readable explanation of why a command had no effect.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: &'static str,
}

/// The result of a move or a rotation.
///
/// Neither of the rejected outcomes is an error: a sequence of commands keeps going after them.
#[must_use]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The state changed and the actuator was notified.
    Applied,
    /// Nothing happened because the robot has not been placed.
    NotPlaced,
    /// Nothing happened because the robot would have left the open interior of the table.
    Blocked,
}

impl Outcome {
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Outcome::Applied => None,
            Outcome::NotPlaced => Some(Notice {
                level: NoticeLevel::Info,
                message: NOT_PLACED,
            }),
            Outcome::Blocked => Some(Notice {
                level: NoticeLevel::Warn,
                message: WOULD_FALL,
            }),
        }
    }
}

/// Places, moves and rotates the robot on the table.
///
/// The robot is never allowed to move off the table or to teeter on its edge: while placed,
/// `0 < x < width` and `0 < y < height` always hold.
pub struct Controller {
    width: i32,
    height: i32,
    state: AgentState,
    actuator: Box<dyn Actuator>,
}

impl Controller {
    /// Creates a new controller with an unplaced robot.
    ///
    /// # Arguments
    /// * `width` - The width of the table.
    /// * `height` - The height of the table.
    /// * `actuator` - Reflects every state change outside the controller.
    ///
    /// # Panics
    /// If `width` or `height` is not positive.
    pub fn new(width: i32, height: i32, actuator: Box<dyn Actuator>) -> Controller {
        assert!(
            width > 0 && height > 0,
            "Table dimensions must be positive, got {width}x{height}"
        );

        Controller {
            width,
            height,
            state: AgentState::Unplaced,
            actuator,
        }
    }

    /// Places the robot, replacing any previous placement.
    ///
    /// The position is validated before the facing.
    ///
    /// # Arguments
    /// * `x` - The column, strictly between `0` and the width.
    /// * `y` - The row, strictly between `0` and the height.
    /// * `facing` - One of `NORTH`, `EAST`, `SOUTH` or `WEST`.
    pub fn place(&mut self, x: i32, y: i32, facing: &str) -> Result<(), PlacementError> {
        self.check_position(x, y)?;
        let bearing = facing
            .parse::<Bearing>()
            .map_err(|unknown| PlacementError::InvalidFacing(unknown.0))?;
        self.place_bearing(x, y, bearing)
    }

    /// Places the robot with an already validated bearing.
    pub fn place_bearing(&mut self, x: i32, y: i32, bearing: Bearing) -> Result<(), PlacementError> {
        self.check_position(x, y)?;

        self.state = AgentState::Placed { x, y, bearing };
        self.actuator.set_position(x, y);
        self.actuator.set_heading(bearing);
        Ok(())
    }

    /// Moves the robot one cell in the direction it is facing.
    pub fn move_forward(&mut self) -> Outcome {
        let AgentState::Placed { x, y, bearing } = self.state else {
            return Outcome::NotPlaced;
        };

        let (dx, dy) = bearing.displacement();
        let (x, y) = (x + dx, y + dy);

        if !self.is_valid_placement(x, y) {
            return Outcome::Blocked;
        }

        self.state = AgentState::Placed { x, y, bearing };
        self.actuator.step_forward();
        Outcome::Applied
    }

    /// Rotates the robot a quarter turn counter-clockwise.
    pub fn rotate_left(&mut self) -> Outcome {
        self.rotate(Turn::Left)
    }

    /// Rotates the robot a quarter turn clockwise.
    pub fn rotate_right(&mut self) -> Outcome {
        self.rotate(Turn::Right)
    }

    /// Describes the robot as `x,y,FACING`, or [`NOT_PLACED`] if it is not on the table.
    pub fn report(&self) -> String {
        match self.state {
            AgentState::Unplaced => NOT_PLACED.to_string(),
            AgentState::Placed { x, y, bearing } => format!("{x},{y},{bearing}"),
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn actuator(&self) -> &dyn Actuator {
        self.actuator.as_ref()
    }

    pub fn actuator_mut(&mut self) -> &mut dyn Actuator {
        self.actuator.as_mut()
    }

    fn rotate(&mut self, turn: Turn) -> Outcome {
        let AgentState::Placed { x, y, bearing } = self.state else {
            return Outcome::NotPlaced;
        };

        let bearing = match turn {
            Turn::Left => bearing.left(),
            Turn::Right => bearing.right(),
        };

        self.state = AgentState::Placed { x, y, bearing };
        self.actuator.quarter_turn(turn);
        Outcome::Applied
    }

    fn check_position(&self, x: i32, y: i32) -> Result<(), PlacementError> {
        if self.is_valid_placement(x, y) {
            Ok(())
        } else {
            Err(PlacementError::InvalidPosition { x, y })
        }
    }

    fn is_valid_placement(&self, x: i32, y: i32) -> bool {
        x > 0 && x < self.width && y > 0 && y < self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::NoOpActuator;
    use proptest::prelude::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Debug, PartialEq)]
    enum Call {
        SetPosition(i32, i32),
        SetHeading(Bearing),
        StepForward,
        QuarterTurn(Turn),
    }

    #[derive(Clone, Default)]
    struct RecordingActuator {
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl RecordingActuator {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Actuator for RecordingActuator {
        fn set_position(&mut self, x: i32, y: i32) {
            self.calls.lock().unwrap().push(Call::SetPosition(x, y));
        }

        fn set_heading(&mut self, bearing: Bearing) {
            self.calls.lock().unwrap().push(Call::SetHeading(bearing));
        }

        fn step_forward(&mut self) {
            self.calls.lock().unwrap().push(Call::StepForward);
        }

        fn quarter_turn(&mut self, turn: Turn) {
            self.calls.lock().unwrap().push(Call::QuarterTurn(turn));
        }
    }

    fn controller() -> Controller {
        Controller::new(5, 5, Box::new(NoOpActuator))
    }

    fn recorded() -> (Controller, RecordingActuator) {
        let actuator = RecordingActuator::default();
        (Controller::new(5, 5, Box::new(actuator.clone())), actuator)
    }

    #[test]
    fn when_the_robot_has_not_been_placed_the_report_says_so() {
        let controller = controller();

        assert_eq!(controller.report(), "Robot has not been placed");
        assert_eq!(controller.state(), AgentState::Unplaced);
    }

    #[test]
    fn when_placing_the_robot_the_report_shows_its_position_and_facing() {
        let mut controller = controller();

        controller.place(2, 2, "NORTH").unwrap();

        assert_eq!(controller.report(), "2,2,NORTH");
    }

    #[test]
    fn when_reporting_multiple_times_the_report_follows_the_robot() {
        let mut controller = controller();
        controller.place(2, 2, "NORTH").unwrap();

        let first = controller.report();
        let _ = controller.move_forward();
        let _ = controller.rotate_right();
        let _ = controller.move_forward();
        let second = controller.report();

        assert_eq!(first, "2,2,NORTH");
        assert_eq!(second, "3,3,EAST");
    }

    #[test]
    fn when_placing_the_robot_outside_the_open_interior_an_invalid_position_error_is_returned() {
        let mut controller = controller();
        let invalid = [
            (-1, 1),
            (6, 1),
            (1, -1),
            (1, 6),
            (1, 0),
            (0, 1),
            (1, 5),
            (5, 1),
            (0, 0),
            (5, 5),
        ];

        for (x, y) in invalid {
            assert_eq!(
                controller.place(x, y, "NORTH"),
                Err(PlacementError::InvalidPosition { x, y })
            );
        }
        assert_eq!(controller.state(), AgentState::Unplaced);
    }

    #[test]
    fn when_placing_the_robot_with_an_invalid_facing_an_invalid_facing_error_is_returned() {
        let mut controller = controller();

        for facing in ["NORT", "SOUT", "EASTT", "WESTT"] {
            assert_eq!(
                controller.place(1, 1, facing),
                Err(PlacementError::InvalidFacing(facing.to_string()))
            );
        }
        assert_eq!(controller.state(), AgentState::Unplaced);
    }

    #[test]
    fn when_both_position_and_facing_are_invalid_the_position_error_wins() {
        let mut controller = controller();

        assert_eq!(
            controller.place(0, 0, "UP"),
            Err(PlacementError::InvalidPosition { x: 0, y: 0 })
        );
    }

    #[test]
    fn when_an_invalid_placement_follows_a_valid_one_the_previous_state_is_kept() {
        let (mut controller, actuator) = recorded();
        controller.place(3, 3, "WEST").unwrap();

        assert!(controller.place(9, 9, "NORTH").is_err());
        assert!(controller.place(2, 2, "UP").is_err());

        assert_eq!(controller.report(), "3,3,WEST");
        assert_eq!(actuator.calls().len(), 2);
    }

    #[test]
    fn when_placing_the_robot_the_actuator_receives_position_then_heading() {
        let (mut controller, actuator) = recorded();

        controller.place(1, 3, "SOUTH").unwrap();

        assert_eq!(
            actuator.calls(),
            vec![Call::SetPosition(1, 3), Call::SetHeading(Bearing::South)]
        );
    }

    #[test]
    fn when_placing_the_robot_again_the_previous_placement_is_replaced() {
        let mut controller = controller();
        controller.place(1, 1, "NORTH").unwrap();

        controller.place_bearing(3, 2, Bearing::West).unwrap();

        assert_eq!(
            controller.state(),
            AgentState::Placed {
                x: 3,
                y: 2,
                bearing: Bearing::West
            }
        );
    }

    #[test]
    fn when_moving_the_robot_it_advances_one_cell() {
        let (mut controller, actuator) = recorded();
        controller.place(1, 1, "NORTH").unwrap();

        assert_eq!(controller.move_forward(), Outcome::Applied);

        assert_eq!(controller.report(), "1,2,NORTH");
        assert_eq!(actuator.calls().last(), Some(&Call::StepForward));
    }

    #[test]
    fn when_moving_before_placing_nothing_happens() {
        let (mut controller, actuator) = recorded();

        let outcome = controller.move_forward();

        assert_eq!(outcome, Outcome::NotPlaced);
        assert_eq!(outcome.notice().unwrap().level, NoticeLevel::Info);
        assert_eq!(controller.report(), NOT_PLACED);
        assert!(actuator.calls().is_empty());
    }

    #[test]
    fn when_moving_off_the_southern_edge_the_move_is_blocked() {
        let (mut controller, actuator) = recorded();
        controller.place(1, 1, "SOUTH").unwrap();

        let outcome = controller.move_forward();

        assert_eq!(outcome, Outcome::Blocked);
        assert_eq!(
            outcome.notice(),
            Some(Notice {
                level: NoticeLevel::Warn,
                message: "Robot would fall off the table"
            })
        );
        assert_eq!(controller.report(), "1,1,SOUTH");
        assert_eq!(actuator.calls().len(), 2);
    }

    #[test]
    fn when_moving_off_the_northern_edge_the_move_is_blocked() {
        let mut controller = controller();
        controller.place(1, 4, "NORTH").unwrap();

        assert_eq!(controller.move_forward(), Outcome::Blocked);
        assert_eq!(controller.report(), "1,4,NORTH");
    }

    #[test]
    fn when_moving_east_twice_the_robot_crosses_the_table() {
        let mut controller = controller();
        controller.place(1, 2, "EAST").unwrap();

        let _ = controller.move_forward();
        let _ = controller.move_forward();

        assert_eq!(controller.report(), "3,2,EAST");
    }

    #[test]
    fn when_rotating_left_the_facing_turns_counter_clockwise() {
        let cases = [("NORTH", "WEST"), ("WEST", "SOUTH"), ("SOUTH", "EAST"), ("EAST", "NORTH")];

        for (initial, expected) in cases {
            let mut controller = controller();
            controller.place(1, 1, initial).unwrap();

            assert_eq!(controller.rotate_left(), Outcome::Applied);

            assert_eq!(controller.report(), format!("1,1,{expected}"));
        }
    }

    #[test]
    fn when_rotating_right_the_facing_turns_clockwise() {
        let cases = [("NORTH", "EAST"), ("WEST", "NORTH"), ("SOUTH", "WEST"), ("EAST", "SOUTH")];

        for (initial, expected) in cases {
            let mut controller = controller();
            controller.place(1, 1, initial).unwrap();

            assert_eq!(controller.rotate_right(), Outcome::Applied);

            assert_eq!(controller.report(), format!("1,1,{expected}"));
        }
    }

    #[test]
    fn when_rotating_left_then_right_twice_the_robot_faces_the_opposite_side() {
        let (mut controller, actuator) = recorded();
        controller.place(2, 2, "NORTH").unwrap();

        let _ = controller.rotate_left();
        assert_eq!(controller.report(), "2,2,WEST");

        let _ = controller.rotate_right();
        let _ = controller.rotate_right();
        assert_eq!(controller.report(), "2,2,EAST");

        assert_eq!(
            actuator.calls()[2..],
            [
                Call::QuarterTurn(Turn::Left),
                Call::QuarterTurn(Turn::Right),
                Call::QuarterTurn(Turn::Right)
            ]
        );
    }

    #[test]
    fn when_rotating_before_placing_nothing_happens() {
        let (mut controller, actuator) = recorded();

        assert_eq!(controller.rotate_left(), Outcome::NotPlaced);
        assert_eq!(controller.rotate_right(), Outcome::NotPlaced);

        assert_eq!(controller.state(), AgentState::Unplaced);
        assert!(actuator.calls().is_empty());
    }

    #[test]
    fn when_applied_the_outcome_has_no_notice() {
        assert_eq!(Outcome::Applied.notice(), None);
    }

    #[test]
    #[should_panic(expected = "Table dimensions must be positive, got 0x5")]
    fn when_creating_a_controller_with_an_empty_table_it_panics() {
        Controller::new(0, 5, Box::new(NoOpActuator));
    }

    fn bearing() -> impl Strategy<Value = Bearing> {
        prop::sample::select(Bearing::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn placing_inside_the_open_interior_is_reported_verbatim(
            width in 3i32..20,
            height in 3i32..20,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
            bearing in bearing(),
        ) {
            let x = 1 + (fx * (width - 2) as f64) as i32;
            let y = 1 + (fy * (height - 2) as f64) as i32;
            let mut controller = Controller::new(width, height, Box::new(NoOpActuator));

            controller.place(x, y, bearing.name()).unwrap();

            prop_assert_eq!(controller.report(), format!("{},{},{}", x, y, bearing.name()));
            prop_assert_eq!(controller.report(), controller.report());
        }

        #[test]
        fn placing_outside_the_open_interior_fails_and_keeps_the_state(
            x in -10i32..15,
            y in -10i32..15,
            bearing in bearing(),
        ) {
            prop_assume!(!(x > 0 && x < 5 && y > 0 && y < 5));
            let mut controller = controller();
            controller.place(2, 2, "NORTH").unwrap();

            prop_assert_eq!(
                controller.place(x, y, bearing.name()),
                Err(PlacementError::InvalidPosition { x, y })
            );
            prop_assert_eq!(controller.report(), "2,2,NORTH");
        }

        #[test]
        fn placing_with_an_unknown_facing_fails(facing in "[A-Za-z]{0,8}") {
            prop_assume!(facing.parse::<Bearing>().is_err());
            let mut controller = controller();

            prop_assert_eq!(
                controller.place(2, 2, &facing),
                Err(PlacementError::InvalidFacing(facing.clone()))
            );
        }

        #[test]
        fn rotating_four_times_restores_the_bearing(bearing in bearing(), left in any::<bool>()) {
            let mut controller = controller();
            controller.place_bearing(2, 2, bearing).unwrap();

            for _ in 0..4 {
                let _ = if left { controller.rotate_left() } else { controller.rotate_right() };
            }

            prop_assert_eq!(controller.report(), format!("2,2,{}", bearing));
        }

        #[test]
        fn moves_never_leave_the_open_interior(
            commands in prop::collection::vec(0u8..3, 0..60),
            bearing in bearing(),
        ) {
            let mut controller = Controller::new(6, 4, Box::new(NoOpActuator));
            controller.place_bearing(1, 1, bearing).unwrap();

            for command in commands {
                let _ = match command {
                    0 => controller.move_forward(),
                    1 => controller.rotate_left(),
                    _ => controller.rotate_right(),
                };
                let AgentState::Placed { x, y, .. } = controller.state() else {
                    panic!("Robot was unplaced");
                };
                prop_assert!(x > 0 && x < 6 && y > 0 && y < 4);
            }
        }

        #[test]
        fn facing_outward_next_to_the_edge_the_move_is_rejected(along in 1i32..4, side in 0usize..4) {
            let (x, y, bearing) = match side {
                0 => (along, 3, Bearing::North),
                1 => (4, along, Bearing::East),
                2 => (along, 1, Bearing::South),
                _ => (1, along, Bearing::West),
            };
            let mut controller = Controller::new(5, 4, Box::new(NoOpActuator));
            controller.place_bearing(x, y, bearing).unwrap();

            prop_assert_eq!(controller.move_forward(), Outcome::Blocked);
            prop_assert_eq!(controller.report(), format!("{},{},{}", x, y, bearing));
        }
    }
}
