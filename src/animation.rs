use crate::actuator::{Actuator, Turn};
use crate::bearing::Bearing;
use crossterm::{
    cursor::Hide,
    execute,
    style::{Color, Print, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};
use tracing::warn;

/// Ease-out-back interpolation: overshoots the target slightly before settling.
///
/// # Arguments
/// * `t` - Time since the start of the animation.
/// * `b` - The beginning value.
/// * `c` - The change in value.
/// * `d` - The duration of the animation.
pub fn ease_out_back(t: f64, b: f64, c: f64, d: f64) -> f64 {
    const S: f64 = 1.70158;
    let t = t / d - 1.0;
    c * (t * t * ((S + 1.0) * t + S) + 1.0) + b
}

/// Where the rendered robot currently is. Coordinates are in cells, heading in radians.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    /// The glyph for the quarter heading closest to the current one.
    pub fn glyph(&self) -> char {
        match ((self.heading / FRAC_PI_2).round() as i64).rem_euclid(4) {
            0 => '>',
            1 => '^',
            2 => '<',
            _ => 'v',
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Task {
    Place(i32, i32),
    Face(Bearing),
    Step,
    Turn(Turn),
}

#[derive(Clone, Copy, Debug)]
enum Property {
    X,
    Y,
    Heading,
}

#[derive(Debug)]
struct Animation {
    property: Property,
    beginning: f64,
    change: f64,
    final_value: f64,
    duration: f64,
    started_at: Option<f64>,
}

impl Animation {
    fn is_finished(&self, now: f64) -> bool {
        self.started_at
            .is_some_and(|started_at| now - started_at >= self.duration)
    }

    fn value_at(&mut self, now: f64) -> f64 {
        let started_at = *self.started_at.get_or_insert(now);
        let t = now - started_at;

        if t >= self.duration {
            self.final_value
        } else {
            ease_out_back(t, self.beginning, self.change, self.duration)
        }
    }
}

/// Animates the robot on a terminal rendering of the table.
///
/// Notifications are queued and played one at a time, so two animations never run on the
/// same property at once. Nothing moves until the host calls [`drain`](Actuator::drain) (or
/// drives [`tick`](AnimatedActuator::tick) itself).
pub struct AnimatedActuator<W: Write + Send> {
    out: W,
    table_width: i32,
    table_height: i32,
    step_secs: f64,
    frame: Duration,
    clock: Instant,
    pose: Pose,
    placed: bool,
    queue: VecDeque<Task>,
    animation: Option<Animation>,
}

impl<W: Write + Send> AnimatedActuator<W> {
    /// Creates a new animated actuator.
    ///
    /// # Arguments
    /// * `out` - Where the table is drawn.
    /// * `table_width` - The width of the table.
    /// * `table_height` - The height of the table.
    /// * `step_secs` - How long a single step or turn animation lasts.
    /// * `frame` - The pause between two frames while draining.
    pub fn new(
        out: W,
        table_width: i32,
        table_height: i32,
        step_secs: f64,
        frame: Duration,
    ) -> AnimatedActuator<W> {
        AnimatedActuator {
            out,
            table_width,
            table_height,
            step_secs,
            frame,
            clock: Instant::now(),
            pose: Pose::default(),
            placed: false,
            queue: VecDeque::new(),
            animation: None,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn placed(&self) -> bool {
        self.placed
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    /// Whether there is nothing queued and nothing animating.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.animation.is_none()
    }

    /// Advances the animation to `now`, expressed in seconds.
    ///
    /// Starts the next queued task if no animation is running, then either settles the
    /// running animation on its final value or interpolates it.
    pub fn tick(&mut self, now: f64) {
        if self.animation.is_none() {
            if let Some(task) = self.queue.pop_front() {
                self.start(task);
            }
        }

        if let Some(animation) = self.animation.as_mut() {
            let (property, value) = if animation.is_finished(now) {
                let value = (animation.property, animation.final_value);
                self.animation = None;
                value
            } else {
                (animation.property, animation.value_at(now))
            };
            self.apply(property, value);
        }
    }

    /// Plays every queued task to its final value without drawing.
    pub fn complete(&mut self) {
        loop {
            if let Some(animation) = self.animation.take() {
                self.apply(animation.property, animation.final_value);
            } else if let Some(task) = self.queue.pop_front() {
                self.start(task);
            } else {
                break;
            }
        }
    }

    /// Draws the table, the robot and its pose.
    pub fn draw(&mut self) -> io::Result<()> {
        execute!(
            self.out,
            Clear(ClearType::All),
            Hide,
            Print("Table: "),
            Print(format!("{}x{}", self.table_width, self.table_height)),
            Print("\n\n")
        )?;

        let robot = self
            .placed
            .then(|| (self.pose.x.round() as i32, self.pose.y.round() as i32));

        for row in (0..=self.table_height).rev() {
            for col in 0..=self.table_width {
                let edge =
                    row == 0 || col == 0 || row == self.table_height || col == self.table_width;
                let (color, glyph) = if robot == Some((col, row)) {
                    (Color::Green, self.pose.glyph())
                } else if edge {
                    (Color::DarkGrey, '#')
                } else {
                    (Color::Reset, '.')
                };
                execute!(
                    self.out,
                    SetForegroundColor(color),
                    Print(glyph),
                    SetForegroundColor(Color::Reset)
                )?;
            }
            execute!(self.out, Print("\n"))?;
        }

        if self.placed {
            execute!(
                self.out,
                Print(format!(
                    "\nx = {:.2}, y = {:.2}, heading = {:.0}°\n",
                    self.pose.x,
                    self.pose.y,
                    self.pose.heading.to_degrees()
                ))
            )?;
        }

        self.out.flush()
    }

    fn start(&mut self, task: Task) {
        match task {
            Task::Place(x, y) => {
                self.pose.x = x as f64;
                self.pose.y = y as f64;
                self.placed = true;
            }
            Task::Face(bearing) => self.pose.heading = bearing.heading(),
            Task::Step => {
                let dx = self.pose.heading.cos().round();
                let dy = self.pose.heading.sin().round();
                self.animation = Some(if dx != 0.0 {
                    self.animate(Property::X, self.pose.x, dx, self.pose.x + dx)
                } else {
                    self.animate(Property::Y, self.pose.y, dy, self.pose.y + dy)
                });
            }
            Task::Turn(turn) => {
                let delta = match turn {
                    Turn::Left => FRAC_PI_2,
                    Turn::Right => -FRAC_PI_2,
                };
                let heading = self.pose.heading;
                self.animation = Some(self.animate(
                    Property::Heading,
                    heading,
                    delta,
                    (heading + delta).rem_euclid(TAU),
                ));
            }
        }
    }

    fn animate(&self, property: Property, beginning: f64, change: f64, final_value: f64) -> Animation {
        Animation {
            property,
            beginning,
            change,
            final_value,
            duration: self.step_secs,
            started_at: None,
        }
    }

    fn apply(&mut self, property: Property, value: f64) {
        match property {
            Property::X => self.pose.x = value,
            Property::Y => self.pose.y = value,
            Property::Heading => self.pose.heading = value,
        }
    }
}

impl<W: Write + Send> Actuator for AnimatedActuator<W> {
    fn set_position(&mut self, x: i32, y: i32) {
        self.queue.push_back(Task::Place(x, y));
    }

    fn set_heading(&mut self, bearing: Bearing) {
        self.queue.push_back(Task::Face(bearing));
    }

    fn step_forward(&mut self) {
        self.queue.push_back(Task::Step);
    }

    fn quarter_turn(&mut self, turn: Turn) {
        self.queue.push_back(Task::Turn(turn));
    }

    fn drain(&mut self) {
        loop {
            self.tick(self.clock.elapsed().as_secs_f64());

            if let Err(error) = self.draw() {
                warn!(%error, "could not draw the table, skipping the animation");
                self.complete();
                return;
            }

            if self.is_idle() {
                return;
            }

            thread::sleep(self.frame);
        }
    }
}
