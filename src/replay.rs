use crate::actuator::{Actuator, Turn};
use crate::bearing::Bearing;
use serde::Serialize;
use serde_json::json;
use std::{fs::File, io, io::BufWriter, io::Write};
use tracing::debug;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum EventType {
    SetPosition,
    SetHeading,
    StepForward,
    QuarterTurn,
}

/// A single actuator notification as it appears in the replay file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Event {
    pub seq: usize,
    pub event_type: EventType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<(i32, i32)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bearing: Option<Bearing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub turn: Option<Turn>,
}

/// Records every notification and writes them as JSON on [`save`](Actuator::save).
pub struct ReplayActuator {
    filename: String,
    table_width: i32,
    table_height: i32,
    events: Vec<Event>,
}

impl ReplayActuator {
    /// Creates a new replay actuator.
    ///
    /// # Arguments
    /// * `filename` - The file the replay is written to.
    /// * `table_width` - The width of the table, stored in the replay header.
    /// * `table_height` - The height of the table, stored in the replay header.
    pub fn new(filename: String, table_width: i32, table_height: i32) -> ReplayActuator {
        ReplayActuator {
            filename,
            table_width,
            table_height,
            events: Vec::new(),
        }
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Writes the replay to any writer.
    pub fn write_to<W: Write>(&self, writer: W) -> io::Result<()> {
        let data = json!({
            "table": {
                "width": self.table_width,
                "height": self.table_height,
            },
            "events": self.events,
        });

        serde_json::to_writer_pretty(writer, &data)?;
        Ok(())
    }

    fn log_event(
        &mut self,
        event_type: EventType,
        location: Option<(i32, i32)>,
        bearing: Option<Bearing>,
        turn: Option<Turn>,
    ) {
        self.events.push(Event {
            seq: self.events.len(),
            event_type,
            location,
            bearing,
            heading: bearing.map(Bearing::heading),
            turn,
        });
    }
}

impl Actuator for ReplayActuator {
    fn set_position(&mut self, x: i32, y: i32) {
        self.log_event(EventType::SetPosition, Some((x, y)), None, None);
    }

    fn set_heading(&mut self, bearing: Bearing) {
        self.log_event(EventType::SetHeading, None, Some(bearing), None);
    }

    fn step_forward(&mut self) {
        self.log_event(EventType::StepForward, None, None, None);
    }

    fn quarter_turn(&mut self, turn: Turn) {
        self.log_event(EventType::QuarterTurn, None, None, Some(turn));
    }

    fn save(&self) -> io::Result<()> {
        let file = File::create(&self.filename)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()?;
        debug!(filename = %self.filename, events = self.events.len(), "saved replay");
        Ok(())
    }
}
