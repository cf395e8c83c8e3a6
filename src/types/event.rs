//! Event points and their phases.

use serde::Serialize;

use crate::error::{MapError, Result};

use super::command::Command;
use super::position::{Position, Positioned};

/// Number of phases on every event point.
pub const PHASE_COUNT: usize = 4;

/// What the player does to start a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EventTiming {
    /// Examining the cell.
    #[default]
    Look = 0,
    /// Stepping on or bumping into the cell.
    Touch = 1,
}

impl EventTiming {
    pub fn id(self) -> i32 {
        self as i32
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(EventTiming::Look),
            1 => Some(EventTiming::Touch),
            _ => None,
        }
    }
}

/// Requirements for a secondary phase to be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Condition {
    pub switch: Option<i32>,
    pub gold: Option<i32>,
}

impl Condition {
    pub fn is_empty(&self) -> bool {
        self.switch.is_none() && self.gold.is_none()
    }
}

/// One behavior slot of an event point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventPhase {
    pub timing: EventTiming,
    /// Always empty on the primary phase.
    pub condition: Condition,
    pub commands: Vec<Command>,
}

impl EventPhase {
    pub fn new(timing: EventTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn with_condition(mut self, condition: Condition) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_command(mut self, command: impl Into<Command>) -> Self {
        self.commands.push(command.into());
        self
    }

    /// A phase with default timing, no condition and no commands.
    pub fn is_default(&self) -> bool {
        self.timing == EventTiming::Look && self.condition.is_empty() && self.commands.is_empty()
    }
}

/// A scripted cell with four ordered phases.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventPoint {
    pub position: Position,
    phases: [EventPhase; PHASE_COUNT],
}

impl EventPoint {
    pub fn new(position: Position) -> Self {
        Self {
            position,
            phases: Default::default(),
        }
    }

    /// Replace the phase at `index`.
    ///
    /// The primary phase (index 0) never keeps a condition.
    pub fn set_phase(&mut self, index: usize, mut phase: EventPhase) -> Result<()> {
        let slot = self.phases.get_mut(index).ok_or_else(|| MapError::InvalidPhase {
            name: format!("PH{}", index),
        })?;
        if index == 0 {
            phase.condition = Condition::default();
        }
        *slot = phase;
        Ok(())
    }

    pub fn with_phase(mut self, index: usize, phase: EventPhase) -> Result<Self> {
        self.set_phase(index, phase)?;
        Ok(self)
    }

    pub fn phase(&self, index: usize) -> Option<&EventPhase> {
        self.phases.get(index)
    }

    pub fn phases(&self) -> &[EventPhase; PHASE_COUNT] {
        &self.phases
    }

    pub fn primary(&self) -> &EventPhase {
        &self.phases[0]
    }

    pub fn secondary(&self) -> &[EventPhase] {
        &self.phases[1..]
    }
}

impl Positioned for EventPoint {
    fn position(&self) -> Position {
        self.position
    }
}
