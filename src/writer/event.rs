//! Serialization of event points.

use crate::types::{EventPhase, EventPoint};

use super::number;

/// Write one phase block, or nothing for a phase left at its default.
fn write_phase(out: &mut String, index: usize, phase: &EventPhase) {
    if phase.is_default() {
        return;
    }

    out.push_str(&format!("#PH{} tm:{},", index, phase.timing.id()));
    if index > 0 {
        if let Some(switch) = phase.condition.switch {
            out.push_str(&format!("sw:{},", switch));
        }
        if let Some(gold) = phase.condition.gold {
            out.push_str(&format!("g:{},", gold));
        }
    }
    out.push('\n');

    for command in &phase.commands {
        out.push_str(&command.to_string());
        out.push('\n');
    }

    out.push_str(&format!("#PHEND{}\n", index));
}

/// The value of an `EPOINT` chunk.
pub fn write_event_point(point: &EventPoint) -> String {
    let mut out = format!(
        "tx:{},ty:{},\n",
        number(point.position.x),
        number(point.position.y)
    );
    for (index, phase) in point.phases().iter().enumerate() {
        write_phase(&mut out, index, phase);
    }
    out
}
