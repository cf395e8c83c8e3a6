//! Event script grammar.
//!
//! ```text
//! #EPOINT
//! tx:1,ty:2,
//! #PH1 tm:0,sw:3,g:100,
//! #MSG m:Hello#ED
//! #SEL1
//! #BR1 Yes
//! #GOLD g:-10#ED
//! #BREND1
//! #SELEND1
//! #PHEND1
//! #END
//! ```
//!
//! An event point is a header line followed by up to four phase blocks.
//! Each phase is a condition line followed by commands; a select command
//! holds branch blocks which hold commands again. Every level is read with
//! a fresh [`ChunkReader`](super::tokenizer::ChunkReader) over the parent's
//! value.

use crate::diagnostics::codes;
use crate::error::{MapError, Result};
use crate::escape::unescape_meta_chars;
use crate::types::{
    command_terminator, trailing_digits, Branch, Command, Condition, EventPhase, EventPoint,
    EventTiming, Params, RawCommand, Select, BRANCH_END, BRANCH_PREFIX, PHASE_COUNT,
    SELECT_PREFIX,
};

use super::context::Context;
use super::fields::{split_first_line, trim_inline_start};
use super::tokenizer::Terminator;

const PHASE_PREFIX: &str = "PH";
const PHASE_END: &str = "#PHEND";

fn phase_terminator(name: &str) -> String {
    format!("{}{}", PHASE_END, trailing_digits(name))
}

/// Phase index named by a `PH<n>` chunk.
fn phase_index(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(PHASE_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok().filter(|&i| i < PHASE_COUNT)
}

/// Split the `tx:N,ty:N,` header off an event body. The header ends at the
/// first line break, or at the first `#` when a phase follows on the same
/// line.
fn split_header(text: &str) -> (&str, &str, usize) {
    match text.find(['#', '\n']) {
        Some(i) if text.as_bytes()[i] == b'#' => (&text[..i], &text[i..], i),
        _ => split_first_line(text),
    }
}

/// Parse the value of an `EPOINT` chunk. Missing or unreadable `tx`/`ty`
/// values leave the matching half of the position `None`.
pub(crate) fn parse_event_point(
    value: &str,
    value_offset: usize,
    ctx: &mut Context<'_>,
) -> Result<EventPoint> {
    let text = value.trim_start();
    let lead = value.len() - text.len();
    let (header, body, body_start) = split_header(text);

    let params = Params::parse(header);
    let position = ctx.position(params.get("tx"), params.get("ty"))?;

    let mut point = EventPoint::new(position);
    let mut reader = ctx.reader(body, value_offset + lead + body_start);
    let terminator = Terminator::Named(phase_terminator);

    while let Some(chunk) = ctx.next_chunk(&mut reader, &terminator)? {
        let Some(index) = phase_index(chunk.name) else {
            if ctx.options.strict_chunks {
                return Err(MapError::InvalidPhase {
                    name: chunk.name.to_string(),
                });
            }
            ctx.diagnostics.warning(
                codes::INVALID_PHASE,
                format!("'{}' is not a phase of event {}", chunk.name, position),
                chunk.offset,
            );
            continue;
        };

        let phase = parse_phase(chunk.value, chunk.value_offset, index, ctx)
            .map_err(|e| e.in_chunk(chunk.name, chunk.offset))?;
        point.set_phase(index, phase)?;
    }

    Ok(point)
}

fn parse_timing(params: &Params, offset: usize, ctx: &mut Context<'_>) -> Result<EventTiming> {
    let Some(value) = params.get("tm") else {
        return Ok(EventTiming::default());
    };

    match ctx.int("tm", Some(value))?.and_then(EventTiming::from_id) {
        Some(timing) => Ok(timing),
        None if ctx.options.strict_numbers => Err(MapError::InvalidNumber {
            field: "tm",
            value: value.to_string(),
        }),
        None => {
            ctx.diagnostics.warning(
                codes::INVALID_RECORD,
                format!("unknown event timing '{}', using look", value),
                offset,
            );
            Ok(EventTiming::default())
        }
    }
}

/// Parse one phase block: a condition line, then commands.
fn parse_phase(value: &str, value_offset: usize, index: usize, ctx: &mut Context<'_>) -> Result<EventPhase> {
    let text = trim_inline_start(value);
    let lead = value.len() - text.len();
    let (line, body, body_start) = split_first_line(text);
    let params = Params::parse(line);

    let timing = parse_timing(&params, value_offset, ctx)?;
    let condition = if index == 0 {
        Condition::default()
    } else {
        Condition {
            switch: ctx.optional_int("sw", params.get("sw"))?,
            gold: ctx.optional_int("g", params.get("g"))?,
        }
    };
    let commands = parse_commands(body, value_offset + lead + body_start, ctx)?;

    Ok(EventPhase {
        timing,
        condition,
        commands,
    })
}

/// Parse a command sequence.
pub(crate) fn parse_commands(text: &str, offset: usize, ctx: &mut Context<'_>) -> Result<Vec<Command>> {
    let mut reader = ctx.reader(text, offset);
    let terminator = Terminator::Named(command_terminator);
    let mut commands = Vec::new();

    while let Some(chunk) = ctx.next_chunk(&mut reader, &terminator)? {
        let raw = RawCommand::new(chunk.name, chunk.value);
        let command = if ctx.options.translate_commands {
            translate(raw, chunk.value_offset, ctx).map_err(|e| e.in_chunk(chunk.name, chunk.offset))?
        } else {
            Command::Raw(raw)
        };
        commands.push(command);
    }

    Ok(commands)
}

/// The value of the only parameter of a one-line command body, if the
/// body holds exactly `key` and nothing else.
fn single_param(raw: &RawCommand, key: &str) -> Option<String> {
    if raw.body.trim().contains('\n') {
        return None;
    }
    let params = raw.params();
    if params.len() != 1 {
        return None;
    }
    params.get(key).map(str::to_string)
}

/// Turn a raw command into a typed one when its name and parameters are
/// known. Anything that would not survive the translation unchanged stays
/// raw.
fn translate(raw: RawCommand, body_offset: usize, ctx: &mut Context<'_>) -> Result<Command> {
    let typed = match raw.name.as_str() {
        "MSG" => single_param(&raw, "m").map(|m| Command::Message {
            text: unescape_meta_chars(&m),
        }),
        "GOLD" => match single_param(&raw, "g") {
            Some(g) => Some(Command::Gold {
                amount: ctx.int("g", Some(&g))?,
            }),
            None => None,
        },
        "SWON" => match single_param(&raw, "sw") {
            Some(sw) => Some(Command::SwitchOn {
                switch: ctx.int("sw", Some(&sw))?,
            }),
            None => None,
        },
        "SWOFF" => match single_param(&raw, "sw") {
            Some(sw) => Some(Command::SwitchOff {
                switch: ctx.int("sw", Some(&sw))?,
            }),
            None => None,
        },
        name => match select_number(name) {
            Some(number) => Some(parse_select(&raw, number, body_offset, ctx)?),
            None => {
                ctx.diagnostics.info(
                    codes::UNKNOWN_COMMAND,
                    format!("command '{}' kept as written", name),
                    body_offset,
                );
                None
            }
        },
    };

    Ok(typed.unwrap_or(Command::Raw(raw)))
}

/// `N` of a `SEL<N>` command name.
fn select_number(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(SELECT_PREFIX)?;
    if digits.is_empty() || trailing_digits(digits) != digits {
        return None;
    }
    digits.parse().ok()
}

/// Parse the body of a `SEL<N>` command: a parameter line, then
/// `#BR<N> label` blocks closed by `#BREND<N>`.
fn parse_select(raw: &RawCommand, number: u32, body_offset: usize, ctx: &mut Context<'_>) -> Result<Command> {
    let text = trim_inline_start(&raw.body);
    let lead = raw.body.len() - text.len();
    let (line, rest, rest_start) = split_first_line(text);

    let branch_name = format!("{}{}", BRANCH_PREFIX, number);
    let branch_end = format!("{}{}", BRANCH_END, number);
    let terminator = Terminator::Fixed(&branch_end);

    let mut reader = ctx.reader(rest, body_offset + lead + rest_start);
    let mut branches = Vec::new();

    while let Some(chunk) = ctx.next_chunk(&mut reader, &terminator)? {
        if chunk.name != branch_name {
            ctx.diagnostics.warning(
                codes::UNKNOWN_CHUNK,
                format!("'{}' is not a branch of {}; skipped", chunk.name, raw.name),
                chunk.offset,
            );
            continue;
        }

        let branch_text = trim_inline_start(chunk.value);
        let branch_lead = chunk.value.len() - branch_text.len();
        let (label, commands, commands_start) = split_first_line(branch_text);
        let commands = parse_commands(commands, chunk.value_offset + branch_lead + commands_start, ctx)
            .map_err(|e| e.in_chunk(chunk.name, chunk.offset))?;

        branches.push(Branch {
            label: unescape_meta_chars(label.trim()),
            commands,
        });
    }

    Ok(Command::Select(Select {
        number,
        params: Params::parse(line),
        branches,
    }))
}
