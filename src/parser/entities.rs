//! Record chunks: `HERO`, `HUMAN`, `TBOX`, `SPOINT` and `MPOINT`.
//!
//! Records are comma-separated fields. Trailing fields may be left out, and
//! the last field of a record with a message keeps any commas it holds.
//! Unreadable numbers and sprites become sentinels; records are never
//! dropped for them.

use crate::error::Result;
use crate::escape::unescape_meta_chars;
use crate::types::{Destination, Human, LookPoint, Position, TeleportPoint, TreasureBox};

use super::context::Context;
use super::fields::{record_text, split_record};
use super::sprite::parse_human_sprite;

fn message(field: Option<&&str>) -> String {
    field.map(|m| unescape_meta_chars(m)).unwrap_or_default()
}

fn record_position(fields: &[&str], index: usize, ctx: &Context<'_>) -> Result<Position> {
    ctx.position(fields.get(index).copied(), fields.get(index + 1).copied())
}

/// `x,y`. `None` when either field is missing altogether.
pub(crate) fn parse_hero(value: &str, offset: usize, ctx: &mut Context<'_>) -> Result<Option<Position>> {
    let fields = split_record(record_text(value), 3);
    if fields.len() < 2 {
        ctx.drop_record("HERO", "needs both x and y", offset);
        return Ok(None);
    }
    record_position(&fields, 0, ctx).map(Some)
}

/// `sprite,x,y,direction,behavior,speed[,message]`
pub(crate) fn parse_human(value: &str, ctx: &Context<'_>) -> Result<Human> {
    let fields = split_record(record_text(value), 7);

    Ok(Human {
        sprite: parse_human_sprite(fields[0], ctx.mode())?,
        position: record_position(&fields, 1, ctx)?,
        direction: ctx.int("direction", fields.get(3).copied())?,
        behavior: ctx.int("behavior", fields.get(4).copied())?,
        speed: ctx.int("speed", fields.get(5).copied())?,
        message: message(fields.get(6)),
    })
}

/// `x,y[,message]`
pub(crate) fn parse_treasure_box(value: &str, ctx: &Context<'_>) -> Result<TreasureBox> {
    let fields = split_record(record_text(value), 3);

    Ok(TreasureBox {
        position: record_position(&fields, 0, ctx)?,
        message: message(fields.get(2)),
    })
}

/// `x,y,once,[message]`; only `1` sets the once flag.
pub(crate) fn parse_look_point(value: &str, ctx: &Context<'_>) -> Result<LookPoint> {
    let fields = split_record(record_text(value), 4);

    Ok(LookPoint {
        position: record_position(&fields, 0, ctx)?,
        once: fields.get(2).is_some_and(|f| f.trim() == "1"),
        message: message(fields.get(3)),
    })
}

/// `x,y,mapId,destX,destY`
pub(crate) fn parse_teleport_point(value: &str, ctx: &Context<'_>) -> Result<TeleportPoint> {
    let fields = split_record(record_text(value), 5);

    Ok(TeleportPoint {
        position: record_position(&fields, 0, ctx)?,
        destination: Destination {
            map_id: ctx.int("map id", fields.get(2).copied())?,
            x: ctx.int("destination x", fields.get(3).copied())?,
            y: ctx.int("destination y", fields.get(4).copied())?,
        },
    })
}
