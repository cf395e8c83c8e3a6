//! Serialization of map documents back into map file text.
//!
//! Output is canonical: every chunk is written as `#NAME\n<value>#END\n`,
//! in a fixed order, so that parsing the output gives back an equal
//! document.

mod event;

use std::fs;
use std::path::Path;

use crate::error::{MapError, Result};
use crate::escape::escape_meta_chars;
use crate::types::{MapDocument, TileCode, TileGrid};

pub use event::write_event_point;

fn number(value: Option<i32>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| v.to_string())
}

fn push_chunk(out: &mut String, name: &str, value: &str) {
    out.push('#');
    out.push_str(name);
    out.push('\n');
    out.push_str(value);
    out.push_str("#END\n");
}

/// Rows of a tile layer. Blank tokens at the end of a row are dropped.
pub fn write_grid(grid: &TileGrid<TileCode>) -> String {
    let size = grid.size();
    let mut rows = Vec::with_capacity(size.height as usize);

    for y in 0..size.height as i32 {
        let tokens: Vec<String> = (0..size.width as i32)
            .map(|x| grid.get(x, y).map(|code| code.to_string()).unwrap_or_default())
            .collect();
        let len = tokens.iter().rposition(|t| !t.is_empty()).map_or(0, |i| i + 1);
        rows.push(tokens[..len].join(" "));
    }

    rows.join("\n")
}

/// Serialize a document.
pub fn write_map(document: &MapDocument) -> String {
    let mut out = String::new();

    push_chunk(&mut out, "HERO", &document.hero.to_string());
    if let Some(bgm) = &document.bgm_url {
        push_chunk(&mut out, "BGM", bgm);
    }
    push_chunk(&mut out, "BGIMG", &document.background_image_url);
    push_chunk(&mut out, "FLOOR", &write_grid(&document.floor));
    push_chunk(&mut out, "MAP", &write_grid(&document.objects));

    for human in document.humans.iter() {
        let record = format!(
            "{},{},{},{},{},{}",
            human.sprite,
            human.position,
            number(human.direction),
            number(human.behavior),
            number(human.speed),
            escape_meta_chars(&human.message)
        );
        push_chunk(&mut out, "HUMAN", &record);
    }

    for tbox in document.treasure_boxes.iter() {
        let record = format!("{},{}", tbox.position, escape_meta_chars(&tbox.message));
        push_chunk(&mut out, "TBOX", &record);
    }

    for point in document.look_points.iter() {
        let record = format!(
            "{},{},{}",
            point.position,
            if point.once { 1 } else { 0 },
            escape_meta_chars(&point.message)
        );
        push_chunk(&mut out, "SPOINT", &record);
    }

    for point in document.teleport_points.iter() {
        let dest = point.destination;
        let record = format!(
            "{},{},{},{}",
            point.position,
            number(dest.map_id),
            number(dest.x),
            number(dest.y)
        );
        push_chunk(&mut out, "MPOINT", &record);
    }

    for point in document.event_points.iter() {
        push_chunk(&mut out, "EPOINT", &write_event_point(point));
    }

    out
}

/// Serialize a document into a file.
pub fn write_map_file(document: &MapDocument, path: &Path) -> Result<()> {
    fs::write(path, write_map(document)).map_err(|e| MapError::Io {
        path: path.to_path_buf(),
        message: format!("Failed to write map: {}", e),
    })
}
