//! Loader for the `FLOOR` and `MAP` tile layers.
//!
//! A layer is written as rows of tile tokens separated by single spaces.
//! The column index of a token is its position in the row, so empty tokens
//! leave a cell empty and still take up a column.

use crate::diagnostics::codes;
use crate::error::Result;
use crate::types::{TileCode, TileGrid};

use super::context::Context;
use super::fields::strip_leading_line_break;
use super::sprite::parse_tile_code;

/// Load the rows of a tile chunk into `grid`.
pub(crate) fn load_grid(
    value: &str,
    value_offset: usize,
    grid: &mut TileGrid<TileCode>,
    ctx: &mut Context<'_>,
) -> Result<()> {
    let body = strip_leading_line_break(value);
    let mut line_offset = value_offset + (value.len() - body.len());

    for (y, line) in body.split('\n').enumerate() {
        let row = line.strip_suffix('\r').unwrap_or(line);
        let mut token_offset = line_offset;

        for (x, token) in row.split(' ').enumerate() {
            if !token.is_empty() {
                match parse_tile_code(token, ctx.mode())? {
                    Some(code) => {
                        if let Err(err) = grid.set(x as i32, y as i32, code) {
                            ctx.out_of_range(err, token_offset)?;
                        }
                    }
                    None => ctx.diagnostics.warning(
                        codes::INVALID_RECORD,
                        format!("unreadable tile '{}' at ({}, {}) skipped", token, x, y),
                        token_offset,
                    ),
                }
            }
            token_offset += token.len() + 1;
        }

        line_offset += line.len() + 1;
    }

    Ok(())
}
