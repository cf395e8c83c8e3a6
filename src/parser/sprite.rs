//! Sprite token grammar for tile layers and humans.

use crate::config::NumberMode;
use crate::error::{MapError, Result};
use crate::types::{CharacterSurface, HumanSprite, Surface, TileCode};

use super::fields::parse_id;

fn invalid<T>(token: &str, mode: NumberMode) -> Result<Option<T>> {
    match mode {
        NumberMode::Permissive => Ok(None),
        NumberMode::Strict => Err(MapError::InvalidSprite {
            token: token.to_string(),
        }),
    }
}

/// Parse a tile token: `x_y` for a standard sheet cell, `id` or `idC` for
/// a custom sprite.
///
/// Unreadable tokens yield `None` in permissive mode.
pub fn parse_tile_code(token: &str, mode: NumberMode) -> Result<Option<TileCode>> {
    if let Some((x, y)) = token.split_once('_') {
        let coord = |s: &str| parse_id(s, mode).and_then(|v| u16::try_from(v).ok());
        return match (coord(x), coord(y)) {
            (Some(x), Some(y)) => Ok(Some(TileCode::Standard(Surface::new(x, y)))),
            _ => invalid(token, mode),
        };
    }

    let (id, collidable) = match token.strip_suffix('C') {
        Some(id) => (id, true),
        None => (token, false),
    };
    match parse_id(id, mode) {
        Some(id) => Ok(Some(TileCode::Custom { id, collidable })),
        None => invalid(token, mode),
    }
}

/// Parse a human sprite token: `A<id>` animated custom, `-<id>` still
/// custom, or a bare standard character id.
///
/// In permissive mode a token that names no sprite is kept as
/// [`HumanSprite::Unknown`].
pub fn parse_human_sprite(token: &str, mode: NumberMode) -> Result<HumanSprite> {
    let token = token.trim();

    let sprite = if let Some(id) = token.strip_prefix('A') {
        parse_id(id, mode).map(HumanSprite::CustomAnimation)
    } else if let Some(id) = token.strip_prefix('-') {
        parse_id(id, mode).map(HumanSprite::CustomStill)
    } else {
        parse_id(token, mode)
            .and_then(|id| u8::try_from(id).ok())
            .and_then(CharacterSurface::from_id)
            .map(HumanSprite::Standard)
    };

    match (sprite, mode) {
        (Some(sprite), _) => Ok(sprite),
        (None, NumberMode::Permissive) => Ok(HumanSprite::Unknown(parse_id(token, mode))),
        (None, NumberMode::Strict) => Err(MapError::InvalidSprite {
            token: token.to_string(),
        }),
    }
}
