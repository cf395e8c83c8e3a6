//! Sprite references for tiles and humans.
//!
//! Standard sprites come from the built-in material sheets; custom sprites
//! are user-uploaded images referenced by numeric id. Tiles are always still
//! sprites, humans are animated unless they use a custom still image.
//!
//! Each type's `Display` impl writes the canonical token used in map files:
//!
//! | sprite                     | token  |
//! |----------------------------|--------|
//! | standard tile (3, 8)       | `3_8`  |
//! | custom tile 12, collidable | `12C`  |
//! | standard character (king)  | `20`   |
//! | custom animated 5          | `A5`   |
//! | custom still 7             | `-7`   |

use std::fmt;

use serde::Serialize;

use super::position::Position;

/// A cell on the standard tile sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Surface {
    pub x: u16,
    pub y: u16,
}

impl Surface {
    pub fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }
}

/// Standard sheet cells a hero can walk over.
///
/// Every other standard cell blocks movement. The list assumes row 8 is
/// open ground and row 9 holds paths and floors, plus a few bridge and stair
/// cells.
const WALKABLE_SURFACES: &[(u16, u16)] = &[
    (0, 8),
    (1, 8),
    (2, 8),
    (3, 8),
    (4, 8),
    (5, 8),
    (6, 8),
    (7, 8),
    (0, 9),
    (1, 9),
    (2, 9),
    (3, 9),
    (4, 2),
    (5, 2),
    (6, 0),
    (7, 0),
];

/// Whether a standard sheet cell can be walked over.
pub fn is_walkable(surface: Surface) -> bool {
    WALKABLE_SURFACES.contains(&(surface.x, surface.y))
}

/// A non-animated sprite as used by floor and object tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StillSprite {
    Standard(Surface),
    Custom(u32),
}

/// The stored form of a tile: its sprite plus whatever collision
/// information the token itself carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TileCode {
    /// `x_y`; collision comes from the walkability table.
    Standard(Surface),
    /// `id` or `idC`.
    Custom { id: u32, collidable: bool },
}

impl TileCode {
    pub fn standard(x: u16, y: u16) -> Self {
        TileCode::Standard(Surface::new(x, y))
    }

    pub fn custom(id: u32, collidable: bool) -> Self {
        TileCode::Custom { id, collidable }
    }

    pub fn sprite(&self) -> StillSprite {
        match *self {
            TileCode::Standard(surface) => StillSprite::Standard(surface),
            TileCode::Custom { id, .. } => StillSprite::Custom(id),
        }
    }

    /// Whether the tile blocks movement.
    pub fn collision(&self) -> bool {
        match *self {
            TileCode::Standard(surface) => !is_walkable(surface),
            TileCode::Custom { collidable, .. } => collidable,
        }
    }

    /// Resolve into a placed tile.
    pub fn at(&self, position: Position) -> Tile {
        Tile {
            sprite: self.sprite(),
            collision: self.collision(),
            position,
        }
    }
}

impl fmt::Display for TileCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileCode::Standard(surface) => write!(f, "{}_{}", surface.x, surface.y),
            TileCode::Custom { id, collidable } => {
                write!(f, "{}", id)?;
                if *collidable {
                    f.write_str("C")?;
                }
                Ok(())
            }
        }
    }
}

/// A decoded tile at a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub sprite: StillSprite,
    pub collision: bool,
    pub position: Position,
}

/// Standard animated character sheets, by id.
///
/// The ids are fixed by the editor and do not follow any grouping by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CharacterSurface {
    Hero = 0,
    SoldierB = 1,
    Merchant = 2,
    ElderlyA = 3,
    Child = 4,
    ElderlyB = 5,
    WarriorA = 6,
    WeaponMerchant = 7,
    Princess = 8,
    WomanA = 9,
    ElderlyC = 10,
    WomanB = 11,
    WarriorB = 12,
    ArmorMerchant = 13,
    ManA = 14,
    WomanC = 15,
    ManB = 16,
    WomanD = 17,
    SoldierA = 18,
    /// Present in the sheet but never named by the editor.
    Surface19 = 19,
    King = 20,
    Bhikkhuni = 21,
}

impl CharacterSurface {
    pub const ALL: [CharacterSurface; 22] = [
        CharacterSurface::Hero,
        CharacterSurface::SoldierB,
        CharacterSurface::Merchant,
        CharacterSurface::ElderlyA,
        CharacterSurface::Child,
        CharacterSurface::ElderlyB,
        CharacterSurface::WarriorA,
        CharacterSurface::WeaponMerchant,
        CharacterSurface::Princess,
        CharacterSurface::WomanA,
        CharacterSurface::ElderlyC,
        CharacterSurface::WomanB,
        CharacterSurface::WarriorB,
        CharacterSurface::ArmorMerchant,
        CharacterSurface::ManA,
        CharacterSurface::WomanC,
        CharacterSurface::ManB,
        CharacterSurface::WomanD,
        CharacterSurface::SoldierA,
        CharacterSurface::Surface19,
        CharacterSurface::King,
        CharacterSurface::Bhikkhuni,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }
}

/// Sprite used by a human (NPC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HumanSprite {
    /// Bare integer token.
    Standard(CharacterSurface),
    /// `A<id>`.
    CustomAnimation(u32),
    /// `-<id>`.
    CustomStill(u32),
    /// A bare token outside the character table: its id, or `None` when the
    /// token is not a number. Written back as the id or `NaN`.
    Unknown(Option<u32>),
}

impl fmt::Display for HumanSprite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HumanSprite::Standard(surface) => write!(f, "{}", surface.id()),
            HumanSprite::CustomAnimation(id) => write!(f, "A{}", id),
            HumanSprite::CustomStill(id) => write!(f, "-{}", id),
            HumanSprite::Unknown(Some(id)) => write!(f, "{}", id),
            HumanSprite::Unknown(None) => f.write_str("NaN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_ids_match_table() {
        for (i, surface) in CharacterSurface::ALL.iter().enumerate() {
            assert_eq!(surface.id() as usize, i);
        }
        assert_eq!(CharacterSurface::from_id(20), Some(CharacterSurface::King));
        assert_eq!(CharacterSurface::from_id(8), Some(CharacterSurface::Princess));
        assert_eq!(CharacterSurface::from_id(22), None);
    }

    #[test]
    fn test_tile_code_display() {
        assert_eq!(TileCode::standard(0, 8).to_string(), "0_8");
        assert_eq!(TileCode::custom(12, true).to_string(), "12C");
        assert_eq!(TileCode::custom(40, false).to_string(), "40");
    }

    #[test]
    fn test_tile_collision() {
        assert!(!TileCode::standard(0, 8).collision());
        assert!(TileCode::standard(2, 3).collision());
        assert!(TileCode::custom(12, true).collision());
        assert!(!TileCode::custom(12, false).collision());
    }

    #[test]
    fn test_tile_at() {
        let tile = TileCode::custom(5, true).at(Position::new(2, 0));
        assert_eq!(tile.sprite, StillSprite::Custom(5));
        assert!(tile.collision);
        assert_eq!(tile.position, Position::new(2, 0));
    }

    #[test]
    fn test_human_sprite_display() {
        assert_eq!(HumanSprite::Standard(CharacterSurface::King).to_string(), "20");
        assert_eq!(HumanSprite::CustomAnimation(5).to_string(), "A5");
        assert_eq!(HumanSprite::CustomStill(7).to_string(), "-7");
        assert_eq!(HumanSprite::Unknown(Some(30)).to_string(), "30");
        assert_eq!(HumanSprite::Unknown(None).to_string(), "NaN");
    }
}
