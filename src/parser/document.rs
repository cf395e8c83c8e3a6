//! Map document parsing.
//!
//! The top level of a map file is a flat list of `#NAME value#END` chunks.
//! Each chunk is dispatched by name; unknown names are reported and skipped.

use crate::config::ParseOptions;
use crate::diagnostics::{codes, Diagnostics};
use crate::error::{MapError, Result};
use crate::types::{MapDocument, Position, DEFAULT_BACKGROUND_IMAGE_URL};

use super::context::Context;
use super::entities::{parse_hero, parse_human, parse_look_point, parse_teleport_point, parse_treasure_box};
use super::event::parse_event_point;
use super::tiles::load_grid;
use super::tokenizer::{Chunk, Terminator, CHUNK_END};

/// A parsed document and everything the parser recovered from on the way.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub document: MapDocument,
    pub diagnostics: Diagnostics,
}

/// Parse a map with default options.
pub fn parse_map(source: &str) -> Result<MapDocument> {
    parse_map_with(source, &ParseOptions::default()).map(|output| output.document)
}

/// Parse a map.
///
/// Returns the complete document or the first fatal error; recoverable
/// problems are listed in [`ParseOutput::diagnostics`].
pub fn parse_map_with(source: &str, options: &ParseOptions) -> Result<ParseOutput> {
    let mut ctx = Context::new(options);
    let mut document = MapDocument::with_limits(Position::default(), options.max_width, options.shard_capacity);
    let mut hero = None;

    let mut reader = ctx.reader(source, 0);
    let end = Terminator::Fixed(CHUNK_END);

    while let Some(chunk) = ctx.next_chunk(&mut reader, &end)? {
        load_chunk(&chunk, &mut document, &mut hero, &mut ctx).map_err(|e| e.in_chunk(chunk.name, chunk.offset))?;
    }

    document.hero = hero.ok_or(MapError::MissingRequiredField {
        field: "HERO",
        offset: source.len(),
    })?;

    Ok(ParseOutput {
        document,
        diagnostics: ctx.diagnostics,
    })
}

fn load_chunk(
    chunk: &Chunk<'_>,
    document: &mut MapDocument,
    hero: &mut Option<Position>,
    ctx: &mut Context<'_>,
) -> Result<()> {
    let value = chunk.value;
    let offset = chunk.value_offset;

    match chunk.name {
        "HERO" => {
            if let Some(position) = parse_hero(value, offset, ctx)? {
                *hero = Some(position);
            }
        }
        "BGM" => {
            let url = value.trim();
            document.bgm_url = (!url.is_empty()).then(|| url.to_string());
        }
        "BGIMG" => {
            let url = value.trim();
            document.background_image_url = if url.is_empty() {
                DEFAULT_BACKGROUND_IMAGE_URL.to_string()
            } else {
                url.to_string()
            };
        }
        "HUMAN" => {
            document.humans.insert(parse_human(value, ctx)?);
        }
        "TBOX" => {
            document.treasure_boxes.insert(parse_treasure_box(value, ctx)?);
        }
        "SPOINT" => {
            document.look_points.insert(parse_look_point(value, ctx)?);
        }
        "MPOINT" => {
            document.teleport_points.insert(parse_teleport_point(value, ctx)?);
        }
        "EPOINT" => {
            document.event_points.insert(parse_event_point(value, offset, ctx)?);
        }
        "FLOOR" => load_grid(value, offset, &mut document.floor, ctx)?,
        "MAP" => load_grid(value, offset, &mut document.objects, ctx)?,
        name => ctx.diagnostics.warning(
            codes::UNKNOWN_CHUNK,
            format!("unknown chunk '{}' ignored", name),
            chunk.offset,
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Command, EventTiming, TileCode};

    #[test]
    fn test_hero_only() {
        let doc = parse_map("#HERO\n3,4#END").unwrap();
        assert_eq!(doc.hero, Position::new(3, 4));
        assert_eq!(doc.background_image_url, DEFAULT_BACKGROUND_IMAGE_URL);
        assert_eq!(doc.bgm_url, None);
        assert_eq!(doc.entity_count(), 0);
    }

    #[test]
    fn test_missing_hero() {
        let source = "#BGM song.mp3#END\n";
        let err = parse_map(source).unwrap_err();
        assert!(matches!(
            err,
            MapError::MissingRequiredField { field: "HERO", offset } if offset == source.len()
        ));
    }

    #[test]
    fn test_non_numeric_hero_is_kept() {
        let doc = parse_map("#HERO\nx,y#END").unwrap();
        assert_eq!(doc.hero, Position { x: None, y: None });
        assert_eq!(crate::writer::write_map(&doc).lines().nth(1), Some("NaN,NaN#END"));
    }

    #[test]
    fn test_hero_without_y_is_missing() {
        let output = parse_map_with("#HERO\n3#END", &ParseOptions::default());
        assert!(matches!(output, Err(MapError::MissingRequiredField { .. })));
    }

    #[test]
    fn test_header_chunks() {
        let doc = parse_map("#HERO 0,0#END\n#BGM  song.mp3 \n#END\n#BGIMG \n#END").unwrap();
        assert_eq!(doc.bgm_url.as_deref(), Some("song.mp3"));
        assert_eq!(doc.background_image_url, DEFAULT_BACKGROUND_IMAGE_URL);
    }

    #[test]
    fn test_unknown_chunk_is_reported() {
        let output = parse_map_with("#HERO 0,0#END\n#WEATHER rain#END", &ParseOptions::default()).unwrap();
        assert_eq!(output.diagnostics.count(codes::UNKNOWN_CHUNK), 1);
        assert_eq!(output.diagnostics.iter().next().unwrap().offset, 14);
    }

    #[test]
    fn test_entities_are_keyed_by_position() {
        let source = "\
#HERO 0,0#END
#TBOX 1,1,first#END
#TBOX 1,1,second#END
#TBOX 2,1,other#END
";
        let doc = parse_map(source).unwrap();
        assert_eq!(doc.treasure_boxes.len(), 2);
        assert_eq!(doc.treasure_boxes.get(1, 1).unwrap().message, "second");

        let order: Vec<_> = doc.treasure_boxes.iter().map(|t| t.message.as_str()).collect();
        assert_eq!(order, vec!["second", "other"]);
    }

    #[test]
    fn test_full_map() {
        let source = "\
#HERO
5,5#END
#FLOOR
0_8 0_8 12C
0_9#END
#MAP
 3_4#END
#HUMAN
20,2,2,1,0,1,Hello#END
#SPOINT
3,3,1,A sign#END
#MPOINT
4,4,2,0,0#END
#EPOINT
tx:1,ty:2,
#PH0 tm:1,
#MSG m:Hi#ED
#PHEND0
#END
";
        let output = parse_map_with(source, &ParseOptions::default()).unwrap();
        assert!(output.diagnostics.is_empty());

        let doc = output.document;
        assert_eq!(doc.hero, Position::new(5, 5));
        assert_eq!(doc.floor.len(), 4);
        assert_eq!(doc.floor.get(2, 0), Some(&TileCode::custom(12, true)));
        assert_eq!(doc.floor.get(0, 1), Some(&TileCode::standard(0, 9)));
        assert_eq!(doc.objects.get(1, 0), Some(&TileCode::standard(3, 4)));
        assert!(doc.is_blocked(1, 0));
        assert_eq!(doc.humans.len(), 1);
        assert!(doc.look_points.get(3, 3).unwrap().once);
        assert_eq!(doc.teleport_points.get(4, 4).unwrap().destination.map_id, Some(2));

        let event = doc.event_points.get(1, 2).unwrap();
        assert_eq!(event.primary().timing, EventTiming::Touch);
        assert_eq!(event.primary().commands[0].name(), "MSG");
        assert!(matches!(event.primary().commands[0], Command::Raw(_)));
    }

    #[test]
    fn test_lenient_recovery() {
        let source = "garbage\n#HERO 1,1#END\n#FLOOR\n400_1 0_8#END\n#BGM tail.mp3";
        let output = parse_map_with(source, &ParseOptions::default()).unwrap();

        assert_eq!(output.document.bgm_url.as_deref(), Some("tail.mp3"));
        assert_eq!(output.document.floor.len(), 2);
        assert_eq!(output.diagnostics.count(codes::MALFORMED_CHUNK), 1);
        assert_eq!(output.diagnostics.count(codes::UNTERMINATED_CHUNK), 1);
    }

    #[test]
    fn test_strict_unterminated() {
        let err = parse_map_with("#HERO 1,1#END\n#BGM tail.mp3", &ParseOptions::strict()).unwrap_err();
        assert!(matches!(err, MapError::UnterminatedChunk { ref name, .. } if name == "BGM"));
    }

    #[test]
    fn test_errors_name_their_chunk() {
        let source = "#HERO 1,1#END\n#HUMAN 0,x,1,0,0,0#END";
        let err = parse_map_with(source, &ParseOptions::strict()).unwrap_err();
        assert_eq!(err.chunk_name(), Some("HUMAN"));
        assert_eq!(err.offset(), Some(14));
    }

    #[test]
    fn test_options_limit_grids() {
        let options = ParseOptions {
            max_width: 2,
            ..ParseOptions::default()
        };
        let output = parse_map_with("#HERO 0,0#END\n#FLOOR\n1 2 3#END", &options).unwrap();
        assert_eq!(output.document.floor.len(), 2);
        assert_eq!(output.diagnostics.count(codes::OUT_OF_RANGE), 1);
    }

    #[test]
    fn test_wide_grid_keeps_far_cells_apart() {
        let options = ParseOptions::parse("max_width: 100000").unwrap();
        let source = format!("#HERO 0,0#END\n#FLOOR\n5{}7#END", " ".repeat(32_768));
        let doc = parse_map_with(&source, &options).unwrap().document;

        assert_eq!(doc.floor.get(0, 0), Some(&TileCode::custom(5, false)));
        assert_eq!(doc.floor.get(32_768, 0), Some(&TileCode::custom(7, false)));
        assert_eq!(doc.floor.len(), 2);
    }

    #[test]
    fn test_unreadable_records_are_kept() {
        let source = "\
#HERO 0,0#END
#HUMAN 40,x,2,0,0,0,Lost#END
#TBOX ?,?,Gold#END
";
        let output = parse_map_with(source, &ParseOptions::default()).unwrap();
        assert!(output.diagnostics.is_empty());

        let doc = output.document;
        let human = doc.humans.get_at(Position { x: None, y: Some(2) }).unwrap();
        assert_eq!(human.message, "Lost");
        let tbox = doc.treasure_boxes.get_at(Position { x: None, y: None }).unwrap();
        assert_eq!(tbox.message, "Gold");
    }
}
