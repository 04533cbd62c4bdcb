// src/loader/text_loader.rs
use crate::catalog::AssetCatalog;
use crate::config::WorldConfig;
use crate::error::LevelError;
use crate::level::*;
use crate::loader::geometry::*;
use macroquad::math::vec2;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DECORATION_FIELDS: usize = 5;
const PORTAL_FIELDS: usize = 8;
const ENTITY_FIELDS: usize = 12;
const ENTITY_ANIM_DELAY: f32 = 0.1;

/// Whitespace-separated fields of one tagged line.
struct Fields<'a> {
    source_id: &'a str,
    line: usize,
    items: Vec<&'a str>,
    next: usize,
}

impl<'a> Fields<'a> {
    fn new(
        source_id: &'a str,
        line: usize,
        tag: char,
        rest: &'a str,
        expected: usize,
    ) -> Result<Self, LevelError> {
        let items: Vec<&str> = rest.split_whitespace().collect();
        if items.len() != expected {
            return Err(LevelError::FieldCount {
                source_id: source_id.to_owned(),
                line,
                tag,
                expected,
                found: items.len(),
            });
        }
        Ok(Self {
            source_id,
            line,
            items,
            next: 0,
        })
    }

    fn text(&mut self) -> &'a str {
        let s = self.items[self.next];
        self.next += 1;
        s
    }

    fn num<T: FromStr>(&mut self, field: &'static str) -> Result<T, LevelError> {
        let raw = self.text();
        raw.parse().map_err(|_| LevelError::InvalidNumber {
            source_id: self.source_id.to_owned(),
            line: self.line,
            field,
            value: raw.to_owned(),
        })
    }
}

/// Shared inputs for parsing one level.
struct Ctx<'a> {
    source_id: &'a str,
    config: &'a WorldConfig,
}

impl Ctx<'_> {
    fn decoration(&self, f: &mut Fields<'_>) -> Result<Decoration, LevelError> {
        let texture = f.text().to_owned();
        let gx: f32 = f.num("x")?;
        let gy: f32 = f.num("y")?;
        let w: f32 = f.num("width")?;
        let h: f32 = f.num("height")?;

        let origin = vec2(self.config.x_min, self.config.y_min);
        let tile = self.config.tile_size();
        let hitbox = decoration_hitbox(origin, tile, gx, gy, w, h);

        Ok(Decoration {
            texture,
            grid_x: gx,
            grid_y: gy,
            width: w,
            height: h,
            draw_rect: decoration_rect(origin, tile, gx, gy, w, h),
            hitbox,
            anchor_y: hitbox.y0,
            kind: DecorationKind::Static,
        })
    }

    fn portal(&self, f: &mut Fields<'_>) -> Result<Decoration, LevelError> {
        let mut deco = self.decoration(f)?;
        let destination = f.text().to_owned();
        let dest_x: f32 = f.num("dest_x")?;
        let dest_y: f32 = f.num("dest_y")?;

        deco.kind = DecorationKind::Portal(PortalLink {
            destination,
            dest_x,
            dest_y,
            anchor_x: (deco.hitbox.x0 + deco.hitbox.x1) / 2.0,
        });
        Ok(deco)
    }

    fn entity(&self, f: &mut Fields<'_>) -> Result<Entity, LevelError> {
        let texture = f.text().to_owned();
        let gx: i32 = f.num("x")?;
        let gy: i32 = f.num("y")?;
        let w: f32 = f.num("width")?;
        let h: f32 = f.num("height")?;
        let scale: f32 = f.num("scale")?;
        let start_frame_x: u32 = f.num("start_frame_x")?;
        let stop_frame_y: u32 = f.num("stop_frame_y")?;
        let frames_per_row: u32 = f.num("frames_per_row")?;
        let frames_per_col: u32 = f.num("frames_per_col")?;
        let frame_width: u32 = f.num("frame_width")?;
        let frame_height: u32 = f.num("frame_height")?;

        let origin = vec2(self.config.x_min, self.config.y_min);
        let tile = self.config.tile_size();
        let hitbox = entity_hitbox(origin, tile, gx, gy, w, h, scale, scale);

        Ok(Entity {
            texture,
            grid_x: gx,
            grid_y: gy,
            width: w,
            height: h,
            scale_x: scale,
            scale_y: scale,
            sheet: SpriteSheet {
                frame_width,
                frame_height,
                frames_per_row,
                frames_per_col,
                start_frame_x,
                stop_frame_y,
                frame_x: start_frame_x,
                frame_y: 0,
                anim_timer: 0.0,
                anim_delay: ENTITY_ANIM_DELAY,
            },
            draw_rect: entity_rect(origin, tile, gx, gy, w, h, scale, scale, hitbox.y0),
            hitbox,
            anchor_y: hitbox.y0,
        })
    }

    fn tile_row(
        &self,
        level: &mut Level,
        catalog: &AssetCatalog,
        line_no: usize,
        row: usize,
        line: &str,
    ) -> Result<(), LevelError> {
        if row >= level.height {
            return Err(LevelError::TooManyRows {
                source_id: self.source_id.to_owned(),
                line: line_no,
                height: level.height,
            });
        }

        let ids = line
            .split_whitespace()
            .map(|raw| {
                raw.parse::<u32>().map_err(|_| LevelError::InvalidNumber {
                    source_id: self.source_id.to_owned(),
                    line: line_no,
                    field: "tile id",
                    value: raw.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if ids.len() != level.width {
            return Err(LevelError::TileRowWidth {
                source_id: self.source_id.to_owned(),
                line: line_no,
                expected: level.width,
                found: ids.len(),
            });
        }

        for (x, id) in ids.into_iter().enumerate() {
            if let Some(tile) = level.tile_mut(x, row) {
                *tile = Tile {
                    id,
                    texture: catalog.resolve(id).to_owned(),
                };
            }
        }
        Ok(())
    }
}

/// Parse a level description of a `width` x `height` grid.
///
/// Tagged lines become decorations (`D`), portals (`P`) and entities (`E`);
/// every other non-blank line is the next row of tile ids, row 0 first.
/// Each object gets its hitbox here, once.
pub fn parse_level(
    source_id: &str,
    text: &str,
    width: usize,
    height: usize,
    config: &WorldConfig,
    catalog: &AssetCatalog,
) -> Result<Level, LevelError> {
    let ctx = Ctx { source_id, config };
    let fill = Tile {
        id: 0,
        texture: catalog.resolve(0).to_owned(),
    };
    let mut level = Level::new(source_id, width, height, fill);
    let mut row = 0;

    for (idx, raw_line) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let mut chars = line.chars();
        let tag = chars.next().unwrap_or_default();
        let rest = chars.as_str();

        match tag {
            'D' => {
                let mut f = Fields::new(source_id, line_no, tag, rest, DECORATION_FIELDS)?;
                let deco = ctx.decoration(&mut f)?;
                tracing::debug!(
                    level = source_id,
                    texture = %deco.texture,
                    x0 = deco.hitbox.x0,
                    y0 = deco.hitbox.y0,
                    x1 = deco.hitbox.x1,
                    y1 = deco.hitbox.y1,
                    "decoration"
                );
                level.hitboxes.push(deco.hitbox);
                level.decorations.push(deco);
            }
            'P' => {
                let mut f = Fields::new(source_id, line_no, tag, rest, PORTAL_FIELDS)?;
                let portal = ctx.portal(&mut f)?;
                tracing::debug!(
                    level = source_id,
                    destination = portal.portal().map(|p| p.destination.as_str()),
                    x0 = portal.hitbox.x0,
                    y0 = portal.hitbox.y0,
                    x1 = portal.hitbox.x1,
                    y1 = portal.hitbox.y1,
                    "portal"
                );
                level.hitboxes.push(portal.hitbox);
                level.decorations.push(portal);
            }
            'E' => {
                let mut f = Fields::new(source_id, line_no, tag, rest, ENTITY_FIELDS)?;
                let entity = ctx.entity(&mut f)?;
                tracing::debug!(
                    level = source_id,
                    texture = %entity.texture,
                    x0 = entity.hitbox.x0,
                    y0 = entity.hitbox.y0,
                    x1 = entity.hitbox.x1,
                    y1 = entity.hitbox.y1,
                    "entity"
                );
                level.hitboxes.push(entity.hitbox);
                level.entities.push(entity);
            }
            _ => {
                ctx.tile_row(&mut level, catalog, line_no, row, line)?;
                row += 1;
            }
        }
    }

    if row < height {
        tracing::warn!(
            level = source_id,
            rows = row,
            height,
            "level has fewer tile rows than the grid; remaining rows use tile 0"
        );
    }

    Ok(level)
}

/// Read and parse one level file. The path, as displayed, becomes the level id.
pub fn load_level_file(
    path: &Path,
    width: usize,
    height: usize,
    config: &WorldConfig,
    catalog: &AssetCatalog,
) -> Result<Level, LevelError> {
    let txt = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level(&path.display().to_string(), &txt, width, height, config, catalog)
}

/// Files in `dir` with the given extension, sorted by path.
pub fn level_files_in_dir(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, LevelError> {
    let io_err = |source| LevelError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some(extension) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
