use macroquad::math::{Rect, Vec2};

/// One background cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tile {
    /// Catalog id as written in the level file.
    pub id: u32,
    /// Resolved texture path.
    pub texture: String,
}

/// Axis-aligned box in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    /// Left edge.
    pub x0: f32,
    /// Bottom edge.
    pub y0: f32,
    /// Right edge.
    pub x1: f32,
    /// Top edge.
    pub y1: f32,
}

impl Hitbox {
    /// Box from its corners.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Open-interval overlap against a box at `(x, y)` of size `w` x `h`.
    /// Touching edges do not overlap.
    #[inline]
    pub fn overlaps(&self, x: f32, y: f32, w: f32, h: f32) -> bool {
        x < self.x1 && x + w > self.x0 && y < self.y1 && y + h > self.y0
    }

    /// Horizontal extent.
    #[inline]
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Vertical extent.
    #[inline]
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Destination payload carried by a portal decoration.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalLink {
    /// Source id of the destination level, as registered.
    pub destination: String,
    /// Arrival X in world units.
    pub dest_x: f32,
    /// Arrival Y in world units.
    pub dest_y: f32,
    /// Horizontal midpoint of the portal hitbox.
    pub anchor_x: f32,
}

/// What a decoration line declared.
#[derive(Debug, Clone, PartialEq)]
pub enum DecorationKind {
    /// Scenery only.
    Static,
    /// A doorway to another level.
    Portal(PortalLink),
}

/// A static sprite placed on the grid. Portals are decorations with a
/// [`PortalLink`] payload; their hitbox doubles as the trigger geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoration {
    /// Texture path.
    pub texture: String,
    /// Grid column.
    pub grid_x: f32,
    /// Grid row, 0 at the bottom.
    pub grid_y: f32,
    /// Width in grid cells.
    pub width: f32,
    /// Height in grid cells.
    pub height: f32,
    /// Where the sprite is drawn, in world units.
    pub draw_rect: Rect,
    /// Collision box in world units.
    pub hitbox: Hitbox,
    /// Visual base, used as the depth-sort key.
    pub anchor_y: f32,
    /// Plain decoration or portal.
    pub kind: DecorationKind,
}

impl Decoration {
    /// Destination data when this is a portal.
    #[inline]
    pub fn portal(&self) -> Option<&PortalLink> {
        match &self.kind {
            DecorationKind::Portal(link) => Some(link),
            DecorationKind::Static => None,
        }
    }

    /// Whether this is a portal.
    #[inline]
    pub fn is_portal(&self) -> bool {
        self.portal().is_some()
    }
}

/// Sprite-sheet layout and playback state for an animated entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    /// Frame width in sheet pixels.
    pub frame_width: u32,
    /// Frame height in sheet pixels.
    pub frame_height: u32,
    /// Frames across one row.
    pub frames_per_row: u32,
    /// Rows in the sheet.
    pub frames_per_col: u32,
    /// First column of the cycle.
    pub start_frame_x: u32,
    /// Last row of the cycle.
    pub stop_frame_y: u32,
    /// Current column.
    pub frame_x: u32,
    /// Current row.
    pub frame_y: u32,
    /// Time since the last frame step.
    pub anim_timer: f32,
    /// Seconds per frame; zero freezes the sheet.
    pub anim_delay: f32,
}

impl SpriteSheet {
    /// Walks the sheet in raster order, wrapping back to `(start_frame_x, 0)`
    /// after the last playable row. The timer keeps its remainder.
    pub fn advance(&mut self, dt: f32) {
        self.anim_timer += dt;
        if self.anim_delay <= 0.0 || self.anim_timer < self.anim_delay {
            return;
        }
        self.anim_timer -= self.anim_delay;

        let cols = self.frames_per_row.max(1);
        let last_row = self
            .stop_frame_y
            .min(self.frames_per_col.saturating_sub(1));

        self.frame_x += 1;
        if self.frame_x >= cols {
            self.frame_x = 0;
            self.frame_y += 1;
        }
        if self.frame_y > last_row {
            self.frame_x = self.start_frame_x.min(cols - 1);
            self.frame_y = 0;
        }
    }

    /// Texture coordinates of the current frame.
    pub fn uv(&self) -> Rect {
        frame_uv(
            self.frame_x,
            self.frame_y,
            self.frames_per_row,
            self.frames_per_col,
        )
    }
}

/// Normalised source rectangle of frame `(fx, fy)` in a `cols` x `rows` sheet.
#[inline]
pub fn frame_uv(fx: u32, fy: u32, cols: u32, rows: u32) -> Rect {
    let cols = cols.max(1) as f32;
    let rows = rows.max(1) as f32;
    Rect::new(fx as f32 / cols, fy as f32 / rows, 1.0 / cols, 1.0 / rows)
}

/// An animated, collidable sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Sprite sheet path.
    pub texture: String,
    /// Grid column.
    pub grid_x: i32,
    /// Grid row, 0 at the bottom.
    pub grid_y: i32,
    /// Width in grid cells.
    pub width: f32,
    /// Height in grid cells.
    pub height: f32,
    /// Horizontal draw scale.
    pub scale_x: f32,
    /// Vertical draw scale.
    pub scale_y: f32,
    /// Animation state.
    pub sheet: SpriteSheet,
    /// Where the sprite is drawn.
    pub draw_rect: Rect,
    /// Collision box in world units.
    pub hitbox: Hitbox,
    /// Depth-sort key: the base of the hitbox.
    pub anchor_y: f32,
}

/// A loaded level. Only entity animation state changes after load.
#[derive(Debug, Clone)]
pub struct Level {
    /// Source path or name the level was registered under.
    pub id: String,
    /// Grid columns.
    pub width: usize,
    /// Grid rows.
    pub height: usize,
    /// Row-major tiles, row 0 at the bottom.
    pub tiles: Vec<Tile>,
    /// Decorations and portals in file order.
    pub decorations: Vec<Decoration>,
    /// Entities in file order.
    pub entities: Vec<Entity>,
    /// One static box per decoration, portal and entity, in file order.
    pub hitboxes: Vec<Hitbox>,
}

impl Level {
    /// A `width` x `height` level filled with `fill`.
    pub fn new(id: impl Into<String>, width: usize, height: usize, fill: Tile) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            tiles: vec![fill; width * height],
            decorations: Vec::new(),
            entities: Vec::new(),
            hitboxes: Vec::new(),
        }
    }

    /// Tile at column `x`, row `y`; `None` out of bounds.
    #[inline]
    pub fn get_tile(&self, x: usize, y: usize) -> Option<&Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x)
    }

    #[inline]
    pub(crate) fn tile_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get_mut(y * self.width + x)
    }

    /// Portals in file order, with their index among decorations.
    pub fn portals(&self) -> impl Iterator<Item = (usize, &Decoration, &PortalLink)> {
        self.decorations
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.portal().map(|p| (i, d, p)))
    }

    /// World rectangle covered by tile `(x, y)`; row 0 sits at the bottom.
    #[inline]
    pub fn tile_rect(&self, x: usize, y: usize, origin: Vec2, tile_size: Vec2) -> Rect {
        Rect::new(
            origin.x + x as f32 * tile_size.x,
            origin.y + y as f32 * tile_size.y,
            tile_size.x,
            tile_size.y,
        )
    }
}
