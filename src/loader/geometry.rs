//! Grid -> world conversions for level objects.
//!
//! The correction factors below are tuned against the stock art and must stay
//! as they are: decorations lean right and up with their grid position, and
//! entity boxes are trimmed asymmetrically so sprites can overlap scenery
//! a little before they block.

use macroquad::math::{Rect, Vec2};

use crate::level::Hitbox;

const DECORATION_SHIFT_X: f32 = 0.04;
const DECORATION_SHIFT_Y: f32 = 0.10;
/// Decorations taller than this only block their lower part.
const DECORATION_MAX_SOLID_ROWS: f32 = 3.0;

const ENTITY_BOX_SCALE: f32 = 0.4;
const ENTITY_CENTER_X: f32 = 0.5;
const ENTITY_CENTER_Y: f32 = 0.8;
const ENTITY_INSET: f32 = 0.01;
const ENTITY_TOP_TRIM: f32 = 0.40;

/// Blocking box of a decoration or portal.
pub fn decoration_hitbox(origin: Vec2, tile: Vec2, gx: f32, gy: f32, w: f32, h: f32) -> Hitbox {
    let cx = DECORATION_SHIFT_X * gx;
    let cy = DECORATION_SHIFT_Y * gy;
    let solid_h = h.min(DECORATION_MAX_SOLID_ROWS);

    Hitbox {
        x0: origin.x + gx * tile.x * (1.0 + DECORATION_SHIFT_X),
        y0: origin.y + gy * tile.y + tile.y * cy,
        x1: origin.x + (gx + w) * tile.x + tile.x * cx,
        y1: origin.y + (gy + solid_h) * tile.y + tile.y * cy,
    }
}

/// Where a decoration sprite is drawn: its grid cells, untouched.
pub fn decoration_rect(origin: Vec2, tile: Vec2, gx: f32, gy: f32, w: f32, h: f32) -> Rect {
    Rect::new(origin.x + gx * tile.x, origin.y + gy * tile.y, w * tile.x, h * tile.y)
}

/// Centre point an entity sprite is placed around.
#[inline]
pub fn entity_center(origin: Vec2, tile: Vec2, gx: i32, gy: i32) -> Vec2 {
    Vec2::new(
        origin.x + gx as f32 * tile.x + tile.x * ENTITY_CENTER_X,
        origin.y + gy as f32 * tile.y + tile.y * ENTITY_CENTER_Y,
    )
}

/// Blocking box of an entity.
#[allow(clippy::too_many_arguments)]
pub fn entity_hitbox(
    origin: Vec2,
    tile: Vec2,
    gx: i32,
    gy: i32,
    w: f32,
    h: f32,
    scale_x: f32,
    scale_y: f32,
) -> Hitbox {
    let scaled_w = w * tile.x * scale_x * ENTITY_BOX_SCALE;
    let scaled_h = h * tile.y * scale_y * ENTITY_BOX_SCALE;
    let c = entity_center(origin, tile, gx, gy);

    let mut hb = Hitbox {
        x0: c.x - scaled_w / 2.0,
        y0: c.y - scaled_h / 2.0,
        x1: c.x + scaled_w / 3.0,
        y1: c.y + scaled_h / 2.0,
    };

    hb.x0 += tile.x * ENTITY_INSET;
    hb.y0 += tile.y * ENTITY_INSET;
    hb.x1 -= tile.x * ENTITY_INSET;
    if hb.y1 - hb.y1 * ENTITY_TOP_TRIM > hb.y0 {
        hb.y1 -= hb.y1 * ENTITY_TOP_TRIM;
    }
    hb
}

/// Entity sprite rectangle: centred on the cell, standing on the hitbox base.
#[allow(clippy::too_many_arguments)]
pub fn entity_rect(
    origin: Vec2,
    tile: Vec2,
    gx: i32,
    gy: i32,
    w: f32,
    h: f32,
    scale_x: f32,
    scale_y: f32,
    base_y: f32,
) -> Rect {
    let draw_w = w * tile.x * scale_x;
    let draw_h = h * tile.y * scale_y;
    let c = entity_center(origin, tile, gx, gy);
    Rect::new(c.x - draw_w / 2.0, base_y, draw_w, draw_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn tile() -> Vec2 {
        Vec2::new(51.0 / 16.0, 47.3 / 16.0)
    }

    fn origin() -> Vec2 {
        Vec2::new(0.0, -2.0)
    }

    #[test]
    fn decoration_box_matches_tuned_formula() {
        let t = tile();
        let hb = decoration_hitbox(origin(), t, 2.0, 3.0, 2.0, 1.0);
        assert!((hb.x0 - 2.0 * t.x * 1.04).abs() < EPS);
        assert!((hb.y0 - (-2.0 + 3.0 * t.y + t.y * 0.3)).abs() < EPS);
        assert!((hb.x1 - (4.0 * t.x + t.x * 0.08)).abs() < EPS);
        assert!((hb.y1 - (-2.0 + 4.0 * t.y + t.y * 0.3)).abs() < EPS);
    }

    #[test]
    fn decoration_height_is_capped_at_three_rows() {
        let t = tile();
        let tall = decoration_hitbox(origin(), t, 0.0, 0.0, 1.0, 7.0);
        assert!((tall.height() - 3.0 * t.y).abs() < EPS);
    }

    #[test]
    fn zero_height_decoration_has_no_vertical_extent() {
        let hb = decoration_hitbox(origin(), tile(), 5.0, 4.0, 1.0, 0.0);
        assert!(hb.height().abs() < EPS);
        assert!(hb.x0 < hb.x1);
    }

    #[test]
    fn entity_box_keeps_asymmetric_right_edge() {
        let t = tile();
        let hb = entity_hitbox(origin(), t, 4, 6, 1.0, 1.0, 1.0, 1.0);
        let sw = t.x * 0.4;
        let sh = t.y * 0.4;
        let cx = 4.0 * t.x + t.x * 0.5;
        let cy = -2.0 + 6.0 * t.y + t.y * 0.8;
        assert!((hb.x0 - (cx - sw / 2.0 + t.x * 0.01)).abs() < EPS);
        assert!((hb.x1 - (cx + sw / 3.0 - t.x * 0.01)).abs() < EPS);
        assert!((hb.y0 - (cy - sh / 2.0 + t.y * 0.01)).abs() < EPS);
        // Here y1 * 0.6 < y0, so the top trim is skipped.
        assert!((hb.y1 - (cy + sh / 2.0)).abs() < EPS);
    }

    #[test]
    fn entity_top_trim_applies_near_the_origin() {
        let t = tile();
        // Cell row 0 sits around y = 0, where trimming y1 by 40% keeps it above y0.
        let hb = entity_hitbox(origin(), t, 0, 0, 1.0, 4.0, 1.0, 1.0);
        let cy = -2.0 + t.y * 0.8;
        let raw_y1 = cy + 4.0 * t.y * 0.4 / 2.0;
        assert!(raw_y1 - raw_y1 * 0.4 > hb.y0);
        assert!((hb.y1 - raw_y1 * 0.6).abs() < EPS);
    }
}
