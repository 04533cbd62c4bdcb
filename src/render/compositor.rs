//! Per-frame depth compositing.
//!
//! Background tiles go first in raster order. Everything else becomes a
//! [`Drawable`] keyed by its render anchor and is painted back to front:
//! higher anchors first, equal anchors in insertion order.

use macroquad::math::{vec2, Rect};

use crate::config::WorldConfig;
use crate::level::{DecorationKind, Level};
use crate::player::Player;
use crate::render::renderer::{RenderBackend, Renderer};

/// What a drawable refers to. Indices point into the level being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    /// The player sprite.
    Player,
    /// Decoration index.
    Decoration(usize),
    /// Portal (decoration index).
    Portal(usize),
    /// Entity index.
    Entity(usize),
}

/// One sortable draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable {
    /// Sort key; larger draws first.
    pub anchor_y: f32,
    /// What to draw.
    pub kind: DrawableKind,
}

/// Sorts back to front: descending anchor, stable for ties.
pub fn sort_drawables(drawables: &mut [Drawable]) {
    drawables.sort_by(|a, b| b.anchor_y.total_cmp(&a.anchor_y));
}

/// Inputs that change from frame to frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameParams {
    /// Render-frame delta, drives entity animation.
    pub dt: f32,
    /// Whether the player moved recently; idle players show frame (0, 0).
    pub player_active: bool,
    /// Opacity of the full-screen fade, if one is playing.
    pub fade_alpha: Option<f32>,
}

/// Collects, sorts and draws one frame. Keeps its scratch list between frames.
#[derive(Debug, Default)]
pub struct DepthCompositor {
    scratch: Vec<Drawable>,
}

impl DepthCompositor {
    /// Compositor with an empty scratch list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decorations, portals and entities in file order, then the player.
    pub fn collect(&mut self, level: &Level, player: &Player) -> &[Drawable] {
        self.scratch.clear();
        for (i, deco) in level.decorations.iter().enumerate() {
            let kind = match deco.kind {
                DecorationKind::Static => DrawableKind::Decoration(i),
                DecorationKind::Portal(_) => DrawableKind::Portal(i),
            };
            self.scratch.push(Drawable {
                anchor_y: deco.anchor_y,
                kind,
            });
        }
        for (i, entity) in level.entities.iter().enumerate() {
            self.scratch.push(Drawable {
                anchor_y: entity.anchor_y,
                kind: DrawableKind::Entity(i),
            });
        }
        self.scratch.push(Drawable {
            anchor_y: player.anchor_y(),
            kind: DrawableKind::Player,
        });
        &self.scratch
    }

    /// Draws one full frame. Entities advance their animation as they are drawn.
    pub fn compose<B: RenderBackend>(
        &mut self,
        renderer: &mut Renderer<B>,
        level: &mut Level,
        player: &Player,
        config: &WorldConfig,
        params: FrameParams,
    ) {
        draw_tiles(renderer, level, config);

        self.collect(level, player);
        sort_drawables(&mut self.scratch);

        for d in &self.scratch {
            match d.kind {
                DrawableKind::Decoration(i) | DrawableKind::Portal(i) => {
                    if let Some(deco) = level.decorations.get(i) {
                        renderer.draw_quad(&deco.texture, deco.draw_rect);
                    }
                }
                DrawableKind::Entity(i) => {
                    if let Some(entity) = level.entities.get_mut(i) {
                        entity.sheet.advance(params.dt);
                        renderer.draw_frame(&entity.texture, entity.draw_rect, entity.sheet.uv());
                    }
                }
                DrawableKind::Player => {
                    let (fx, fy) = if params.player_active {
                        (player.frame_x, player.frame_y)
                    } else {
                        (0, 0)
                    };
                    renderer.draw_frame(&player.texture, player.draw_rect(), player.frame_uv(fx, fy));
                }
            }
        }

        if let Some(alpha) = params.fade_alpha {
            renderer.draw_fade_overlay(alpha, config.bounds());
        }
    }
}

fn draw_tiles<B: RenderBackend>(renderer: &mut Renderer<B>, level: &Level, config: &WorldConfig) {
    let origin = vec2(config.x_min, config.y_min);
    let tile_size = config.tile_size();
    for y in 0..level.height {
        for x in 0..level.width {
            if let Some(tile) = level.get_tile(x, y) {
                let rect: Rect = level.tile_rect(x, y, origin, tile_size);
                renderer.draw_quad(&tile.texture, rect);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(anchor_y: f32, i: usize) -> Drawable {
        Drawable {
            anchor_y,
            kind: DrawableKind::Decoration(i),
        }
    }

    #[test]
    fn sorts_descending() {
        let mut v = vec![d(5.0, 0), d(1.0, 1), d(3.0, 2)];
        sort_drawables(&mut v);
        let anchors: Vec<f32> = v.iter().map(|x| x.anchor_y).collect();
        assert_eq!(anchors, vec![5.0, 3.0, 1.0]);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let mut v = vec![d(2.0, 0), d(7.0, 1), d(2.0, 2)];
        sort_drawables(&mut v);
        let kinds: Vec<DrawableKind> = v.iter().map(|x| x.kind).collect();
        assert_eq!(
            kinds,
            vec![
                DrawableKind::Decoration(1),
                DrawableKind::Decoration(0),
                DrawableKind::Decoration(2)
            ]
        );
    }
}
