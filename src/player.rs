use crate::config::{PlayerConfig, WorldConfig};
use crate::level::{frame_uv, Level};
use macroquad::math::{Rect, Vec2};

const ROW_DOWN: u32 = 4;
const ROW_UP: u32 = 5;
const ROW_RIGHT: u32 = 6;
const ROW_LEFT: u32 = 7;

/// The controllable character. Movement is resolved one axis at a time
/// against the level's static hitboxes; a blocked move leaves it untouched.
#[derive(Debug, Clone)]
pub struct Player {
    /// Collision box left edge.
    pub x: f32,
    /// Collision box bottom edge.
    pub y: f32,
    /// Collision box width.
    pub width: f32,
    /// Collision box height.
    pub height: f32,
    /// World units per second.
    pub speed: f32,
    /// Sprite sheet path.
    pub texture: String,
    /// Frame width in sheet pixels.
    pub frame_width: u32,
    /// Frame height in sheet pixels.
    pub frame_height: u32,
    /// Frames across one row.
    pub frames_per_row: u32,
    /// Rows in the sheet.
    pub frames_per_col: u32,
    /// Current walk column.
    pub frame_x: u32,
    /// Current sheet row (direction).
    pub frame_y: u32,
    /// Time since the last walk frame.
    pub anim_timer: f32,
    /// Seconds per walk frame.
    pub anim_delay: f32,
    sprite_scale: f32,
    /// World bounds the box must stay inside.
    bounds: Rect,
}

impl Player {
    /// Player at the configured spawn point.
    pub fn new(config: &PlayerConfig, world: &WorldConfig) -> Self {
        Self {
            x: config.spawn_x,
            y: config.spawn_y,
            width: config.width,
            height: config.height,
            speed: config.speed,
            texture: config.texture.clone(),
            frame_width: config.frame_width,
            frame_height: config.frame_height,
            frames_per_row: config.frames_per_row,
            frames_per_col: config.frames_per_col,
            frame_x: 0,
            frame_y: 0,
            anim_timer: 0.0,
            anim_delay: config.anim_delay,
            sprite_scale: config.sprite_scale,
            bounds: world.bounds(),
        }
    }

    /// Collision box origin.
    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Teleports without any collision check.
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }

    /// Whether a box at `(x, y)` overlaps any hitbox of `level`.
    pub fn collides_with_hitboxes(&self, level: &Level, x: f32, y: f32) -> bool {
        level
            .hitboxes
            .iter()
            .any(|hb| hb.overlaps(x, y, self.width, self.height))
    }

    /// Tries to move up by `speed * dt`. Returns whether the move was kept.
    pub fn move_up(&mut self, dt: f32, level: &Level) -> bool {
        let next = self.y + self.speed * dt;
        if next + self.height > self.bounds.bottom() {
            return false;
        }
        self.commit(level, self.x, next, ROW_UP, dt)
    }

    /// Tries to move down by `speed * dt`. Returns whether the move was kept.
    pub fn move_down(&mut self, dt: f32, level: &Level) -> bool {
        let next = self.y - self.speed * dt;
        if next < self.bounds.y {
            return false;
        }
        self.commit(level, self.x, next, ROW_DOWN, dt)
    }

    /// Tries to move left by `speed * dt`. Returns whether the move was kept.
    pub fn move_left(&mut self, dt: f32, level: &Level) -> bool {
        let next = self.x - self.speed * dt;
        if next < self.bounds.x {
            return false;
        }
        self.commit(level, next, self.y, ROW_LEFT, dt)
    }

    /// Tries to move right by `speed * dt`. Returns whether the move was kept.
    pub fn move_right(&mut self, dt: f32, level: &Level) -> bool {
        let next = self.x + self.speed * dt;
        if next + self.width > self.bounds.right() {
            return false;
        }
        self.commit(level, next, self.y, ROW_RIGHT, dt)
    }

    fn commit(&mut self, level: &Level, x: f32, y: f32, row: u32, dt: f32) -> bool {
        if self.collides_with_hitboxes(level, x, y) {
            return false;
        }
        self.x = x;
        self.y = y;
        self.frame_y = row;
        self.update_animation(dt);
        true
    }

    /// Advances the walk cycle; the timer keeps its remainder. The last two
    /// columns of each row are not part of the cycle.
    pub fn update_animation(&mut self, dt: f32) {
        self.anim_timer += dt;
        if self.anim_timer >= self.anim_delay {
            self.anim_timer -= self.anim_delay;
            let cycle = self.frames_per_row.saturating_sub(2).max(1);
            self.frame_x = (self.frame_x + 1) % cycle;
        }
    }

    /// Sprite rectangle in world units: centred on the box, feet on its base.
    pub fn draw_rect(&self) -> Rect {
        let w = self.frame_width as f32 * self.sprite_scale;
        let h = self.frame_height as f32 * self.sprite_scale;
        Rect::new(self.x + (self.width - w) / 2.0, self.y, w, h)
    }

    /// Texture coordinates for frame `(fx, fy)` of the player sheet.
    pub fn frame_uv(&self, fx: u32, fy: u32) -> Rect {
        frame_uv(fx, fy, self.frames_per_row, self.frames_per_col)
    }

    /// Depth-sort key: the bottom of the collision box.
    #[inline]
    pub fn anchor_y(&self) -> f32 {
        self.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{Hitbox, Tile};

    fn player_at(x: f32, y: f32) -> Player {
        let world = WorldConfig::default();
        let mut p = Player::new(&world.player, &world);
        p.set_position(x, y);
        p
    }

    fn level_with(hitboxes: Vec<Hitbox>) -> Level {
        let mut lvl = Level::new("t", 1, 1, Tile::default());
        lvl.hitboxes = hitboxes;
        lvl
    }

    #[test]
    fn open_space_moves_exactly_one_axis() {
        let lvl = level_with(vec![]);
        let mut p = player_at(10.0, 10.0);
        assert!(p.move_right(0.1, &lvl));
        assert_eq!(p.x, 11.0);
        assert_eq!(p.y, 10.0);
        assert_eq!(p.frame_y, ROW_RIGHT);

        assert!(p.move_up(0.1, &lvl));
        assert_eq!(p.x, 11.0);
        assert_eq!(p.y, 11.0);
        assert_eq!(p.frame_y, ROW_UP);
    }

    #[test]
    fn blocked_move_leaves_state_unchanged() {
        let lvl = level_with(vec![Hitbox::new(11.5, 9.0, 13.0, 12.0)]);
        let mut p = player_at(10.0, 10.0);
        let before = (p.x, p.y, p.frame_x, p.frame_y, p.anim_timer);
        assert!(!p.move_right(0.1, &lvl));
        assert_eq!(before, (p.x, p.y, p.frame_x, p.frame_y, p.anim_timer));
    }

    #[test]
    fn touching_a_hitbox_edge_is_allowed() {
        let lvl = level_with(vec![Hitbox::new(12.0, 9.0, 13.0, 12.0)]);
        let mut p = player_at(10.0, 10.0);
        assert!(p.move_right(0.1, &lvl));
        assert_eq!(p.x + p.width, 12.0);
    }

    #[test]
    fn world_bounds_reject_moves() {
        let lvl = level_with(vec![]);
        let mut p = player_at(0.0, -2.0);
        assert!(!p.move_left(0.1, &lvl));
        assert!(!p.move_down(0.1, &lvl));

        let mut p = player_at(49.5, 43.8);
        assert!(!p.move_right(0.1, &lvl));
        assert!(!p.move_up(0.1, &lvl));
    }

    #[test]
    fn animation_cycles_skip_last_two_columns_and_keep_phase() {
        let mut p = player_at(0.0, 0.0);
        for _ in 0..6 {
            p.update_animation(0.1);
        }
        // 8 columns per row -> cycle of 6.
        assert_eq!(p.frame_x, 0);
        p.update_animation(0.13);
        assert_eq!(p.frame_x, 1);
        assert!((p.anim_timer - 0.03).abs() < 1e-5);
    }
}
