#![warn(missing_docs)]

//! Tile-world simulation core for Macroquad: text level loading, static-hitbox
//! movement, Y-sorted compositing and portal level transitions.

mod catalog;
mod config;
mod error;
mod game;
mod input;
mod level;
mod loader {
    pub mod geometry;
    pub mod text_loader;
}
mod player;
mod registry;
mod render {
    pub mod compositor;
    pub mod macroquad_backend;
    pub mod renderer;
}
mod transition;

pub use catalog::AssetCatalog;
pub use config::{PlayerConfig, WorldConfig};
pub use error::{LevelError, RenderError};
pub use game::{load_session, FrameReport, GameManager};
pub use input::InputState;
pub use level::{
    frame_uv, Decoration, DecorationKind, Entity, Hitbox, Level, PortalLink, SpriteSheet, Tile,
};
pub use loader::geometry::{decoration_hitbox, entity_hitbox};
pub use loader::text_loader::{level_files_in_dir, load_level_file, parse_level};
pub use player::Player;
pub use registry::LevelRegistry;
pub use render::compositor::{sort_drawables, DepthCompositor, Drawable, DrawableKind, FrameParams};
pub use render::macroquad_backend::MacroquadBackend;
pub use render::renderer::{DrawCall, RecordingBackend, RenderBackend, Renderer, TextureCache};
pub use transition::{
    find_triggered_portal, in_activation_envelope, Arrival, PortalTransition, TransitionState,
    FADE_MIN_ALPHA,
};
