use std::collections::{HashMap, HashSet};

use macroquad::math::Rect;

use crate::error::RenderError;

/// Drawing primitives a graphics backend provides. Rectangles are in world
/// units; `uv` is a normalised source rectangle inside the texture.
pub trait RenderBackend {
    /// Backend texture handle.
    type Texture: Clone;

    fn load_texture(&mut self, path: &str) -> Result<Self::Texture, RenderError>;

    fn draw_textured_quad(&mut self, texture: &Self::Texture, dest: Rect, uv: Option<Rect>);

    fn draw_fade_overlay(&mut self, alpha: f32, bounds: Rect);
}

/// Path -> texture handle memo. Each path is written once and never evicted,
/// so a path keeps the same handle for the whole session. Paths that failed
/// to load (including the fallback) are remembered as `None`.
#[derive(Debug)]
pub struct TextureCache<T> {
    handles: HashMap<String, Option<T>>,
}

impl<T: Clone> TextureCache<T> {
    /// Empty cache.
    pub fn new() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }

    /// Cached entry for `path`: `Some(None)` when it failed to load.
    #[inline]
    pub fn get(&self, path: &str) -> Option<Option<T>> {
        self.handles.get(path).cloned()
    }

    /// Stores `handle` unless the path is already cached; returns the cached value.
    pub fn insert_once(&mut self, path: &str, handle: Option<T>) -> Option<T> {
        self.handles
            .entry(path.to_owned())
            .or_insert(handle)
            .clone()
    }

    /// Whether `path` was ever resolved.
    pub fn contains(&self, path: &str) -> bool {
        self.handles.contains_key(path)
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<T: Clone> Default for TextureCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A backend plus the session's texture cache.
pub struct Renderer<B: RenderBackend> {
    backend: B,
    cache: TextureCache<B::Texture>,
    missing: String,
}

impl<B: RenderBackend> Renderer<B> {
    /// Renderer with an empty cache, falling back to `missing`.
    pub fn new(backend: B, missing: impl Into<String>) -> Self {
        Self {
            backend,
            cache: TextureCache::new(),
            missing: missing.into(),
        }
    }

    /// The backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the backend.
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// The texture cache.
    pub fn cache(&self) -> &TextureCache<B::Texture> {
        &self.cache
    }

    /// Handle for `path`, loading it on first use. Paths that fail to load
    /// resolve to the missing-texture handle.
    pub fn resolve_handle(&mut self, path: &str) -> Option<B::Texture> {
        if let Some(cached) = self.cache.get(path) {
            return cached;
        }

        let handle = match self.backend.load_texture(path) {
            Ok(tex) => Some(tex),
            Err(err) => {
                tracing::warn!(path, error = %err, "texture load failed, using fallback");
                if path == self.missing {
                    None
                } else {
                    let missing = self.missing.clone();
                    self.resolve_handle(&missing)
                }
            }
        };
        self.cache.insert_once(path, handle)
    }

    /// Draws the whole texture at `path` over `dest`.
    pub fn draw_quad(&mut self, path: &str, dest: Rect) {
        if let Some(tex) = self.resolve_handle(path) {
            self.backend.draw_textured_quad(&tex, dest, None);
        }
    }

    /// Draws one sprite-sheet frame.
    pub fn draw_frame(&mut self, path: &str, dest: Rect, uv: Rect) {
        if let Some(tex) = self.resolve_handle(path) {
            self.backend.draw_textured_quad(&tex, dest, Some(uv));
        }
    }

    /// Full-screen black overlay; `alpha` is clamped to 0..=1.
    pub fn draw_fade_overlay(&mut self, alpha: f32, bounds: Rect) {
        self.backend.draw_fade_overlay(alpha.clamp(0.0, 1.0), bounds);
    }
}

/// One call observed by [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    /// A textured quad.
    Quad {
        /// Texture path as requested.
        path: String,
        /// Destination in world units.
        dest: Rect,
        /// Normalised source rectangle.
        uv: Option<Rect>,
    },
    /// A fade overlay.
    Fade {
        /// Opacity.
        alpha: f32,
        /// Covered area.
        bounds: Rect,
    },
}

/// Headless backend that records draw calls in order. Handles are indices
/// into the list of loaded paths.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    /// Every draw, in order.
    pub calls: Vec<DrawCall>,
    loaded: Vec<String>,
    failing: HashSet<String>,
}

impl RecordingBackend {
    /// Backend where every texture loads.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every load of `path` fail.
    pub fn fail_on(&mut self, path: impl Into<String>) {
        self.failing.insert(path.into());
    }

    /// Paths handed to `load_texture`, in order, including failed attempts.
    pub fn loads(&self) -> &[String] {
        &self.loaded
    }

    /// Forgets recorded draws; loads stay counted.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Paths of quad calls, in draw order.
    pub fn quad_paths(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Quad { path, .. } => Some(path.as_str()),
                DrawCall::Fade { .. } => None,
            })
            .collect()
    }
}

impl RenderBackend for RecordingBackend {
    type Texture = usize;

    fn load_texture(&mut self, path: &str) -> Result<usize, RenderError> {
        self.loaded.push(path.to_owned());
        if self.failing.contains(path) {
            return Err(RenderError::Io {
                path: path.to_owned(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
            });
        }
        Ok(self.loaded.len() - 1)
    }

    fn draw_textured_quad(&mut self, texture: &usize, dest: Rect, uv: Option<Rect>) {
        let path = self.loaded.get(*texture).cloned().unwrap_or_default();
        self.calls.push(DrawCall::Quad { path, dest, uv });
    }

    fn draw_fade_overlay(&mut self, alpha: f32, bounds: Rect) {
        self.calls.push(DrawCall::Fade { alpha, bounds });
    }
}
