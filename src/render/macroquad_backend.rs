use macroquad::prelude::*;

use crate::error::RenderError;
use crate::render::renderer::RenderBackend;

/// Draws through macroquad with a y-up camera spanning the world bounds.
pub struct MacroquadBackend {
    bounds: Rect,
}

impl MacroquadBackend {
    /// Backend whose camera spans `bounds`.
    pub fn new(bounds: Rect) -> Self {
        Self { bounds }
    }

    /// Y-up camera covering the world bounds.
    pub fn camera(&self) -> Camera2D {
        Camera2D {
            target: self.bounds.center(),
            zoom: vec2(2.0 / self.bounds.w, 2.0 / self.bounds.h),
            ..Default::default()
        }
    }

    /// Clears the screen and installs the world camera.
    pub fn begin_frame(&self) {
        clear_background(BLACK);
        set_camera(&self.camera());
    }
}

impl RenderBackend for MacroquadBackend {
    type Texture = Texture2D;

    fn load_texture(&mut self, path: &str) -> Result<Texture2D, RenderError> {
        let bytes = std::fs::read(path).map_err(|source| RenderError::Io {
            path: path.to_owned(),
            source,
        })?;
        let image = Image::from_file_with_format(&bytes, None).map_err(|e| RenderError::Decode {
            path: path.to_owned(),
            reason: format!("{e:?}"),
        })?;
        let tex = Texture2D::from_image(&image);
        tex.set_filter(FilterMode::Nearest);
        Ok(tex)
    }

    fn draw_textured_quad(&mut self, texture: &Texture2D, dest: Rect, uv: Option<Rect>) {
        let source = uv.map(|uv| {
            let tw = texture.width();
            let th = texture.height();
            Rect::new(uv.x * tw, uv.y * th, uv.w * tw, uv.h * th)
        });

        draw_texture_ex(
            texture,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                dest_size: Some(vec2(dest.w, dest.h)),
                source,
                // The world camera is y-up; images are stored top row first.
                flip_y: true,
                ..Default::default()
            },
        );
    }

    fn draw_fade_overlay(&mut self, alpha: f32, bounds: Rect) {
        draw_rectangle(
            bounds.x,
            bounds.y,
            bounds.w,
            bounds.h,
            Color::new(0.0, 0.0, 0.0, alpha),
        );
    }
}
