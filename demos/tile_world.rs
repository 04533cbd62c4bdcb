use macroquad::prelude::*;
use tile_world::{load_session, InputState, MacroquadBackend, Renderer, WorldConfig};
use tracing_subscriber::EnvFilter;

fn window_conf() -> Conf {
    Conf {
        window_title: "TileWorld-2d".into(),
        window_width: 1024,
        window_height: 768,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::error!("{err}");
                std::process::exit(1);
            }
        },
        None => WorldConfig::default(),
    };

    // Levels are mandatory: any load error ends the process here.
    let mut game = match load_session(config) {
        Ok(game) => game,
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(1);
        }
    };

    let backend = MacroquadBackend::new(game.config().bounds());
    let mut renderer = Renderer::new(backend, game.config().missing_texture.clone());

    loop {
        renderer.backend().begin_frame();

        let input = InputState::from_keyboard();
        let report = game.frame(get_frame_time() as f64, input, &mut renderer);
        if let Some(err) = report.integrity_error {
            tracing::debug!(%err, "frame reported integrity error");
        }

        set_default_camera();
        draw_text(&format!("FPS: {}", get_fps()), 20.0, 30.0, 30.0, WHITE);

        next_frame().await;
    }
}
