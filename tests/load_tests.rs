// tests/load_tests.rs

use std::fs;
use tempfile::TempDir;
use tile_world::{AssetCatalog, GameManager, LevelError, WorldConfig};

/// Scratch level directory, deleted with its contents when dropped.
fn temp_dir(tag: &str) -> TempDir {
    TempDir::with_prefix(format!("tile_world_{tag}_")).expect("failed to create temp dir")
}

fn small_game() -> GameManager {
    let config = WorldConfig {
        grid_resolution: 2,
        ..Default::default()
    };
    GameManager::new(config, AssetCatalog::builtin("null.png"))
}

#[test]
fn bulk_load_registers_each_level_once_in_order() {
    let tmp = temp_dir("bulk");
    let dir = tmp.path();
    for name in ["c.txt", "a.txt", "b.txt"] {
        fs::write(dir.join(name), "1 2\n3 4\n").expect("write level");
    }
    fs::write(dir.join("readme.md"), "not a level").expect("write readme");

    let mut game = small_game();
    let n = game.load_levels_from_dir(dir).expect("levels should load");
    assert_eq!(n, 3);
    assert_eq!(game.registry().len(), 3);
    assert_eq!(game.levels().len(), 3);

    let entries: Vec<(String, usize)> = game
        .registry()
        .iter()
        .map(|(id, idx)| (id.to_owned(), idx))
        .collect();
    for (i, name) in ["a.txt", "b.txt", "c.txt"].iter().enumerate() {
        assert_eq!(entries[i], (dir.join(name).display().to_string(), i));
        assert_eq!(game.levels()[i].id, entries[i].0);
    }
}

#[test]
fn loaded_tiles_match_file_contents() {
    let dir = temp_dir("tiles");
    fs::write(dir.path().join("lvl.txt"), "1 2\n\n3 4\n").expect("write level");

    let mut game = small_game();
    game.load_levels_from_dir(dir.path()).expect("levels should load");
    let lvl = &game.levels()[0];
    assert_eq!(lvl.tiles.len(), lvl.width * lvl.height);
    let ids: Vec<u32> = lvl.tiles.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn missing_directory_is_an_io_error() {
    let dir = temp_dir("gone");
    let mut game = small_game();
    let err = game
        .load_levels_from_dir(&dir.path().join("nope"))
        .unwrap_err();
    assert!(matches!(err, LevelError::Io { .. }));
}

#[test]
fn malformed_line_names_file_and_line() {
    let dir = temp_dir("malformed");
    fs::write(dir.path().join("bad.txt"), "1 1\nE slime.png 1 1\n").expect("write level");

    let mut game = small_game();
    let err = game.load_levels_from_dir(dir.path()).unwrap_err();
    match err {
        LevelError::FieldCount {
            source_id,
            line,
            tag,
            ..
        } => {
            assert!(source_id.ends_with("bad.txt"));
            assert_eq!(line, 2);
            assert_eq!(tag, 'E');
        }
        other => panic!("expected FieldCount, got {other:?}"),
    }
}

#[test]
fn registering_same_id_twice_fails() {
    let mut game = small_game();
    game.add_level_from_str("a", "1 1\n1 1").unwrap();
    let err = game.add_level_from_str("a", "1 1\n1 1").unwrap_err();
    assert!(matches!(err, LevelError::DuplicateLevel { .. }));
    assert_eq!(game.levels().len(), 1);
}

#[test]
fn demo_session_loads() {
    let config = WorldConfig::load("demos/world.json").expect("demo config");
    let game = tile_world::load_session(config).expect("demo levels should load");
    assert_eq!(game.registry().len(), 2);
    assert_eq!(
        game.registry().id_of(game.current_index()),
        Some("demos/levels/entity_animation.txt")
    );
}
