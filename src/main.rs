//! Eight Ball entry point
//!
//! Runs a seeded headless game between two random shooters and logs the
//! outcome. Pass a settings JSON path as the first argument to override
//! the defaults.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use eight_ball::Settings;
    use eight_ball::audio::{AudioManager, LogBackend};
    use eight_ball::demo::play_game;
    use eight_ball::sim::BallGroup;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Eight Ball (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    log::info!("Game seed: {}", settings.seed);

    let mut audio = AudioManager::new(LogBackend);
    audio.set_master_volume(settings.master_volume);
    audio.set_sfx_volume(settings.sfx_volume);
    audio.set_muted(settings.muted);

    let report = play_game(&settings, &mut audio);
    let state = &report.final_state;

    match report.winner {
        Some(winner) => log::info!(
            "Player {} wins after {} shots ({} frames)",
            winner.number(),
            report.shots,
            report.frames
        ),
        None if report.stalled => log::warn!("Game abandoned: a shot never settled"),
        None => log::info!("No winner after {} shots", report.shots),
    }
    for player in &state.players {
        log::info!(
            "Player {}: {} ({} left)",
            player.id.number(),
            player.group.map(|g| g.as_str()).unwrap_or("open"),
            state.remaining_for(player.id)
        );
    }
    log::info!(
        "Pocketed: {} solids, {} stripes",
        state.pocketed_count(BallGroup::Solids),
        state.pocketed_count(BallGroup::Stripes)
    );

    match serde_json::to_string(state) {
        Ok(json) => log::debug!("Final table: {json}"),
        Err(e) => log::warn!("Could not encode final table: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The engine is a library on the web; front ends drive `sim::tick` directly
}
