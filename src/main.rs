//! Blum Drop entry point
//!
//! Runs a headless match with a simple bot clicking the lowest blum, then
//! prints the summary as JSON. Useful for tuning `settings.json`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::process::ExitCode;
    use std::sync::Arc;

    use blum_drop::render::DrawCommand;
    use blum_drop::sim::{EntityKind, EntityPhase, MatchEvent, TickInput, tick};
    use blum_drop::{AssetBundle, Clock, ManualClock, MatchController, NullLoader, Settings};

    /// Frame step (~60 Hz)
    const FRAME_MS: u64 = 16;
    /// Bot reaction time between clicks
    const BOT_COOLDOWN_MS: u64 = 250;

    pub fn run() -> ExitCode {
        let settings = Settings::load("settings.json");

        let assets = match AssetBundle::load(&mut NullLoader::default(), &settings.asset_dir) {
            Ok(assets) => Arc::new(assets),
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        };
        let mut game = match MatchController::new(assets, &settings) {
            Ok(game) => game,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        };

        let clock = ManualClock::new(0);
        let mut next_click = 0;
        let mut frame: Vec<DrawCommand> = Vec::new();
        let mut frames = 0u64;

        while !game.is_game_over() {
            clock.advance(FRAME_MS);
            let now = clock.now();

            let mut input = TickInput {
                now,
                clicks: Vec::new(),
            };
            if now >= next_click {
                // Lowest idle blum is the one about to leave the board
                let target = game
                    .population()
                    .entities(EntityKind::Blum)
                    .iter()
                    .filter(|e| e.phase() == EntityPhase::Idle)
                    .map(|e| e.rect())
                    .filter(|r| game.board().intersects(r))
                    .max_by(|a, b| a.top().total_cmp(&b.top()));
                if let Some(rect) = target {
                    input.clicks.push(rect.center());
                    next_click = now + BOT_COOLDOWN_MS;
                }
            }
            tick(&mut game, &input);

            for event in game.drain_events() {
                match event {
                    MatchEvent::Exploded { cash } => log::debug!("Bomb! cash now {cash}"),
                    MatchEvent::Frozen => log::debug!("Ice hit"),
                    other => log::trace!("{other:?}"),
                }
            }

            frame.clear();
            game.draw(now, &mut frame);
            frames += 1;
        }

        log::info!("Match finished after {frames} frames");
        match serde_json::to_string_pretty(&game.summary()) {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Could not encode summary: {e}");
                ExitCode::FAILURE
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Blum Drop (headless) starting...");
    headless::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser shell; the library is driven by the host page
}
