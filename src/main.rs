//! Tank Arena - headless runner
//!
//! Runs the simulation in autopilot mode and logs what happens.
//!
//! Usage: `tank-arena [CONFIG.json] [SECONDS]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tank_arena::WorldConfig;
    use tank_arena::consts::TICKS_PER_SECOND;
    use tank_arena::sim::{GameEvent, TankId, TickInput, World, tick};

    env_logger::init();
    log::info!("Tank Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match WorldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("{e}; using default config");
                WorldConfig::default()
            }
        },
        None => WorldConfig::default(),
    };
    let seconds: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60);

    let mut world = match World::try_new(config) {
        Ok(world) => world,
        Err(e) => {
            log::error!("Invalid config: {e}");
            std::process::exit(1);
        }
    };

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut kills = 0u32;
    let mut deaths = 0u32;

    for _ in 0..seconds * TICKS_PER_SECOND {
        tick(&mut world, &input);

        for event in world.drain_events() {
            if let GameEvent::TankKilled { victim, killer, .. } = event {
                if victim == TankId::PLAYER {
                    deaths += 1;
                } else if killer == Some(TankId::PLAYER) {
                    kills += 1;
                }
            }
        }

        if world.time_ticks % (10 * TICKS_PER_SECOND) == 0 {
            let hud = world.hud();
            log::info!(
                "t={}s level {} score {} shapes {} bullets {}",
                world.time_ticks / TICKS_PER_SECOND,
                hud.level,
                hud.score,
                world.shapes.len(),
                world.bullets.len()
            );
            for (rank, entry) in hud.leaderboard.entries.iter().enumerate() {
                log::debug!("  #{} {} {}", rank + 1, entry.name, entry.score);
            }
        }
    }

    let hud = world.hud();
    println!(
        "After {}s: level {}, score {}, {} kills, {} deaths",
        seconds, hud.level, hud.score, kills, deaths
    );
    for (rank, entry) in hud.leaderboard.entries.iter().enumerate() {
        let marker = if entry.is_player { "*" } else { " " };
        println!("{marker}{}. {:<10} {}", rank + 1, entry.name, entry.score);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Frontends embed the library directly
}
