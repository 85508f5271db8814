//! Tile Brawl headless runner
//!
//! Plays a match with every actor on autopilot and logs what happens.
//!
//! ```text
//! tile-brawl [pvp|solo|coop] [--map FILE] [--config FILE] [--seed N] [--ticks N]
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::init();
    native::run(native::Cli::parse());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts drive tile_brawl::sim::step directly on the web
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::{Parser, ValueEnum};
    use tile_brawl::SimConfig;
    use tile_brawl::sim::{GameEvent, MatchMode, MatchState, TickInputs, TileMap, Winner, step};

    const DEFAULT_TICKS: u64 = 60 * 60 * 5;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
    pub enum Mode {
        Pvp,
        Solo,
        Coop,
    }

    impl From<Mode> for MatchMode {
        fn from(mode: Mode) -> Self {
            match mode {
                Mode::Pvp => MatchMode::Pvp,
                Mode::Solo => MatchMode::Solo,
                Mode::Coop => MatchMode::Coop,
            }
        }
    }

    #[derive(Parser, Debug)]
    #[command(name = "tile-brawl")]
    #[command(about = "Play a headless Tile Brawl match with every seat on autopilot")]
    pub struct Cli {
        /// Match rules
        #[arg(value_enum, default_value_t = Mode::Solo)]
        mode: Mode,

        /// Map layout JSON (falls back to the built-in arena)
        #[arg(long)]
        map: Option<PathBuf>,

        /// Tuning JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// RNG seed; defaults to the clock
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many ticks if nobody has won
        #[arg(long, default_value_t = DEFAULT_TICKS)]
        ticks: u64,
    }

    /// Time-derived seed when none was given
    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    }

    fn load_map(path: Option<&PathBuf>) -> TileMap {
        let Some(path) = path else {
            return TileMap::default_arena();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => TileMap::from_json_or_default(&json, "Industrial Zone"),
            Err(e) => {
                log::warn!("Failed to read map {}: {}", path.display(), e);
                TileMap::default_arena()
            }
        }
    }

    pub fn run(args: Cli) {
        let config = args
            .config
            .as_deref()
            .map(SimConfig::load)
            .unwrap_or_default();
        let map = load_map(args.map.as_ref());
        let seed = args.seed.unwrap_or_else(clock_seed);

        log::info!("Tile Brawl (headless) starting...");
        let mut state = MatchState::new(args.mode.into(), map, seed);
        // Autoplay: bots drive every seat
        for actor in &mut state.actors {
            actor.is_bot = true;
        }

        let inputs = TickInputs::new();
        while state.time_ticks < args.ticks && !state.is_over() {
            let (next, events) = step(state, &inputs, &config);
            state = next;
            for event in &events {
                log_event(&state, event);
            }
        }

        match state.winner {
            Some(Winner::Actor(id)) => {
                let name = state.actor(id).map_or("Unknown", |a| a.name.as_str());
                println!("{} won after {} ticks (seed {})", name, state.time_ticks, seed);
            }
            Some(Winner::Draw) => println!("Draw after {} ticks (seed {})", state.time_ticks, seed),
            Some(Winner::Horde) => println!(
                "Horde won on wave {} after {} ticks (seed {})",
                state.wave, state.time_ticks, seed
            ),
            None => println!("No result after {} ticks (seed {})", state.time_ticks, seed),
        }
        for actor in &state.actors {
            println!(
                "  {:<10} team {} score {:>3} hp {:>4}{}",
                actor.name,
                actor.team,
                actor.score,
                actor.hp,
                if actor.is_dead { " (dead)" } else { "" }
            );
        }
    }

    fn log_event(state: &MatchState, event: &GameEvent) {
        let name = |id| state.actor(id).map_or("?", |a| a.name.as_str());
        match event {
            GameEvent::Died { actor, cause } => {
                log::info!("[{}] {} died ({:?})", state.time_ticks, name(*actor), cause)
            }
            GameEvent::PickedUp { actor, weapon } => {
                log::info!("[{}] {} picked up {}", state.time_ticks, name(*actor), weapon.name())
            }
            GameEvent::WaveStarted { wave, hostiles } => {
                log::info!("[{}] wave {} ({} hostiles)", state.time_ticks, wave, hostiles)
            }
            other => log::trace!("[{}] {:?}", state.time_ticks, other),
        }
    }

}
