//! Pop Pop headless runner
//!
//! Plays one game with a simple autoplayer at 60 Hz, prints the final
//! snapshot summary as JSON and records the score on a leaderboard file.
//! The browser build drives the engine through `pop_pop::web` instead.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};

    use anyhow::{Context, Result};
    use clap::Parser;
    use serde::Serialize;

    use pop_pop::consts::SIM_DT;
    use pop_pop::sim::{BasicPhysics, GameEvent, GameState, GameStatus, TickInput, tick};
    use pop_pop::{GameConfig, GameMode, Leaderboard};

    #[derive(Parser)]
    #[command(name = "pop-pop")]
    #[command(about = "Run a headless Pop Pop game with an autoplayer")]
    struct Args {
        /// Game mode: relax or speed
        #[arg(long, default_value = "relax", value_parser = parse_mode)]
        mode: GameMode,
        /// RNG seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,
        /// Maximum ticks to simulate
        #[arg(long, default_value_t = 36_000)]
        ticks: u64,
        /// JSON game config
        #[arg(long)]
        config: Option<PathBuf>,
        /// Leaderboard JSON file, created if missing
        #[arg(long)]
        leaderboard: Option<PathBuf>,
        /// Initials to submit the score under
        #[arg(long, default_value = "CPU")]
        name: String,
    }

    fn parse_mode(s: &str) -> Result<GameMode, String> {
        GameMode::parse(s).ok_or_else(|| format!("unknown mode '{s}' (expected relax or speed)"))
    }

    #[derive(Serialize)]
    struct Summary {
        mode: GameMode,
        seed: u64,
        status: GameStatus,
        score: u64,
        highest_level: u8,
        ticks: u64,
        elapsed_ms: f64,
        circles: usize,
        drops: usize,
        merges: usize,
        destroyed: usize,
        rank: Option<usize>,
    }

    /// Pointer sweep plus an emergency destroy when circles pile into the
    /// drop zone
    struct Autoplayer {
        sweep: f32,
        direction: f32,
    }

    impl Autoplayer {
        fn new(width: f32) -> Self {
            Self {
                sweep: width / 2.0,
                direction: 1.0,
            }
        }

        fn next_input(&mut self, state: &mut GameState) -> TickInput {
            let width = state.config().width;
            self.sweep += self.direction * 3.7;
            if self.sweep <= 0.0 || self.sweep >= width {
                self.direction = -self.direction;
                self.sweep = self.sweep.clamp(0.0, width);
            }

            if state.is_in_danger() && state.power_ups() > 0 {
                let target = state
                    .circles()
                    .iter()
                    .min_by(|a, b| a.top().total_cmp(&b.top()))
                    .map(|c| c.pos);
                if let Some(pos) = target {
                    state.destroy_circle_at(pos);
                }
            }

            TickInput {
                pointer_x: Some(self.sweep),
                drop: state.can_drop(),
                pause: false,
            }
        }
    }

    fn now_ms() -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    fn load_config(args: &Args) -> Result<GameConfig> {
        let mut config = match &args.config {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                GameConfig::from_json(&json)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => GameConfig::default(),
        };
        if let Some(seed) = args.seed {
            config.seed = seed;
        }
        Ok(config)
    }

    fn load_leaderboard(path: &Path) -> Result<Leaderboard> {
        if !path.exists() {
            return Ok(Leaderboard::new());
        }
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read leaderboard {}", path.display()))?;
        Leaderboard::from_json(&json)
            .with_context(|| format!("invalid leaderboard {}", path.display()))
    }

    pub fn run() -> Result<()> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        let args = Args::parse();
        let config = load_config(&args)?;
        let seed = config.seed;
        log::info!("Pop Pop (native) starting: {} mode, seed {seed}", args.mode.as_str());

        let mut physics = BasicPhysics::new(config.width, config.height);
        let mut player = Autoplayer::new(config.width);
        let mut state = GameState::new(config, args.mode);
        state.start();

        let (mut drops, mut merges, mut destroyed) = (0, 0, 0);
        while state.status() == GameStatus::Playing && state.time_ticks() < args.ticks {
            let input = player.next_input(&mut state);
            tick(&mut state, &mut physics, &input, SIM_DT);

            for event in state.drain_events() {
                match event {
                    GameEvent::Dropped { .. } => drops += 1,
                    GameEvent::Merged { .. } => merges += 1,
                    GameEvent::Destroyed { .. } => destroyed += 1,
                    GameEvent::PowerUpAwarded { charges } => {
                        log::info!("Power-up awarded ({charges} held)");
                    }
                    _ => {}
                }
            }
            if state.time_ticks() % 3600 == 0 {
                log::info!(
                    "t={}s score={} circles={}",
                    state.time_ticks() / 60,
                    state.score(),
                    state.circles().len()
                );
            }
        }

        let mut rank = None;
        if let Some(path) = &args.leaderboard {
            let mut board = load_leaderboard(path)?;
            rank = board.potential_rank(state.mode(), state.score());
            match board.submit(&args.name, state.score(), state.mode(), now_ms()) {
                Ok(entry) => {
                    fs::write(path, board.to_json()?)
                        .with_context(|| format!("failed to write leaderboard {}", path.display()))?;
                    log::info!("Recorded {} for {}", entry.score, entry.player_name);
                }
                Err(e) => log::warn!("Score not recorded: {e}"),
            }
        }

        let summary = Summary {
            mode: state.mode(),
            seed,
            status: state.status(),
            score: state.score(),
            highest_level: state.highest_level(),
            ticks: state.time_ticks(),
            elapsed_ms: state.elapsed_ms(),
            circles: state.circles().len(),
            drops,
            merges,
            destroyed,
            rank,
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);

        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `pop_pop::web`, this is just to satisfy the compiler
}
