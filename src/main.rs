//! Chroma Climb entry point
//!
//! Native builds run a headless autopilot session against a JSON stats file.
//! The browser build is driven from JavaScript through `platform::web`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Chroma Climb (native, headless) starting...");

    if let Err(e) = native::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::{SystemTime, UNIX_EPOCH};

    use chroma_climb::persistence::{JsonFileStore, StoreError};
    use chroma_climb::platform::headless::HeadlessHost;
    use chroma_climb::sim::GameState;
    use chroma_climb::{PersistentStats, Settings, Tuning, TuningError};

    const DEFAULT_STORE: &str = "chroma_climb_stats.json";
    const DEFAULT_RUNS: u32 = 3;
    const MAX_SECONDS: f32 = 600.0;

    #[derive(Debug, thiserror::Error)]
    pub enum AppError {
        #[error(transparent)]
        Store(#[from] StoreError),
        #[error(transparent)]
        Tuning(#[from] TuningError),
        #[error("cannot read tuning file {path}: {source}")]
        TuningFile {
            path: String,
            source: std::io::Error,
        },
        #[error("invalid argument {0:?} (usage: chroma-climb [seed] [runs])")]
        Usage(String),
        #[error("cannot encode summary: {0}")]
        Summary(#[from] serde_json::Error),
    }

    pub fn run() -> Result<(), AppError> {
        let mut args = std::env::args().skip(1);
        let seed = match args.next() {
            Some(arg) => arg.parse::<u64>().map_err(|_| AppError::Usage(arg))?,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        };
        let runs = match args.next() {
            Some(arg) => arg.parse::<u32>().map_err(|_| AppError::Usage(arg))?,
            None => DEFAULT_RUNS,
        };

        let tuning = match std::env::var("CHROMA_CLIMB_TUNING") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|source| AppError::TuningFile { path, source })?;
                Tuning::from_json(&json)?
            }
            Err(_) => Tuning::default(),
        };

        let store_path =
            std::env::var("CHROMA_CLIMB_STORE").unwrap_or_else(|_| DEFAULT_STORE.to_string());
        let store = JsonFileStore::open(&store_path)?;
        log::info!("Stats file: {}", store.path().display());
        let settings = Settings::load(&store);
        let stats = PersistentStats::load(Box::new(store));

        let state = GameState::new(tuning, settings, stats, seed)?;
        log::info!("Game initialized with seed: {}", seed);

        let mut host = HeadlessHost::new(state);
        let summary = host.play(runs, MAX_SECONDS);

        println!("{}", serde_json::to_string_pretty(&summary)?);
        println!(
            "High score: {}  Total stars: {}",
            host.state.score.high_score(),
            host.state.score.total_stars()
        );
        Ok(())
    }
}
