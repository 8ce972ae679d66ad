//! Snow Rider entry point
//!
//! The browser build exports a `WebGame` handle that the page's render loop
//! drives once per animation frame. The native build runs a headless
//! session with a simple autopilot, which is handy for balancing presets.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use snow_rider::Tuning;
    use snow_rider::persistence::{KeyValueStore, LocalStorage, Record};
    use snow_rider::platform::{SwipeTracker, intent_for_key};
    use snow_rider::sim::{GameSession, LaneIntent, SimEvent, TickInput, tick};

    /// Today's calendar day (YYYY-MM-DD) from the browser clock
    fn today_key() -> String {
        let iso: String = js_sys::Date::new_0().to_iso_string().into();
        iso.chars().take(10).collect()
    }

    /// One browser session: simulation, storage and pending input
    #[wasm_bindgen]
    pub struct WebGame {
        session: GameSession,
        store: LocalStorage,
        swipe: SwipeTracker,
        input: TickInput,
        events: Vec<SimEvent>,
    }

    #[wasm_bindgen]
    impl WebGame {
        /// Create a game from a preset name ("endless", "goal_run") or a
        /// tuning JSON document. Unknown presets fall back to endless.
        #[wasm_bindgen(constructor)]
        pub fn new(config: &str) -> WebGame {
            let tuning = if config.trim_start().starts_with('{') {
                match Tuning::from_json(config) {
                    Ok(tuning) => tuning,
                    Err(e) => {
                        log::error!("Bad tuning JSON ({}), using endless preset", e);
                        Tuning::endless()
                    }
                }
            } else {
                Tuning::preset(config).unwrap_or_else(|| {
                    log::warn!("Unknown preset '{}', using endless", config);
                    Tuning::endless()
                })
            };

            let store = LocalStorage::open();
            let record = Record::load(&store, &tuning);
            let seed = js_sys::Date::now() as u64;
            let mut session = GameSession::new(tuning, record, seed);
            session.today = Some(today_key());

            log::info!(
                "Snow Rider ready ({} preset, seed {})",
                session.tuning.name,
                seed
            );

            WebGame {
                session,
                store,
                swipe: SwipeTracker::new(),
                input: TickInput::default(),
                events: Vec::new(),
            }
        }

        pub fn start(&mut self) {
            self.session.today = Some(today_key());
            self.input.start = true;
        }

        pub fn retry(&mut self) {
            self.session.today = Some(today_key());
            self.input.retry = true;
        }

        pub fn acknowledge(&mut self) {
            self.input.acknowledge = true;
        }

        pub fn abort(&mut self) {
            self.input.abort = true;
        }

        pub fn move_left(&mut self) {
            self.input.push(LaneIntent::Left);
        }

        pub fn move_right(&mut self) {
            self.input.push(LaneIntent::Right);
        }

        /// On-screen lane button
        pub fn set_lane(&mut self, lane: usize) {
            self.input.target_lane = Some(lane);
        }

        /// Feed a `KeyboardEvent.key`; returns true if the key was used
        pub fn key_down(&mut self, key: &str) -> bool {
            match intent_for_key(key) {
                Some(intent) => {
                    self.input.push(intent);
                    true
                }
                None => false,
            }
        }

        pub fn touch_start(&mut self, x: f32, y: f32) {
            self.swipe.begin(x, y);
        }

        pub fn touch_end(&mut self, x: f32, y: f32) {
            if let Some(intent) = self.swipe.end(x, y) {
                self.input.push(intent);
            }
        }

        pub fn touch_cancel(&mut self) {
            self.swipe.cancel();
        }

        /// Advance one animation frame and return the snapshot as JSON
        pub fn frame(&mut self, dt_secs: f32) -> String {
            self.events = tick(&mut self.session, &self.input, dt_secs);
            self.input.clear();

            if self.events.iter().any(|e| e.ends_run()) {
                self.session.record.save(&mut self.store);
            }
            for event in &self.events {
                match event {
                    SimEvent::Started | SimEvent::Retried => {
                        // A started run stamps the daily limit
                        self.session.record.save(&mut self.store);
                    }
                    SimEvent::Crashed { attempts_left } => {
                        log::info!("Crashed, attempts left: {:?}", attempts_left)
                    }
                    SimEvent::Finished => log::info!("Goal reached!"),
                    _ => {}
                }
            }

            match serde_json::to_string(&self.session.snapshot()) {
                Ok(json) => json,
                Err(e) => {
                    log::error!("Failed to serialize snapshot: {}", e);
                    String::from("null")
                }
            }
        }

        /// Events from the last `frame` call as JSON (sound cues, overlays)
        pub fn events(&self) -> String {
            serde_json::to_string(&self.events).unwrap_or_else(|_| String::from("[]"))
        }

        /// Forget stored progress for this browser
        pub fn reset_progress(&mut self) {
            for key in Record::KEYS {
                self.store.remove(key);
            }
            self.session.record = Record::fresh(&self.session.tuning);
            log::info!("Progress reset");
        }
    }

    pub fn init() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
        }
        log::info!("Snow Rider module loaded");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::init();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let preset = args.next().unwrap_or_else(|| String::from("endless"));
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(7);

    let Some(tuning) = snow_rider::Tuning::preset(&preset) else {
        eprintln!("Unknown preset '{}' (try 'endless' or 'goal_run')", preset);
        std::process::exit(2);
    };

    log::info!("Snow Rider (native) autopilot: preset={} seed={}", preset, seed);
    autopilot::run(tuning, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use snow_rider::Tuning;
    use snow_rider::persistence::{MemoryStore, Record, day_key_from_unix_secs};
    use snow_rider::sim::{
        EntityKind, GamePhase, GameSession, SimEvent, TickInput, Trigger, tick, transition,
    };

    const STEP: f32 = 1.0 / 60.0;
    /// Stop an endless run after this long
    const MAX_RUN_SECS: f32 = 180.0;
    /// How far ahead of the sled (world units) obstacles are considered
    const LOOK_AHEAD: f32 = 22.0;

    pub fn run(tuning: Tuning, seed: u64) {
        let mut store = MemoryStore::new();
        let record = Record::load(&store, &tuning);
        let mut session = GameSession::new(tuning, record, seed);
        session.today = Some(today());

        let mut input = TickInput {
            start: true,
            ..Default::default()
        };

        loop {
            input.target_lane = Some(pick_lane(&session));
            let events = tick(&mut session, &input, STEP);
            input.clear();

            for event in &events {
                match event {
                    SimEvent::GiftCollected { gifts, .. } => log::debug!("Gift #{}", gifts),
                    SimEvent::Crashed { attempts_left } => {
                        log::info!(
                            "Crashed at {:.1}m, attempts left {:?}",
                            session.run.distance,
                            attempts_left
                        );
                    }
                    _ => {}
                }
                if event.ends_run() {
                    session.record.save(&mut store);
                }
            }

            match session.phase {
                GamePhase::Crashed => {
                    // Unlimited variants would retry forever
                    let limited = session.tuning.max_attempts.is_some();
                    let ctx = session.guard_context();
                    if !limited || transition(GamePhase::Crashed, Trigger::Retry, ctx).is_none() {
                        break;
                    }
                    input.retry = true;
                }
                GamePhase::Finished | GamePhase::Exhausted => break,
                GamePhase::Menu => break,
                GamePhase::Playing if session.run.elapsed >= MAX_RUN_SECS => {
                    log::info!("Time limit reached, stopping");
                    break;
                }
                GamePhase::Playing => {}
            }
        }

        report(&session);
    }

    /// Stay put unless an obstacle is coming; then take the nearest clear
    /// lane, preferring one with a gift in it
    fn pick_lane(session: &GameSession) -> usize {
        let sled_z = session.sled.z;
        let lanes = session.lanes.lane_count();
        let incoming = |lane: usize, kind: EntityKind| {
            session.entities.iter().any(|e| {
                !e.hit
                    && e.kind == kind
                    && e.lane == lane
                    && e.pos.z < sled_z + 1.0
                    && e.pos.z > sled_z - LOOK_AHEAD
            })
        };

        let current = session.sled.lane;
        if !incoming(current, EntityKind::Obstacle) {
            return current;
        }

        let mut clear: Vec<usize> = (0..lanes)
            .filter(|&lane| !incoming(lane, EntityKind::Obstacle))
            .collect();
        clear.sort_by_key(|&lane| {
            let gift_rank = if incoming(lane, EntityKind::Gift) { 0 } else { 1 };
            (lane.abs_diff(current), gift_rank)
        });
        clear.first().copied().unwrap_or(current)
    }

    fn today() -> String {
        let secs = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0);
        day_key_from_unix_secs(secs)
    }

    fn report(session: &GameSession) {
        println!("\n=== Snow Rider: {} ===", session.tuning.name);
        println!("Phase:     {:?}", session.phase);
        println!("Distance:  {:.1}", session.run.distance);
        println!("Score:     {}", session.run.display_score());
        println!("Gifts:     {}", session.run.gifts);
        if let Some(pct) = session.progress_pct() {
            println!("Progress:  {:.0}%", pct);
        }
        println!("Best:      {}", session.record.best_score);
        if let Some(left) = session.record.attempts_left {
            println!("Attempts:  {}", left);
        }
        match &session.last_prize {
            Some(prize) => println!("Prize:     {} ({})", prize.label, prize.key),
            None => println!("Prize:     none (run still in progress)"),
        }
    }
}
