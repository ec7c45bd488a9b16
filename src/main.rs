//! Canyon Run entry point
//!
//! In the browser this wires keyboard input, the fixed-step game loop, the
//! host draw hook and the HUD. Natively it runs a headless autopilot session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use canyon_run::Settings;
    use canyon_run::Tuning;
    use canyon_run::consts::*;
    use canyon_run::render::{as_bytes, build_frame, instances};
    use canyon_run::sim::{GameOutcome, GameState, TickInput, tick};

    // The host page owns the GL context and draws whatever we hand it
    #[wasm_bindgen(inline_js = "
        export function canyon_run_draw(frame_json, instances) {
            if (typeof window.canyonRunDraw === 'function') {
                window.canyonRunDraw(JSON.parse(frame_json), instances);
            }
        }
    ")]
    extern "C" {
        fn canyon_run_draw(frame_json: &str, instances: &[u8]);
    }

    /// Keys currently held down
    #[derive(Default)]
    struct HeldKeys {
        up: bool,
        down: bool,
        left: bool,
        right: bool,
    }

    struct Game {
        state: GameState,
        settings: Settings,
        keys: HeldKeys,
        restart_requested: bool,
        accumulator: f32,
        last_time: f64,
        aspect: f32,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, settings: Settings) -> Self {
            Self {
                state: GameState::new(Tuning::default(), seed),
                settings,
                keys: HeldKeys::default(),
                restart_requested: false,
                accumulator: 0.0,
                last_time: 0.0,
                aspect: 16.0 / 9.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn tick_input(&self) -> TickInput {
            let (up, down) = self.settings.vertical_intents(self.keys.up, self.keys.down);
            TickInput {
                up,
                down,
                left: self.keys.left,
                right: self.keys.right,
                restart: self.restart_requested,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.tick_input();
                let report = tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Restart is one-shot
                self.restart_requested = false;
                if report.transition == Some(GameOutcome::Playing) {
                    self.accumulator = 0.0;
                }
            }

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Hand the frame to the host renderer
        fn render(&self) {
            let frame = build_frame(&self.state, &self.settings, self.aspect);
            match serde_json::to_string(&frame) {
                Ok(json) => canyon_run_draw(&json, as_bytes(&instances(&frame))),
                Err(e) => log::warn!("Frame serialization failed: {e}"),
            }
        }

        fn update_hud(&self, document: &Document) {
            let status = self.state.status();

            if let Some(el) = document.query_selector("#hud-health .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.0}", status.health)));
            }
            if let Some(el) = document.query_selector("#hud-distance .hud-value").ok().flatten() {
                el.set_text_content(Some(&format!("{:.0}", status.distance)));
            }

            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            if let Some(el) = document.get_element_by_id("outcome-banner") {
                let text = match status.outcome {
                    GameOutcome::Playing => None,
                    GameOutcome::Won => Some("Deposit reached! Press R to fly again"),
                    GameOutcome::Lost => Some("Jet destroyed. Press R to fly again"),
                };
                match text {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.set_attribute("class", "");
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }

        fn set_key(&mut self, key: &str, held: bool) -> bool {
            match key {
                "w" | "W" | "ArrowUp" => self.keys.up = held,
                "s" | "S" | "ArrowDown" => self.keys.down = held,
                "a" | "A" | "ArrowLeft" => self.keys.left = held,
                "d" | "D" | "ArrowRight" => self.keys.right = held,
                "r" | "R" | "Enter" => {
                    if held {
                        self.restart_requested = true;
                    }
                }
                _ => return false,
            }
            true
        }

        /// Preference toggles, persisted immediately
        fn toggle_setting(&mut self, key: &str) {
            match key {
                "f" | "F" => self.settings.show_fps = !self.settings.show_fps,
                "i" | "I" => self.settings.invert_vertical = !self.settings.invert_vertical,
                "m" | "M" => self.settings.reduced_motion = !self.settings.reduced_motion,
                _ => return,
            }
            log::info!("Settings changed: {:?}", self.settings);
            self.settings.save();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Logger init failed: {e}").into());
        }

        log::info!("Canyon Run starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, settings)));
        log::info!("Game initialized with seed: {}", seed);

        let canvas: Option<HtmlCanvasElement> = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into().ok());
        match canvas {
            Some(canvas) => {
                let dpr = window.device_pixel_ratio();
                let client_w = canvas.client_width().max(1);
                let client_h = canvas.client_height().max(1);
                canvas.set_width((client_w as f64 * dpr) as u32);
                canvas.set_height((client_h as f64 * dpr) as u32);
                game.borrow_mut().aspect = client_w as f32 / client_h as f32;
            }
            None => log::warn!("No #canvas element, using a 16:9 aspect"),
        }

        setup_input_handlers(&window, game.clone());
        setup_focus_handlers(&window, &document, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Canyon Run flying!");
    }

    fn setup_input_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                if g.set_key(&event.key(), true) {
                    event.prevent_default();
                } else if !event.repeat() {
                    g.toggle_setting(&event.key());
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().set_key(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Drop held keys when the page loses focus, since the matching keyup
    /// never arrives
    fn setup_focus_handlers(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.keys = HeldKeys::default();
                    g.last_time = 0.0;
                    log::info!("Input released (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().keys = HeldKeys::default();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use canyon_run::sim::{GameState, TickInput};

    /// Distance from the centre line tolerated before steering back
    const DEADBAND: f32 = 2.0;

    /// Hold the centre of the canyon, and slide away from a shown missile
    pub fn steer(state: &GameState) -> TickInput {
        let jet = state.jet.position();
        let mut input = TickInput::default();

        if state.missile.shown {
            // Left moves toward +X, right toward -X
            if state.missile.position().x > jet.x {
                input.right = true;
            } else {
                input.left = true;
            }
        } else if jet.x > DEADBAND {
            input.right = true;
        } else if jet.x < -DEADBAND {
            input.left = true;
        }

        if jet.y > DEADBAND {
            input.down = true;
        } else if jet.y < -DEADBAND {
            input.up = true;
        }
        input
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), canyon_run::TuningError> {
    use canyon_run::consts::SIM_DT;
    use canyon_run::render::{build_frame, instances};
    use canyon_run::sim::{GameState, tick};
    use canyon_run::{Settings, Tuning};

    /// Two minutes of flight
    const TICK_CAP: u64 = 60 * 120;

    env_logger::init();
    log::info!("Canyon Run (native) starting...");

    let mut args = std::env::args().skip(1);
    let tuning = match args.next() {
        Some(path) => {
            log::info!("Loading tuning from {path}");
            Tuning::load(&path)?
        }
        None => Tuning::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::warn!("Bad seed argument ({e}), using 0");
            0
        }
        None => 0,
    };

    let mut state = GameState::new(tuning, seed);
    let mut hits = 0usize;
    let mut spawns = 0usize;
    while !state.outcome.is_terminal() && state.time_ticks < TICK_CAP {
        let input = autopilot::steer(&state);
        let report = tick(&mut state, &input, SIM_DT);
        hits += report.damage.len();
        spawns += usize::from(report.missile_spawned);

        if state.time_ticks % 600 == 0 {
            let status = state.status();
            log::info!(
                "t={:.0}s distance={:.0} health={:.2}",
                state.time,
                status.distance,
                status.health
            );
        }
    }

    let frame = build_frame(&state, &Settings::default(), 16.0 / 9.0);
    log::debug!(
        "Final frame: {} draws, {} instance records",
        frame.draws.len(),
        instances(&frame).len()
    );

    log::info!("Session over after {} ticks: {spawns} missiles, {hits} damage events", state.time_ticks);
    println!("{}", serde_json::to_string_pretty(&state.status())?);
    Ok(())
}
