//! Zombie Math entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, HtmlInputElement};

    use zombie_math::audio::AudioManager;
    use zombie_math::consts::*;
    use zombie_math::export;
    use zombie_math::render::{CanvasSurface, HudView, Sprite, render_frame};
    use zombie_math::settings::Settings;
    use zombie_math::sim::{
        Arena, GameEvent, GameState, PlayerProfile, SubmitError, spawn_zombie, submit_answer,
        tick,
    };

    /// Game instance holding all state
    struct Game {
        state: GameState,
        surface: Option<CanvasSurface>,
        audio: AudioManager,
        settings: Settings,
        /// Timestamp of the previous animation frame
        last_time: Option<f64>,
        /// `setInterval` handle of the spawner while a session runs
        spawn_interval: Option<i32>,
    }

    impl Game {
        fn new(arena: Arena, seed: u64) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.apply_settings(&settings);
            Self {
                state: GameState::new(arena, seed),
                surface: None,
                audio,
                settings,
                last_time: None,
                spawn_interval: None,
            }
        }

        /// Run one frame of simulation and draw it
        fn frame(&mut self, time: f64) {
            let delta = match self.last_time {
                Some(last) => (time - last) as f32,
                None => 0.0,
            };
            self.last_time = Some(time);

            tick(&mut self.state, delta);
            if let Some(surface) = self.surface.as_mut() {
                render_frame(&self.state, surface);
            }
            self.handle_events();
        }

        /// React to everything the simulation raised since the last call
        fn handle_events(&mut self) {
            let mut refresh_hud = false;
            for event in self.state.drain_events() {
                if let Some(effect) = event.sound() {
                    self.audio.play(effect);
                }
                if let Some(text) = event.message() {
                    show_message(&text);
                }
                refresh_hud |= event.refreshes_hud();

                if let GameEvent::GameOver(summary) = &event {
                    self.cancel_spawner();
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(&summary.message());
                    }
                    self.start_export();
                    set_display("restart-btn", "inline-block");
                }
            }
            if refresh_hud {
                self.update_hud();
            }
        }

        /// Clear the spawn interval; safe to call more than once
        fn cancel_spawner(&mut self) {
            if let Some(handle) = self.spawn_interval.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
                log::info!("Spawner stopped");
            }
        }

        /// Upload the attempt log in the background
        fn start_export(&self) {
            let Some(endpoint) = self.settings.export_target().map(str::to_string) else {
                log::info!("Export disabled");
                return;
            };
            let (file_name, csv) = match export::prepare(&self.state) {
                Ok(prepared) => prepared,
                Err(e) => {
                    log::info!("Skipping export: {}", e);
                    return;
                }
            };

            wasm_bindgen_futures::spawn_local(async move {
                match export::upload_csv(&endpoint, &file_name, &csv).await {
                    Ok(reply) => {
                        log::info!("Export accepted: {:?}", reply);
                        show_message("Data sent to the API!");
                    }
                    Err(e) => {
                        log::error!("Export failed: {}", e);
                        show_message(&format!("Could not send data: {}", e));
                    }
                }
            });
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = document() else { return };
            let hud = HudView::from_state(&self.state);

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&hud.score_text));
            }
            if let Some(el) = document.get_element_by_id("phase") {
                el.set_text_content(Some(&hud.phase_text));
            }
            if let Some(el) = document.get_element_by_id("lives") {
                el.set_inner_html("");
                for _ in 0..hud.life_icons {
                    if let Ok(icon) = document.create_element("img") {
                        let _ = icon.set_attribute("src", Sprite::Life.path());
                        let _ = icon.set_attribute("width", "24");
                        let _ = icon.set_attribute("height", "24");
                        let _ = icon.set_attribute("style", "margin-right: 5px");
                        let _ = el.append_child(&icon);
                    }
                }
            }
        }
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn input_element(id: &str) -> Option<HtmlInputElement> {
        document()?.get_element_by_id(id)?.dyn_into().ok()
    }

    fn set_display(id: &str, value: &str) {
        let el = document()
            .and_then(|d| d.get_element_by_id(id))
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        if let Some(el) = el {
            let _ = el.style().set_property("display", value);
        }
    }

    /// Status line under the game. Created on first use.
    fn show_message(text: &str) {
        let Some(document) = document() else { return };
        let el = match document.get_element_by_id("message") {
            Some(el) => el,
            None => {
                let Ok(el) = document.create_element("p") else { return };
                el.set_id("message");
                if let Some(body) = document.body() {
                    let _ = body.append_child(&el);
                }
                el
            }
        };
        el.set_text_content(Some(text));
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Zombie Math starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let arena = Arena::new(canvas.width() as f32, canvas.height() as f32);
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(arena, seed)));
        game.borrow_mut().surface = CanvasSurface::new(&canvas);
        if game.borrow().surface.is_none() {
            log::error!("2D canvas context unavailable - nothing will be drawn");
        }

        log::info!(
            "Game initialized ({}x{}, seed {})",
            arena.width,
            arena.height,
            seed
        );

        set_display("restart-btn", "none");
        game.borrow().update_hud();

        setup_start_button(game.clone());
        setup_answer_input(game.clone());
        setup_restart_button(game);

        log::info!("Waiting for player profile");
    }

    /// Profile modal: validates name/age and starts the session
    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };
        let Some(btn) = document.get_element_by_id("start-btn") else {
            log::error!("start button missing");
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let name = input_element("name").map(|el| el.value()).unwrap_or_default();
            let age = input_element("age").map(|el| el.value()).unwrap_or_default();

            let profile = match PlayerProfile::from_form(&name, &age) {
                Ok(profile) => profile,
                Err(e) => {
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(&e.to_string());
                    }
                    return;
                }
            };

            {
                let mut g = game.borrow_mut();
                g.audio.resume();
                if !g.state.start(profile, js_sys::Date::now()) {
                    return;
                }
                g.last_time = None;
                g.handle_events();
            }

            set_display("userModal", "none");
            set_display("gameCanvas", "block");
            set_display("controls", "flex");
            set_display("hud", "flex");
            if let Some(input) = input_element("answer") {
                let _ = input.focus();
            }

            start_spawner(game.clone());
            request_animation_frame(game.clone());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Submit button and Enter key both submit the typed answer
    fn setup_answer_input(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };

        if let Some(btn) = document.get_element_by_id("submit-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                submit(&game);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(input) = document.get_element_by_id("answer") {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if event.key() == "Enter" {
                    submit(&game);
                }
            });
            let _ = input
                .add_event_listener_with_callback("keypress", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn submit(game: &Rc<RefCell<Game>>) {
        let Some(input) = input_element("answer") else { return };
        let mut g = game.borrow_mut();

        match submit_answer(&mut g.state, &input.value(), js_sys::Date::now()) {
            Ok(_) => {
                input.set_value("");
                g.handle_events();
            }
            Err(SubmitError::NotRunning) => {}
            Err(e) => show_message(&e.to_string()),
        }
        let _ = input.focus();
    }

    /// Full restart back to the profile modal
    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = document() else { return };
        let Some(btn) = document.get_element_by_id("restart-btn") else { return };

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
            let seed = js_sys::Date::now() as u64;
            {
                let mut guard = game.borrow_mut();
                let g = &mut *guard;
                g.cancel_spawner();
                g.state.reset(seed);
                g.last_time = None;
                g.update_hud();
                if let Some(surface) = g.surface.as_mut() {
                    render_frame(&g.state, surface);
                }
            }

            show_message("");
            set_display("restart-btn", "none");
            set_display("userModal", "block");
            log::info!("Game reset with seed: {}", seed);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Spawn on a fixed interval, independent of the frame rate
    fn start_spawner(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        game.borrow_mut().cancel_spawner();

        let spawner = game.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = spawner.borrow_mut();
            spawn_zombie(&mut g.state);
            g.handle_events();
        });
        match window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            SPAWN_INTERVAL_MS as i32,
        ) {
            Ok(handle) => game.borrow_mut().spawn_interval = Some(handle),
            Err(e) => log::error!("Could not start spawner: {:?}", e),
        }
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let running = {
            let mut g = game.borrow_mut();
            g.frame(time);
            g.state.is_running()
        };

        // No reschedule once the session ends; restart starts a fresh loop
        if running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Zombie Math (native) starting...");
    log::info!("Native mode runs a headless autoplay session - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(12345);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use zombie_math::consts::SPAWN_INTERVAL_MS;
    use zombie_math::export;
    use zombie_math::render::HudView;
    use zombie_math::sim::{
        Arena, Autoplayer, GameEvent, GameState, PlayerProfile, SpawnTimer, spawn_zombie,
        submit_answer, tick,
    };

    const FRAME_MS: f32 = 16.0;
    /// Give up after ten simulated minutes
    const MAX_SESSION_MS: f64 = 10.0 * 60.0 * 1000.0;

    pub fn run(seed: u64) {
        let mut state = GameState::new(Arena::default(), seed);
        let mut spawner = SpawnTimer::new(SPAWN_INTERVAL_MS);
        let mut bot = Autoplayer::new(seed ^ 0x5eed, 0.85, 1200.0);

        let Ok(profile) = PlayerProfile::new("Demo", 10) else {
            return;
        };
        let mut now_ms = 0.0f64;
        state.start(profile, now_ms);

        while state.is_running() && now_ms < MAX_SESSION_MS {
            for _ in 0..spawner.advance(FRAME_MS as f64) {
                spawn_zombie(&mut state);
            }
            if let Some(answer) = bot.advance(&state, FRAME_MS) {
                if let Err(e) = submit_answer(&mut state, &answer, now_ms) {
                    log::warn!("Bot answer rejected: {}", e);
                }
            }

            tick(&mut state, FRAME_MS);
            now_ms += FRAME_MS as f64;

            for event in state.drain_events() {
                match event {
                    GameEvent::PhaseAdvanced(phase) => log::info!("Phase {}", phase),
                    GameEvent::GameOver(summary) => {
                        spawner.cancel();
                        println!("{}", summary.message());
                    }
                    _ => {}
                }
            }
        }

        let hud = HudView::from_state(&state);
        println!(
            "{} | {} | lives {} | {:.1}s simulated",
            hud.score_text,
            hud.phase_text,
            hud.life_icons,
            now_ms / 1000.0
        );

        match export::prepare(&state) {
            Ok((file_name, csv)) => {
                println!("\n{}:\n{}", file_name, csv);
            }
            Err(e) => log::info!("Nothing to export: {}", e),
        }
    }
}
