//! Hourglass Flip entry point
//!
//! On wasm32 this wires the page (canvas, buttons, keyboard) to a session and
//! runs the frame loop. Natively it plays a scripted headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use hourglass_flip::renderer::{RenderState, build_frame};
    use hourglass_flip::sim::Simulator;
    use hourglass_flip::{GameEvent, RenderError, Session, Settings};

    /// Longest frame step fed to the simulation
    const MAX_FRAME_DELTA: f32 = 0.1;

    /// Game instance holding all state
    struct Game {
        sim: Simulator,
        session: Session,
        render_state: Option<RenderState>,
        document: Document,
        last_time: Option<f64>,
    }

    impl Game {
        fn flip(&mut self) {
            if self.session.flip(&mut self.sim, js_sys::Date::now()) {
                pulse_flip_button(&self.document);
            }
        }

        fn toggle_pause(&mut self) {
            self.session.toggle_pause(&mut self.sim);
        }

        fn restart(&mut self) {
            self.session.restart(&mut self.sim);
        }

        fn collect_at(&mut self, point: Vec2) {
            self.session.collect_at(&mut self.sim, point);
        }

        fn tick_second(&mut self) {
            self.session.tick_second(&mut self.sim);
        }

        /// Advance and draw one display frame
        fn frame(&mut self, time: f64) {
            let delta = match self.last_time {
                Some(last) => (((time - last) / 1000.0) as f32).clamp(0.0, MAX_FRAME_DELTA),
                None => 0.0,
            };
            self.last_time = Some(time);

            self.session.frame(&mut self.sim, delta);
            self.render(time);

            for event in self.session.drain_events() {
                self.handle_event(event);
            }
            self.update_hud();
        }

        fn render(&mut self, time: f64) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_frame(&self.sim, &self.session, time);
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(RenderError::Surface(wgpu::SurfaceError::Lost)) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(RenderError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {}", e),
            }
        }

        fn handle_event(&self, event: GameEvent) {
            match event {
                GameEvent::GameOver { score, level } => {
                    set_text(&self.document, "finalScore", &score.to_string());
                    set_text(&self.document, "finalLevel", &level.to_string());
                    set_hidden(&self.document, "gameOverModal", false);
                }
                GameEvent::Restarted => set_hidden(&self.document, "gameOverModal", true),
                GameEvent::GoldCollected { count, .. } => {
                    log::debug!("+{} gold", count);
                }
                GameEvent::Flipped { .. } | GameEvent::LevelUp { .. } => {}
            }
        }

        fn update_hud(&self) {
            set_text(&self.document, "score", &self.session.score.to_string());
            set_text(&self.document, "level", &self.session.level.to_string());
            set_text(&self.document, "timer", &self.session.timer.max(0).to_string());
            let label = if self.session.paused {
                "▶️ Resume"
            } else {
                "⏸️ Pause"
            };
            set_text(&self.document, "pauseBtn", label);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id)
            && el.text_content().as_deref() != Some(text)
        {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    /// Brief highlight on the flip button
    fn pulse_flip_button(document: &Document) {
        let Some(btn) = document.get_element_by_id("flipBtn") else {
            return;
        };
        let _ = btn.class_list().add_1("pulse");
        let closure = Closure::once(move || {
            let _ = btn.class_list().remove_1("pulse");
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                300,
            );
        }
        closure.forget();
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Hourglass Flip starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = match canvas.get_attribute("data-settings") {
            Some(json) => Settings::from_json_or_default(&json),
            None => Settings::default(),
        };
        // Seed 0 means "pick one"
        let settings = if settings.seed == 0 {
            Settings {
                seed: js_sys::Date::now() as u64,
                ..settings
            }
        } else {
            settings
        };

        // Backing store at device resolution; scene stays in canvas units
        let dpr = window.device_pixel_ratio();
        let width = (settings.canvas_width as f64 * dpr) as u32;
        let height = (settings.canvas_height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let sim = Simulator::new(&settings).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let session = Session::new(&settings);
        log::info!("Game initialized with seed: {}", settings.seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let canvas_size = Vec2::new(settings.canvas_width, settings.canvas_height);
        let render_state = RenderState::new(surface, &adapter, width, height, canvas_size)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Rc::new(RefCell::new(Game {
            sim,
            session,
            render_state: Some(render_state),
            document: document.clone(),
            last_time: None,
        }));

        setup_buttons(&document, game.clone());
        setup_input_handlers(&canvas, canvas_size, game.clone())?;
        start_timer(game.clone())?;

        request_animation_frame(game);

        log::info!("Hourglass Flip running!");
        Ok(())
    }

    fn on_click(document: &Document, id: &str, game: Rc<RefCell<Game>>, action: fn(&mut Game)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{}", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            action(&mut game.borrow_mut());
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "flipBtn", game.clone(), Game::flip);
        on_click(document, "pauseBtn", game.clone(), Game::toggle_pause);
        on_click(document, "restartBtn", game.clone(), Game::restart);
        on_click(document, "playAgainBtn", game, Game::restart);
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        canvas_size: Vec2,
        game: Rc<RefCell<Game>>,
    ) -> Result<(), JsValue> {
        // Click to collect; the canvas may be CSS-scaled
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                if rect.width() <= 0.0 || rect.height() <= 0.0 {
                    return;
                }
                let x = (event.client_x() as f64 - rect.left()) / rect.width();
                let y = (event.client_y() as f64 - rect.top()) / rect.height();
                let point = Vec2::new(x as f32, y as f32) * canvas_size;
                game.borrow_mut().collect_at(point);
            });
            canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Keyboard
        {
            let window = web_sys::window().ok_or("no window")?;
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.code().as_str() {
                    "Space" => {
                        event.prevent_default();
                        g.flip();
                    }
                    "KeyP" => g.toggle_pause(),
                    "KeyR" => g.restart(),
                    _ => {}
                }
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    /// Wall-clock second tick for the session timer
    fn start_timer(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut()>::new(move || {
            game.borrow_mut().tick_second();
        });
        window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            1000,
        )?;
        closure.forget();
        Ok(())
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
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted session: flip every couple of seconds and grab any gold in reach
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use hourglass_flip::sim::Simulator;
    use hourglass_flip::{GameEvent, Session, Settings};

    const FRAME_DT: f32 = 1.0 / 60.0;
    const FLIP_EVERY_FRAMES: u32 = 120;

    env_logger::init();
    log::info!("Hourglass Flip (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the web version");

    let settings = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Settings::from_json_or_default(&json),
            Err(e) => {
                log::warn!("Cannot read {}: {}", path, e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };

    let mut sim = match Simulator::new(&settings) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Invalid settings: {}", e);
            std::process::exit(1);
        }
    };
    let mut session = Session::new(&settings);

    let mut frame = 0u32;
    while session.running {
        frame += 1;
        let now_ms = frame as f64 * FRAME_DT as f64 * 1000.0;

        if frame % FLIP_EVERY_FRAMES == 0 {
            session.flip(&mut sim, now_ms);
        }
        let targets: Vec<_> = sim
            .gold
            .iter()
            .filter(|g| !g.collected)
            .map(|g| g.pos)
            .collect();
        for pos in targets {
            session.collect_at(&mut sim, pos);
        }

        session.frame(&mut sim, FRAME_DT);
        if frame % 60 == 0 {
            session.tick_second(&mut sim);
        }

        for event in session.drain_events() {
            if let GameEvent::LevelUp { level, .. } = event {
                println!("Level {} at {}s left, {} grains", level, session.timer, sim.sand.len());
            }
        }
    }

    println!(
        "Game over after {} frames: score {}, level {}",
        frame, session.score, session.level
    );
}
