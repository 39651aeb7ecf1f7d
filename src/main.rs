//! Kickabout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, MouseEvent, TouchEvent};

    use kickabout::consts::*;
    use kickabout::renderer::pipeline::viewport_to_field;
    use kickabout::renderer::{RenderState, scene};
    use kickabout::sim::Difficulty;
    use kickabout::{Phase, Session};

    const FIELD_SIZE: Vec2 = Vec2::new(SCENE_WIDTH, SCENE_HEIGHT);

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
    }

    impl Game {
        fn new() -> Self {
            Self {
                session: Session::default(),
                render_state: None,
            }
        }

        /// Advance the session clock; goals are logged by the simulation
        fn update(&mut self, time_ms: f64) {
            self.session.frame(time_ms / 1000.0);
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(snapshot) = self.session.snapshot() else {
                return;
            };
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&scene(&snapshot)) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let snapshot = self.session.snapshot();

            if let Some(el) = document.get_element_by_id("player-score") {
                let text = snapshot
                    .as_ref()
                    .map(|s| s.score.player_label())
                    .unwrap_or_default();
                el.set_text_content(Some(&text));
            }
            if let Some(el) = document.get_element_by_id("opponent-score") {
                let text = snapshot
                    .as_ref()
                    .map(|s| s.score.opponent_label())
                    .unwrap_or_default();
                el.set_text_content(Some(&text));
            }
            if let Some(el) = document.get_element_by_id("difficulty") {
                let text = snapshot
                    .as_ref()
                    .map(|s| s.difficulty.label())
                    .unwrap_or_default();
                el.set_text_content(Some(&text));
            }

            show(document, "menu", self.session.phase() == Phase::Menu);
            show(document, "hud", self.session.phase() != Phase::Menu);
            show(document, "pause-banner", self.session.phase() == Phase::Paused);
        }

        /// Pointer position in canvas CSS pixels
        fn pointer_at(&mut self, canvas: &HtmlCanvasElement, x: f32, y: f32) {
            let viewport = (canvas.client_width() as f32, canvas.client_height() as f32);
            self.session
                .pointer_moved(viewport_to_field(x, y, FIELD_SIZE, viewport));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Kickabout starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        show(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let game = Rc::new(RefCell::new(Game::new()));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, FIELD_SIZE)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_menu(&document, game.clone());
        setup_input_handlers(&canvas, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        game.borrow().update_hud(&document);

        // Start game loop
        request_animation_frame(game);

        log::info!("Kickabout running!");
        Ok(())
    }

    /// One button per difficulty: `#rookie-btn`, `#professional-btn`, `#legendary-btn`
    fn setup_menu(document: &Document, game: Rc<RefCell<Game>>) {
        for difficulty in Difficulty::ALL {
            let id = format!("{}-btn", difficulty.as_str().to_lowercase());
            let Some(btn) = document.get_element_by_id(&id) else {
                log::warn!("Menu button #{} missing", id);
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().session.select_difficulty(difficulty);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - absolute position within the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().pointer_at(
                    &canvas_clone,
                    event.offset_x() as f32,
                    event.offset_y() as f32,
                );
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    game.borrow_mut().pointer_at(&canvas_clone, x, y);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "p" | "P" => g.session.toggle_pause(),
                    "r" | "R" => g.session.restart(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
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
            g.update(time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let visible = document_clone.visibility_state() == web_sys::VisibilityState::Visible;
                game.borrow_mut().session.visibility_changed(visible);
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.focus_changed(false);
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window focus (click back in)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().session.focus_changed(true);
            });
            let _ =
                window.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Start-up failed: {:?}", e);
    }
}

/// Length of the headless attract-mode match (seconds of match time)
#[cfg(not(target_arch = "wasm32"))]
const ATTRACT_SECONDS: u32 = 90;

/// Fixed frame rate the headless runner pretends to render at
#[cfg(not(target_arch = "wasm32"))]
const ATTRACT_FPS: u32 = 60;

/// Command line of the headless runner: `kickabout [difficulty] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, PartialEq)]
struct AttractArgs {
    difficulty: kickabout::sim::Difficulty,
    tuning_path: Option<String>,
}

#[cfg(not(target_arch = "wasm32"))]
impl AttractArgs {
    /// A leading preset name picks the difficulty; anything else is the tuning file
    fn parse(args: impl IntoIterator<Item = String>) -> Self {
        use kickabout::sim::Difficulty;

        let mut args = args.into_iter().peekable();
        let difficulty = match args.peek().and_then(|a| Difficulty::from_str(a)) {
            Some(difficulty) => {
                args.next();
                difficulty
            }
            None => Difficulty::Professional,
        };
        Self {
            difficulty,
            tuning_path: args.next(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use kickabout::{PhysicsTuning, Session};

    env_logger::init();
    log::info!("Kickabout (native) starting...");
    log::info!("Rendering requires the web build - running a headless attract match");

    let args = AttractArgs::parse(std::env::args().skip(1));
    let tuning = match &args.tuning_path {
        Some(path) => PhysicsTuning::from_path(path).unwrap_or_else(|e| {
            log::error!("Ignoring tuning file {}: {}", path, e);
            PhysicsTuning::default()
        }),
        None => PhysicsTuning::default(),
    };

    let mut session = Session::new(tuning);
    log::info!("Physics tuning: {:?}", session.tuning());
    session.select_difficulty(args.difficulty);

    for frame in 0..ATTRACT_SECONDS * ATTRACT_FPS {
        // The attract player simply runs at the ball
        if let Some(ball) = session.state().map(|s| s.ball.center()) {
            session.pointer_moved(ball);
        }
        session.frame(frame as f64 / ATTRACT_FPS as f64);
    }

    match session.snapshot().map(|s| serde_json::to_string_pretty(&s)) {
        Some(Ok(json)) => println!("{}", json),
        Some(Err(e)) => log::error!("Failed to serialize final snapshot: {}", e),
        None => log::warn!("No match was played"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use kickabout::sim::Difficulty;

    fn parse(args: &[&str]) -> AttractArgs {
        AttractArgs::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_no_args_defaults_to_professional() {
        assert_eq!(
            parse(&[]),
            AttractArgs {
                difficulty: Difficulty::Professional,
                tuning_path: None,
            }
        );
    }

    #[test]
    fn test_difficulty_then_tuning_path() {
        let args = parse(&["legendary", "tuning.json"]);
        assert_eq!(args.difficulty, Difficulty::Legendary);
        assert_eq!(args.tuning_path.as_deref(), Some("tuning.json"));
    }

    #[test]
    fn test_tuning_path_alone() {
        let args = parse(&["tuning.json"]);
        assert_eq!(args.difficulty, Difficulty::Professional);
        assert_eq!(args.tuning_path.as_deref(), Some("tuning.json"));
    }
}
