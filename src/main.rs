//! Rock'n'Race entry point
//!
//! On the web: sets up WebGPU on the page canvas, feeds pointer input to
//! the game and runs the frame loop. Natively: drives a headless game with
//! a simple autopilot and logs how far it got.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::error::Error;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use rock_n_race::audio::AudioManager;
    use rock_n_race::platform::WebPixelSource;
    use rock_n_race::renderer::{FrameRecorder, GpuTextures, ImageRenderer};
    use rock_n_race::sim::{Game, Gesture, GestureTracker};
    use rock_n_race::{Settings, Tuning};

    /// Everything the page keeps alive between frames
    struct App {
        game: Game<GpuTextures<WebPixelSource>>,
        renderer: ImageRenderer,
        frame: FrameRecorder,
        gestures: GestureTracker,
        audio: AudioManager,
    }

    impl App {
        /// Advance, draw and present one frame
        fn frame(&mut self, time: f64) {
            self.frame.begin(time);
            self.game.draw(&mut self.frame);

            for event in self.game.drain_events() {
                self.audio.on_event(event);
            }

            match self.renderer.render(&self.frame) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    self.renderer.resize(self.renderer.size.0, self.renderer.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn apply(&mut self, gestures: impl IntoIterator<Item = Gesture>) {
            for gesture in gestures {
                self.game.apply(gesture);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {e}").into());
        }

        log::info!("Rock'n'Race starting...");

        match start().await {
            Ok(()) => log::info!("Rock'n'Race running!"),
            Err(e) => log::error!("Failed to start: {e}"),
        }
    }

    async fn start() -> Result<(), Box<dyn Error>> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "#canvas is not a canvas")?;

        // Layout happens in CSS pixels, the surface in device pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        if client_w <= 0 || client_h <= 0 || width == 0 || height == 0 {
            return Err(format!("canvas has no area ({client_w}x{client_h} CSS pixels)").into());
        }
        canvas.set_width(width);
        canvas.set_height(height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(rock_n_race::RenderError::from)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(rock_n_race::RenderError::from)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let renderer = ImageRenderer::new(surface, &adapter, width, height, dpr as f32).await?;

        let mut tuning = Tuning::load();
        tuning.seed.get_or_insert(js_sys::Date::now() as u64);

        let textures = renderer.textures(WebPixelSource::new(document.clone())?);
        let screen = Vec2::new(client_w as f32, client_h as f32);
        let game = Game::new(screen, tuning, textures)?;

        let app = Rc::new(RefCell::new(App {
            game,
            renderer,
            frame: FrameRecorder::default(),
            gestures: GestureTracker::new(),
            audio: AudioManager::new(Settings::load()),
        }));

        setup_input_handlers(&canvas, app.clone());
        setup_key_handlers(&document, app.clone());
        request_animation_frame(app);
        Ok(())
    }

    fn pointer_location(event: &PointerEvent) -> Vec2 {
        Vec2::new(event.offset_x() as f32, event.offset_y() as f32)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Pointer down
        {
            let app = app.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                // Keep receiving moves when the finger leaves the canvas
                let _ = target.set_pointer_capture(event.pointer_id());

                let mut a = app.borrow_mut();
                // Browsers only start audio from inside a gesture
                a.audio.resume();
                a.gestures.pointer_down(pointer_location(&event));
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer move
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                let gestures = a.gestures.pointer_moved(pointer_location(&event));
                a.apply(gestures);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut a = app.borrow_mut();
                let gesture = a.gestures.pointer_up();
                a.apply(gesture);
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer cancelled by the browser
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                let mut a = app.borrow_mut();
                let gesture = a.gestures.pointer_cancel();
                a.apply(gesture);
            });
            let _ = canvas.add_event_listener_with_callback(
                "pointercancel",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_key_handlers(document: &Document, app: Rc<RefCell<App>>) {
        // M toggles mute and remembers it
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.repeat() || !event.key().eq_ignore_ascii_case("m") {
                return;
            }
            let mut a = app.borrow_mut();
            a.audio.toggle_muted().save();
        });
        let _ = document
            .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use glam::Vec2;

    use rock_n_race::Tuning;
    use rock_n_race::renderer::{FrameRecorder, HeadlessTextures};
    use rock_n_race::sim::{Game, GameEvent, GamePhase};

    /// Portrait phone screen, in points
    const SCREEN: Vec2 = Vec2::new(400.0, 800.0);
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Five minutes at 60 fps
    const MAX_FRAMES: u32 = 5 * 60 * 60;

    /// Drag the player into whichever lane the oncoming car is not in
    fn dodge(game: &mut Game<HeadlessTextures>) {
        let width = game.screen_size().x;
        let enemy_x = game.enemy().center.x;
        let target_x = if enemy_x < width / 2.0 {
            width * 0.75
        } else {
            width * 0.25
        };

        let player = game.player().center;
        if player.x == target_x {
            return;
        }
        game.move_started(player);
        game.moved(Vec2::new(target_x - player.x, 0.0));
        game.move_ended();
    }

    pub fn run(tuning: Tuning) {
        let mut game = match Game::new(SCREEN, tuning, HeadlessTextures::new()) {
            Ok(game) => game,
            Err(e) => {
                log::error!("Failed to create game: {e}");
                return;
            }
        };
        let mut frame = FrameRecorder::default();

        game.handle_tap(SCREEN / 2.0);
        for i in 0..MAX_FRAMES {
            frame.begin(f64::from(i) * FRAME_MS);
            game.draw(&mut frame);

            for event in game.drain_events() {
                match event {
                    GameEvent::Overtaken { total } if total % 10 == 0 => {
                        log::info!("{total} cars overtaken, speed {:.1}", game.road().speed);
                    }
                    GameEvent::Crashed { cars_overtaken } => {
                        log::info!("Crashed on frame {i} after {cars_overtaken} cars");
                    }
                    _ => {}
                }
            }

            if game.phase() != GamePhase::Playing {
                break;
            }
            dodge(&mut game);
        }

        log::info!(
            "Autopilot finished: {:?}, {} cars overtaken, final speed {:.1}",
            game.phase(),
            game.cars_overtaken(),
            game.road().speed
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Rock'n'Race (native) starting...");
    log::info!("Native mode runs a headless autopilot");
    log::info!("Run with `trunk serve` for the web version");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match rock_n_race::Tuning::load_from_path(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => rock_n_race::Tuning::default(),
    };

    autopilot::run(tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
