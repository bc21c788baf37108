//! Podracer entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, FontFace, HtmlCanvasElement, HtmlImageElement, KeyboardEvent};

    use podracer::assets::{AssetError, AssetId, Readiness, ReadinessLatch};
    use podracer::audio::{AudioCue, HtmlAudio};
    use podracer::consts::FONT_FAMILY;
    use podracer::input::Key;
    use podracer::platform::LocalStore;
    use podracer::renderer::{CanvasSurface, Sprite};
    use podracer::{Game, Settings, Tuning};

    /// Game plus the surface it draws on
    struct App {
        game: Game,
        surface: CanvasSurface,
    }

    type ReadyCallback = Rc<dyn Fn(Readiness)>;

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Podracer starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let tuning = Tuning::default();
        let timeout_ms = tuning.asset_timeout_ms;
        let settings = Settings::load(&LocalStore::new());

        let audio = HtmlAudio::new(&settings);
        watch_audio_errors(&audio);

        let images = Sprite::ALL.map(|sprite| {
            let img = HtmlImageElement::new();
            if let Err(ref e) = img {
                log::error!("Could not create image for {:?}: {:?}", sprite, e);
            }
            img.ok()
        });
        let surface = CanvasSurface::new(&canvas, images.clone())?;

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(
            tuning,
            settings,
            seed,
            Box::new(audio),
            Box::new(LocalStore::new()),
        );
        let app = Rc::new(RefCell::new(App { game, surface }));
        app.borrow_mut().game.start_music();

        setup_key_handler(app.clone());

        let on_ready: ReadyCallback = {
            let app = app.clone();
            Rc::new(move |readiness: Readiness| {
                log::info!(
                    "Assets ready ({:?}): {} loaded, {} failed, {} pending",
                    readiness.reason,
                    readiness.loaded.len(),
                    readiness.failed.len(),
                    readiness.pending.len()
                );
                if !readiness.is_loaded(AssetId::DisplayFont) {
                    log::warn!("Display font not ready, text uses sans-serif until it loads");
                }
                app.borrow_mut().game.start();
                request_animation_frame(app.clone());
            })
        };

        let latch = Rc::new(RefCell::new(ReadinessLatch::new(AssetId::GATING)));
        for (sprite, img) in Sprite::ALL.into_iter().zip(images) {
            load_image(sprite, img, latch.clone(), on_ready.clone());
        }
        load_font(&document, latch.clone(), on_ready.clone());
        start_timeout(&window, timeout_ms, latch.clone(), on_ready.clone());

        let ready = latch.borrow_mut().check();
        if let Some(readiness) = ready {
            on_ready(readiness);
        }

        log::info!("Podracer loading assets...");
        Ok(())
    }

    fn settle(
        latch: &Rc<RefCell<ReadinessLatch>>,
        on_ready: &ReadyCallback,
        asset: AssetId,
        result: Result<(), AssetError>,
    ) {
        let ready = latch.borrow_mut().settle(asset, result);
        if let Some(readiness) = ready {
            on_ready(readiness);
        }
    }

    fn load_image(
        sprite: Sprite,
        img: Option<HtmlImageElement>,
        latch: Rc<RefCell<ReadinessLatch>>,
        on_ready: ReadyCallback,
    ) {
        let asset = sprite.asset();
        let Some(img) = img else {
            settle(&latch, &on_ready, asset, Err(AssetError::new(asset, "no image element")));
            return;
        };

        {
            let latch = latch.clone();
            let on_ready = on_ready.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                settle(&latch, &on_ready, asset, Ok(()));
            });
            let _ = img.add_event_listener_with_callback("load", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                settle(&latch, &on_ready, asset, Err(AssetError::new(asset, "image failed to load")));
            });
            let _ = img.add_event_listener_with_callback("error", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        img.set_src(asset.path());
    }

    fn load_font(document: &Document, latch: Rc<RefCell<ReadinessLatch>>, on_ready: ReadyCallback) {
        let asset = AssetId::DisplayFont;
        let source = format!("url({})", asset.path());
        let font = match FontFace::new_with_str(FONT_FAMILY, &source) {
            Ok(font) => font,
            Err(e) => {
                settle(&latch, &on_ready, asset, Err(AssetError::new(asset, format!("{:?}", e))));
                return;
            }
        };
        let promise = match font.load() {
            Ok(promise) => promise,
            Err(e) => {
                settle(&latch, &on_ready, asset, Err(AssetError::new(asset, format!("{:?}", e))));
                return;
            }
        };

        let fonts = document.fonts();
        wasm_bindgen_futures::spawn_local(async move {
            let result = match JsFuture::from(promise).await {
                Ok(_) => fonts
                    .add(&font)
                    .map(|_| ())
                    .map_err(|e| AssetError::new(asset, format!("{:?}", e))),
                Err(e) => Err(AssetError::new(asset, format!("{:?}", e))),
            };
            settle(&latch, &on_ready, asset, result);
        });
    }

    fn start_timeout(
        window: &web_sys::Window,
        timeout_ms: u32,
        latch: Rc<RefCell<ReadinessLatch>>,
        on_ready: ReadyCallback,
    ) {
        let closure = Closure::once(move || {
            let ready = latch.borrow_mut().time_out();
            if let Some(readiness) = ready {
                on_ready(readiness);
            }
        });
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            timeout_ms as i32,
        ) {
            log::error!("Could not schedule asset timeout: {:?}", e);
        }
        closure.forget();
    }

    /// Audio never gates the start; failures are only reported
    fn watch_audio_errors(audio: &HtmlAudio) {
        for cue in AudioCue::ALL {
            let Some(el) = audio.element(cue) else { continue };
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                log::warn!("{}; playing silently", AssetError::new(cue.asset(), "audio failed to load"));
            });
            let _ = el.add_event_listener_with_callback("error", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_key_handler(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if let Some(key) = Key::from_code(&event.code()) {
                event.prevent_default();
                app.borrow_mut().game.key_down(key);
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            let App { game, surface } = &mut *a;
            game.frame(surface);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use podracer::audio::SilentAudio;
    use podracer::input::Key;
    use podracer::platform::MemoryStore;
    use podracer::renderer::HeadlessSurface;
    use podracer::sim::{GameState, Lane};
    use podracer::{FrameOutcome, Game, Settings, Tuning};

    /// Ten minutes at 60 Hz
    const SESSION_FRAMES: u64 = 36_000;
    /// How far ahead of the vehicle the autopilot looks (px)
    const LOOKAHEAD: f32 = 120.0;

    /// Pick a key that moves out of the way of the nearest threat
    fn autopilot(state: &GameState) -> Option<Key> {
        let vehicle = &state.vehicle;
        let threatened = |lane: Lane| {
            state.obstacles.iter().any(|o| {
                o.lane == lane
                    && o.x + o.width > vehicle.x
                    && o.x < vehicle.x + vehicle.width + LOOKAHEAD
            })
        };
        if !threatened(vehicle.lane) {
            return None;
        }
        let up = vehicle.lane.up().filter(|l| !threatened(*l)).map(|_| Key::Up);
        let down = vehicle.lane.down().filter(|l| !threatened(*l)).map(|_| Key::Down);
        up.or(down)
    }

    fn load_tuning() -> Tuning {
        let Some(path) = std::env::args().nth(1) else {
            return Tuning::default();
        };
        let parsed = std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()));
        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::error!("Ignoring tuning file {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut game = Game::new(
            load_tuning(),
            Settings::default(),
            seed,
            Box::new(SilentAudio::new()),
            Box::new(MemoryStore::new()),
        );
        let mut surface = HeadlessSurface::new();
        let mut runs = 1;

        game.start();
        while game.frames() < SESSION_FRAMES {
            match game.frame(&mut surface) {
                FrameOutcome::GameOver => {
                    log::info!(
                        "Run {} over: score {}, high score {}",
                        runs,
                        game.state().score,
                        game.state().high_score.best()
                    );
                    game.key_down(Key::Up);
                    runs += 1;
                }
                FrameOutcome::Played(_) => {
                    if let Some(key) = autopilot(game.state()) {
                        game.key_down(key);
                    }
                }
                FrameOutcome::Skipped => break,
            }
        }
        game.stop();

        log::info!(
            "Session done: {} frames, {} runs, score {}, high score {}, speed {:.1}",
            game.frames(),
            runs,
            game.state().score,
            game.state().high_score.best(),
            game.state().speed()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Podracer (native) starting...");
    log::info!("Native mode runs a headless autopilot session - build for wasm32 to play");

    headless::run();
}
