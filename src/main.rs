//! Headshot Bounce entry point
//!
//! On the web: wires the simulation to the about page DOM and runs the frame
//! loop. Natively: runs a headless demo and prints the final bodies.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_about {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, HtmlImageElement, MouseEvent};

    use headshot_bounce::Settings;
    use headshot_bounce::sim::{
        Anchor, BodyHandle, Deflections, Obstacle, ObstacleId, Rect, SimState, StepInput, Transform,
        step,
    };

    /// Clicks inside these never spawn a body
    const SPAWN_EXCLUDE: &str = "a, .contact-social, .social-icon, .contact-item";
    /// The custom cursor hides over these
    const CURSOR_HIDE: &str = ".contact-item, .social-icon, .contact-social";

    /// About page instance holding all state
    struct About {
        state: SimState,
        deflections: Deflections,
        container: HtmlElement,
        /// Doubles as the anchor and the sprite template
        headshot: HtmlImageElement,
        words: Vec<HtmlElement>,
        sprites: HashMap<BodyHandle, HtmlElement>,
    }

    impl About {
        fn anchor(&self) -> Anchor {
            Anchor::new(
                Vec2::new(
                    self.headshot.offset_left() as f32,
                    self.headshot.offset_top() as f32,
                ),
                Vec2::new(self.headshot.width() as f32, self.headshot.height() as f32),
            )
        }

        /// Word rectangles in container space, as currently laid out
        fn obstacles(&self) -> Vec<Obstacle> {
            let origin = self.container.get_bounding_client_rect();
            self.words
                .iter()
                .enumerate()
                .map(|(i, word)| {
                    let r = word.get_bounding_client_rect();
                    Obstacle {
                        id: ObstacleId(i as u32),
                        rect: Rect::from_edges(
                            (r.left() - origin.left()) as f32,
                            (r.top() - origin.top()) as f32,
                            (r.right() - origin.left()) as f32,
                            (r.bottom() - origin.top()) as f32,
                        ),
                    }
                })
                .collect()
        }

        fn spawn_at(&mut self, client_x: f32, client_y: f32) {
            let origin = self.container.get_bounding_client_rect();
            let click = Vec2::new(
                client_x - origin.left() as f32,
                client_y - origin.top() as f32,
            );
            let Some(sprite) = self.make_sprite() else {
                log::warn!("Could not clone headshot, skipping spawn");
                return;
            };

            // The image may have finished loading or been resized since startup
            let template = self.template();
            if template == Vec2::ZERO {
                log::debug!("Headshot has no size yet, spawning a zero-size body");
            }
            self.state.template = template;
            let handle = self.state.spawn(click - template * 0.5);
            if let Some(body) = self.state.body(handle) {
                place_sprite(&sprite, &body.transform());
            }
            self.sprites.insert(handle, sprite);

            for evicted in self.state.take_evicted() {
                if let Some(el) = self.sprites.remove(&evicted) {
                    el.remove();
                }
            }
        }

        /// Current rendered size of the headshot
        fn template(&self) -> Vec2 {
            Vec2::new(self.headshot.width() as f32, self.headshot.height() as f32)
        }

        fn make_sprite(&self) -> Option<HtmlElement> {
            let sprite = self
                .headshot
                .clone_node_with_deep(true)
                .ok()?
                .dyn_into::<HtmlElement>()
                .ok()?;
            let _ = sprite.style().set_property("position", "absolute");
            self.container.append_child(&sprite).ok()?;
            Some(sprite)
        }

        /// Step once and push the results into the DOM
        fn frame(&mut self) {
            let obstacles = self.obstacles();
            let input = StepInput {
                bounds: Vec2::new(
                    self.container.client_width() as f32,
                    self.container.client_height() as f32,
                ),
                anchor: self.anchor(),
                obstacles: &obstacles,
            };
            let reports = step(&mut self.state, &input);

            for report in &reports {
                if let Some(sprite) = self.sprites.get(&report.handle) {
                    place_sprite(sprite, &report.transform);
                }
            }

            for id in self.deflections.apply(&reports) {
                let Some(word) = self.words.get(id.0 as usize) else {
                    continue;
                };
                let transform = if self.deflections.is_displaced(id) {
                    let offset = self.deflections.offset(id);
                    format!("translate({}px, {}px)", offset.x, offset.y)
                } else {
                    String::new()
                };
                let _ = word.style().set_property("transform", &transform);
            }
        }
    }

    fn place_sprite(sprite: &HtmlElement, transform: &Transform) {
        let style = sprite.style();
        let _ = style.set_property("left", &format!("{}px", transform.pos.x));
        let _ = style.set_property("top", &format!("{}px", transform.pos.y));
        let _ = style.set_property("transform", &format!("rotate({}deg)", transform.rotation));
    }

    /// Replace a paragraph's text with one span per word
    fn split_words(document: &Document, paragraph: &Element) -> Vec<HtmlElement> {
        let text = paragraph.text_content().unwrap_or_default();
        paragraph.set_inner_html("");

        let mut words = Vec::new();
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 {
                let _ = paragraph.append_child(&document.create_text_node(" "));
            }
            let Some(span) = document
                .create_element("span")
                .ok()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                continue;
            };
            span.set_class_name("floating-word");
            span.set_text_content(Some(word));
            if paragraph.append_child(&span).is_ok() {
                words.push(span);
            }
        }
        words
    }

    fn event_target_matches(event: &MouseEvent, selectors: &str) -> bool {
        event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .and_then(|el| el.closest(selectors).ok().flatten())
            .is_some()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document available");
            return;
        };
        let Some(container) = document
            .query_selector(".about-container")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("No .about-container on this page, nothing to do");
            return;
        };
        let Some(headshot) = container
            .query_selector("img")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
        else {
            log::warn!("About container has no headshot image");
            return;
        };

        let words = match container.query_selector("p").ok().flatten() {
            Some(paragraph) => split_words(&document, &paragraph),
            None => Vec::new(),
        };

        // Pin the headshot where the layout put it
        let style = headshot.style();
        let left = headshot.offset_left();
        let top = headshot.offset_top();
        let _ = style.set_property("position", "absolute");
        let _ = style.set_property("left", &format!("{}px", left));
        let _ = style.set_property("top", &format!("{}px", top));

        let settings = Settings::load();

        let seed = js_sys::Date::now() as u64;
        let template = Vec2::new(headshot.width() as f32, headshot.height() as f32);
        let about = About {
            state: SimState::from_settings(seed, template, &settings),
            deflections: Deflections::new(),
            container: container.clone(),
            headshot,
            words,
            sprites: HashMap::new(),
        };
        log::info!(
            "About page ready: {} words, seed {}, template {}x{}",
            about.words.len(),
            seed,
            template.x,
            template.y
        );

        let about = Rc::new(RefCell::new(about));
        setup_spawn_handler(&container, about.clone());
        if settings.custom_cursor {
            setup_cursor(&document, &container);
        }
        request_animation_frame(about);
    }

    fn setup_spawn_handler(container: &HtmlElement, about: Rc<RefCell<About>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            if event_target_matches(&event, SPAWN_EXCLUDE) {
                return;
            }
            about
                .borrow_mut()
                .spawn_at(event.client_x() as f32, event.client_y() as f32);
        });
        let _ = container
            .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_cursor(document: &Document, container: &HtmlElement) {
        let Some(cursor) = document
            .create_element("div")
            .ok()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        cursor.set_class_name("about-cursor");
        if let Some(body) = document.body() {
            let _ = body.append_child(&cursor);
        }

        // Follow the pointer, hide over interactive bits
        {
            let cursor = cursor.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let style = cursor.style();
                let _ = style.set_property("left", &format!("{}px", event.client_x()));
                let _ = style.set_property("top", &format!("{}px", event.client_y()));
                let hidden = event_target_matches(&event, CURSOR_HIDE);
                let _ = style.set_property("opacity", if hidden { "0" } else { "1" });
            });
            let _ = container
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (kind, opacity) in [("mouseenter", "1"), ("mouseleave", "0")] {
            let cursor = cursor.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let _ = cursor.style().set_property("opacity", opacity);
            });
            let _ =
                container.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(about: Rc<RefCell<About>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            about.borrow_mut().frame();
            request_animation_frame(about);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_about::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use headshot_bounce::Settings;

    env_logger::init();
    log::info!("Headshot Bounce (native) starting...");
    log::info!("Native mode runs a headless demo - use `trunk serve` for the about page");

    let settings = match std::env::args_os().nth(1) {
        Some(path) => Settings::load_from_path(std::path::Path::new(&path)),
        None => Settings::default(),
    };
    run_demo(&settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drop a few headshots into a 960x540 container and let them settle
#[cfg(not(target_arch = "wasm32"))]
fn run_demo(settings: &headshot_bounce::Settings) {
    use glam::Vec2;
    use headshot_bounce::sim::{
        Anchor, Deflections, Obstacle, ObstacleId, Rect, SimState, StepInput, step,
    };

    const FRAMES: u32 = 600;
    let bounds = Vec2::new(960.0, 540.0);
    let template = Vec2::new(80.0, 80.0);
    let anchor = Anchor::new(Vec2::new(440.0, 140.0), template);

    if let Ok(json) = settings.to_json() {
        log::debug!("Effective settings: {}", json);
    }

    let mut state = SimState::from_settings(0x00B0_0B1E, template, settings);
    let mut deflections = Deflections::new();

    // A line of text along the bottom third
    let obstacles: Vec<Obstacle> = (0..12)
        .map(|i| Obstacle {
            id: ObstacleId(i),
            rect: Rect::new(40.0 + 72.0 * i as f32, 380.0, 60.0, 18.0),
        })
        .collect();

    // Includes a coincident pair and one dropped right on the anchor
    for pos in [
        Vec2::new(100.0, 50.0),
        Vec2::new(100.0, 50.0),
        anchor.pos,
        Vec2::new(800.0, 60.0),
    ] {
        state.spawn(pos);
    }

    for frame in 0..FRAMES {
        if frame > 0 && frame % 60 == 0 && frame <= 300 {
            state.spawn(Vec2::new(120.0 + frame as f32 * 2.0, 40.0));
        }
        let input = StepInput {
            bounds,
            anchor,
            obstacles: &obstacles,
        };
        let reports = step(&mut state, &input);
        let changed = deflections.apply(&reports);
        if !changed.is_empty() {
            log::debug!("Frame {}: {} words moved", frame, changed.len());
        }
    }

    let resting = state
        .bodies
        .iter()
        .filter(|b| {
            let floor = bounds.y - b.height() - state.tuning.edge_margin;
            (b.pos.y - floor).abs() < 1e-3 && b.vel.y.abs() < 1.0
        })
        .count();
    log::info!(
        "After {} frames: {} bodies, {} resting on the floor, {} words displaced",
        FRAMES,
        state.bodies.len(),
        resting,
        deflections.len()
    );

    match serde_json::to_string_pretty(&state.bodies) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize bodies: {}", e),
    }
}
