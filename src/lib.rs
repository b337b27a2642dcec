mod app;
mod engine;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Event, HtmlCanvasElement, HtmlInputElement, MouseEvent, Request, RequestInit, RequestMode, Response, WebGlRenderingContext, WheelEvent, Window};

use crate::app::hud::Hud;
use crate::app::{App, AppConfig};
use crate::engine::renderer::Renderer;

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

#[wasm_bindgen]
pub async fn init_app() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or("No window")?;
    let document = window.document().ok_or("No document")?;
    let canvas = document.get_element_by_id("solarCanvas")
        .ok_or("No canvas")?
        .dyn_into::<HtmlCanvasElement>()?;

    let gl = canvas
        .get_context("webgl")?
        .ok_or("No WebGL")?
        .dyn_into::<WebGlRenderingContext>()?;

    let renderer = Renderer::new(gl)?;
    let config = fetch_config(&window).await;
    let hud = Hud::new(&document)?;

    let mut app = App::new(renderer, hud, config)?;
    app.handle_resize();
    APP.with(|cell| *cell.borrow_mut() = Some(app));

    bind_controls(&window, &document, &canvas)?;

    // Render loop
    let f = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        with_app(|app| app.frame());
        request_animation_frame(f.borrow().as_ref().unwrap());
    }) as Box<dyn FnMut()>));

    request_animation_frame(g.borrow().as_ref().unwrap());

    log::info!("solar-orrery: initialized");
    Ok(())
}

/// Optional startup config; any failure along the way falls back to the
/// defaults without surfacing an error.
async fn fetch_config(window: &Window) -> AppConfig {
    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = match Request::new_with_str_and_init("/assets/config.json", &opts) {
        Ok(request) => request,
        Err(_) => return AppConfig::default(),
    };

    if let Ok(resp_value) = JsFuture::from(window.fetch_with_request(&request)).await {
        if let Ok(resp) = resp_value.dyn_into::<Response>() {
            if resp.ok() {
                if let Ok(json_promise) = resp.json() {
                    if let Ok(json) = JsFuture::from(json_promise).await {
                        if let Ok(config) = serde_wasm_bindgen::from_value(json) {
                            return config;
                        }
                    }
                }
            }
        }
    }

    AppConfig::default()
}

fn bind_controls(window: &Window, document: &Document, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
    // Hover tooltip + camera drag share the same move events
    let on_mouse_move = Closure::wrap(Box::new(move |event: MouseEvent| {
        with_app(|app| app.pointer_move(event.client_x(), event.client_y()));
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousemove", on_mouse_move.as_ref().unchecked_ref())?;
    on_mouse_move.forget();

    let on_mouse_down = Closure::wrap(Box::new(move |event: MouseEvent| {
        with_app(|app| app.pointer_down(event.client_x(), event.client_y()));
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("mousedown", on_mouse_down.as_ref().unchecked_ref())?;
    on_mouse_down.forget();

    // On the window, so releasing outside the canvas still ends the drag
    let on_mouse_up = Closure::wrap(Box::new(move |_event: MouseEvent| {
        with_app(|app| app.pointer_up());
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("mouseup", on_mouse_up.as_ref().unchecked_ref())?;
    on_mouse_up.forget();

    let on_wheel = Closure::wrap(Box::new(move |event: WheelEvent| {
        with_app(|app| app.wheel(event.delta_y() as f32));
    }) as Box<dyn FnMut(_)>);
    canvas.add_event_listener_with_callback("wheel", on_wheel.as_ref().unchecked_ref())?;
    on_wheel.forget();

    let on_orbit_toggle = Closure::wrap(Box::new(move |event: Event| {
        if let Some(input) = event.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
            with_app(|app| app.set_trails_visible(input.checked()));
        }
    }) as Box<dyn FnMut(_)>);
    document.get_element_by_id("toggleOrbits")
        .ok_or("No orbit toggle")?
        .add_event_listener_with_callback("change", on_orbit_toggle.as_ref().unchecked_ref())?;
    on_orbit_toggle.forget();

    let on_sidebar_toggle = Closure::wrap(Box::new(move || {
        with_app(|app| app.toggle_sidebar());
    }) as Box<dyn FnMut()>);
    document.get_element_by_id("toggleSidebar")
        .ok_or("No sidebar toggle")?
        .add_event_listener_with_callback("click", on_sidebar_toggle.as_ref().unchecked_ref())?;
    on_sidebar_toggle.forget();

    let on_pause = Closure::wrap(Box::new(move || {
        with_app(|app| app.set_paused(true));
    }) as Box<dyn FnMut()>);
    document.get_element_by_id("pauseBtn")
        .ok_or("No pause button")?
        .add_event_listener_with_callback("click", on_pause.as_ref().unchecked_ref())?;
    on_pause.forget();

    let on_resume = Closure::wrap(Box::new(move || {
        with_app(|app| app.set_paused(false));
    }) as Box<dyn FnMut()>);
    document.get_element_by_id("resumeBtn")
        .ok_or("No resume button")?
        .add_event_listener_with_callback("click", on_resume.as_ref().unchecked_ref())?;
    on_resume.forget();

    // One delegated listener covers every speed slider; rows without a
    // data-name, or with an unparsable value, are dropped silently.
    let on_slider = Closure::wrap(Box::new(move |event: Event| {
        if let Some(input) = event.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
            if let Some(name) = input.get_attribute("data-name") {
                if let Ok(value) = input.value().parse::<f32>() {
                    with_app(|app| app.set_speed(&name, value));
                }
            }
        }
    }) as Box<dyn FnMut(_)>);
    document.get_element_by_id("sliders")
        .ok_or("No sliders container")?
        .add_event_listener_with_callback("input", on_slider.as_ref().unchecked_ref())?;
    on_slider.forget();

    let on_resize = Closure::wrap(Box::new(move || {
        with_app(|app| app.handle_resize());
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("resize", on_resize.as_ref().unchecked_ref())?;
    on_resize.forget();

    Ok(())
}

fn request_animation_frame(f: &Closure<dyn FnMut()>) {
    web_sys::window()
        .unwrap()
        .request_animation_frame(f.as_ref().unchecked_ref())
        .unwrap();
}
