mod app;
mod catalog;
mod clock;
mod config;
mod console;
mod errors;
mod gacha;
mod input;
mod picker;
mod store;
mod thumbnail;
mod time;
mod timer;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use app::state::Session;
use app::GachaApp;
use clock::SystemClock;
use config::GachaConfig;
use errors::Disposition;
use gacha::Gacha;
use input::{ClickState, InputEvent};
use picker::Inbox;
use store::kv::KvStore;
use time::FrameClock;

/// Map a pointer position in client pixels to an action via the grid element.
fn dom_hit_test(mouse_x: u32, mouse_y: u32, cs: &ClickState) -> Option<u16> {
    let document = web_sys::window()?.document()?;

    // DomBackend creates a <div> as the grid container inside <body>.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    cs.hit_test_pixels(
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    )
}

fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Feed one event to the app, then open a file picker if a control asked
/// for one. Runs inside the DOM event, so the picker counts as user-initiated.
fn dispatch(app: &Rc<RefCell<GachaApp>>, inbox: &Inbox, event: InputEvent) {
    let target = {
        let mut a = app.borrow_mut();
        a.handle_input(&event);
        a.take_pick_request()
    };
    if let Some(target) = target {
        if let Err(e) = picker::open(target, inbox) {
            console::error(&format!("ファイル選択を開けませんでした: {e}"));
        }
    }
}

fn show_fatal_screen(html: &str) {
    let body = web_sys::window()
        .and_then(|w| w.document())
        .and_then(|d| d.body());
    if let Some(body) = body {
        body.set_inner_html(html);
    }
}

/// Panics are logged and always replace the page with the fatal screen.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        console_error_panic_hook::hook(info);
        show_fatal_screen(&errors::panic_screen_html(info.payload(), &info.to_string()));
    }));
}

fn suppress_if_noise(message: &str, event: &web_sys::Event) {
    if errors::classify(message) == Disposition::Suppressed {
        event.prevent_default();
        console::warn(&format!("拡張機能由来のエラーを無視しました: {message}"));
    }
}

/// Window-level listeners for errors thrown by scripts other than ours.
fn install_error_listeners() -> Option<()> {
    let window = web_sys::window()?;

    let on_error = Closure::<dyn FnMut(web_sys::ErrorEvent)>::new(|e: web_sys::ErrorEvent| {
        suppress_if_noise(&e.message(), &e);
    });
    window
        .add_event_listener_with_callback("error", on_error.as_ref().unchecked_ref())
        .ok()?;
    on_error.forget();

    let on_rejection = Closure::<dyn FnMut(web_sys::PromiseRejectionEvent)>::new(
        |e: web_sys::PromiseRejectionEvent| {
            let reason = e.reason();
            let message = reason
                .as_string()
                .or_else(|| {
                    js_sys::Reflect::get(&reason, &"message".into())
                        .ok()
                        .and_then(|m| m.as_string())
                })
                .unwrap_or_default();
            suppress_if_noise(&message, &e);
        },
    );
    window
        .add_event_listener_with_callback("unhandledrejection", on_rejection.as_ref().unchecked_ref())
        .ok()?;
    on_rejection.forget();

    Some(())
}

fn main() -> io::Result<()> {
    install_panic_hook();
    if install_error_listeners().is_none() {
        console::warn("エラーリスナーを登録できませんでした");
    }

    let config = GachaConfig::default();
    let ticks_per_second = config.ticks_per_second;
    let session = Session::new(
        Rc::new(KvStore::browser()),
        Rc::new(SystemClock),
        config,
        Gacha::from_entropy(),
    );
    let app = Rc::new(RefCell::new(GachaApp::new(session)));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let inbox: Inbox = Rc::new(RefCell::new(Vec::new()));

    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Mouse/touch click handler
    terminal.on_mouse_event({
        let app = app.clone();
        let click_state = click_state.clone();
        let inbox = inbox.clone();
        move |mouse_event| {
            if mouse_event.event != MouseEventKind::Pressed
                || mouse_event.button != MouseButton::Left
            {
                return;
            }
            let action = {
                let cs = click_state.borrow();
                if cs.terminal_rows == 0 || cs.terminal_cols == 0 {
                    return;
                }
                dom_hit_test(mouse_event.x, mouse_event.y, &cs)
            };
            if let Some(id) = action {
                dispatch(&app, &inbox, InputEvent::Click(id));
            }
        }
    });

    // Keyboard handler
    terminal.on_key_event({
        let app = app.clone();
        let inbox = inbox.clone();
        move |key_event| {
            let key = match key_event.code {
                KeyCode::Char(c) => c,
                KeyCode::Esc => 'q',
                _ => return,
            };
            dispatch(&app, &inbox, InputEvent::Key(key));
        }
    });

    let frame_clock = RefCell::new(FrameClock::new(ticks_per_second));
    terminal.draw_web(move |f| {
        let size = f.area();
        click_state.borrow_mut().reset(size.width, size.height);

        let picked: Vec<_> = inbox.borrow_mut().drain(..).collect();
        let ticks = frame_clock.borrow_mut().advance(now_ms());
        {
            let mut a = app.borrow_mut();
            // Tick first: a cover picked this frame is decoded on the next one.
            a.tick(ticks);
            for file in picked {
                a.on_file_picked(file);
            }
        }

        app.borrow().render(f, size, &click_state);
    });

    Ok(())
}
