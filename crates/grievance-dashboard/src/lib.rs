//! Grievance Dashboard - Leptos Web Interface
//!
//! Browser console for the grievance tracker: customers file requests and
//! follow them up, administrators triage, assign and resolve them, and both
//! sides exchange threaded messages per request.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

pub mod api;
pub mod components;
pub mod pages;
pub mod state;
pub mod storage;

use leptos::*;
use leptos_router::*;

use pages::{Dashboard, Login, Register};
use state::provide_app_state;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_app_state();

    view! {
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=|| view! { <Redirect path="/dashboard"/> } />
                    <Route path="/login" view=Login />
                    <Route path="/register" view=Register />
                    <Route path="/dashboard" view=Dashboard />
                    <Route path="/dashboard/*any" view=Dashboard />
                </Routes>
            </main>
        </Router>
    }
}

/// Mount the application to the DOM
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("console logger not installed: {}", e).into());
    }

    mount_to_body(App);
}
