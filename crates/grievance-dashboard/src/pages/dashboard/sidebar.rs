//! Dashboard sidebar navigation component

use grievance_client::MenuItem;
use leptos::*;
use leptos_router::*;
use crate::state::use_app_state;
use super::state::{use_dashboard_context, DashboardContext};

fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "home" => "🏠",
        "file-text" => "📄",
        "plus" => "➕",
        "bar-chart" => "📊",
        "filter" => "⏳",
        "star" => "⭐",
        "users" => "👥",
        _ => "•",
    }
}

/// Sidebar navigation component
#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_dashboard_context();
    let navigate = use_navigate();
    let app_state = use_app_state();

    let logout = move |_| {
        app_state.logout();
        navigate("/login", Default::default());
    };

    let menu = ctx.controller.with_untracked(|c| c.menu());

    view! {
        <aside class="sidebar">
            <div class="sidebar-header">
                <span class="sidebar-title">"Grievance Console"</span>
            </div>

            <nav class="sidebar-nav">
                {menu.iter().map(|item| view! { <NavItem item=*item ctx=ctx /> }).collect_view()}
            </nav>

            <div class="sidebar-footer">
                <button class="logout-btn" on:click=logout>
                    <span class="logout-icon">"🚪"</span>
                    <span>"Logout"</span>
                </button>
            </div>
        </aside>
    }
}

/// Individual navigation item
#[component]
fn NavItem(item: MenuItem, ctx: DashboardContext) -> impl IntoView {
    let is_active = move || ctx.controller.with(|c| c.screen() == item.screen);

    view! {
        <button
            class=move || if is_active() { "nav-item active" } else { "nav-item" }
            on:click=move |_| ctx.controller.update(|c| c.navigate(item.screen))
        >
            <span class="nav-icon">{icon_glyph(item.icon)}</span>
            <span>{item.label}</span>
        </button>
    }
}
