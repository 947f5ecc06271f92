//! Dashboard module - the signed-in console

pub mod analytics;
pub mod create;
pub mod detail;
pub mod messages;
pub mod overview;
pub mod requests;
pub mod sidebar;
pub mod state;
pub mod users;

pub use analytics::AnalyticsPage;
pub use create::CreateRequestPage;
pub use detail::RequestDetailPage;
pub use messages::MessagesPanel;
pub use overview::OverviewPage;
pub use requests::RequestsPage;
pub use sidebar::Sidebar;
pub use state::{provide_dashboard_context, use_dashboard_context, DashboardContext};
pub use users::UsersPage;

use grievance_client::Screen;
use grievance_common::User;
use leptos::*;
use leptos_router::*;
use crate::state::use_app_state;

/// Main dashboard component. Redirects to the login page without a session.
#[component]
pub fn Dashboard() -> impl IntoView {
    let navigate = use_navigate();
    let app_state = use_app_state();
    let viewer = create_memo(move |_| app_state.user.get());

    create_effect(move |_| {
        if !app_state.is_loading.get() && !app_state.is_authenticated.get() {
            navigate("/login", Default::default());
        }
    });

    move || viewer.get().map(|viewer| view! { <DashboardShell viewer=viewer /> })
}

#[component]
fn DashboardShell(viewer: User) -> impl IntoView {
    let app_state = use_app_state();
    let ctx = provide_dashboard_context(app_state.api(), &viewer);

    let load_data = create_action(move |_: &()| async move { ctx.load().await });

    // Load data on mount
    create_effect(move |_| {
        load_data.dispatch(());
    });

    let screen = create_memo(move |_| ctx.controller.with(|c| c.screen()));
    let page_title = move || ctx.controller.with(|c| c.title());
    let unread = move || ctx.mails.with(|mails| mails.iter().filter(|m| !m.is_read && !m.is_archived).count());
    let viewer_name = viewer.user_name.clone();
    let viewer_label = viewer
        .company_label()
        .map(str::to_string)
        .unwrap_or_else(|| viewer.role.to_string());

    view! {
        <div class=move || if ctx.controller.with(|c| c.sidebar_open()) { "dashboard-layout sidebar-open" } else { "dashboard-layout" }>
            <Sidebar />

            <main class="main-content">
                <header class="content-header">
                    <button class="menu-toggle" on:click=move |_| ctx.controller.update(|c| c.toggle_sidebar())>"☰"</button>
                    <h1>{page_title}</h1>
                    <div class="header-actions">
                        <button class="messages-btn" on:click=move |_| ctx.controller.update(|c| c.open_messages())>
                            "Messages"
                            <Show when=move || { unread() > 0 }>
                                <span class="unread-count">{unread}</span>
                            </Show>
                        </button>
                        <button
                            class="refresh-btn"
                            on:click=move |_| load_data.dispatch(())
                            disabled=move || ctx.loading.get()
                        >
                            {move || if ctx.loading.get() { "Refreshing..." } else { "Refresh" }}
                        </button>
                        <div class="viewer">
                            <span class="viewer-name">{viewer_name}</span>
                            <span class="viewer-label">{viewer_label}</span>
                        </div>
                    </div>
                </header>

                <Show when=move || ctx.message.get().is_some()>
                    {move || ctx.message.get().map(|(text, ok)| view! {
                        <div class=if ok { "banner success" } else { "banner error" }>
                            <span>{text}</span>
                            <button class="banner-close" on:click=move |_| ctx.message.set(None)>"×"</button>
                        </div>
                    })}
                </Show>

                <Show when=move || ctx.error.get().is_some()>
                    <div class="banner error">{move || ctx.error.get()}</div>
                </Show>

                <Show when=move || ctx.loading.get()>
                    <div class="loading-overlay">
                        <div class="spinner"></div>
                        <p>"Loading..."</p>
                    </div>
                </Show>

                <div class="page-content">
                    {move || match screen.get() {
                        Screen::Dashboard => view! { <OverviewPage /> }.into_view(),
                        Screen::MyRequests | Screen::AllRequests | Screen::Pending | Screen::Active => {
                            view! { <RequestsPage /> }.into_view()
                        }
                        Screen::CreateRequest => view! { <CreateRequestPage /> }.into_view(),
                        Screen::Analytics => view! { <AnalyticsPage /> }.into_view(),
                        Screen::Users => view! { <UsersPage /> }.into_view(),
                        Screen::RequestDetail => view! { <RequestDetailPage /> }.into_view(),
                    }}
                </div>
            </main>

            <Show when=move || ctx.controller.with(|c| c.show_messages())>
                <MessagesPanel />
            </Show>
        </div>
    }
}
