//! Dashboard overview page component

use grievance_common::Request;
use leptos::*;
use crate::components::{RequestList, StatCardGrid};
use super::state::use_dashboard_context;

/// Overview page: stat cards plus the recent pending and in-flight lists.
#[component]
pub fn OverviewPage() -> impl IntoView {
    let ctx = use_dashboard_context();

    let cards = Signal::derive(move || {
        ctx.requests.with(|requests| {
            ctx.users
                .with(|users| ctx.controller.with(|c| c.stat_cards(requests, users)))
        })
    });
    let lists = create_memo(move |_| {
        ctx.requests
            .with(|requests| ctx.controller.with(|c| c.dashboard_lists(requests)))
    });
    let pending = Signal::derive(move || lists.with(|(pending, _)| pending.clone()));
    let in_progress = Signal::derive(move || lists.with(|(_, active)| active.clone()));

    let select = Callback::new(move |request: Request| {
        ctx.controller.update(|c| c.select_request(request));
    });

    view! {
        <StatCardGrid cards=cards />

        <div class="dashboard-grid">
            <div class="card">
                <div class="card-header">
                    <span class="card-title">"Recent Pending Requests"</span>
                </div>
                <div class="card-body">
                    <RequestList requests=pending on_select=select empty_text="No pending requests" />
                </div>
            </div>

            <div class="card">
                <div class="card-header">
                    <span class="card-title">"In Progress"</span>
                </div>
                <div class="card-body">
                    <RequestList requests=in_progress on_select=select empty_text="Nothing in progress" />
                </div>
            </div>
        </div>
    }
}
