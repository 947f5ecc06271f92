//! Analytics page component

use chrono::Utc;
use grievance_client::{Analytics, Breakdown};
use grievance_common::Request;
use leptos::*;
use crate::components::{RequestList, StatCardGrid};
use super::state::use_dashboard_context;

#[component]
pub fn AnalyticsPage() -> impl IntoView {
    let ctx = use_dashboard_context();
    let analytics = create_memo(move |_| ctx.requests.with(|requests| Analytics::compute(requests, Utc::now())));

    let cards = Signal::derive(move || analytics.with(Analytics::stat_cards));
    let recent = Signal::derive(move || analytics.with(|a| a.recent.clone()));
    let select = Callback::new(move |request: Request| {
        ctx.controller.update(|c| c.select_request(request));
    });

    view! {
        <StatCardGrid cards=cards />

        <div class="dashboard-grid">
            <div class="card">
                <div class="card-header">
                    <span class="card-title">"By Request Type"</span>
                </div>
                <div class="card-body">
                    <BreakdownBars rows=Signal::derive(move || analytics.with(|a| a.by_type.clone())) />
                </div>
            </div>

            <div class="card">
                <div class="card-header">
                    <span class="card-title">"By Priority"</span>
                </div>
                <div class="card-body">
                    <BreakdownBars rows=Signal::derive(move || analytics.with(|a| a.by_priority.clone())) />
                </div>
            </div>
        </div>

        <div class="card">
            <div class="card-header">
                <span class="card-title">"Status Distribution"</span>
            </div>
            <div class="card-body status-distribution">
                {move || analytics.with(|a| {
                    a.status_counts
                        .iter()
                        .map(|(status, count)| view! {
                            <div class="status-count">
                                <span class="status-count-value">{*count}</span>
                                <span class="status-count-label">{status.label()}</span>
                            </div>
                        })
                        .collect_view()
                })}
            </div>
        </div>

        <div class="card">
            <div class="card-header">
                <span class="card-title">
                    {move || format!("Last 7 Days ({})", analytics.with(|a| a.recent_count))}
                </span>
            </div>
            <div class="card-body">
                <RequestList requests=recent on_select=select empty_text="No requests this week" />
            </div>
        </div>
    }
}

/// Horizontal percentage bars for one breakdown table.
#[component]
fn BreakdownBars(#[prop(into)] rows: Signal<Vec<Breakdown>>) -> impl IntoView {
    view! {
        <div class="breakdown">
            {move || rows.get().into_iter().map(|row| view! {
                <div class="breakdown-row">
                    <span class="breakdown-label">{row.label}</span>
                    <div class="breakdown-bar-container">
                        <div class="breakdown-bar" style=format!("width: {}%", row.percent)></div>
                    </div>
                    <span class="breakdown-value">{format!("{} ({}%)", row.count, row.percent)}</span>
                </div>
            }).collect_view()}
        </div>
    }
}
