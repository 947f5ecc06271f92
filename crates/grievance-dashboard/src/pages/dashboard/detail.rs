//! Request detail view with the admin status and assignment forms

use grievance_client::{Assignment, DetailMode};
use grievance_common::utils::{format_date, format_datetime, format_file_size, format_target_date, parse_date};
use grievance_common::{PhasePlan, Request, UserId, UserRole};
use leptos::*;
use crate::components::{PriorityBadge, RequestTypeBadge, StatusBadge};
use super::state::use_dashboard_context;

#[component]
pub fn RequestDetailPage() -> impl IntoView {
    let ctx = use_dashboard_context();
    let selected = create_memo(move |_| ctx.controller.with(|c| c.selected().cloned()));
    let mode = create_memo(move |_| ctx.controller.with(|c| c.detail_mode()));

    move || match selected.get() {
        None => view! { <div class="empty-state">"No request selected"</div> }.into_view(),
        Some(request) => view! {
            <div class="detail-layout">
                <RequestSummary request=request.clone() />
                {move || match mode.get() {
                    DetailMode::Plain => ().into_view(),
                    DetailMode::StatusUpdate => view! { <StatusUpdateForm request=request.clone() /> }.into_view(),
                    DetailMode::AssignForm => view! { <AssignForm request=request.clone() /> }.into_view(),
                }}
            </div>
        }
        .into_view(),
    }
}

#[component]
fn RequestSummary(request: Request) -> impl IntoView {
    let ctx = use_dashboard_context();
    let is_admin = ctx.controller.with_untracked(|c| c.is_admin());

    let phases = request
        .phases()
        .into_iter()
        .map(|(label, plan)| {
            let date = plan
                .target_date
                .as_ref()
                .map(format_target_date)
                .unwrap_or_else(|| "Not set".to_string());
            let remark = plan.remark.clone().unwrap_or_default();
            view! {
                <div class="phase">
                    <span class="phase-label">{label}</span>
                    <span class="phase-date">{date}</span>
                    <span class="phase-remark">{remark}</span>
                </div>
            }
        })
        .collect_view();

    let attachments = request
        .attachments
        .iter()
        .map(|a| {
            let size = a.file_size.map(format_file_size).unwrap_or_default();
            view! {
                <li class="attachment">
                    <span class="attachment-name">{a.file_name.clone()}</span>
                    <span class="attachment-size">{size}</span>
                </li>
            }
        })
        .collect_view();

    let assignee = request
        .assigned_to
        .as_ref()
        .map(|u| u.user_name.clone())
        .unwrap_or_else(|| "Unassigned".to_string());

    view! {
        <div class="card">
            <div class="card-header">
                <button class="btn btn-small" on:click=move |_| {
                    ctx.controller.update(|c| c.navigate(grievance_client::Screen::Dashboard))
                }>"← Back"</button>
                <span class="card-title">{format!("#{} {}", request.request_id, request.subject)}</span>
            </div>
            <div class="card-body">
                <div class="badges">
                    <StatusBadge status=request.status.status_name.as_str() />
                    <PriorityBadge priority=request.priority.priority_name.as_str() />
                    <RequestTypeBadge request_type=request.request_type.as_str().to_string() />
                </div>

                <p class="request-message">{request.message.clone()}</p>

                <dl class="detail-grid">
                    <dt>"Created by"</dt>
                    <dd>{request.created_by.user_name.clone()}</dd>
                    <dt>"Created on"</dt>
                    <dd>{format_datetime(&request.created_on)}</dd>
                    <dt>"Last update"</dt>
                    <dd>{request.updated_on.as_ref().map(format_datetime).unwrap_or_else(|| "-".to_string())}</dd>
                    <dt>"Assigned to"</dt>
                    <dd>{assignee}</dd>
                    <dt>"Assigned on"</dt>
                    <dd>{request.assigned_on.as_ref().map(format_date).unwrap_or_else(|| "-".to_string())}</dd>
                    <dt>"Remark"</dt>
                    <dd>{request.remark.clone().unwrap_or_else(|| "-".to_string())}</dd>
                </dl>

                <div class="phases">{phases}</div>

                <Show when={
                    let has = !request.attachments.is_empty();
                    move || has
                }>
                    <h4>"Attachments"</h4>
                </Show>
                <ul class="attachments">{attachments}</ul>

                <div class="form-actions">
                    <button class="btn" on:click=move |_| ctx.controller.update(|c| c.open_messages())>
                        {format!("Messages ({})", request.mail_count)}
                    </button>
                    <Show when=move || is_admin>
                        <button class="btn btn-primary" on:click=move |_| {
                            ctx.controller.update(|c| {
                                c.open_status_update();
                            })
                        }>"Update Status"</button>
                        <button class="btn btn-primary" on:click=move |_| {
                            ctx.controller.update(|c| {
                                c.open_assign_form();
                            })
                        }>"Assign"</button>
                    </Show>
                </div>
            </div>
        </div>
    }
}

#[component]
fn StatusUpdateForm(request: Request) -> impl IntoView {
    let ctx = use_dashboard_context();
    let (status_id, set_status_id) = create_signal(request.status.status_id);
    let (remark, set_remark) = create_signal(request.remark.clone().unwrap_or_default());
    let (saving, set_saving) = create_signal(false);
    let request_id = request.request_id;

    let save = create_action(move |_: &()| {
        let status = status_id.get_untracked();
        let remark = Some(remark.get_untracked());

        async move {
            set_saving.set(true);
            let result = ctx
                .request_store()
                .update_request_status(request_id, status, remark)
                .await;
            ctx.sync_requests();
            if ctx.report(result.map_err(|e| e.to_string()), "Status updated") {
                ctx.controller.update(|c| c.on_status_updated());
            }
            set_saving.set(false);
        }
    });

    view! {
        <div class="card form-card">
            <div class="card-header">
                <span class="card-title">"Update Status"</span>
            </div>
            <form class="card-body" on:submit=move |ev| {
                ev.prevent_default();
                save.dispatch(());
            }>
                <label>
                    <span>"Status"</span>
                    <select
                        prop:value=move || status_id.get().to_string()
                        on:change=move |ev| {
                            if let Ok(id) = event_target_value(&ev).parse() {
                                set_status_id.set(id);
                            }
                        }
                    >
                        {move || ctx.statuses.get().into_iter().map(|s| view! {
                            <option value=s.status_id.to_string()>{s.status_name.label()}</option>
                        }).collect_view()}
                    </select>
                </label>
                <label>
                    <span>"Remark"</span>
                    <textarea
                        rows="3"
                        prop:value=remark
                        on:input=move |ev| set_remark.set(event_target_value(&ev))
                    ></textarea>
                </label>
                <div class="form-actions">
                    <button type="button" class="btn btn-secondary" on:click=move |_| ctx.controller.update(|c| c.cancel_form())>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save" }}
                    </button>
                </div>
            </form>
        </div>
    }
}

/// Editable target date and remark of one phase.
#[derive(Clone, Copy)]
struct PhaseFields {
    date: RwSignal<String>,
    remark: RwSignal<String>,
}

impl PhaseFields {
    fn new(plan: &PhasePlan) -> Self {
        Self {
            date: create_rw_signal(
                plan.target_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
            ),
            remark: create_rw_signal(plan.remark.clone().unwrap_or_default()),
        }
    }

    fn plan(&self) -> PhasePlan {
        let remark = self.remark.get_untracked();
        PhasePlan {
            target_date: parse_date(&self.date.get_untracked()),
            remark: if remark.trim().is_empty() { None } else { Some(remark) },
        }
    }
}

#[component]
fn AssignForm(request: Request) -> impl IntoView {
    let ctx = use_dashboard_context();
    let assignees = ctx.request_store().assignable_users();
    let current = request.assigned_to.as_ref().map(|u| u.user_id.0).unwrap_or(0);
    let (assignee, set_assignee) = create_signal(current);
    let dev = PhaseFields::new(&request.dev);
    let uat = PhaseFields::new(&request.uat);
    let live = PhaseFields::new(&request.live);
    let (saving, set_saving) = create_signal(false);
    let request_id = request.request_id;

    let save = create_action(move |_: &()| {
        let assignment = Assignment {
            assigned_to: Some(UserId(assignee.get_untracked())),
            dev: dev.plan(),
            uat: uat.plan(),
            live: live.plan(),
        };

        async move {
            set_saving.set(true);
            let result = ctx.request_store().assign_request(request_id, assignment).await;
            ctx.sync_requests();
            if ctx.report(result.map_err(|e| e.to_string()), "Request assigned") {
                ctx.controller.update(|c| c.on_assigned());
            }
            set_saving.set(false);
        }
    });

    let phase_row = move |label: &'static str, fields: PhaseFields| {
        view! {
            <div class="phase-fields">
                <span class="phase-label">{label}</span>
                <input
                    type="date"
                    prop:value=fields.date
                    on:input=move |ev| fields.date.set(event_target_value(&ev))
                />
                <input
                    type="text"
                    placeholder="Remark"
                    prop:value=fields.remark
                    on:input=move |ev| fields.remark.set(event_target_value(&ev))
                />
            </div>
        }
    };

    view! {
        <div class="card form-card">
            <div class="card-header">
                <span class="card-title">"Assign Request"</span>
            </div>
            <form class="card-body" on:submit=move |ev| {
                ev.prevent_default();
                save.dispatch(());
            }>
                <label>
                    <span>"Assign to"</span>
                    <select
                        prop:value=move || assignee.get().to_string()
                        on:change=move |ev| set_assignee.set(event_target_value(&ev).parse().unwrap_or(0))
                    >
                        <option value="0">"Select a team member"</option>
                        {assignees.into_iter().map(|u| {
                            let role = if u.role == UserRole::Admin { "admin" } else { "support" };
                            view! {
                                <option value=u.user_id.0.to_string()>{format!("{} ({})", u.user_name, role)}</option>
                            }
                        }).collect_view()}
                    </select>
                </label>
                {phase_row("Development", dev)}
                {phase_row("UAT", uat)}
                {phase_row("Live", live)}
                <div class="form-actions">
                    <button type="button" class="btn btn-secondary" on:click=move |_| ctx.controller.update(|c| c.cancel_form())>"Cancel"</button>
                    <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                        {move || if saving.get() { "Assigning..." } else { "Assign" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
