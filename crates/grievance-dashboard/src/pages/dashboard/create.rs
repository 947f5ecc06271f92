//! New request form

use grievance_client::NewRequest;
use leptos::*;
use crate::state::use_app_state;
use super::state::use_dashboard_context;

#[component]
pub fn CreateRequestPage() -> impl IntoView {
    let ctx = use_dashboard_context();
    let app_state = use_app_state();

    let (subject, set_subject) = create_signal(String::new());
    let (message, set_message) = create_signal(String::new());
    let (request_type, set_request_type) = create_signal(String::new());
    let (priority_id, set_priority_id) = create_signal(0u32);
    let (submitting, set_submitting) = create_signal(false);

    let submit = create_action(move |_: &()| {
        let type_name = request_type.get_untracked();
        let type_id = ctx
            .request_types
            .with_untracked(|types| types.iter().find(|t| t.name == type_name).map(|t| t.id));
        let mut new = NewRequest::new(subject.get_untracked().trim(), message.get_untracked())
            .with_request_type(type_name, type_id)
            .with_priority(priority_id.get_untracked());
        if let Some(user) = app_state.user.get_untracked() {
            new = new.with_user(user.user_id);
        }

        async move {
            set_submitting.set(true);
            let result = ctx.request_store().create_request(new).await;
            ctx.sync_requests();
            if ctx.report(result.map_err(|e| e.to_string()), "Request submitted successfully") {
                ctx.controller.update(|c| c.on_request_created());
            }
            set_submitting.set(false);
        }
    });

    view! {
        <div class="card form-card">
            <div class="card-header">
                <span class="card-title">"Submit a New Request"</span>
            </div>
            <form class="card-body request-form" on:submit=move |ev| {
                ev.prevent_default();
                submit.dispatch(());
            }>
                <label>
                    <span>"Subject"</span>
                    <input
                        type="text"
                        placeholder="Short summary of the issue"
                        prop:value=subject
                        on:input=move |ev| set_subject.set(event_target_value(&ev))
                        required
                    />
                </label>

                <div class="form-grid">
                    <label>
                        <span>"Request Type"</span>
                        <select
                            prop:value=request_type
                            on:change=move |ev| set_request_type.set(event_target_value(&ev))
                            required
                        >
                            <option value="">"Select type"</option>
                            {move || ctx.request_types.get().into_iter().map(|t| view! {
                                <option value=t.name.clone()>{t.name.clone()}</option>
                            }).collect_view()}
                        </select>
                    </label>

                    <label>
                        <span>"Priority"</span>
                        <select
                            prop:value=move || priority_id.get().to_string()
                            on:change=move |ev| {
                                set_priority_id.set(event_target_value(&ev).parse().unwrap_or(0))
                            }
                            required
                        >
                            <option value="0">"Select priority"</option>
                            {move || ctx.priorities.get().into_iter().map(|p| view! {
                                <option value=p.priority_id.to_string()>{p.priority_name.as_str()}</option>
                            }).collect_view()}
                        </select>
                    </label>
                </div>

                <label>
                    <span>"Description"</span>
                    <textarea
                        rows="8"
                        placeholder="Describe the problem or change in detail"
                        prop:value=message
                        on:input=move |ev| set_message.set(event_target_value(&ev))
                        required
                    ></textarea>
                </label>

                <div class="form-actions">
                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                        {move || if submitting.get() { "Submitting..." } else { "Submit Request" }}
                    </button>
                </div>
            </form>
        </div>
    }
}
