//! Request list pages (my/all/pending/active)

use grievance_client::Screen;
use grievance_common::Request;
use leptos::*;
use crate::components::RequestList;
use super::state::use_dashboard_context;

#[component]
pub fn RequestsPage() -> impl IntoView {
    let ctx = use_dashboard_context();
    let (search, set_search) = create_signal(String::new());

    let visible = Signal::derive(move || {
        let needle = search.get().trim().to_lowercase();
        let requests = ctx
            .requests
            .with(|requests| ctx.controller.with(|c| c.visible_requests(requests)));
        if needle.is_empty() {
            return requests;
        }
        requests
            .into_iter()
            .filter(|r| {
                r.subject.to_lowercase().contains(&needle)
                    || r.request_id.to_string() == needle
                    || r.created_by.user_name.to_lowercase().contains(&needle)
            })
            .collect()
    });

    let select = Callback::new(move |request: Request| {
        ctx.controller.update(|c| c.select_request(request));
    });
    let can_create = move || ctx.controller.with(|c| !c.is_admin());

    view! {
        <div class="card">
            <div class="card-header">
                <input
                    class="search-input"
                    type="search"
                    placeholder="Search by subject, id or creator"
                    prop:value=search
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
                <span class="result-count">{move || format!("{} requests", visible.with(Vec::len))}</span>
                <Show when=can_create>
                    <button
                        class="btn btn-primary"
                        on:click=move |_| ctx.controller.update(|c| c.navigate(Screen::CreateRequest))
                    >"+ New Request"</button>
                </Show>
            </div>
            <div class="card-body">
                <RequestList requests=visible on_select=select />
            </div>
        </div>
    }
}
