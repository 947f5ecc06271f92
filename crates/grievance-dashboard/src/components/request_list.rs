//! Clickable request table

use super::{PriorityBadge, RequestTypeBadge, StatusBadge};
use grievance_common::utils::format_date;
use grievance_common::Request;
use leptos::*;

#[component]
pub fn RequestList(
    #[prop(into)] requests: Signal<Vec<Request>>,
    #[prop(into)] on_select: Callback<Request>,
    #[prop(default = "No requests found")] empty_text: &'static str,
) -> impl IntoView {
    view! {
        <Show
            when=move || requests.with(|r| !r.is_empty())
            fallback=move || view! { <div class="empty-state">{empty_text}</div> }
        >
            <table class="data-table">
                <thead>
                    <tr>
                        <th>"#"</th>
                        <th>"Subject"</th>
                        <th>"Type"</th>
                        <th>"Priority"</th>
                        <th>"Status"</th>
                        <th>"Created By"</th>
                        <th>"Created"</th>
                        <th>"Messages"</th>
                    </tr>
                </thead>
                <tbody>
                    {move || requests.get().into_iter().map(|request| {
                        let selected = request.clone();
                        view! {
                            <tr class="clickable" on:click=move |_| on_select.call(selected.clone())>
                                <td>{request.request_id.0}</td>
                                <td class="subject-cell">{request.subject.clone()}</td>
                                <td><RequestTypeBadge request_type=request.request_type.as_str().to_string() /></td>
                                <td><PriorityBadge priority=request.priority.priority_name.as_str() /></td>
                                <td><StatusBadge status=request.status.status_name.as_str() /></td>
                                <td>{request.created_by.user_name.clone()}</td>
                                <td>{format_date(&request.created_on)}</td>
                                <td>{request.mail_count}</td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
        </Show>
    }
}
