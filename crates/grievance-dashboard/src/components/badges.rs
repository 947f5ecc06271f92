//! Status, priority and request type badges

use grievance_client::style::{priority_style, request_type_style, status_style};
use leptos::*;

#[component]
pub fn StatusBadge(#[prop(into)] status: String) -> impl IntoView {
    view! {
        <span class=format!("badge border {}", status_style(&status))>{status}</span>
    }
}

#[component]
pub fn PriorityBadge(#[prop(into)] priority: String) -> impl IntoView {
    view! {
        <span class=format!("badge border {}", priority_style(&priority))>{priority}</span>
    }
}

#[component]
pub fn RequestTypeBadge(#[prop(into)] request_type: String) -> impl IntoView {
    view! {
        <span class=format!("badge border {}", request_type_style(&request_type))>{request_type}</span>
    }
}
