//! User directory page (admin only)

use grievance_common::User;
use leptos::*;
use super::state::use_dashboard_context;

fn company_of(user: &User) -> String {
    user.company_name
        .clone()
        .or_else(|| user.company.as_ref().map(|c| c.company_name.clone()))
        .unwrap_or_else(|| "-".to_string())
}

#[component]
pub fn UsersPage() -> impl IntoView {
    let ctx = use_dashboard_context();
    let (search, set_search) = create_signal(String::new());

    let visible = Signal::derive(move || {
        let needle = search.get().trim().to_lowercase();
        ctx.users.with(|users| {
            users
                .iter()
                .filter(|u| {
                    needle.is_empty()
                        || u.user_name.to_lowercase().contains(&needle)
                        || u.email.to_lowercase().contains(&needle)
                        || company_of(u).to_lowercase().contains(&needle)
                })
                .cloned()
                .collect::<Vec<_>>()
        })
    });

    view! {
        <div class="card">
            <div class="card-header">
                <input
                    class="search-input"
                    type="search"
                    placeholder="Search users"
                    prop:value=search
                    on:input=move |ev| set_search.set(event_target_value(&ev))
                />
                <span class="result-count">{move || format!("{} users", visible.with(Vec::len))}</span>
            </div>
            <div class="card-body">
                <table class="data-table">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Name"</th>
                            <th>"Email"</th>
                            <th>"Role"</th>
                            <th>"Company"</th>
                            <th>"Status"</th>
                        </tr>
                    </thead>
                    <tbody>
                        {move || visible.get().into_iter().map(|user| {
                            let company = company_of(&user);
                            let (status_class, status_text) = if user.is_active {
                                ("status-badge healthy", "Active")
                            } else {
                                ("status-badge offline", "Inactive")
                            };
                            view! {
                                <tr>
                                    <td>{user.user_id.0}</td>
                                    <td>{user.user_name}</td>
                                    <td>{user.email}</td>
                                    <td>{user.role.as_str()}</td>
                                    <td>{company}</td>
                                    <td><span class=status_class>{status_text}</span></td>
                                </tr>
                            }
                        }).collect_view()}
                    </tbody>
                </table>
            </div>
        </div>
    }
}
