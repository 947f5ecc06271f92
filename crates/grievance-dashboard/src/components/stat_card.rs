//! Summary tiles

use grievance_client::StatCard;
use leptos::*;

/// One summary tile. Missing parts fall back to the placeholder card.
#[component]
pub fn StatCardView(
    #[prop(optional, into)] title: Option<String>,
    #[prop(optional, into)] value: Option<String>,
    #[prop(optional, into)] color: Option<String>,
) -> impl IntoView {
    let card = StatCard::from_parts(title.as_deref(), value.as_deref(), color.as_deref());
    let initial = card.title.chars().next().unwrap_or('#').to_string();

    view! {
        <div class="stat-card">
            <div class="stat-header">
                <div class=format!(
                    "stat-icon {} {}",
                    card.color.background_class(),
                    card.color.text_class(),
                )>{initial}</div>
            </div>
            <div class="stat-value">{card.value}</div>
            <div class="stat-label">{card.title}</div>
        </div>
    }
}

/// A row of tiles that follows a derived card list.
#[component]
pub fn StatCardGrid(#[prop(into)] cards: Signal<Vec<StatCard>>) -> impl IntoView {
    view! {
        <div class="stats-grid">
            {move || cards.get().into_iter().map(|card| view! {
                <StatCardView title=card.title value=card.value color=card.color.name() />
            }).collect_view()}
        </div>
    }
}
