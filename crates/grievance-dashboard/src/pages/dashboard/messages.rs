//! Messages overlay: folders, search, threaded view and compose
//!
//! Opened from a request it shows that request's mails only; opened from
//! the header it shows every mail the viewer can see.

use grievance_client::{ComposeDraft, MailFolder, Screen};
use grievance_common::utils::{format_datetime, join_addresses};
use grievance_common::{Mail, MailId, RequestId};
use leptos::*;
use crate::state::use_app_state;
use super::state::use_dashboard_context;

#[component]
pub fn MessagesPanel() -> impl IntoView {
    let ctx = use_dashboard_context();

    let request_filter = create_memo(move |_| {
        ctx.controller.with(|c| {
            if c.screen() == Screen::RequestDetail {
                c.selected().map(|r| r.request_id)
            } else {
                None
            }
        })
    });
    let folder = create_rw_signal(MailFolder::Inbox);
    let search = create_rw_signal(String::new());
    let open_mail = create_rw_signal(None::<MailId>);
    let draft = create_rw_signal(None::<ComposeDraft>);

    // Re-filter whenever the fetched mails change.
    let listed = Signal::derive(move || {
        ctx.mails.track();
        ctx.mail_store()
            .filter(folder.get(), request_filter.get(), &search.get())
    });

    let new_message = move |_| {
        let draft_value = match request_filter.get_untracked() {
            Some(id) => ctx
                .requests
                .with_untracked(|requests| requests.iter().find(|r| r.request_id == id).map(ComposeDraft::for_request))
                .unwrap_or_else(|| ComposeDraft::blank(Some(id))),
            None => ComposeDraft::blank(None),
        };
        draft.set(Some(draft_value));
    };

    view! {
        <div class="modal-overlay">
            <div class="modal messages-modal">
                <div class="modal-header">
                    <h2>
                        {move || match request_filter.get() {
                            Some(id) => format!("Messages for request #{}", id),
                            None => "Messages".to_string(),
                        }}
                    </h2>
                    <button class="btn btn-primary" on:click=new_message>"New Message"</button>
                    <button class="modal-close" on:click=move |_| ctx.controller.update(|c| c.close_messages())>"×"</button>
                </div>

                <Show when=move || ctx.mail_error.get().is_some()>
                    <div class="banner error">{move || ctx.mail_error.get()}</div>
                </Show>

                <div class="messages-layout">
                    <div class="messages-sidebar">
                        <div class="folder-tabs">
                            {MailFolder::ALL.into_iter().map(|f| {
                                let count = move || {
                                    ctx.mails.track();
                                    ctx.mail_store().filter(f, request_filter.get(), "").len()
                                };
                                view! {
                                    <button
                                        class=move || if folder.get() == f { "folder-tab active" } else { "folder-tab" }
                                        on:click=move |_| folder.set(f)
                                    >
                                        {f.label()} " (" {count} ")"
                                    </button>
                                }
                            }).collect_view()}
                        </div>
                        <input
                            class="search-input"
                            type="search"
                            placeholder="Search mail"
                            prop:value=search
                            on:input=move |ev| search.set(event_target_value(&ev))
                        />
                        <MailList mails=listed open_mail=open_mail />
                    </div>

                    <div class="messages-main">
                        {move || match (draft.get(), open_mail.get()) {
                            (Some(_), _) => view! { <ComposeForm draft=draft /> }.into_view(),
                            (None, Some(id)) => view! { <ThreadView mail_id=id open_mail=open_mail draft=draft /> }.into_view(),
                            (None, None) => view! { <div class="empty-state">"Select a message to read"</div> }.into_view(),
                        }}
                    </div>
                </div>
            </div>
        </div>
    }
}

#[component]
fn MailList(mails: Signal<Vec<Mail>>, open_mail: RwSignal<Option<MailId>>) -> impl IntoView {
    view! {
        <Show
            when=move || mails.with(|m| !m.is_empty())
            fallback=|| view! { <div class="empty-state">"No messages"</div> }
        >
            <ul class="mail-list">
                {move || mails.get().into_iter().map(|mail| {
                    let id = mail.mail_id;
                    let mut class = String::from("mail-item");
                    if !mail.is_read {
                        class.push_str(" unread");
                    }
                    view! {
                        <li
                            class=move || if open_mail.get() == Some(id) { format!("{} active", class) } else { class.clone() }
                            on:click=move |_| open_mail.set(Some(id))
                        >
                            <div class="mail-from">
                                {mail.created_by.user_name.clone()}
                                {mail.is_starred.then_some(" ★")}
                            </div>
                            <div class="mail-subject">{mail.subject.clone()}</div>
                            <div class="mail-meta">
                                <span>{format!("#{}", mail.request_id)}</span>
                                <span>{format_datetime(&mail.sent_on)}</span>
                            </div>
                        </li>
                    }
                }).collect_view()}
            </ul>
        </Show>
    }
}

#[component]
fn ThreadView(
    mail_id: MailId,
    open_mail: RwSignal<Option<MailId>>,
    draft: RwSignal<Option<ComposeDraft>>,
) -> impl IntoView {
    let ctx = use_dashboard_context();
    let app_state = use_app_state();

    let thread = Signal::derive(move || {
        ctx.mails.track();
        ctx.mail_store().thread(mail_id)
    });
    let current = move || ctx.mail_store().find(mail_id);

    let run = create_action(move |action: &MailAction| {
        let action = *action;
        async move {
            let store = ctx.mail_store();
            let (result, success) = match action {
                MailAction::Star => (store.toggle_star(mail_id).await, "Star updated"),
                MailAction::Archive => (store.archive_mail(mail_id).await, "Message archived"),
                MailAction::Delete => (store.delete_mail(mail_id).await, "Message deleted"),
            };
            ctx.sync_mails();
            if ctx.report(result.map_err(|e| e.to_string()), success) && action == MailAction::Delete {
                open_mail.set(None);
            }
        }
    });

    let reply = move |build: fn(&Mail, &str) -> ComposeDraft| {
        move |_: ev::MouseEvent| {
            let email = app_state.user.with_untracked(|u| u.as_ref().map(|u| u.email.clone()).unwrap_or_default());
            if let Some(mail) = current() {
                draft.set(Some(build(&mail, &email)));
            }
        }
    };

    view! {
        <div class="thread-view">
            <div class="thread-actions">
                <button class="btn btn-small" on:click=reply(|m, _| ComposeDraft::reply(m))>"Reply"</button>
                <button class="btn btn-small" on:click=reply(ComposeDraft::reply_all)>"Reply All"</button>
                <button class="btn btn-small" on:click=reply(|m, _| ComposeDraft::forward(m))>"Forward"</button>
                <button class="btn btn-small" on:click=move |_| run.dispatch(MailAction::Star)>
                    {move || if current().map(|m| m.is_starred).unwrap_or(false) { "Unstar" } else { "Star" }}
                </button>
                <button class="btn btn-small" on:click=move |_| run.dispatch(MailAction::Archive)>"Archive"</button>
                <button class="btn btn-small btn-danger" on:click=move |_| run.dispatch(MailAction::Delete)>"Delete"</button>
            </div>

            {move || thread.get().into_iter().map(|mail| {
                let is_open = mail.mail_id == mail_id;
                view! {
                    <article class=if is_open { "thread-mail open" } else { "thread-mail" }>
                        <header>
                            <strong>{mail.subject.clone()}</strong>
                            <span class="mail-date">{format_datetime(&mail.sent_on)}</span>
                        </header>
                        <div class="mail-addresses">
                            <div>"From: " {mail.from_address.clone()}</div>
                            <div>"To: " {join_addresses(&mail.to_addresses)}</div>
                            <Show when={
                                let has_cc = !mail.cc_addresses.is_empty();
                                move || has_cc
                            }>
                                <div>"Cc: " {join_addresses(&mail.cc_addresses)}</div>
                            </Show>
                        </div>
                        <pre class="mail-body">{mail.body.clone()}</pre>
                        <ul class="attachments">
                            {mail.attachments.iter().map(|a| view! { <li>{a.file_name.clone()}</li> }).collect_view()}
                        </ul>
                    </article>
                }
            }).collect_view()}
        </div>
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MailAction {
    Star,
    Archive,
    Delete,
}

#[component]
fn ComposeForm(draft: RwSignal<Option<ComposeDraft>>) -> impl IntoView {
    let ctx = use_dashboard_context();
    let app_state = use_app_state();
    let initial = draft.get_untracked().unwrap_or_else(|| ComposeDraft::blank(None));

    let request_id = create_rw_signal(initial.request_id);
    let to = create_rw_signal(join_addresses(&initial.to));
    let cc = create_rw_signal(join_addresses(&initial.cc));
    let bcc = create_rw_signal(join_addresses(&initial.bcc));
    let subject = create_rw_signal(initial.subject.clone());
    let body = create_rw_signal(initial.body.clone());
    let (sending, set_sending) = create_signal(false);
    let (error, set_error) = create_signal(None::<String>);
    let mode = initial.mode;
    let needs_request = initial.request_id.is_none();
    let quoted = initial.quoted.clone();
    let has_quote = !quoted.is_empty();

    let send = create_action(move |_: &()| {
        let mut current = draft.get_untracked().unwrap_or_else(|| ComposeDraft::blank(None));
        current.request_id = request_id.get_untracked();
        current.set_recipients(&to.get_untracked(), &cc.get_untracked(), &bcc.get_untracked());
        current.subject = subject.get_untracked();
        current.body = body.get_untracked();
        let sender = app_state.user.get_untracked();

        async move {
            let Some(sender) = sender else {
                set_error.set(Some("Not signed in".to_string()));
                return;
            };
            let outgoing = match current.into_outgoing(&sender) {
                Ok(outgoing) => outgoing,
                Err(e) => {
                    set_error.set(Some(e.to_string()));
                    return;
                }
            };
            set_sending.set(true);
            let result = ctx.mail_store().send_mail(outgoing).await;
            ctx.sync_mails();
            if ctx.report(result.map_err(|e| e.to_string()), "Message sent") {
                draft.set(None);
            }
            set_sending.set(false);
        }
    });

    let text_field = move |label: &'static str, value: RwSignal<String>| {
        view! {
            <label class="compose-field">
                <span>{label}</span>
                <input
                    type="text"
                    prop:value=value
                    on:input=move |ev| value.set(event_target_value(&ev))
                />
            </label>
        }
    };

    view! {
        <form class="compose-form" on:submit=move |ev| {
            ev.prevent_default();
            send.dispatch(());
        }>
            <h3>{mode.title()}</h3>
            <Show when=move || error.get().is_some()>
                <div class="banner error">{move || error.get()}</div>
            </Show>

            <Show when=move || needs_request>
                <label class="compose-field">
                    <span>"Request"</span>
                    <select
                        prop:value=move || request_id.get().map(|id| id.0.to_string()).unwrap_or_default()
                        on:change=move |ev| {
                            request_id.set(event_target_value(&ev).parse().ok().map(RequestId))
                        }
                    >
                        <option value="">"Select a request"</option>
                        {move || ctx.requests.get().into_iter().map(|r| view! {
                            <option value=r.request_id.0.to_string()>{format!("#{} {}", r.request_id, r.subject)}</option>
                        }).collect_view()}
                    </select>
                </label>
            </Show>

            {text_field("To", to)}
            {text_field("Cc", cc)}
            {text_field("Bcc", bcc)}
            {text_field("Subject", subject)}
            <textarea
                class="compose-body"
                rows="10"
                prop:value=body
                on:input=move |ev| body.set(event_target_value(&ev))
            ></textarea>
            <Show when=move || has_quote>
                <pre class="compose-quote">{quoted.clone()}</pre>
            </Show>

            <div class="form-actions">
                <button type="button" class="btn btn-secondary" on:click=move |_| draft.set(None)>"Discard"</button>
                <button type="submit" class="btn btn-primary" disabled=move || sending.get()>
                    {move || if sending.get() { "Sending..." } else { "Send" }}
                </button>
            </div>
        </form>
    }
}
