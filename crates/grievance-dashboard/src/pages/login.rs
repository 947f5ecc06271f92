//! Login page component

use leptos::*;
use leptos_router::*;
use crate::state::use_app_state;

/// Banner above the auth forms. `(kind, text)` where kind is `error`,
/// `success` or `info`.
#[component]
pub fn AuthMessage(message: ReadSignal<Option<(String, String)>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            {move || {
                let (kind, text) = message.get().unwrap_or_default();
                view! { <div class=format!("message {}", kind)>{text}</div> }
            }}
        </Show>
    }
}

/// Shared header of the auth pages.
#[component]
pub fn AuthLogo() -> impl IntoView {
    view! {
        <div class="logo-section">
            <div class="logo">
                <svg viewBox="0 0 100 100" width="64" height="64">
                    <rect width="100" height="100" rx="20" fill="#2563eb"/>
                    <path d="M30 30 H70 V62 H52 L40 74 V62 H30 Z" fill="none" stroke="white" stroke-width="5" stroke-linejoin="round"/>
                </svg>
            </div>
            <h1 class="welcome-text">"Grievance Console"</h1>
            <div class="design-line"></div>
        </div>
    }
}

/// Login page component
#[component]
pub fn Login() -> impl IntoView {
    let navigate = use_navigate();
    let app_state = use_app_state();

    let (show_password, set_show_password) = create_signal(false);
    let (loading, set_loading) = create_signal(false);
    let (message, set_message) = create_signal::<Option<(String, String)>>(None);
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());

    // Already signed in
    create_effect({
        let navigate = navigate.clone();
        move |_| {
            if app_state.is_authenticated.get() {
                navigate("/dashboard", Default::default());
            }
        }
    });

    let handle_login = create_action(move |_: &()| {
        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let navigate = navigate.clone();

        async move {
            set_loading.set(true);
            set_message.set(None);

            match app_state.login(&email_val, &password_val).await {
                Ok(_) => navigate("/dashboard", Default::default()),
                Err(e) => set_message.set(Some(("error".to_string(), e))),
            }

            set_loading.set(false);
        }
    });

    view! {
        <div class="login-container">
            <div class="login-content">
                <AuthLogo />

                <div class="form-section">
                    <AuthMessage message=message />

                    <div class="form-header">
                        <span>"Sign in to your account"</span>
                    </div>

                    <form class="auth-form" on:submit=move |ev| {
                        ev.prevent_default();
                        handle_login.dispatch(());
                    }>
                        <div class="input-group">
                            <input
                                type="email"
                                placeholder="Email"
                                prop:value=email
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                autocomplete="username"
                                required
                            />
                        </div>

                        <div class="input-group">
                            <input
                                type=move || if show_password.get() { "text" } else { "password" }
                                placeholder="Password"
                                prop:value=password
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                autocomplete="current-password"
                                required
                            />
                            <button
                                type="button"
                                class="password-toggle"
                                on:click=move |_| set_show_password.update(|v| *v = !*v)
                                tabindex="-1"
                            >
                                {move || if show_password.get() { "Hide" } else { "Show" }}
                            </button>
                        </div>

                        <button type="submit" class="submit-btn" disabled=move || loading.get()>
                            {move || if loading.get() { "Signing in..." } else { "Sign In" }}
                        </button>
                    </form>

                    <div class="form-footer">
                        <span>"No account yet? "</span>
                        <A href="/register">"Register"</A>
                    </div>
                </div>
            </div>
        </div>
    }
}
