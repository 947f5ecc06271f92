//! Customer self-registration page

use leptos::*;
use leptos_router::*;
use grievance_client::Registration;
use super::login::{AuthLogo, AuthMessage};
use crate::state::use_app_state;

#[component]
pub fn Register() -> impl IntoView {
    let navigate = use_navigate();
    let app_state = use_app_state();

    let (loading, set_loading) = create_signal(false);
    let (message, set_message) = create_signal::<Option<(String, String)>>(None);
    let (user_name, set_user_name) = create_signal(String::new());
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (confirm, set_confirm) = create_signal(String::new());
    let (mobile, set_mobile) = create_signal(String::new());
    let (company, set_company) = create_signal(String::new());

    let handle_register = create_action(move |_: &()| {
        let registration = Registration::new(
            user_name.get_untracked().trim(),
            email.get_untracked().trim(),
            password.get_untracked(),
            company.get_untracked().trim(),
        )
        .with_mobile(mobile.get_untracked().trim());
        let passwords_match = password.get_untracked() == confirm.get_untracked();
        let navigate = navigate.clone();

        async move {
            if !passwords_match {
                set_message.set(Some(("error".to_string(), "Passwords do not match".to_string())));
                return;
            }
            set_loading.set(true);
            set_message.set(None);

            match app_state.register(&registration).await {
                Ok(_) => navigate("/dashboard", Default::default()),
                Err(e) => set_message.set(Some(("error".to_string(), e))),
            }

            set_loading.set(false);
        }
    });

    let field = move |placeholder: &'static str, kind: &'static str, value: ReadSignal<String>, set: WriteSignal<String>, required: bool| {
        view! {
            <div class="input-group">
                <input
                    type=kind
                    placeholder=placeholder
                    prop:value=value
                    on:input=move |ev| set.set(event_target_value(&ev))
                    required=required
                />
            </div>
        }
    };

    view! {
        <div class="login-container">
            <div class="login-content">
                <AuthLogo />

                <div class="form-section">
                    <AuthMessage message=message />

                    <div class="form-header">
                        <span>"Create a customer account"</span>
                    </div>

                    <form class="auth-form" on:submit=move |ev| {
                        ev.prevent_default();
                        handle_register.dispatch(());
                    }>
                        {field("Full name", "text", user_name, set_user_name, true)}
                        {field("Email", "email", email, set_email, true)}
                        {field("Company name", "text", company, set_company, true)}
                        {field("Mobile (optional)", "tel", mobile, set_mobile, false)}
                        {field("Password", "password", password, set_password, true)}
                        {field("Confirm password", "password", confirm, set_confirm, true)}

                        <button type="submit" class="submit-btn" disabled=move || loading.get()>
                            {move || if loading.get() { "Creating account..." } else { "Register" }}
                        </button>
                    </form>

                    <div class="form-footer">
                        <span>"Already registered? "</span>
                        <A href="/login">"Sign in"</A>
                    </div>
                </div>
            </div>
        </div>
    }
}
