/* This file is part of the Video Reference Browser project - https://github.com/vidref/vidref-browser
*
*  Copyright (C) 2025 the Video Reference Browser contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

//! Sign in, sign up and email verification dialogs

use gloo_console::error;
use vidref_api::unsync::{LoginRequest, RegisterRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::api_client::ApiError;
use crate::auth::AuthAction;
use crate::constants::{NON_DIGIT_REGEX, VERIFICATION_CODE_REGEX, VERIFICATION_RESEND_SECS};
use crate::contexts::*;
use crate::utils::Timeout;

/// Keeps only the digits of a typed code, at most 6 of them
fn sanitize_code(input: &str) -> String {
    NON_DIGIT_REGEX.replace_all(input, "").chars().take(6).collect()
}

fn is_complete_code(code: &str) -> bool {
    VERIFICATION_CODE_REGEX.is_match(code)
}

fn resend_label(countdown: u32) -> String {
    if countdown > 0 {
        format!("Resend ({countdown}s)")
    } else {
        "Resend".to_owned()
    }
}

/// Callback storing an input's value into `state` and clearing the displayed error
fn field_setter(state: &UseStateHandle<String>, error: &UseStateHandle<Option<String>>) -> Callback<InputEvent> {
    let state = state.clone();
    let error = error.clone();
    Callback::from(move |e: InputEvent| {
        let input: HtmlInputElement = e.target_unchecked_into();
        state.set(input.value());
        error.set(None);
    })
}

fn render_error(error: &Option<String>) -> Html {
    match error {
        None => html! {},
        Some(ref message) => html! { <div class="auth-message error">{message}</div> },
    }
}

#[function_component]
pub fn LoginModal() -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let modal_controls: ModalRendererControls = use_context().expect("LoginModal should be placed inside a ModalRenderer");

    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let requires_verification = use_state(|| false);

    let onsubmit = {
        let (email, password, error, loading, requires_verification) = (email.clone(), password.clone(), error.clone(), loading.clone(), requires_verification.clone());
        let modal_controls = modal_controls.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }
            loading.set(true);
            error.set(None);
            let request = LoginRequest {
                email: email.trim().into(),
                password: password.as_str().into(),
            };
            let (api, auth, modal_controls) = (api.clone(), auth.clone(), modal_controls.clone());
            let (error, loading, requires_verification) = (error.clone(), loading.clone(), requires_verification.clone());
            spawn_local(async move {
                match api.login(&request).await {
                    Ok(response) => {
                        auth.dispatch(AuthAction::LoggedIn { token: response.access_token, user: response.user });
                        modal_controls.emit(ModalMessage::CloseTop);
                    },
                    Err(ApiError::Forbidden { .. }) => requires_verification.set(true),
                    Err(e) => {
                        error!(format!("Sign in failed: {e}"));
                        error.set(Some(e.user_message("Sign in error")));
                    },
                }
                loading.set(false);
            });
        })
    };
    let switch_to_register = use_callback(modal_controls.clone(), |_: MouseEvent, modal_controls| {
        modal_controls.emit(ModalMessage::Replace(html! {<RegisterModal />}));
    });
    let enter_code = use_callback((modal_controls, email.clone()), |_: MouseEvent, (modal_controls, email)| {
        modal_controls.emit(ModalMessage::Replace(html! {
            <VerificationModal email={AttrValue::from(email.trim().to_owned())} />
        }));
    });

    if *requires_verification {
        return html! {
            <div class="auth-modal">
                <h2>{"Email not verified"}</h2>
                <p>{"You need to verify your email address to sign in."}</p>
                <p>{"Please check your email and enter the verification code."}</p>
                <button class="primary" onclick={enter_code}>{"Enter verification code"}</button>
            </div>
        };
    }

    html! {
        <form class="auth-modal" {onsubmit}>
            <h2>{"Sign in"}</h2>
            {render_error(&error)}
            <label for="login-email">{"Email"}</label>
            <input id="login-email" type="email" required=true placeholder="your@email.com"
                value={(*email).clone()} oninput={field_setter(&email, &error)} />
            <label for="login-password">{"Password"}</label>
            <input id="login-password" type="password" required=true placeholder="Enter your password"
                value={(*password).clone()} oninput={field_setter(&password, &error)} />
            <button type="submit" class="primary" disabled={*loading}>
                {if *loading { "Signing in..." } else { "Sign in" }}
            </button>
            <p class="auth-switch">
                {"Don't have an account? "}
                <button type="button" class="link-button" onclick={switch_to_register}>{"Sign up"}</button>
            </p>
        </form>
    }
}

#[function_component]
pub fn RegisterModal() -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let modal_controls: ModalRendererControls = use_context().expect("RegisterModal should be placed inside a ModalRenderer");

    let name = use_state(String::new);
    let email = use_state(String::new);
    let password = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);

    let onsubmit = {
        let (name, email, password, error, loading) = (name.clone(), email.clone(), password.clone(), error.clone(), loading.clone());
        let modal_controls = modal_controls.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *loading {
                return;
            }
            loading.set(true);
            error.set(None);
            let request = RegisterRequest {
                name: name.trim().into(),
                email: email.trim().into(),
                password: password.as_str().into(),
            };
            let (api, modal_controls, error, loading) = (api.clone(), modal_controls.clone(), error.clone(), loading.clone());
            spawn_local(async move {
                match api.register(&request).await {
                    // the backend mails a code on registration
                    Ok(()) => modal_controls.emit(ModalMessage::Replace(html! {
                        <VerificationModal email={AttrValue::from(request.email.clone())} code_already_sent=true />
                    })),
                    Err(e) => {
                        error!(format!("Registration failed: {e}"));
                        error.set(Some(e.user_message("Registration error")));
                    },
                }
                loading.set(false);
            });
        })
    };
    let switch_to_login = use_callback(modal_controls, |_: MouseEvent, modal_controls| {
        modal_controls.emit(ModalMessage::Replace(html! {<LoginModal />}));
    });

    html! {
        <form class="auth-modal" {onsubmit}>
            <h2>{"Sign up"}</h2>
            {render_error(&error)}
            <label for="register-name">{"Name"}</label>
            <input id="register-name" type="text" required=true placeholder="Your name"
                value={(*name).clone()} oninput={field_setter(&name, &error)} />
            <label for="register-email">{"Email"}</label>
            <input id="register-email" type="email" required=true placeholder="your@email.com"
                value={(*email).clone()} oninput={field_setter(&email, &error)} />
            <label for="register-password">{"Password"}</label>
            <input id="register-password" type="password" required=true minlength="8" placeholder="At least 8 characters"
                value={(*password).clone()} oninput={field_setter(&password, &error)} />
            <button type="submit" class="primary" disabled={*loading}>
                {if *loading { "Signing up..." } else { "Sign up" }}
            </button>
            <p class="auth-switch">
                {"Already have an account? "}
                <button type="button" class="link-button" onclick={switch_to_login}>{"Sign in"}</button>
            </p>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct VerificationModalProps {
    #[prop_or_default]
    pub email: AttrValue,
    /// Skip the initial send, e.g. right after registering
    #[prop_or_default]
    pub code_already_sent: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum VerificationStep {
    EnterEmail,
    EnterCode,
    Verified,
}

#[function_component]
pub fn VerificationModal(props: &VerificationModalProps) -> Html {
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let modal_controls: ModalRendererControls = use_context().expect("VerificationModal should be placed inside a ModalRenderer");

    let email = use_state(|| props.email.to_string());
    let code = use_state(String::new);
    let error = use_state(|| None::<String>);
    let loading = use_state(|| false);
    let sending = use_state(|| false);
    let countdown = use_state_eq(|| if props.code_already_sent { VERIFICATION_RESEND_SECS } else { 0 });
    let step = use_state_eq(|| if props.code_already_sent { VerificationStep::EnterCode } else { VerificationStep::EnterEmail });

    let send_code = {
        let (api, email, error, sending, countdown, step) = (api.clone(), email.clone(), error.clone(), sending.clone(), countdown.clone(), step.clone());
        Callback::from(move |()| {
            let address = email.trim().to_owned();
            if address.is_empty() {
                error.set(Some("Please enter your email".to_owned()));
                return;
            }
            if *sending {
                return;
            }
            sending.set(true);
            error.set(None);
            let (api, error, sending, countdown, step) = (api.clone(), error.clone(), sending.clone(), countdown.clone(), step.clone());
            spawn_local(async move {
                match api.send_verification_code(&address).await {
                    Ok(()) => {
                        step.set(VerificationStep::EnterCode);
                        countdown.set(VERIFICATION_RESEND_SECS);
                    },
                    Err(e) => {
                        error!(format!("Failed to send a verification code: {e}"));
                        error.set(Some(e.user_message("Error sending code")));
                    },
                }
                sending.set(false);
            });
        })
    };

    // a known address without a code yet gets one right away
    {
        let send_code = send_code.clone();
        let should_send = !props.email.is_empty() && !props.code_already_sent;
        use_effect_with((), move |()| if should_send { send_code.emit(()) });
    }

    {
        let countdown = countdown.clone();
        use_effect_with(*countdown, move |remaining| {
            let remaining = *remaining;
            let timer = (remaining > 0).then(|| Timeout::new(move || countdown.set(remaining - 1), 1000));
            let timer = match timer {
                Some(Err(e)) => {
                    error!(format!("{e:?}"));
                    None
                },
                Some(Ok(t)) => Some(t),
                None => None,
            };
            move || drop(timer)
        });
    }

    let onsubmit = {
        let (email, code, error, loading, step) = (email.clone(), code.clone(), error.clone(), loading.clone(), step.clone());
        let (api, auth, send_code) = (api.clone(), auth.clone(), send_code.clone());
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *step == VerificationStep::EnterEmail {
                send_code.emit(());
                return;
            }
            if *loading || !is_complete_code(&code) {
                return;
            }
            loading.set(true);
            error.set(None);
            let (address, typed) = (email.trim().to_owned(), (*code).clone());
            let (api, auth, error, loading, step) = (api.clone(), auth.clone(), error.clone(), loading.clone(), step.clone());
            spawn_local(async move {
                match api.verify_code(&address, &typed).await {
                    Ok(()) => {
                        step.set(VerificationStep::Verified);
                        // an unverified session picks up the new verification state
                        if auth.state().is_authenticated() {
                            match api.current_user().await {
                                Ok(user) => auth.dispatch(AuthAction::UserUpdated(user)),
                                Err(e) => error!(format!("Failed to refresh the current user: {e}")),
                            }
                        }
                    },
                    Err(e) => {
                        error!(format!("Verification failed: {e}"));
                        error.set(Some(e.user_message("Invalid code")));
                    },
                }
                loading.set(false);
            });
        })
    };
    let oncodeinput = {
        let (code, error) = (code.clone(), error.clone());
        use_callback((), move |e: InputEvent, ()| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let sanitized = sanitize_code(&input.value());
            // the browser keeps the raw text otherwise
            input.set_value(&sanitized);
            code.set(sanitized);
            error.set(None);
        })
    };
    let onresend = use_callback(send_code, |_: MouseEvent, send_code| send_code.emit(()));
    let sign_in = use_callback((modal_controls, auth.clone()), |_: MouseEvent, (modal_controls, auth)| {
        if auth.state().is_authenticated() {
            modal_controls.emit(ModalMessage::CloseTop);
        } else {
            modal_controls.emit(ModalMessage::Replace(html! {<LoginModal />}));
        }
    });

    let body = match *step {
        VerificationStep::Verified => html! {
            <>
                <div class="auth-message success">{"Your email has been verified."}</div>
                <button type="button" class="primary" onclick={sign_in}>
                    {if auth.state().is_authenticated() { "Continue" } else { "Sign in" }}
                </button>
            </>
        },
        VerificationStep::EnterEmail => html! {
            <>
                <label for="verification-email">{"Email"}</label>
                <input id="verification-email" type="email" required=true placeholder="your@email.com"
                    value={(*email).clone()} oninput={field_setter(&email, &error)} />
                <button type="submit" class="primary" disabled={*sending || email.trim().is_empty()}>
                    {if *sending { "Sending..." } else { "Send code" }}
                </button>
            </>
        },
        VerificationStep::EnterCode => html! {
            <>
                <p>{"A verification code has been sent to "}<strong>{(*email).clone()}</strong></p>
                <p class="auth-info-small">{"Enter the 6-digit code from the email. The code is valid for 15 minutes."}</p>
                <label for="verification-code">{"Verification code"}</label>
                <input id="verification-code" class="verification-code-input" type="text" inputmode="numeric"
                    autocomplete="one-time-code" maxlength="6" required=true placeholder="000000"
                    value={(*code).clone()} oninput={oncodeinput} />
                <button type="submit" class="primary" disabled={*loading || !is_complete_code(&code)}>
                    {if *loading { "Verifying..." } else { "Verify" }}
                </button>
                <p class="auth-switch">
                    {"Didn't receive the code? "}
                    <button type="button" class="link-button" onclick={onresend} disabled={*countdown > 0 || *sending}>
                        {resend_label(*countdown)}
                    </button>
                </p>
            </>
        },
    };

    html! {
        <form class="auth-modal" {onsubmit}>
            <h2>{"Email verification"}</h2>
            {render_error(&error)}
            {body}
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_keep_six_digits_only() {
        assert_eq!(sanitize_code("12 34-56"), "123456");
        assert_eq!(sanitize_code("1234567890"), "123456");
        assert_eq!(sanitize_code("abc"), "");
    }

    #[test]
    fn only_six_digit_codes_are_complete() {
        assert!(is_complete_code("000123"));
        assert!(!is_complete_code("12345"));
        assert!(!is_complete_code("12345a"));
    }

    #[test]
    fn resend_label_shows_the_countdown() {
        assert_eq!(resend_label(42), "Resend (42s)");
        assert_eq!(resend_label(0), "Resend");
    }
}
