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
use yew::prelude::*;
use yew_router::prelude::{use_navigator, Link};

use crate::components::icon::*;
use crate::components::modals::auth::{LoginModal, RegisterModal, VerificationModal};
use crate::components::modals::{settings::SettingsModal, status::StatusModal, ModalMessage};
use crate::constants::{BUILD_TIME, VERSION_STRING};
use crate::contexts::*;
use crate::pages::MainRoute;
use crate::utils::render_datetime;

/// First letter of the user's name for the avatar bubble
fn avatar_initial(name: &str) -> String {
    name.trim()
        .chars()
        .next()
        .map_or_else(|| "U".to_owned(), |c| c.to_uppercase().collect())
}

#[function_component]
pub fn Header() -> Html {
    let modal_controls: ModalRendererControls = use_context().expect("Header should be placed inside a ModalRenderer");
    let open_settings_modal = use_callback(modal_controls, |_, modal_controls| {
        modal_controls.emit(ModalMessage::Open(html! {<SettingsModal />}));
    });

    html! {
        <div id="header">
            <Link<MainRoute> to={MainRoute::Home}><Icon r#type={IconType::Logo} /></Link<MainRoute>>
            <div>
                <h1 class="undecorated-link"><Link<MainRoute> to={MainRoute::Home}>{"Video Reference Browser"}</Link<MainRoute>></h1>
                <span id="settings-button" class="clickable" onclick={open_settings_modal}><Icon r#type={IconType::Settings} tooltip={"Open settings"} /></span>
            </div>
            <UserNavigation />
        </div>
    }
}

#[function_component]
fn UserNavigation() -> Html {
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let api: ApiClient = use_context().expect("ApiClient should be available");
    let modal_controls: ModalRendererControls = use_context().expect("UserNavigation should be placed inside a ModalRenderer");
    let navigator = use_navigator().expect("navigator should exist");
    let menu_open = use_state_eq(|| false);

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| menu_open.set(!*menu_open))
    };
    let close_menu = {
        let menu_open = menu_open.clone();
        use_callback((), move |_: MouseEvent, ()| menu_open.set(false))
    };
    let open_login = use_callback(modal_controls.clone(), |_: MouseEvent, modal_controls| {
        modal_controls.emit(ModalMessage::Open(html! {<LoginModal />}));
    });
    let open_register = use_callback(modal_controls.clone(), |_: MouseEvent, modal_controls| {
        modal_controls.emit(ModalMessage::Open(html! {<RegisterModal />}));
    });
    let go_to = |route: MainRoute| {
        let navigator = navigator.clone();
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
            navigator.push(&route);
        })
    };
    let logout = {
        let (auth, menu_open, navigator) = (auth.clone(), menu_open.clone(), navigator.clone());
        Callback::from(move |_: MouseEvent| {
            auth.logout(&api);
            menu_open.set(false);
            navigator.push(&MainRoute::Home);
        })
    };

    let state = auth.state();
    if state.is_restoring() {
        return html! { <nav id="user-navigation"><Icon r#type={IconType::Wait} tooltip="Restoring your session" /></nav> };
    }
    let Some(user) = state.user().cloned() else {
        return html! {
            <nav id="user-navigation" class="auth-buttons">
                <button class="login" onclick={open_login}>{"Sign in"}</button>
                <button class="register" onclick={open_register}>{"Sign up"}</button>
            </nav>
        };
    };

    let open_verification = {
        let email = AttrValue::from(user.email.clone());
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
            modal_controls.emit(ModalMessage::Open(html! {<VerificationModal email={email.clone()} />}));
        })
    };

    html! {
        <nav id="user-navigation">
            <span class="clickable" onclick={go_to(MainRoute::Collections)}>
                <Icon r#type={IconType::Collection} tooltip="My collections" />
            </span>
            <span class="clickable user-menu-button" onclick={toggle_menu}>
                <span class="user-avatar">{avatar_initial(&user.name)}</span>
                <span class="user-name">{user.name.to_string()}</span>
            </span>
            if *menu_open {
                <div class="user-menu-overlay" onclick={close_menu} />
                <div class="user-menu">
                    <button onclick={go_to(MainRoute::Profile)}><Icon r#type={IconType::User} />{" Profile"}</button>
                    <button onclick={go_to(MainRoute::Collections)}>{"My collections"}</button>
                    if !state.is_email_verified() {
                        <button onclick={open_verification}>{"Verify email"}</button>
                    }
                    <hr />
                    <button onclick={logout}>{"Log out"}</button>
                </div>
            }
        </nav>
    }
}

#[function_component]
pub fn Footer() -> Html {
    let modal_controls: ModalRendererControls = use_context().expect("Footer should be placed inside a ModalRenderer");
    let open_version_modal = use_callback(modal_controls, |_, modal_controls| {
        modal_controls.emit(ModalMessage::Open(html! {<StatusModal />}));
    });

    html! {
        <div id="footer">
            <table class="clickable" onclick={open_version_modal}>
                <tr>
                    <td>{"Version:"}</td>
                    <td>{*VERSION_STRING}</td>
                </tr>
                <tr>
                    <td>{"Built at:"}</td>
                    <td>{BUILD_TIME.map_or_else(|| "...".to_owned(), |t| render_datetime(t.into()))}</td>
                </tr>
            </table>
            <span>
                <a href="https://github.com/vidref/vidref-browser">{"Video Reference Browser"}</a>
                {", licensed under "}
                <a href="https://www.gnu.org/licenses/agpl-3.0.en.html">{"AGPL v3"}</a>
                {". Videos are embedded from their original platforms."}
            </span>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn avatar_uses_the_first_letter() {
        assert_eq!(avatar_initial("ada"), "A");
        assert_eq!(avatar_initial("  émile"), "É");
        assert_eq!(avatar_initial(""), "U");
    }
}
