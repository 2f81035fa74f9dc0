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

//! Session state of the current user
//!
//! [`AuthState`] is a reducer. The persisted token follows its transitions, see [`token_effect`].

use std::cell::RefCell;
use std::rc::Rc;

use gloo_console::{error, warn};
use vidref_api::unsync::User;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api_client::ApiClient;
use crate::constants::AUTH_TOKEN_KEY;
use crate::contexts::SettingsContext;
use crate::utils::{storage_get, storage_remove, storage_set};

#[derive(Clone, Debug, PartialEq)]
pub enum AuthStatus {
    /// A saved token is being validated
    Restoring,
    Anonymous,
    Authenticated { token: Rc<str>, user: Rc<User> },
}

#[derive(Clone, Debug, PartialEq)]
pub enum AuthAction {
    /// Result of validating the saved token, `None` if it was rejected
    Restored(Option<(Rc<str>, User)>),
    LoggedIn { token: Rc<str>, user: User },
    LoggedOut,
    /// The server answered 401 to a request made with `token`
    Rejected { token: Rc<str> },
    UserUpdated(User),
}

/// What has to happen to the persisted token after a state transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenEffect<'a> {
    Keep,
    Store(&'a str),
    Remove,
}

fn token_effect<'a>(old: &AuthState, new: &'a AuthState) -> TokenEffect<'a> {
    match (&old.status, &new.status) {
        (_, AuthStatus::Authenticated { token, .. }) if old.token() == Some(token) => TokenEffect::Keep,
        (_, AuthStatus::Authenticated { token, .. }) => TokenEffect::Store(token),
        (AuthStatus::Anonymous, AuthStatus::Anonymous) => TokenEffect::Keep,
        (_, AuthStatus::Anonymous) => TokenEffect::Remove,
        (_, AuthStatus::Restoring) => TokenEffect::Keep,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub status: AuthStatus,
}

impl AuthState {
    fn initial(saved_token: Option<&str>) -> AuthState {
        AuthState {
            status: match saved_token {
                Some(..) => AuthStatus::Restoring,
                None => AuthStatus::Anonymous,
            },
        }
    }

    pub fn token(&self) -> Option<&Rc<str>> {
        match self.status {
            AuthStatus::Authenticated { ref token, .. } => Some(token),
            AuthStatus::Restoring | AuthStatus::Anonymous => None,
        }
    }

    pub fn user(&self) -> Option<&Rc<User>> {
        match self.status {
            AuthStatus::Authenticated { ref user, .. } => Some(user),
            AuthStatus::Restoring | AuthStatus::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.status, AuthStatus::Authenticated { .. })
    }

    pub fn is_restoring(&self) -> bool {
        matches!(self.status, AuthStatus::Restoring)
    }

    pub fn is_email_verified(&self) -> bool {
        self.user().is_some_and(|u| u.email_verified_at.is_some())
    }
}

impl Reducible for AuthState {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let status = match (action, &self.status) {
            (AuthAction::Restored(Some((token, user))), AuthStatus::Restoring) => AuthStatus::Authenticated { token, user: Rc::new(user) },
            (AuthAction::Restored(None), AuthStatus::Restoring) => AuthStatus::Anonymous,
            // a login finished before the restore did
            (AuthAction::Restored(..), _) => return self,
            (AuthAction::LoggedIn { token, user }, _) => AuthStatus::Authenticated { token, user: Rc::new(user) },
            (AuthAction::LoggedOut, AuthStatus::Anonymous) => return self,
            (AuthAction::LoggedOut, _) => AuthStatus::Anonymous,
            // only the session that made the request can be ended by its 401
            (AuthAction::Rejected { token }, _) if self.token() != Some(&token) => return self,
            (AuthAction::Rejected { .. }, _) => AuthStatus::Anonymous,
            (AuthAction::UserUpdated(user), AuthStatus::Authenticated { token, .. }) => AuthStatus::Authenticated { token: token.clone(), user: Rc::new(user) },
            (AuthAction::UserUpdated(..), _) => return self,
        };
        Rc::new(AuthState { status })
    }
}

#[derive(Clone, PartialEq)]
pub struct AuthContext {
    state: UseReducerHandle<AuthState>,
}

impl AuthContext {
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn dispatch(&self, action: AuthAction) {
        self.state.dispatch(action);
    }

    /// Forgets the session locally and tells the server, failures of the latter are only logged
    pub fn logout(&self, api: &ApiClient) {
        let api = api.clone();
        self.dispatch(AuthAction::LoggedOut);
        if api.token().is_none() {
            return;
        }
        spawn_local(async move {
            if let Err(e) = api.logout().await {
                warn!(format!("Server-side logout failed: {e}"));
            }
        });
    }
}

#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    #[prop_or_default]
    pub children: Html,
}

/// Provides [`AuthContext`] and an [`ApiClient`] carrying the current token
#[function_component]
pub fn AuthProvider(props: &AuthProviderProps) -> Html {
    let settings_context: SettingsContext = use_context().expect("AuthProvider should be placed inside a SettingsProvider");
    let saved_token = use_memo((), |()| storage_get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty()).map(Rc::<str>::from));
    let state = use_reducer(|| AuthState::initial(saved_token.as_deref()));
    let auth = AuthContext { state: state.clone() };

    let on_rejected = use_callback(auth.clone(), |token: Rc<str>, auth| auth.dispatch(AuthAction::Rejected { token }));
    let api_base = settings_context.settings().api_base();
    let api = use_memo((api_base.clone(), state.token().cloned()), |(base, token)| {
        ApiClient::new(base.clone(), token.clone(), on_rejected.clone())
    });

    let previous_state: Rc<RefCell<AuthState>> = use_mut_ref(|| AuthState::initial(saved_token.as_deref()));
    use_effect_with((*state).clone(), move |new_state| {
        let old_state = previous_state.replace(new_state.clone());
        match token_effect(&old_state, new_state) {
            TokenEffect::Keep => (),
            TokenEffect::Store(token) => storage_set(AUTH_TOKEN_KEY, token),
            TokenEffect::Remove => storage_remove(AUTH_TOKEN_KEY),
        }
    });

    {
        let auth = auth.clone();
        use_effect_with((), move |()| {
            let token = (*saved_token).clone().filter(|_| auth.state().is_restoring());
            if let Some(token) = token {
                // the outcome is reported through Restored instead
                let api = ApiClient::new(api_base, Some(token.clone()), Callback::noop());
                spawn_local(async move {
                    match api.current_user().await {
                        Ok(user) => auth.dispatch(AuthAction::Restored(Some((token, user)))),
                        Err(e) => {
                            error!(format!("Failed to restore the saved session: {e}"));
                            auth.dispatch(AuthAction::Restored(None));
                        },
                    }
                });
            }
        });
    }

    html! {
        <ContextProvider<AuthContext> context={auth}>
            <ContextProvider<ApiClient> context={(*api).clone()}>
                {props.children.clone()}
            </ContextProvider<ApiClient>>
        </ContextProvider<AuthContext>>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str, verified: bool) -> User {
        User {
            id: 1,
            name: name.into(),
            email: "user@example.com".into(),
            email_verified_at: verified.then(|| "2025-01-01T00:00:00Z".into()),
            created_at: None,
        }
    }

    fn reduce(state: AuthState, action: AuthAction) -> AuthState {
        (*Rc::new(state).reduce(action)).clone()
    }

    #[test]
    fn saved_token_starts_restoring() {
        assert!(AuthState::initial(Some("abc")).is_restoring());
        assert_eq!(AuthState::initial(None).status, AuthStatus::Anonymous);
    }

    #[test]
    fn restore_outcomes() {
        let ok = reduce(AuthState::initial(Some("abc")), AuthAction::Restored(Some(("abc".into(), user("a", true)))));
        assert_eq!(ok.token().map(|t| &**t), Some("abc"));
        assert!(ok.is_email_verified());

        let rejected = reduce(AuthState::initial(Some("abc")), AuthAction::Restored(None));
        assert_eq!(rejected.status, AuthStatus::Anonymous);
    }

    #[test]
    fn late_restore_does_not_override_a_login() {
        let state = reduce(AuthState::initial(Some("old")), AuthAction::LoggedIn { token: "new".into(), user: user("b", false) });
        let state = reduce(state, AuthAction::Restored(None));
        assert_eq!(state.token().map(|t| &**t), Some("new"));
        assert!(!state.is_email_verified());
    }

    #[test]
    fn rejection_and_logout_clear_the_session() {
        let logged_in = reduce(AuthState::initial(None), AuthAction::LoggedIn { token: "t".into(), user: user("a", true) });
        assert_eq!(reduce(logged_in.clone(), AuthAction::Rejected { token: "t".into() }).status, AuthStatus::Anonymous);
        assert_eq!(reduce(logged_in, AuthAction::LoggedOut).status, AuthStatus::Anonymous);
    }

    #[test]
    fn rejection_of_another_token_is_ignored() {
        let logged_in = reduce(AuthState::initial(None), AuthAction::LoggedIn { token: "new".into(), user: user("a", true) });
        let state = reduce(logged_in.clone(), AuthAction::Rejected { token: "old".into() });
        assert_eq!(state, logged_in);
        assert!(reduce(AuthState::initial(Some("old")), AuthAction::Rejected { token: "old".into() }).is_restoring());
    }

    #[test]
    fn user_updates_keep_the_token() {
        let state = reduce(AuthState::initial(None), AuthAction::LoggedIn { token: "t".into(), user: user("old", true) });
        let state = reduce(state, AuthAction::UserUpdated(user("new", true)));
        assert_eq!(state.user().map(|u| &*u.name), Some("new"));
        assert_eq!(state.token().map(|t| &**t), Some("t"));
        let anonymous = reduce(AuthState::initial(None), AuthAction::UserUpdated(user("x", true)));
        assert!(anonymous.user().is_none());
    }

    /// Applies every action in order and collects the storage effects of the transitions
    fn replay(initial: AuthState, actions: Vec<AuthAction>) -> (AuthState, Vec<TokenEffect<'static>>) {
        let mut effects = Vec::new();
        let mut state = initial;
        for action in actions {
            let next = reduce(state.clone(), action);
            effects.push(match token_effect(&state, &next) {
                TokenEffect::Keep => TokenEffect::Keep,
                TokenEffect::Store(token) => TokenEffect::Store(if token == "new" { "new" } else { "other" }),
                TokenEffect::Remove => TokenEffect::Remove,
            });
            state = next;
        }
        (state, effects)
    }

    #[test]
    fn login_during_restore_keeps_the_new_token_persisted() {
        let (state, effects) = replay(AuthState::initial(Some("old")), vec![
            AuthAction::LoggedIn { token: "new".into(), user: user("b", true) },
            AuthAction::Restored(None),
            AuthAction::Rejected { token: "old".into() },
        ]);
        assert_eq!(state.token().map(|t| &**t), Some("new"));
        assert_eq!(effects, [TokenEffect::Store("new"), TokenEffect::Keep, TokenEffect::Keep]);
    }

    #[test]
    fn token_storage_follows_transitions() {
        let restoring = AuthState::initial(Some("t"));
        let anonymous = AuthState::initial(None);
        let logged_in = reduce(anonymous.clone(), AuthAction::LoggedIn { token: "t".into(), user: user("a", true) });
        let restored = reduce(restoring.clone(), AuthAction::Restored(Some(("t".into(), user("a", true)))));
        let updated = reduce(logged_in.clone(), AuthAction::UserUpdated(user("b", true)));

        assert_eq!(token_effect(&anonymous, &logged_in), TokenEffect::Store("t"));
        assert_eq!(token_effect(&restoring, &restored), TokenEffect::Store("t"));
        assert_eq!(token_effect(&logged_in, &updated), TokenEffect::Keep);
        assert_eq!(token_effect(&restoring, &anonymous), TokenEffect::Remove);
        assert_eq!(token_effect(&logged_in, &anonymous), TokenEffect::Remove);
        assert_eq!(token_effect(&anonymous, &anonymous), TokenEffect::Keep);
    }
}
