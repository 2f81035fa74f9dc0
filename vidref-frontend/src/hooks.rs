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
use std::{future::Future, cell::RefCell};
use std::rc::Rc;

use gloo_console::error;
use yew::prelude::*;
use yew::platform::spawn_local;
use yew::suspense::{SuspensionResult, Suspension};

use crate::utils::Timeout;


enum UseAsyncSuspensionState<R>
where
    R: 'static,
{
    Reset,
    Running(Suspension),
    Finished(Rc<R>),
}

/// Suspends until `future` resolves for the current `deps`
///
/// State is memoized per `deps` value, so a response for outdated deps lands in a state cell
/// that nothing reads anymore.
#[hook]
pub fn use_async_suspension<FF, F, D, R>(future: FF, deps: D) -> SuspensionResult<Rc<R>>
where
    FF: 'static + FnOnce(D) -> F,
    F:  'static + Future<Output = R>,
    D:  'static + PartialEq + Clone,
    R:  'static,
{
    let state_ref: Rc<RefCell<UseAsyncSuspensionState<R>>> = use_memo(deps.clone(), |_| RefCell::new(UseAsyncSuspensionState::Reset));
    let mut state = state_ref.borrow_mut();
    match *state {
        UseAsyncSuspensionState::Running(ref sus) => Err(sus.clone()),
        UseAsyncSuspensionState::Finished(ref res) => Ok(res.clone()),
        UseAsyncSuspensionState::Reset => {
            let (sus, sus_handle) = Suspension::new();
            *state = UseAsyncSuspensionState::Running(sus.clone());
            drop(state);
            spawn_local(async move {
                let result = future(deps).await;
                *state_ref.borrow_mut() = UseAsyncSuspensionState::Finished(Rc::new(result));
                sus_handle.resume();
            });
            Err(sus)
        }
    }
}

#[hook]
pub fn use_memo_state_eq<T, F, D>(deps: D, init_fn: F) -> UseStateHandle<T>
where
    T: 'static + PartialEq,
    F: Fn() -> T,
    D: 'static + PartialEq + Clone,
{
    let state = use_state_eq(&init_fn);
    {
        // yes, we're using use_memo to reset a state on changes to props
        let state = state.clone();
        use_memo(deps, move |_| {
            state.set(init_fn());
        });
    }
    state
}

/// Returns `value` once it stopped changing for `delay_ms`
///
/// A delay of 0 applies the value on the next render.
#[hook]
pub fn use_debounced<T>(value: T, delay_ms: u32) -> T
where
    T: 'static + Clone + PartialEq,
{
    let debounced = use_state_eq(|| value.clone());
    let timer: Rc<RefCell<Option<Timeout>>> = use_mut_ref(|| None);
    {
        let debounced = debounced.clone();
        use_effect_with((value, delay_ms), move |(value, delay_ms)| {
            // replacing the timer cancels the pending update
            *timer.borrow_mut() = None;
            if *delay_ms == 0 {
                debounced.set(value.clone());
                return;
            }
            let fallback = debounced.clone();
            let delayed_value = value.clone();
            match Timeout::new(move || debounced.set(delayed_value), *delay_ms) {
                Ok(t) => *timer.borrow_mut() = Some(t),
                Err(e) => {
                    error!(format!("{e:?}"));
                    fallback.set(value.clone());
                },
            }
        });
    }
    (*debounced).clone()
}
