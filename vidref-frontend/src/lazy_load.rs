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

//! Visibility tracking for cards and the infinite scroll sentinel

use std::cell::RefCell;
use std::rc::Rc;

use cloneable_errors::{ErrContext, ErrorContext};
use gloo_console::error;
use wasm_bindgen::{closure::Closure, JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};
use yew::prelude::*;

use crate::constants::{INFINITE_SCROLL_ROOT_MARGIN, LAZY_LOAD_ROOT_MARGIN, LAZY_LOAD_SETTLE_MS, LAZY_LOAD_THRESHOLD};
use crate::utils::{js_error, Timeout};

/// What the caller has to do after feeding an event into [`LazyLoadState`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LazyLoadEffect {
    Nothing,
    /// Start the settle timer for this visibility episode
    ScheduleLoad(u32),
    /// Tear the player down
    Unload,
}

/// Visibility state machine of a single card
///
/// Every time the card enters the view a new episode starts. A settle timer only loads the
/// player if its episode is still the current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LazyLoadState {
    is_visible: bool,
    should_load: bool,
    episode: u32,
}

impl LazyLoadState {
    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn should_load(&self) -> bool {
        self.should_load
    }

    pub fn on_visibility(&mut self, visible: bool) -> LazyLoadEffect {
        match (self.is_visible, visible) {
            (false, true) => {
                self.is_visible = true;
                self.episode = self.episode.wrapping_add(1);
                LazyLoadEffect::ScheduleLoad(self.episode)
            },
            (true, false) => {
                self.is_visible = false;
                self.should_load = false;
                // invalidate the pending timer
                self.episode = self.episode.wrapping_add(1);
                LazyLoadEffect::Unload
            },
            (true, true) | (false, false) => LazyLoadEffect::Nothing,
        }
    }

    /// Returns true if the player should be loaded now
    pub fn on_settle_elapsed(&mut self, episode: u32) -> bool {
        if self.is_visible && !self.should_load && episode == self.episode {
            self.should_load = true;
            true
        } else {
            false
        }
    }

    pub fn output(&self) -> LazyLoad {
        LazyLoad {
            is_visible: self.is_visible,
            should_load: self.should_load,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LazyLoad {
    pub is_visible: bool,
    pub should_load: bool,
}

type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Keeps an observer alive, disconnects it and cancels the settle timer on drop
struct ObserverGuard {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
    timer: Rc<RefCell<Option<Timeout>>>,
}

impl Drop for ObserverGuard {
    fn drop(&mut self) {
        self.observer.disconnect();
        drop(self.timer.borrow_mut().take());
    }
}

fn create_observer(callback: &ObserverCallback, root_margin: &str, threshold: f64) -> Result<IntersectionObserver, ErrorContext> {
    let options = IntersectionObserverInit::new();
    options.set_root_margin(root_margin);
    options.set_threshold(&JsValue::from_f64(threshold));
    IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
        .map_err(|e| js_error(&e).context("Failed to construct an IntersectionObserver"))
}

fn observe(element: &Element, output: UseStateHandle<LazyLoad>) -> Result<ObserverGuard, ErrorContext> {
    let machine = Rc::new(RefCell::new(LazyLoadState::default()));
    let timer: Rc<RefCell<Option<Timeout>>> = Rc::default();

    let callback: ObserverCallback = {
        let timer = timer.clone();
        Closure::new(move |entries: Array, _: IntersectionObserver| {
            // only the newest entry matters
            let Some(entry) = entries.iter().last().and_then(|e| e.dyn_into::<IntersectionObserverEntry>().ok()) else {
                return;
            };
            let visible = entry.is_intersecting() && entry.intersection_ratio() >= LAZY_LOAD_THRESHOLD;
            let effect = machine.borrow_mut().on_visibility(visible);
            match effect {
                LazyLoadEffect::Nothing => return,
                LazyLoadEffect::Unload => drop(timer.borrow_mut().take()),
                LazyLoadEffect::ScheduleLoad(episode) => {
                    let machine = machine.clone();
                    let output = output.clone();
                    let settle = Timeout::new(move || {
                        let mut machine = machine.borrow_mut();
                        if machine.on_settle_elapsed(episode) {
                            output.set(machine.output());
                        }
                    }, LAZY_LOAD_SETTLE_MS);
                    match settle {
                        Ok(t) => *timer.borrow_mut() = Some(t),
                        Err(e) => error!(format!("{e:?}")),
                    }
                },
            }
            output.set(machine.borrow().output());
        })
    };

    let observer = create_observer(&callback, LAZY_LOAD_ROOT_MARGIN, LAZY_LOAD_THRESHOLD)?;
    observer.observe(element);

    Ok(ObserverGuard {
        observer,
        _callback: callback,
        timer,
    })
}

/// Tracks whether the element behind `node` is in view and whether its player should load
#[hook]
pub fn use_viewport_lazy_load(node: NodeRef) -> LazyLoad {
    let output = use_state_eq(LazyLoad::default);
    {
        let output = output.clone();
        use_effect_with(node, move |node| {
            let guard = node.cast::<Element>().and_then(|element| match observe(&element, output) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    error!(format!("{e:?}"));
                    None
                },
            });
            move || drop(guard)
        });
    }
    *output
}

struct SentinelGuard {
    observer: IntersectionObserver,
    _callback: ObserverCallback,
}

impl Drop for SentinelGuard {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

fn observe_sentinel(element: &Element, output: UseStateHandle<bool>) -> Result<SentinelGuard, ErrorContext> {
    let callback: ObserverCallback = Closure::new(move |entries: Array, _: IntersectionObserver| {
        if let Some(entry) = entries.iter().last().and_then(|e| e.dyn_into::<IntersectionObserverEntry>().ok()) {
            output.set(entry.is_intersecting());
        }
    });
    let observer = create_observer(&callback, INFINITE_SCROLL_ROOT_MARGIN, 0.0)?;
    observer.observe(element);
    Ok(SentinelGuard { observer, _callback: callback })
}

/// Tracks whether the element behind `node` is close to the viewport
///
/// Unlike [`use_viewport_lazy_load`] there is no settle delay.
#[hook]
pub fn use_near_viewport(node: NodeRef) -> bool {
    let output = use_state_eq(|| false);
    {
        let output = output.clone();
        use_effect_with(node, move |node| {
            let guard = node.cast::<Element>().and_then(|element| match observe_sentinel(&element, output) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    error!(format!("{e:?}"));
                    None
                },
            });
            move || drop(guard)
        });
    }
    *output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_after_settling_while_visible() {
        let mut state = LazyLoadState::default();
        let LazyLoadEffect::ScheduleLoad(episode) = state.on_visibility(true) else { panic!("expected a scheduled load") };
        assert!(state.is_visible());
        assert!(!state.should_load());
        assert!(state.on_settle_elapsed(episode));
        assert_eq!(state.output(), LazyLoad { is_visible: true, should_load: true });
    }

    #[test]
    fn leaving_before_settling_never_loads_that_episode() {
        let mut state = LazyLoadState::default();
        let LazyLoadEffect::ScheduleLoad(episode) = state.on_visibility(true) else { panic!("expected a scheduled load") };
        assert_eq!(state.on_visibility(false), LazyLoadEffect::Unload);
        assert!(!state.on_settle_elapsed(episode));
        assert!(!state.should_load());
    }

    #[test]
    fn stale_timer_from_an_earlier_episode_is_ignored() {
        let mut state = LazyLoadState::default();
        let LazyLoadEffect::ScheduleLoad(first) = state.on_visibility(true) else { panic!("expected a scheduled load") };
        state.on_visibility(false);
        let LazyLoadEffect::ScheduleLoad(second) = state.on_visibility(true) else { panic!("expected a scheduled load") };
        assert_ne!(first, second);
        assert!(!state.on_settle_elapsed(first));
        assert!(state.on_settle_elapsed(second));
    }

    #[test]
    fn leaving_after_loading_unloads() {
        let mut state = LazyLoadState::default();
        let LazyLoadEffect::ScheduleLoad(episode) = state.on_visibility(true) else { panic!("expected a scheduled load") };
        state.on_settle_elapsed(episode);
        assert_eq!(state.on_visibility(false), LazyLoadEffect::Unload);
        assert_eq!(state.output(), LazyLoad::default());
    }

    #[test]
    fn repeated_visibility_reports_are_ignored() {
        let mut state = LazyLoadState::default();
        assert_eq!(state.on_visibility(false), LazyLoadEffect::Nothing);
        state.on_visibility(true);
        assert_eq!(state.on_visibility(true), LazyLoadEffect::Nothing);
    }
}
