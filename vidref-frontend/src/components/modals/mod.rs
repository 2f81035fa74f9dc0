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
use std::rc::Rc;

use yew::prelude::*;

use crate::components::icon::*;

pub mod auth;
pub mod collections;
pub mod settings;
pub mod status;

/// Messages accepted by the closest [`ModalRenderer`]
pub enum ModalMessage {
    Open(Html),
    /// Closes the topmost modal and opens another in its place
    Replace(Html),
    CloseTop,
    CloseAll,
}

#[derive(Default, PartialEq)]
struct ModalStack {
    modals: Vec<Html>,
}

impl Reducible for ModalStack {
    type Action = ModalMessage;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut modals = self.modals.clone();
        match action {
            ModalMessage::Open(h) => modals.push(h),
            ModalMessage::Replace(h) => {
                modals.pop();
                modals.push(h);
            },
            ModalMessage::CloseTop => drop(modals.pop()),
            ModalMessage::CloseAll => modals.clear(),
        }
        Self { modals }.into()
    }
}

#[derive(Properties, PartialEq)]
pub struct ModalRendererProps {
    #[prop_or_default]
    pub children: Html,
}

pub type ModalRendererControls = Callback<ModalMessage, ()>;

#[function_component]
pub fn ModalRenderer(props: &ModalRendererProps) -> Html {
    let stack = use_reducer(ModalStack::default);
    let callback = {
        let stack = stack.clone();
        use_callback((), move |msg, ()| stack.dispatch(msg))
    };

    html! {
        <ContextProvider<ModalRendererControls> context={callback}>
            {props.children.clone()}
            <ModalContainers {stack} />
        </ContextProvider<ModalRendererControls>>
    }
}

#[derive(Properties, PartialEq)]
struct ModalContainersProps {
    stack: UseReducerHandle<ModalStack>,
}

#[function_component]
fn ModalContainers(props: &ModalContainersProps) -> Html {
    let close_top = {
        let stack = props.stack.clone();
        use_callback((), move |_: MouseEvent, ()| stack.dispatch(ModalMessage::CloseTop))
    };

    html! {
        <>
            {for props.stack.modals.iter().enumerate().map(|(i, modal)| {
                html! {
                    <div class="modal-container" style={format!("z-index: {};", i+1)} key={i}>
                        <div class="modal-background" onclick={close_top.clone()} />
                        <div class="modal-content">
                            <span class="clickable modal-close" onclick={close_top.clone()}>
                                <Icon r#type={IconType::Close} tooltip="Close" />
                            </span>
                            {modal.clone()}
                        </div>
                    </div>
                }
            })}
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(stack: Rc<ModalStack>, action: ModalMessage) -> Rc<ModalStack> {
        stack.reduce(action)
    }

    #[test]
    fn replace_swaps_only_the_top_modal() {
        let stack = Rc::new(ModalStack::default());
        let stack = apply(stack, ModalMessage::Open(html! {<p>{"a"}</p>}));
        let stack = apply(stack, ModalMessage::Open(html! {<p>{"b"}</p>}));
        let stack = apply(stack, ModalMessage::Replace(html! {<p>{"c"}</p>}));
        assert_eq!(stack.modals.len(), 2);
        assert_eq!(stack.modals[1], html! {<p>{"c"}</p>});
    }

    #[test]
    fn close_messages() {
        let stack = Rc::new(ModalStack::default());
        let stack = apply(stack, ModalMessage::CloseTop);
        assert!(stack.modals.is_empty());
        let stack = apply(stack, ModalMessage::Open(html! {}));
        let stack = apply(stack, ModalMessage::Open(html! {}));
        let stack = apply(stack, ModalMessage::CloseTop);
        assert_eq!(stack.modals.len(), 1);
        let stack = apply(stack, ModalMessage::CloseAll);
        assert!(stack.modals.is_empty());
    }
}
