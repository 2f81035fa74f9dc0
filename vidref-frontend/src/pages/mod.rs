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
use strum::IntoStaticStr;
use web_sys::window;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::header_footer::*;
use crate::components::modals::ModalRenderer;
use crate::contexts::AuthContext;

mod collection_detail;
mod collections;
mod home;
mod profile;
mod shared;
mod video;

use collection_detail::CollectionDetailPage;
use collections::CollectionsPage;
use home::HomePage;
use profile::ProfilePage;
use shared::SharedCollectionPage;
use video::VideoPage;

#[derive(Clone, Routable, PartialEq, IntoStaticStr)]
pub enum MainRoute {
    #[at("/")]
    Home,
    #[at("/video/:id")]
    Video { id: u64 },
    #[at("/profile")]
    Profile,
    #[at("/collections")]
    Collections,
    #[at("/collections/:id")]
    CollectionDetail { id: u64 },
    #[at("/shared/:token")]
    Shared { token: AttrValue },
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Sends anonymous visitors to the home page, once the saved session was checked
#[hook]
fn use_redirect_anonymous() {
    let auth: AuthContext = use_context().expect("AuthContext should be available");
    let navigator = use_navigator().expect("navigator should exist");
    let anonymous = !auth.state().is_authenticated() && !auth.state().is_restoring();
    use_effect_with(anonymous, move |anonymous| {
        if *anonymous {
            navigator.replace(&MainRoute::Home);
        }
    });
}

fn page_title(route: &MainRoute) -> String {
    match route {
        MainRoute::Home => "Video Reference Browser".to_string(),
        MainRoute::Video { id } => format!("Video {id} - Video Reference Browser"),
        MainRoute::Profile => "Profile - Video Reference Browser".to_string(),
        MainRoute::Collections => "My collections - Video Reference Browser".to_string(),
        MainRoute::CollectionDetail { id } => format!("Collection {id} - Video Reference Browser"),
        MainRoute::Shared { .. } => "Shared collection - Video Reference Browser".to_string(),
        MainRoute::NotFound => "Page not found - Video Reference Browser".to_string(),
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn render_main_route(route: MainRoute) -> Html {
    let document = window()
        .expect("window should exist")
        .document()
        .expect("document should exist");
    document.set_title(&page_title(&route));
    let route_html = match route {
        MainRoute::Home => html! {<HomePage/>},
        MainRoute::Video { id } => html! {<VideoPage {id} />},
        MainRoute::Profile => html! {<ProfilePage/>},
        MainRoute::Collections => html! {<CollectionsPage/>},
        MainRoute::CollectionDetail { id } => html! {<CollectionDetailPage {id} />},
        MainRoute::Shared { ref token } => html! {<SharedCollectionPage token={token.clone()} />},
        MainRoute::NotFound => html! {
            <>
                <h2>{"404 - Not found"}</h2>
                <h3>{"Looks like you've entered an invalid URL"}</h3>
                <Link<MainRoute> to={MainRoute::Home}>{"Return to home page"}</Link<MainRoute>>
            </>
        },
    };
    let route_name: &'static str = (&route).into();
    html! {
        <ModalRenderer>
            <Header />
            <div id="content" data-route={route_name}>
                {route_html}
            </div>
            <Footer />
        </ModalRenderer>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_round_trip_through_paths() {
        assert_eq!(MainRoute::Video { id: 42 }.to_path(), "/video/42");
        assert_eq!(MainRoute::CollectionDetail { id: 7 }.to_path(), "/collections/7");
        assert!(matches!(MainRoute::recognize("/video/42"), Some(MainRoute::Video { id: 42 })));
        assert!(matches!(MainRoute::recognize("/shared/abc123"), Some(MainRoute::Shared { ref token }) if token == "abc123"));
    }

    #[test]
    fn titles_name_the_page() {
        assert_eq!(page_title(&MainRoute::Video { id: 3 }), "Video 3 - Video Reference Browser");
        assert_eq!(page_title(&MainRoute::Home), "Video Reference Browser");
    }
}
