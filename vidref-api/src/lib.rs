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

//! Wire models for the video reference catalog REST API.
//!
//! The same model definitions are compiled twice: once with `Arc<str>` strings (`sync`), once
//! with `Rc<str>` strings (`unsync`, used by the wasm frontend).

#[cfg(feature = "sync")]
pub mod sync {
    pub type RcStr = std::sync::Arc<str>;
    include!("api.rs");
}

#[cfg(feature = "unsync")]
pub mod unsync {
    pub type RcStr = std::rc::Rc<str>;
    include!("api.rs");
}

#[cfg(all(test, feature = "sync"))]
mod tests {
    use super::sync::*;

    #[test]
    fn paginator_reads_top_level_meta() {
        let page: Paginated<Tag> = serde_json::from_str(r#"{
            "current_page": 2,
            "data": [{"id": 1, "name": "glitch"}],
            "last_page": 5,
            "per_page": 24,
            "total": 110
        }"#).unwrap();
        let meta = page.meta();
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.last_page, 5);
        assert_eq!(meta.total, 110);
        assert_eq!(page.data.len(), 1);
    }

    #[test]
    fn paginator_reads_nested_meta() {
        let page: Paginated<Tag> = serde_json::from_str(r#"{
            "data": [],
            "meta": {"current_page": 1, "last_page": 1, "per_page": 24, "total": 0}
        }"#).unwrap();
        assert_eq!(page.meta().last_page, 1);
        assert!(!page.meta().has_more());
    }

    #[test]
    fn paginator_without_meta_is_a_single_page() {
        let page: Paginated<Tag> = serde_json::from_str(r#"{"data": [{"id": 3, "name": "kinetic"}]}"#).unwrap();
        let meta = page.meta();
        assert_eq!(meta.current_page, 1);
        assert_eq!(meta.last_page, 1);
        assert_eq!(meta.total, 1);
    }

    #[test]
    fn envelope_accepts_wrapped_and_bare() {
        let wrapped: Envelope<Collection> = serde_json::from_str(r#"{"data": {"id": 4, "name": "Intros"}}"#).unwrap();
        let bare: Envelope<Collection> = serde_json::from_str(r#"{"id": 4, "name": "Intros"}"#).unwrap();
        assert_eq!(wrapped.into_inner(), bare.into_inner());
    }

    #[test]
    fn current_user_accepts_both_shapes() {
        let nested: CurrentUserResponse = serde_json::from_str(r#"{"user": {"id": 1, "name": "Ann", "email": "a@b.c", "email_verified_at": null}}"#).unwrap();
        let bare: CurrentUserResponse = serde_json::from_str(r#"{"id": 1, "name": "Ann", "email": "a@b.c"}"#).unwrap();
        let nested = nested.into_user();
        assert_eq!(nested, bare.into_user());
        assert!(nested.email_verified_at.is_none());
    }

    #[test]
    fn video_reference_tolerates_sparse_payloads() {
        let video: VideoReference = serde_json::from_str(r#"{
            "id": 17,
            "title": "Speed ramp transition",
            "platform": "tiktok",
            "platform_video_id": "7301234567890123456",
            "has_3d": true,
            "details_public": {"camera": "iPhone 15", "fps": 60}
        }"#).unwrap();
        assert_eq!(&*video.platform, "tiktok");
        assert!(video.has_3d);
        assert!(!video.is_liked);
        assert_eq!(video.likes_count, 0);
        assert!(video.tags.is_empty());
        let details = video.details_public.unwrap();
        assert_eq!(details.keys().map(|k| &**k).collect::<Vec<_>>(), ["camera", "fps"]);
    }

    #[test]
    fn category_accepts_nested_children() {
        let categories: Vec<Category> = serde_json::from_str(r#"[
            {"id": 1, "name": "Motion", "children": [{"id": 2, "name": "Kinetic type", "parent_id": 1}]}
        ]"#).unwrap();
        assert_eq!(categories[0].parent_id, None);
        assert_eq!(categories[0].children[0].parent_id, Some(1));
    }

    #[test]
    fn saved_response_defaults_collection_ids() {
        let saved: SavedResponse = serde_json::from_str(r#"{"is_saved": false}"#).unwrap();
        assert!(saved.collection_ids.is_empty());
    }
}
