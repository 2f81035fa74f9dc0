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
// NOTE: This file is used as a template for vidref-api::sync and ::unsync modules.
//       The RcStr type will be defined externally with the correct smart pointer variant for the
//       module.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// envelopes

/// Pagination info of a paginated listing
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct PageMeta {
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl PageMeta {
    pub fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// A paginated listing
///
/// The backend either puts the pagination info next to `data`, or in a nested `meta` object,
/// depending on the endpoint. Use [`Paginated::meta`] to read it.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> Paginated<T> {
    pub fn meta(&self) -> PageMeta {
        if let Some(meta) = self.meta {
            return meta;
        }
        let current_page = self.current_page.unwrap_or(1);
        PageMeta {
            current_page,
            last_page: self.last_page.unwrap_or(current_page),
            per_page: self.per_page.unwrap_or(self.data.len() as u64),
            total: self.total.unwrap_or(self.data.len() as u64),
        }
    }
}

/// Non-paginated responses may or may not be wrapped in a `{"data": ...}` object
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(untagged)]
pub enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// Error body returned by the backend
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct MessageResponse {
    pub message: RcStr,
}

// auth

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct User {
    pub id: u64,
    pub name: RcStr,
    pub email: RcStr,
    #[serde(default)]
    pub email_verified_at: Option<RcStr>,
    #[serde(default)]
    pub created_at: Option<RcStr>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct RegisterRequest {
    pub name: RcStr,
    pub email: RcStr,
    pub password: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct LoginRequest {
    pub email: RcStr,
    pub password: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct LoginResponse {
    pub access_token: RcStr,
    pub user: User,
}

/// `GET /me` returns the user either directly or under a `user` key
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(untagged)]
pub enum CurrentUserResponse {
    Wrapped { user: User },
    Bare(User),
}

impl CurrentUserResponse {
    pub fn into_user(self) -> User {
        match self {
            Self::Wrapped { user } | Self::Bare(user) => user,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct SendCodeRequest {
    pub email: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct VerifyCodeRequest {
    pub email: RcStr,
    pub code: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ProfileResponse {
    pub user: User,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ProfileUpdate {
    pub name: RcStr,
}

// catalog

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Category {
    pub id: u64,
    pub name: RcStr,
    #[serde(default)]
    pub parent_id: Option<u64>,
    #[serde(default)]
    pub children: Vec<Category>,
}

/// Category as embedded in a video reference
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct CategoryRef {
    pub id: u64,
    pub name: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Tag {
    pub id: u64,
    pub name: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Hook {
    pub id: u64,
    pub name: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct TransitionType {
    pub id: u64,
    pub name: RcStr,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Tutorial {
    #[serde(default)]
    pub label: Option<RcStr>,
    #[serde(default)]
    pub start_sec: Option<u32>,
    #[serde(default)]
    pub end_sec: Option<u32>,
    #[serde(default)]
    pub tutorial_url: Option<RcStr>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct VideoReference {
    pub id: u64,
    pub title: RcStr,
    /// Kept as a plain string, unknown platforms are handled by the player
    #[serde(default = "empty_str")]
    pub platform: RcStr,
    #[serde(default)]
    pub platform_video_id: Option<RcStr>,
    #[serde(default)]
    pub source_url: Option<RcStr>,
    #[serde(default)]
    pub preview_url: Option<RcStr>,
    #[serde(default)]
    pub duration_sec: Option<u32>,
    #[serde(default)]
    pub public_summary: Option<RcStr>,
    #[serde(default)]
    pub category: Option<CategoryRef>,
    #[serde(default)]
    pub categories: Vec<CategoryRef>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub tutorials: Vec<Tutorial>,
    #[serde(default)]
    pub details_public: Option<IndexMap<RcStr, serde_json::Value>>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub is_saved: bool,
    #[serde(default)]
    pub has_visual_effects: bool,
    #[serde(default)]
    pub has_3d: bool,
    #[serde(default)]
    pub has_animations: bool,
    #[serde(default)]
    pub has_typography: bool,
    #[serde(default)]
    pub has_sound_design: bool,
    #[serde(default)]
    pub has_ai: bool,
    #[serde(default)]
    pub has_tutorial: bool,
}

fn empty_str() -> RcStr {
    RcStr::from("")
}

// likes & collections

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct LikeResponse {
    #[serde(alias = "is_liked")]
    pub liked: bool,
    pub likes_count: u64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct SavedResponse {
    pub is_saved: bool,
    #[serde(default)]
    pub collection_ids: Vec<u64>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct Collection {
    pub id: u64,
    pub name: RcStr,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub video_references_count: u64,
    #[serde(default)]
    pub share_token: Option<RcStr>,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct NewCollection {
    pub name: RcStr,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub struct AddToCollectionRequest {
    pub video_reference_id: u64,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct SharedCollection {
    pub name: RcStr,
    #[serde(default)]
    pub videos: Vec<VideoReference>,
}
