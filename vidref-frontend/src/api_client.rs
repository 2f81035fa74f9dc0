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

//! Typed client for the backend REST API

use std::fmt::Display;
use std::rc::Rc;

use cloneable_errors::{ErrorContext, ResContext};
use reqwest::{Method, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use vidref_api::unsync::*;
use yew::Callback;

use crate::constants::REQWEST_CLIENT;
use crate::filters::QueryObject;
use crate::utils::ReqwestUrlExt;

#[derive(Clone, Debug)]
pub enum ApiError {
    /// 401, the token is missing, expired or revoked
    Unauthorized,
    /// 403, returned by login for accounts with an unverified email
    Forbidden { message: Option<Rc<str>> },
    /// 422, e.g. a video that is already in the collection
    Conflict { message: Option<Rc<str>> },
    NotFound,
    Status { status: u16, message: Option<Rc<str>> },
    Transport(ErrorContext),
}

impl ApiError {
    /// Maps a non-success response to an error, reading `{"message": ...}` from the body
    pub fn from_response(status: u16, body: &str) -> ApiError {
        let message = serde_json::from_str::<MessageResponse>(body)
            .ok()
            .map(|m| m.message)
            .filter(|m| !m.trim().is_empty());
        match status {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden { message },
            404 => ApiError::NotFound,
            422 => ApiError::Conflict { message },
            _ => ApiError::Status { status, message },
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Forbidden { message } | Self::Conflict { message } | Self::Status { message, .. } => message.as_deref(),
            Self::Unauthorized | Self::NotFound | Self::Transport(..) => None,
        }
    }

    /// Backend message if there was one, `fallback` otherwise
    pub fn user_message(&self, fallback: &str) -> String {
        self.message().unwrap_or(fallback).to_owned()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "The server rejected the authentication token"),
            Self::Forbidden { message } => write!(f, "Forbidden: {}", message.as_deref().unwrap_or("no message")),
            Self::Conflict { message } => write!(f, "Unprocessable request: {}", message.as_deref().unwrap_or("no message")),
            Self::NotFound => write!(f, "Not found"),
            Self::Status { status, message } => write!(f, "The server returned a '{status}' status code: {}", message.as_deref().unwrap_or("no message")),
            Self::Transport(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ErrorContext> for ApiError {
    fn from(value: ErrorContext) -> Self {
        Self::Transport(value)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// A handle for making API calls as the current user
///
/// Cheap to clone, rebuilt whenever the base URL or the token changes.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    base: Rc<Url>,
    token: Option<Rc<str>>,
    /// Receives the token of a request that got a 401
    on_rejected: Callback<Rc<str>>,
}

impl ApiClient {
    pub fn new(base: Url, token: Option<Rc<str>>, on_rejected: Callback<Rc<str>>) -> ApiClient {
        ApiClient { base: Rc::new(base), token, on_rejected }
    }

    pub fn token(&self) -> Option<&Rc<str>> {
        self.token.as_ref()
    }

    /// Same client, authenticated with `token` instead
    #[must_use]
    pub fn with_token(&self, token: Option<Rc<str>>) -> ApiClient {
        ApiClient { token, ..self.clone() }
    }

    pub fn endpoint<I>(&self, segments: I) -> ApiResult<Url>
    where I: IntoIterator,
          I::Item: AsRef<str>,
    {
        self.base
            .join_segments(segments)
            .map_err(|()| ErrorContext::new(format!("API base URL {} cannot be a base", self.base)).into())
    }

    async fn send<B, R>(&self, method: Method, url: Url, body: Option<&B>) -> ApiResult<R>
    where B: Serialize + ?Sized,
          R: DeserializeOwned,
    {
        let body = self.send_raw(method, url, body).await?;
        Ok(serde_json::from_str(&body).context("Failed to deserialize response")?)
    }

    async fn send_raw<B>(&self, method: Method, url: Url, body: Option<&B>) -> ApiResult<String>
    where B: Serialize + ?Sized,
    {
        let mut request = REQWEST_CLIENT
            .request(method, url)
            .header("Accept", "application/json");
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.context("Failed to send the request")?;
        let status = response.status();
        let text = response.text().await.with_context(|| format!("Failed to read the response body ('{status}')"))?;
        if status.is_success() {
            return Ok(text);
        }
        if let (StatusCode::UNAUTHORIZED, Some(token)) = (status, &self.token) {
            self.on_rejected.emit(token.clone());
        }
        Err(ApiError::from_response(status.as_u16(), &text))
    }

    async fn get<R: DeserializeOwned>(&self, url: Url) -> ApiResult<R> {
        self.send::<(), R>(Method::GET, url, None).await
    }

    // auth

    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        self.send_raw(Method::POST, self.endpoint(["register"])?, Some(request)).await.map(drop)
    }

    pub async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.send(Method::POST, self.endpoint(["login"])?, Some(request)).await
    }

    pub async fn logout(&self) -> ApiResult<()> {
        self.send_raw::<()>(Method::POST, self.endpoint(["logout"])?, None).await.map(drop)
    }

    pub async fn current_user(&self) -> ApiResult<User> {
        self.get::<CurrentUserResponse>(self.endpoint(["me"])?).await.map(CurrentUserResponse::into_user)
    }

    pub async fn send_verification_code(&self, email: &str) -> ApiResult<()> {
        let request = SendCodeRequest { email: email.into() };
        self.send_raw(Method::POST, self.endpoint(["email-verification", "send-code"])?, Some(&request)).await.map(drop)
    }

    pub async fn verify_code(&self, email: &str, code: &str) -> ApiResult<()> {
        let request = VerifyCodeRequest { email: email.into(), code: code.into() };
        self.send_raw(Method::POST, self.endpoint(["email-verification", "verify-code"])?, Some(&request)).await.map(drop)
    }

    // likes

    pub async fn toggle_like(&self, video_id: u64) -> ApiResult<LikeResponse> {
        self.send::<(), _>(Method::POST, self.endpoint(["video-references", &video_id.to_string(), "like"])?, None).await
    }

    pub async fn user_likes(&self) -> ApiResult<Vec<VideoReference>> {
        self.get::<Envelope<_>>(self.endpoint(["likes"])?).await.map(Envelope::into_inner)
    }

    // collections

    pub async fn collections(&self) -> ApiResult<Vec<Collection>> {
        self.get::<Envelope<_>>(self.endpoint(["collections"])?).await.map(Envelope::into_inner)
    }

    pub async fn create_collection(&self, name: &str) -> ApiResult<Collection> {
        let request = NewCollection { name: name.into() };
        self.send::<_, Envelope<_>>(Method::POST, self.endpoint(["collections"])?, Some(&request)).await.map(Envelope::into_inner)
    }

    pub async fn collection(&self, id: u64) -> ApiResult<Collection> {
        self.get::<Envelope<_>>(self.endpoint(["collections", &id.to_string()])?).await.map(Envelope::into_inner)
    }

    pub async fn update_collection(&self, id: u64, name: &str) -> ApiResult<Collection> {
        let request = NewCollection { name: name.into() };
        self.send::<_, Envelope<_>>(Method::PUT, self.endpoint(["collections", &id.to_string()])?, Some(&request)).await.map(Envelope::into_inner)
    }

    pub async fn delete_collection(&self, id: u64) -> ApiResult<()> {
        self.send_raw::<()>(Method::DELETE, self.endpoint(["collections", &id.to_string()])?, None).await.map(drop)
    }

    pub async fn collection_videos(&self, id: u64) -> ApiResult<Vec<VideoReference>> {
        self.get::<Envelope<_>>(self.endpoint(["collections", &id.to_string(), "videos"])?).await.map(Envelope::into_inner)
    }

    pub async fn add_to_collection(&self, collection_id: u64, video_id: u64) -> ApiResult<()> {
        let request = AddToCollectionRequest { video_reference_id: video_id };
        self.send_raw(Method::POST, self.endpoint(["collections", &collection_id.to_string(), "videos"])?, Some(&request)).await.map(drop)
    }

    pub async fn remove_from_collection(&self, collection_id: u64, video_id: u64) -> ApiResult<()> {
        let url = self.endpoint(["collections", &collection_id.to_string(), "videos", &video_id.to_string()])?;
        self.send_raw::<()>(Method::DELETE, url, None).await.map(drop)
    }

    pub async fn saved_state(&self, video_id: u64) -> ApiResult<SavedResponse> {
        self.get(self.endpoint(["video-references", &video_id.to_string(), "saved"])?).await
    }

    pub async fn shared_collection(&self, token: &str) -> ApiResult<SharedCollection> {
        self.get::<Envelope<_>>(self.endpoint(["shared", "collections", token, "videos"])?).await.map(Envelope::into_inner)
    }

    // profile

    pub async fn profile(&self) -> ApiResult<User> {
        self.get::<ProfileResponse>(self.endpoint(["profile"])?).await.map(|p| p.user)
    }

    pub async fn update_profile(&self, name: &str) -> ApiResult<User> {
        let request = ProfileUpdate { name: name.into() };
        self.send::<_, ProfileResponse>(Method::PUT, self.endpoint(["profile"])?, Some(&request)).await.map(|p| p.user)
    }

    // catalog

    /// One page of search results, `query` comes from [`crate::filters::compose`]
    pub async fn search_videos(&self, query: &QueryObject, page: u64, per_page: usize) -> ApiResult<Paginated<VideoReference>> {
        let mut url = self.endpoint(["video-references"])?;
        query.append_to(&mut url);
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        self.get(url).await
    }

    pub async fn video(&self, id: u64) -> ApiResult<VideoReference> {
        self.get::<Envelope<_>>(self.endpoint(["video-references", &id.to_string()])?).await.map(Envelope::into_inner)
    }

    pub async fn categories(&self) -> ApiResult<Vec<Category>> {
        self.get::<Envelope<_>>(self.endpoint(["categories"])?).await.map(Envelope::into_inner)
    }

    fn lookup_url(&self, resource: &str, search: Option<&str>) -> ApiResult<Url> {
        let mut url = self.endpoint([resource])?;
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            url.query_pairs_mut().append_pair("search", search);
        }
        Ok(url)
    }

    pub async fn tags(&self, search: Option<&str>) -> ApiResult<Vec<Tag>> {
        self.get::<Envelope<_>>(self.lookup_url("tags", search)?).await.map(Envelope::into_inner)
    }

    pub async fn hooks(&self, search: Option<&str>) -> ApiResult<Vec<Hook>> {
        self.get::<Envelope<_>>(self.lookup_url("hooks", search)?).await.map(Envelope::into_inner)
    }

    pub async fn transition_types(&self, search: Option<&str>) -> ApiResult<Vec<TransitionType>> {
        self.get::<Envelope<_>>(self.lookup_url("transition-types", search)?).await.map(Envelope::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(Url::parse("http://localhost:8000/api/").unwrap(), None, Callback::noop())
    }

    #[test]
    fn statuses_map_to_typed_errors() {
        assert!(ApiError::from_response(401, "").is_unauthorized());
        assert!(matches!(ApiError::from_response(404, "{}"), ApiError::NotFound));
        assert!(matches!(ApiError::from_response(500, "oops"), ApiError::Status { status: 500, message: None }));
        let forbidden = ApiError::from_response(403, r#"{"message": "Email not verified"}"#);
        assert!(matches!(forbidden, ApiError::Forbidden { .. }));
        assert_eq!(forbidden.message(), Some("Email not verified"));
    }

    #[test]
    fn validation_errors_are_conflicts() {
        let err = ApiError::from_response(422, r#"{"message": "The video is already in this collection.", "errors": {}}"#);
        assert!(matches!(err, ApiError::Conflict { .. }));
        assert_eq!(err.user_message("fallback"), "The video is already in this collection.");
    }

    #[test]
    fn blank_messages_use_the_fallback() {
        let err = ApiError::from_response(400, r#"{"message": "  "}"#);
        assert_eq!(err.user_message("Sign in error"), "Sign in error");
        let err = ApiError::from_response(502, "<html>Bad gateway</html>");
        assert_eq!(err.user_message("Registration error"), "Registration error");
    }

    #[test]
    fn endpoints_are_relative_to_the_base() {
        let client = client();
        assert_eq!(client.endpoint(["me"]).unwrap().as_str(), "http://localhost:8000/api/me");
        assert_eq!(
            client.endpoint(["collections", "3", "videos", "17"]).unwrap().as_str(),
            "http://localhost:8000/api/collections/3/videos/17",
        );
    }

    #[test]
    fn lookups_only_send_non_empty_searches() {
        let client = client();
        assert_eq!(client.lookup_url("tags", Some("  ")).unwrap().as_str(), "http://localhost:8000/api/tags");
        assert_eq!(client.lookup_url("transition-types", Some("whip")).unwrap().as_str(), "http://localhost:8000/api/transition-types?search=whip");
    }

    #[test]
    fn with_token_keeps_the_base() {
        let client = client().with_token(Some("abc".into()));
        assert_eq!(client.token().map(|t| &**t), Some("abc"));
        assert_eq!(client.endpoint(["likes"]).unwrap().as_str(), "http://localhost:8000/api/likes");
    }
}
