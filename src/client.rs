//! REST client for the local course service.

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::{
    Course, CourseDraft, CoursePatch, DeletedCourse, DeletedPost, Post, PostDraft, PostPatch,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    NotFound(String),
    #[error("server returned status {0}")]
    Api(u16),
    #[error("request failed: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// The operations the state store needs from the backend. A seam so the
/// store can be exercised against an in-process service in tests.
pub trait CourseApi {
    fn fetch_courses(&self) -> Result<Vec<Course>, ClientError>;
    fn create_course(&self, draft: &CourseDraft) -> Result<Course, ClientError>;
    fn update_course(&self, id: &str, patch: &CoursePatch) -> Result<Course, ClientError>;
    fn delete_course(&self, id: &str) -> Result<Course, ClientError>;
    fn create_post(&self, course_id: &str, draft: &PostDraft) -> Result<Post, ClientError>;
    fn update_post(
        &self,
        course_id: &str,
        post_id: &str,
        patch: &PostPatch,
    ) -> Result<Post, ClientError>;
    fn delete_post(&self, course_id: &str, post_id: &str) -> Result<Post, ClientError>;
}

/// HTTP implementation of [`CourseApi`] against a running service.
pub struct CoursesClient {
    base_url: String,
}

impl CoursesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decode<T: DeserializeOwned>(response: ureq::Response) -> Result<T, ClientError> {
        response
            .into_json()
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    fn map_err(err: ureq::Error) -> ClientError {
        match err {
            ureq::Error::Status(404, response) => {
                let message = response
                    .into_json::<serde_json::Value>()
                    .ok()
                    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
                    .unwrap_or_else(|| "not found".to_string());
                ClientError::NotFound(message)
            }
            ureq::Error::Status(code, _) => ClientError::Api(code),
            ureq::Error::Transport(transport) => ClientError::Network(transport.to_string()),
        }
    }
}

impl CourseApi for CoursesClient {
    fn fetch_courses(&self) -> Result<Vec<Course>, ClientError> {
        let response = ureq::get(&self.url("/courses"))
            .call()
            .map_err(Self::map_err)?;
        Self::decode(response)
    }

    fn create_course(&self, draft: &CourseDraft) -> Result<Course, ClientError> {
        let response = ureq::post(&self.url("/courses"))
            .send_json(draft)
            .map_err(Self::map_err)?;
        Self::decode(response)
    }

    fn update_course(&self, id: &str, patch: &CoursePatch) -> Result<Course, ClientError> {
        let response = ureq::put(&self.url(&format!("/courses/{id}")))
            .send_json(patch)
            .map_err(Self::map_err)?;
        Self::decode(response)
    }

    fn delete_course(&self, id: &str) -> Result<Course, ClientError> {
        let response = ureq::delete(&self.url(&format!("/courses/{id}")))
            .call()
            .map_err(Self::map_err)?;
        let deleted: DeletedCourse = Self::decode(response)?;
        Ok(deleted.course)
    }

    fn create_post(&self, course_id: &str, draft: &PostDraft) -> Result<Post, ClientError> {
        let response = ureq::post(&self.url(&format!("/courses/{course_id}/posts")))
            .send_json(draft)
            .map_err(Self::map_err)?;
        Self::decode(response)
    }

    fn update_post(
        &self,
        course_id: &str,
        post_id: &str,
        patch: &PostPatch,
    ) -> Result<Post, ClientError> {
        let response = ureq::put(&self.url(&format!("/courses/{course_id}/posts/{post_id}")))
            .send_json(patch)
            .map_err(Self::map_err)?;
        Self::decode(response)
    }

    fn delete_post(&self, course_id: &str, post_id: &str) -> Result<Post, ClientError> {
        let response = ureq::delete(&self.url(&format!("/courses/{course_id}/posts/{post_id}")))
            .call()
            .map_err(Self::map_err)?;
        let deleted: DeletedPost = Self::decode(response)?;
        Ok(deleted.post)
    }
}
