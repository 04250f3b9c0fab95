//! Client-side state: a disposable mirror of the service data plus the
//! UI-only bits (edit modes, the open posts view, the transient highlight,
//! the quick-add field).
//!
//! Reconciliation rule: replace-on-success, no-op-on-failure. A failed
//! request leaves the mirror exactly as it was.

use std::time::{Duration, Instant};

use crate::client::{ClientError, CourseApi};
use crate::forms::{CourseForm, PostForm};
use crate::types::{Course, CoursePatch, Post, PostPatch};

/// How long a freshly created course keeps its "just added" marker.
pub const NEW_COURSE_HIGHLIGHT: Duration = Duration::from_millis(500);

pub const CONFIRM_DELETE_COURSE: &str =
    "Are you sure you want to delete this course and all its posts?";
pub const CONFIRM_DELETE_POST: &str = "Are you sure you want to delete this post?";

/// Asks the user to approve a destructive action.
pub trait Prompt {
    fn confirm(&mut self, message: &str) -> bool;
}

#[derive(Default)]
pub struct Board {
    courses: Vec<Course>,
    editing_course_id: Option<String>,
    newly_added: Option<(String, Instant)>,
    active_course_id: Option<String>,
    editing_post_id: Option<String>,
    /// Title field of the quick-add form.
    pub quick_title: String,
}

impl Board {
    /// Replace the mirror with the server's collection.
    pub fn refresh(&mut self, api: &impl CourseApi) -> Result<(), ClientError> {
        self.courses = api.fetch_courses()?;
        Ok(())
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, id: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn course_being_edited(&self) -> Option<&Course> {
        self.editing_course_id
            .as_deref()
            .and_then(|id| self.course(id))
    }

    pub fn active_course(&self) -> Option<&Course> {
        self.active_course_id
            .as_deref()
            .and_then(|id| self.course(id))
    }

    pub fn post_being_edited(&self) -> Option<&Post> {
        let course = self.active_course()?;
        let id = self.editing_post_id.as_deref()?;
        course.posts.iter().find(|p| p.id == id)
    }

    /// The course whose "just added" highlight is still within its window.
    pub fn newly_added_course(&self, now: Instant) -> Option<&str> {
        self.newly_added
            .as_ref()
            .filter(|(_, since)| now.duration_since(*since) < NEW_COURSE_HIGHLIGHT)
            .map(|(id, _)| id.as_str())
    }

    pub fn start_course_edit(&mut self, id: &str) {
        self.editing_course_id = Some(id.to_string());
    }

    pub fn cancel_course_edit(&mut self) {
        self.editing_course_id = None;
    }

    /// Save the course form: update the course in edit mode, or create a
    /// new one. Returns `Ok(false)` when validation blocked the submission.
    pub fn save_course(
        &mut self,
        api: &impl CourseApi,
        form: &CourseForm,
    ) -> Result<bool, ClientError> {
        let Some(draft) = form.cleaned() else {
            return Ok(false);
        };

        if let Some(id) = self.editing_course_id.clone() {
            let patch = CoursePatch {
                title: Some(draft.title),
                description: Some(draft.description),
            };
            let updated = api.update_course(&id, &patch)?;
            if let Some(slot) = self.courses.iter_mut().find(|c| c.id == id) {
                *slot = updated;
            }
            self.editing_course_id = None;
            return Ok(true);
        }

        let created = api.create_course(&draft)?;
        self.newly_added = Some((created.id.clone(), Instant::now()));
        self.courses.insert(0, created);
        Ok(true)
    }

    /// Delete a course after explicit confirmation. Returns `Ok(false)` when
    /// the user declined.
    pub fn delete_course(
        &mut self,
        api: &impl CourseApi,
        prompt: &mut dyn Prompt,
        id: &str,
    ) -> Result<bool, ClientError> {
        if !prompt.confirm(CONFIRM_DELETE_COURSE) {
            return Ok(false);
        }
        api.delete_course(id)?;
        self.courses.retain(|c| c.id != id);
        if self.editing_course_id.as_deref() == Some(id) {
            self.editing_course_id = None;
        }
        if self.active_course_id.as_deref() == Some(id) {
            self.active_course_id = None;
            self.editing_post_id = None;
        }
        Ok(true)
    }

    /// Open the posts view for a course. Switching courses always drops any
    /// in-progress post edit.
    pub fn open_posts(&mut self, id: &str) {
        self.active_course_id = Some(id.to_string());
        self.editing_post_id = None;
    }

    pub fn close_posts(&mut self) {
        self.active_course_id = None;
        self.editing_post_id = None;
    }

    pub fn start_post_edit(&mut self, id: &str) {
        self.editing_post_id = Some(id.to_string());
    }

    pub fn cancel_post_edit(&mut self) {
        self.editing_post_id = None;
    }

    /// Save the post form inside the active course: update the post in edit
    /// mode, or create a new one. A no-op (`Ok(false)`) when no posts view
    /// is open or validation blocked the submission.
    pub fn save_post(
        &mut self,
        api: &impl CourseApi,
        form: &PostForm,
    ) -> Result<bool, ClientError> {
        let Some(course_id) = self.active_course_id.clone() else {
            return Ok(false);
        };
        let Some(draft) = form.cleaned() else {
            return Ok(false);
        };

        if let Some(post_id) = self.editing_post_id.clone() {
            let patch = PostPatch {
                title: Some(draft.title),
                image_url: Some(draft.image_url),
                description: Some(draft.description),
            };
            let updated = api.update_post(&course_id, &post_id, &patch)?;
            if let Some(course) = self.courses.iter_mut().find(|c| c.id == course_id) {
                if let Some(slot) = course.posts.iter_mut().find(|p| p.id == post_id) {
                    *slot = updated;
                }
            }
            self.editing_post_id = None;
            return Ok(true);
        }

        let created = api.create_post(&course_id, &draft)?;
        if let Some(course) = self.courses.iter_mut().find(|c| c.id == course_id) {
            course.posts.insert(0, created);
        }
        Ok(true)
    }

    /// Delete a post from the active course after confirmation. A no-op
    /// when no posts view is open; `Ok(false)` when declined.
    pub fn delete_post(
        &mut self,
        api: &impl CourseApi,
        prompt: &mut dyn Prompt,
        post_id: &str,
    ) -> Result<bool, ClientError> {
        let Some(course_id) = self.active_course_id.clone() else {
            return Ok(false);
        };
        if !prompt.confirm(CONFIRM_DELETE_POST) {
            return Ok(false);
        }
        api.delete_post(&course_id, post_id)?;
        if let Some(course) = self.courses.iter_mut().find(|c| c.id == course_id) {
            course.posts.retain(|p| p.id != post_id);
        }
        if self.editing_post_id.as_deref() == Some(post_id) {
            self.editing_post_id = None;
        }
        Ok(true)
    }

    /// Quick-add: create a course from the single title field with an empty
    /// description. Returns `Ok(false)` when the title is blank.
    pub fn quick_add(&mut self, api: &impl CourseApi) -> Result<bool, ClientError> {
        let form = CourseForm {
            title: self.quick_title.clone(),
            description: String::new(),
        };
        let Some(draft) = form.cleaned() else {
            return Ok(false);
        };
        let created = api.create_course(&draft)?;
        self.newly_added = Some((created.id.clone(), Instant::now()));
        self.courses.insert(0, created);
        self.quick_title.clear();
        Ok(true)
    }

    pub fn cancel_quick_add(&mut self) {
        self.quick_title.clear();
    }
}
