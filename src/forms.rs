//! Form values and the client-side validation gate.
//!
//! Validation failures never produce a request: `cleaned()` returns `None`
//! and the intent is dropped before the service layer sees it.

use crate::types::{Course, CourseDraft, Post, PostDraft};

/// Course form: title required, description optional.
#[derive(Clone, Debug, Default)]
pub struct CourseForm {
    pub title: String,
    pub description: String,
}

impl CourseForm {
    /// Pre-fill from the course being edited.
    pub fn prefilled(course: &Course) -> Self {
        Self {
            title: course.title.clone(),
            description: course.description.clone(),
        }
    }

    /// Trimmed payload, or `None` when the required title is missing.
    pub fn cleaned(&self) -> Option<CourseDraft> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        Some(CourseDraft {
            title: title.to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// Post form: title, image, and description are all required.
#[derive(Clone, Debug, Default)]
pub struct PostForm {
    pub title: String,
    pub image_url: String,
    pub description: String,
}

impl PostForm {
    pub fn prefilled(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            image_url: post.image_url.clone(),
            description: post.description.clone(),
        }
    }

    /// Trimmed payload, or `None` when any required field is missing.
    pub fn cleaned(&self) -> Option<PostDraft> {
        let title = self.title.trim();
        let image_url = self.image_url.trim();
        let description = self.description.trim();
        if title.is_empty() || image_url.is_empty() || description.is_empty() {
            return None;
        }
        Some(PostDraft {
            title: title.to_string(),
            image_url: image_url.to_string(),
            description: description.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_form_requires_a_title() {
        let form = CourseForm {
            title: "   ".to_string(),
            description: "anything".to_string(),
        };
        assert!(form.cleaned().is_none());
    }

    #[test]
    fn course_form_trims_fields() {
        let form = CourseForm {
            title: "  Biology ".to_string(),
            description: " intro \n".to_string(),
        };
        let draft = form.cleaned().unwrap();
        assert_eq!(draft.title, "Biology");
        assert_eq!(draft.description, "intro");
    }

    #[test]
    fn course_description_is_optional() {
        let form = CourseForm {
            title: "Biology".to_string(),
            description: String::new(),
        };
        assert!(form.cleaned().is_some());
    }

    #[test]
    fn post_form_requires_every_field() {
        let mut form = PostForm {
            title: "cells".to_string(),
            image_url: "data:image/png;base64,AAAA".to_string(),
            description: "notes".to_string(),
        };
        assert!(form.cleaned().is_some());

        form.image_url = "  ".to_string();
        assert!(form.cleaned().is_none());

        form.image_url = "data:image/png;base64,AAAA".to_string();
        form.description = String::new();
        assert!(form.cleaned().is_none());
    }
}
