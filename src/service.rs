//! CRUD operations over the course collection.
//!
//! Every operation is whole-document read-modify-write: load the collection
//! from the database, locate the target records, apply the mutation, persist
//! the whole collection, and return the affected record. A failed write
//! fails the operation; the caller must not assume the mutation took effect.

use ulid::Ulid;

use crate::error::{ServiceError, ServiceResult};
use crate::storage::Database;
use crate::types::{Course, CourseDraft, CoursePatch, Post, PostDraft, PostPatch};

pub struct CourseService {
    db: Database,
}

impl CourseService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn list_courses(&self) -> Vec<Course> {
        self.db.read()
    }

    /// Create a course with a fresh id and an empty post list, prepended to
    /// the collection.
    pub fn create_course(&self, draft: CourseDraft) -> ServiceResult<Course> {
        let mut courses = self.db.read();
        let course = Course {
            id: Ulid::new().to_string(),
            title: draft.title,
            description: draft.description,
            posts: Vec::new(),
        };
        courses.insert(0, course.clone());
        self.db.write(&courses)?;
        Ok(course)
    }

    /// Merge `patch` into the course. The stored `id` and `posts` survive
    /// regardless of what the caller sent.
    pub fn update_course(&self, id: &str, patch: CoursePatch) -> ServiceResult<Course> {
        let mut courses = self.db.read();
        let course = courses
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| ServiceError::CourseNotFound(id.to_string()))?;
        if let Some(title) = patch.title {
            course.title = title;
        }
        if let Some(description) = patch.description {
            course.description = description;
        }
        let updated = course.clone();
        self.db.write(&courses)?;
        Ok(updated)
    }

    /// Remove the course and everything in it; returns the removed record
    /// with its posts still attached.
    pub fn delete_course(&self, id: &str) -> ServiceResult<Course> {
        let mut courses = self.db.read();
        let index = courses
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ServiceError::CourseNotFound(id.to_string()))?;
        let removed = courses.remove(index);
        self.db.write(&courses)?;
        Ok(removed)
    }

    /// Create a post with a fresh id, prepended to the course's post list.
    pub fn create_post(&self, course_id: &str, draft: PostDraft) -> ServiceResult<Post> {
        let mut courses = self.db.read();
        let course = courses
            .iter_mut()
            .find(|c| c.id == course_id)
            .ok_or_else(|| ServiceError::CourseNotFound(course_id.to_string()))?;
        let post = Post {
            id: Ulid::new().to_string(),
            title: draft.title,
            image_url: draft.image_url,
            description: draft.description,
        };
        course.posts.insert(0, post.clone());
        self.db.write(&courses)?;
        Ok(post)
    }

    /// Merge `patch` into the post. The stored post `id` survives.
    pub fn update_post(
        &self,
        course_id: &str,
        post_id: &str,
        patch: PostPatch,
    ) -> ServiceResult<Post> {
        let mut courses = self.db.read();
        let course = courses
            .iter_mut()
            .find(|c| c.id == course_id)
            .ok_or_else(|| ServiceError::CourseNotFound(course_id.to_string()))?;
        let post = course
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| ServiceError::PostNotFound(post_id.to_string()))?;
        if let Some(title) = patch.title {
            post.title = title;
        }
        if let Some(image_url) = patch.image_url {
            post.image_url = image_url;
        }
        if let Some(description) = patch.description {
            post.description = description;
        }
        let updated = post.clone();
        self.db.write(&courses)?;
        Ok(updated)
    }

    /// Remove the post from its course; the course itself stays.
    pub fn delete_post(&self, course_id: &str, post_id: &str) -> ServiceResult<Post> {
        let mut courses = self.db.read();
        let course = courses
            .iter_mut()
            .find(|c| c.id == course_id)
            .ok_or_else(|| ServiceError::CourseNotFound(course_id.to_string()))?;
        let index = course
            .posts
            .iter()
            .position(|p| p.id == post_id)
            .ok_or_else(|| ServiceError::PostNotFound(post_id.to_string()))?;
        let removed = course.posts.remove(index);
        self.db.write(&courses)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> (tempfile::TempDir, CourseService) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(dir.path().join("db.json"));
        (dir, CourseService::new(db))
    }

    fn draft(title: &str) -> CourseDraft {
        CourseDraft {
            title: title.to_string(),
            description: String::new(),
        }
    }

    fn post_draft(title: &str) -> PostDraft {
        PostDraft {
            title: title.to_string(),
            image_url: "https://example.com/img.png".to_string(),
            description: "notes".to_string(),
        }
    }

    #[test]
    fn created_course_is_empty_and_uniquely_identified() {
        let (_dir, svc) = service();
        let a = svc.create_course(draft("Biology")).unwrap();
        let b = svc.create_course(draft("Chemistry")).unwrap();

        assert!(a.posts.is_empty());
        assert!(b.posts.is_empty());
        assert_ne!(a.id, b.id);

        let listed = svc.list_courses();
        assert_eq!(listed.len(), 2);
        // Newest first.
        assert_eq!(listed[0].id, b.id);
        assert_eq!(listed[1].id, a.id);
    }

    #[test]
    fn update_course_preserves_id_and_posts() {
        let (_dir, svc) = service();
        let created = svc.create_course(draft("Biology")).unwrap();
        svc.create_post(&created.id, post_draft("cells")).unwrap();

        let updated = svc
            .update_course(
                &created.id,
                CoursePatch {
                    title: Some("Biology II".to_string()),
                    description: None,
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Biology II");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.posts.len(), 1);
    }

    #[test]
    fn update_unknown_course_signals_not_found() {
        let (_dir, svc) = service();
        svc.create_course(draft("Biology")).unwrap();
        let before = svc.list_courses();

        let err = svc
            .update_course("unknown-id", CoursePatch::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::CourseNotFound(_)));
        assert_eq!(svc.list_courses(), before);
    }

    #[test]
    fn delete_unknown_course_leaves_collection_unchanged() {
        let (_dir, svc) = service();
        svc.create_course(draft("Biology")).unwrap();
        let before = svc.list_courses();

        let err = svc.delete_course("unknown-id").unwrap_err();
        assert!(matches!(err, ServiceError::CourseNotFound(_)));
        assert_eq!(svc.list_courses(), before);
    }

    #[test]
    fn deleted_course_comes_back_with_its_posts() {
        let (_dir, svc) = service();
        let course = svc.create_course(draft("Biology")).unwrap();
        svc.create_post(&course.id, post_draft("cells")).unwrap();
        svc.create_post(&course.id, post_draft("mitosis")).unwrap();

        let removed = svc.delete_course(&course.id).unwrap();
        assert_eq!(removed.id, course.id);
        assert_eq!(removed.posts.len(), 2);
        assert!(svc.list_courses().is_empty());
    }

    #[test]
    fn create_post_prepends_to_its_course_only() {
        let (_dir, svc) = service();
        let target = svc.create_course(draft("Biology")).unwrap();
        let other = svc.create_course(draft("Chemistry")).unwrap();

        let first = svc.create_post(&target.id, post_draft("cells")).unwrap();
        let second = svc.create_post(&target.id, post_draft("mitosis")).unwrap();
        assert_ne!(first.id, second.id);

        let listed = svc.list_courses();
        let target_posts = &listed.iter().find(|c| c.id == target.id).unwrap().posts;
        assert_eq!(target_posts.len(), 2);
        assert_eq!(target_posts[0].id, second.id);
        assert_eq!(target_posts[1].id, first.id);

        let other_posts = &listed.iter().find(|c| c.id == other.id).unwrap().posts;
        assert!(other_posts.is_empty());
    }

    #[test]
    fn create_post_under_unknown_course_signals_not_found() {
        let (_dir, svc) = service();
        let err = svc.create_post("unknown-id", post_draft("cells")).unwrap_err();
        assert!(matches!(err, ServiceError::CourseNotFound(_)));
    }

    #[test]
    fn update_post_preserves_id() {
        let (_dir, svc) = service();
        let course = svc.create_course(draft("Biology")).unwrap();
        let post = svc.create_post(&course.id, post_draft("cells")).unwrap();

        let updated = svc
            .update_post(
                &course.id,
                &post.id,
                PostPatch {
                    title: Some("cells, revised".to_string()),
                    image_url: None,
                    description: None,
                },
            )
            .unwrap();

        assert_eq!(updated.id, post.id);
        assert_eq!(updated.title, "cells, revised");
        assert_eq!(updated.image_url, post.image_url);
    }

    #[test]
    fn update_unknown_post_signals_post_not_found() {
        let (_dir, svc) = service();
        let course = svc.create_course(draft("Biology")).unwrap();

        let err = svc
            .update_post(&course.id, "unknown-id", PostPatch::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::PostNotFound(_)));
    }

    #[test]
    fn delete_post_keeps_the_course() {
        let (_dir, svc) = service();
        let course = svc.create_course(draft("Biology")).unwrap();
        let post = svc.create_post(&course.id, post_draft("cells")).unwrap();

        let removed = svc.delete_post(&course.id, &post.id).unwrap();
        assert_eq!(removed.id, post.id);

        let listed = svc.list_courses();
        assert_eq!(listed.len(), 1);
        assert!(listed[0].posts.is_empty());
    }
}
