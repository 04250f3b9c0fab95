use serde::{Deserialize, Serialize};

/// A top-level course record owning an ordered list of posts, newest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub posts: Vec<Post>,
}

/// A titled, described, image-bearing item nested under exactly one course.
/// The image is an inline data URL or a plain link.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `POST /courses`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CourseDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `PUT /courses/:id`. Absent fields leave the stored value alone;
/// `id` and `posts` cannot be expressed here at all.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CoursePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of `POST /courses/:id/posts`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PostDraft {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "imageUrl", default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
}

/// Body of `PUT /courses/:courseId/posts/:postId`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body of a successful `DELETE /courses/:id`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeletedCourse {
    pub message: String,
    pub course: Course,
}

/// Body of a successful `DELETE /courses/:courseId/posts/:postId`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeletedPost {
    pub message: String,
    pub post: Post,
}
