//! REST surface of the course service.
//!
//! Routes, status codes, and body shapes:
//!
//! - `GET    /courses`                          -> 200 course array
//! - `POST   /courses`                          -> 201 created course
//! - `PUT    /courses/:id`                      -> 200 updated course | 404
//! - `DELETE /courses/:id`                      -> 200 {message, course} | 404
//! - `POST   /courses/:id/posts`                -> 201 created post | 404
//! - `PUT    /courses/:cid/posts/:pid`          -> 200 updated post | 404
//! - `DELETE /courses/:cid/posts/:pid`          -> 200 {message, post} | 404
//!
//! Persistence failures map to 500, malformed JSON bodies to 400. Error
//! bodies are `{"error": "<message>"}`. Every response carries permissive
//! CORS headers so a browser client on another origin can talk to it.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE, HeaderValue,
};
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::net::TcpListener;

use crate::error::ServiceError;
use crate::service::CourseService;
use crate::storage::StorageError;
use crate::types::{CourseDraft, CoursePatch, DeletedCourse, DeletedPost, PostDraft, PostPatch};

/// Bind and serve until the process is stopped.
pub async fn serve(
    addr: SocketAddr,
    service: CourseService,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let service = Arc::new(service);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("course service listening on http://{addr}");

    loop {
        let (stream, _) = match listener.accept().await {
            Ok(conn) => conn,
            Err(err) => {
                tracing::warn!("accept error: {err}");
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let service = service.clone();
        tokio::spawn(async move {
            let handler = service_fn(move |req| handle(req, service.clone()));
            if let Err(err) = Builder::new(TokioExecutor::default())
                .serve_connection(io, handler)
                .await
            {
                tracing::warn!("connection error: {err}");
            }
        });
    }
}

async fn handle(
    req: Request<Incoming>,
    service: Arc<CourseService>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    if req.method() == Method::OPTIONS {
        return Ok(preflight());
    }

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            tracing::warn!("failed to read request body: {err}");
            return Ok(error_response(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ));
        }
    };

    let response = dispatch(&method, &path, body, service).await;
    tracing::debug!("{method} {path} -> {}", response.status());
    Ok(response)
}

/// Route table. Split out of [`handle`] so tests can drive it without a
/// live connection.
async fn dispatch(
    method: &Method,
    path: &str,
    body: Bytes,
    service: Arc<CourseService>,
) -> Response<Full<Bytes>> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["courses"]) => {
            let courses = run(service, |svc| Ok(svc.list_courses())).await;
            match courses {
                Ok(courses) => json_response(StatusCode::OK, &courses),
                Err(err) => failure(err, "Failed to retrieve courses"),
            }
        }

        ("POST", ["courses"]) => {
            let draft: CourseDraft = match parse_body(&body) {
                Ok(draft) => draft,
                Err(response) => return response,
            };
            match run(service, move |svc| svc.create_course(draft)).await {
                Ok(course) => json_response(StatusCode::CREATED, &course),
                Err(err) => failure(err, "Failed to save course"),
            }
        }

        ("PUT", ["courses", id]) => {
            let patch: CoursePatch = match parse_body(&body) {
                Ok(patch) => patch,
                Err(response) => return response,
            };
            let id = id.to_string();
            match run(service, move |svc| svc.update_course(&id, patch)).await {
                Ok(course) => json_response(StatusCode::OK, &course),
                Err(err) => failure(err, "Failed to update course"),
            }
        }

        ("DELETE", ["courses", id]) => {
            let id = id.to_string();
            match run(service, move |svc| svc.delete_course(&id)).await {
                Ok(course) => json_response(
                    StatusCode::OK,
                    &DeletedCourse {
                        message: "Course deleted successfully".to_string(),
                        course,
                    },
                ),
                Err(err) => failure(err, "Failed to delete course"),
            }
        }

        ("POST", ["courses", id, "posts"]) => {
            let draft: PostDraft = match parse_body(&body) {
                Ok(draft) => draft,
                Err(response) => return response,
            };
            let id = id.to_string();
            match run(service, move |svc| svc.create_post(&id, draft)).await {
                Ok(post) => json_response(StatusCode::CREATED, &post),
                Err(err) => failure(err, "Failed to save post"),
            }
        }

        ("PUT", ["courses", course_id, "posts", post_id]) => {
            let patch: PostPatch = match parse_body(&body) {
                Ok(patch) => patch,
                Err(response) => return response,
            };
            let course_id = course_id.to_string();
            let post_id = post_id.to_string();
            match run(service, move |svc| svc.update_post(&course_id, &post_id, patch)).await {
                Ok(post) => json_response(StatusCode::OK, &post),
                Err(err) => failure(err, "Failed to update post"),
            }
        }

        ("DELETE", ["courses", course_id, "posts", post_id]) => {
            let course_id = course_id.to_string();
            let post_id = post_id.to_string();
            match run(service, move |svc| svc.delete_post(&course_id, &post_id)).await {
                Ok(post) => json_response(
                    StatusCode::OK,
                    &DeletedPost {
                        message: "Post deleted successfully".to_string(),
                        post,
                    },
                ),
                Err(err) => failure(err, "Failed to delete post"),
            }
        }

        _ => error_response(StatusCode::NOT_FOUND, "Not found"),
    }
}

/// Run a service operation on the blocking pool; every operation touches
/// the database file.
async fn run<T, F>(service: Arc<CourseService>, op: F) -> Result<T, ServiceError>
where
    T: Send + 'static,
    F: FnOnce(&CourseService) -> Result<T, ServiceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(move || op(&service)).await {
        Ok(result) => result,
        Err(err) => Err(ServiceError::Storage(StorageError::Io(
            std::io::Error::other(format!("spawn_blocking failed: {err}")),
        ))),
    }
}

/// An empty body falls back to the payload type's defaults, matching the
/// original service's lenient body handling.
fn parse_body<T>(body: &Bytes) -> Result<T, Response<Full<Bytes>>>
where
    T: DeserializeOwned + Default,
{
    if body.is_empty() {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        tracing::warn!("rejecting malformed JSON body: {err}");
        error_response(StatusCode::BAD_REQUEST, "Invalid JSON body")
    })
}

fn failure(err: ServiceError, persistence_message: &str) -> Response<Full<Bytes>> {
    match err {
        ServiceError::CourseNotFound(_) => {
            error_response(StatusCode::NOT_FOUND, "Course not found")
        }
        ServiceError::PostNotFound(_) => error_response(StatusCode::NOT_FOUND, "Post not found"),
        ServiceError::Storage(err) => {
            tracing::error!("persistence failure: {err}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, persistence_message)
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(value).unwrap_or_default();
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    with_cors(response)
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &json!({ "error": message }))
}

fn preflight() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = StatusCode::NO_CONTENT;
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    with_cors(response)
}

fn with_cors(mut response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
    response
        .headers_mut()
        .insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    response
}
