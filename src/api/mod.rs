use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder};
use rocket::serde::json::{json, Value};
use rocket::serde::Deserialize;

fn error_body(req: &Request, code: u16, msg: &str) -> Value {
    warn!("{} {} -> {}", req.method(), req.uri(), code);
    json!({
        "code": -1,
        "msg": msg
    })
}

#[catch(400)]
pub fn catch_400_error(req: &Request) -> Value {
    error_body(req, 400, "bad request")
}

#[catch(404)]
pub fn catch_404_error(req: &Request) -> Value {
    error_body(req, 404, "not found")
}

#[catch(405)]
pub fn catch_405_error(req: &Request) -> Value {
    error_body(req, 405, "method not allowed")
}

#[catch(422)]
pub fn catch_422_error(req: &Request) -> Value {
    error_body(req, 422, "malformed json body")
}

#[catch(500)]
pub fn catch_500_error(req: &Request) -> Value {
    error_body(req, 500, "internal error")
}

pub enum APIError {
    NotFound,
    Validation(String),
    DbError(diesel::result::Error),
}

impl From<diesel::result::Error> for APIError {
    fn from(err: diesel::result::Error) -> APIError {
        match err {
            diesel::result::Error::NotFound => APIError::NotFound,
            e => APIError::DbError(e),
        }
    }
}

impl<'r> Responder<'r, 'static> for APIError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let (status, msg) = match self {
            APIError::NotFound => (Status::NotFound, "not found".to_string()),
            APIError::Validation(msg) => (Status::BadRequest, msg),
            APIError::DbError(e) => {
                error!("database error on {}: {}", req.uri(), e);
                (Status::InternalServerError, e.to_string())
            }
        };
        (
            status,
            json!({
                "code": -1,
                "msg": msg
            }),
        )
            .respond_to(req)
    }
}

pub type API<T> = Result<T, APIError>;

/// Body of every comment-level create call.
#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ContentInput {
    content: Option<String>,
}

impl ContentInput {
    pub fn into_content(self) -> API<String> {
        required("content", self.content)
    }
}

fn required(field: &str, value: Option<String>) -> API<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(APIError::Validation(format!("{} is required", field))),
    }
}

pub mod comment;
pub mod post;
pub mod socket;
