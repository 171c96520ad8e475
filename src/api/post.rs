use crate::aggregate::{view_and_load, PostDetailOutput, PostSummaryOutput};
use crate::api::{required, APIError, API};
use crate::db_conn::Db;
use crate::models::*;
use rocket::http::Status;
use rocket::serde::{json::Json, Deserialize};

const TITLE_MAX_LEN: usize = 80;

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct PostInput {
    title: Option<String>,
    content: Option<String>,
}

impl PostInput {
    fn validate(self) -> API<(String, String)> {
        let title = required("title", self.title)?;
        if title.chars().count() > TITLE_MAX_LEN {
            return Err(APIError::Validation(format!(
                "title is longer than {} characters",
                TITLE_MAX_LEN
            )));
        }
        Ok((title, required("content", self.content)?))
    }
}

#[post("/create", data = "<pi>")]
pub async fn publish_post(pi: Json<PostInput>, db: Db) -> API<Status> {
    let (title, content) = pi.into_inner().validate()?;
    let p = db.run(move |c| Post::create(c, &title, &content)).await?;
    info!("post {} created", p.id);
    Ok(Status::Created)
}

#[get("/create")]
pub fn publish_post_get() -> Status {
    Status::MethodNotAllowed
}

#[get("/post-list")]
pub async fn get_list(db: Db) -> API<Json<Vec<PostSummaryOutput>>> {
    let ps = db.run(|c| Post::list(c)).await?;
    Ok(Json(ps.into_iter().map(PostSummaryOutput::from).collect()))
}

#[get("/<post_id>")]
pub async fn get_one(post_id: i32, db: Db) -> API<Json<PostDetailOutput>> {
    let detail = db.run(move |c| view_and_load(c, post_id)).await?;
    Ok(Json(detail))
}
