use crate::aggregate::{
    comment_and_reload, last_comment_and_reload, nested_comment_and_reload, CommentOutput,
};
use crate::api::{ContentInput, API};
use crate::db_conn::Db;
use rocket::http::Status;
use rocket::serde::json::Json;

type TreeAPI = API<Json<Vec<CommentOutput>>>;

#[post("/comment/<post_id>/comment-create", data = "<ci>")]
pub async fn add_comment(post_id: i32, ci: Json<ContentInput>, db: Db) -> TreeAPI {
    let content = ci.into_inner().into_content()?;
    let cs = db
        .run(move |c| comment_and_reload(c, post_id, &content))
        .await?;
    Ok(Json(cs))
}

#[post("/nestedComment/<comment_id>/nestedComment-create", data = "<ci>")]
pub async fn add_nested_comment(comment_id: i32, ci: Json<ContentInput>, db: Db) -> TreeAPI {
    let content = ci.into_inner().into_content()?;
    let cs = db
        .run(move |c| nested_comment_and_reload(c, comment_id, &content))
        .await?;
    Ok(Json(cs))
}

#[post("/lastComment/<nested_comment_id>/lastComment-create", data = "<ci>")]
pub async fn add_last_comment(
    nested_comment_id: i32,
    ci: Json<ContentInput>,
    db: Db,
) -> TreeAPI {
    let content = ci.into_inner().into_content()?;
    let cs = db
        .run(move |c| last_comment_and_reload(c, nested_comment_id, &content))
        .await?;
    Ok(Json(cs))
}

/// GET on any reply-create path; other three-segment paths stay 404.
#[get("/<_>/<_>/<action>")]
pub fn add_reply_get(action: &str) -> Status {
    match action {
        "comment-create" | "nestedComment-create" | "lastComment-create" => {
            Status::MethodNotAllowed
        }
        _ => Status::NotFound,
    }
}
