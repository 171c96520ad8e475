//! Rebuilds the reply tree of a post from storage.
//!
//! The tree is loaded level by level with one query per level, so a post costs
//! four round trips no matter how many replies it has. The `*_and_reload`
//! writers run the insert and the reload in one transaction, so a response is
//! a consistent snapshot.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::associations::GroupedBy;
use diesel::query_dsl::BelongingToDsl;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::serde::Serialize;

use crate::db_conn::Conn;
use crate::models::*;
use crate::schema::*;

#[derive(Serialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct LastCommentOutput {
    pub id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct NestedCommentOutput {
    pub id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
    #[serde(rename = "lastComments")]
    pub last_comments: Vec<LastCommentOutput>,
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(crate = "rocket::serde")]
pub struct CommentOutput {
    pub id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
    #[serde(rename = "nestedComments")]
    pub nested_comments: Vec<NestedCommentOutput>,
}

/// A post as shown in the list, without its tree.
#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct PostSummaryOutput {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Debug)]
#[serde(crate = "rocket::serde")]
pub struct PostDetailOutput {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub views: i32,
    pub comments: Vec<CommentOutput>,
}

impl From<Post> for PostSummaryOutput {
    fn from(p: Post) -> Self {
        PostSummaryOutput {
            id: p.id,
            title: p.title,
            content: p.content,
            created_at: p.created_at,
        }
    }
}

fn lc2output(lc: LastComment) -> LastCommentOutput {
    LastCommentOutput {
        id: lc.id,
        content: lc.content,
        created_at: lc.created_at,
    }
}

/// Assembles loaded rows into the output tree.
///
/// `ncs` is aligned with `cs` (one group per comment); `lcs` maps a nested
/// comment id to its last comments. Order inside every group is kept.
pub fn build_tree(
    cs: Vec<Comment>,
    ncs: Vec<Vec<NestedComment>>,
    mut lcs: HashMap<i32, Vec<LastComment>>,
) -> Vec<CommentOutput> {
    cs.into_iter()
        .zip(ncs)
        .map(|(c, group)| CommentOutput {
            id: c.id,
            content: c.content,
            created_at: c.created_at,
            nested_comments: group
                .into_iter()
                .map(|nc| NestedCommentOutput {
                    last_comments: lcs
                        .remove(&nc.id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(lc2output)
                        .collect(),
                    id: nc.id,
                    content: nc.content,
                    created_at: nc.created_at,
                })
                .collect(),
        })
        .collect()
}

/// Every comment subtree of a post, in insertion order at each level.
pub fn load_comment_tree(conn: &Conn, post_id: i32) -> MR<Vec<CommentOutput>> {
    let cs = Comment::gets_by_post_id(conn, post_id)?;
    let ncs = NestedComment::belonging_to(&cs)
        .order(nested_comments::id.asc())
        .load::<NestedComment>(conn)?;
    let lcs = LastComment::belonging_to(&ncs)
        .order(last_comments::id.asc())
        .load::<LastComment>(conn)?
        .grouped_by(&ncs);
    log::debug!(
        "post {}: {} comments, {} nested, {} last",
        post_id,
        cs.len(),
        ncs.len(),
        lcs.iter().map(Vec::len).sum::<usize>()
    );

    let lcs_by_nc = ncs.iter().map(|nc| nc.id).zip(lcs).collect();
    let ncs = ncs.grouped_by(&cs);
    Ok(build_tree(cs, ncs, lcs_by_nc))
}

pub fn load_post_detail(conn: &Conn, post_id: i32) -> MR<PostDetailOutput> {
    let p = Post::get(conn, post_id)?;
    let comments = load_comment_tree(conn, p.id)?;
    Ok(PostDetailOutput {
        id: p.id,
        title: p.title,
        content: p.content,
        created_at: p.created_at,
        views: p.views,
        comments,
    })
}

// Every write below opens with BEGIN IMMEDIATE: the parent lookup must not
// hold a read snapshot that a concurrent commit would make stale before the
// insert takes the write lock.

/// Counts one view and returns the post with its tree.
pub fn view_and_load(conn: &Conn, post_id: i32) -> MR<PostDetailOutput> {
    conn.immediate_transaction(|| {
        Post::add_view(conn, post_id)?;
        load_post_detail(conn, post_id)
    })
}

pub fn comment_and_reload(conn: &Conn, post_id: i32, content: &str) -> MR<Vec<CommentOutput>> {
    conn.immediate_transaction(|| {
        let cm = Comment::create(conn, post_id, content)?;
        log::info!("comment {} created under post {}", cm.id, cm.post_id);
        load_comment_tree(conn, cm.post_id)
    })
}

pub fn nested_comment_and_reload(
    conn: &Conn,
    comment_id: i32,
    content: &str,
) -> MR<Vec<CommentOutput>> {
    conn.immediate_transaction(|| {
        let nc = NestedComment::create(conn, comment_id, content)?;
        log::info!("nested comment {} created under comment {}", nc.id, nc.comment_id);
        load_comment_tree(conn, nc.owning_post_id(conn)?)
    })
}

pub fn last_comment_and_reload(
    conn: &Conn,
    nested_comment_id: i32,
    content: &str,
) -> MR<Vec<CommentOutput>> {
    conn.immediate_transaction(|| {
        let lc = LastComment::create(conn, nested_comment_id, content)?;
        log::info!(
            "last comment {} created under nested comment {}",
            lc.id,
            lc.nested_comment_id
        );
        load_comment_tree(conn, lc.owning_post_id(conn)?)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rocket::serde::json::{json, serde_json};

    fn ts(sec: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 16)
            .and_then(|d| d.and_hms_opt(8, 30, sec))
            .unwrap()
    }

    fn comment(id: i32) -> Comment {
        Comment {
            id,
            post_id: 1,
            content: format!("c{}", id),
            created_at: ts(0),
        }
    }

    fn nested(id: i32, comment_id: i32) -> NestedComment {
        NestedComment {
            id,
            comment_id,
            content: format!("n{}", id),
            created_at: ts(1),
        }
    }

    fn last(id: i32, nested_comment_id: i32) -> LastComment {
        LastComment {
            id,
            nested_comment_id,
            content: format!("l{}", id),
            created_at: ts(2),
        }
    }

    #[test]
    fn no_comments_gives_empty_tree() {
        assert!(build_tree(vec![], vec![], HashMap::new()).is_empty());
    }

    #[test]
    fn last_comments_stay_under_their_nested_comment() {
        let cs = vec![comment(1), comment(2)];
        let ncs = vec![vec![nested(10, 1), nested(11, 1)], vec![]];
        let lcs = HashMap::from([(11, vec![last(100, 11), last(101, 11)])]);

        let tree = build_tree(cs, ncs, lcs);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].nested_comments.len(), 2);
        assert!(tree[0].nested_comments[0].last_comments.is_empty());
        let ids: Vec<i32> = tree[0].nested_comments[1]
            .last_comments
            .iter()
            .map(|lc| lc.id)
            .collect();
        assert_eq!(ids, vec![100, 101]);
        assert!(tree[1].nested_comments.is_empty());
    }

    #[test]
    fn serializes_with_camel_case_children_and_iso_timestamps() {
        let tree = build_tree(
            vec![comment(1)],
            vec![vec![nested(2, 1)]],
            HashMap::from([(2, vec![last(3, 2)])]),
        );
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!([{
                "id": 1,
                "content": "c1",
                "created_at": "2026-10-16T08:30:00",
                "nestedComments": [{
                    "id": 2,
                    "content": "n2",
                    "created_at": "2026-10-16T08:30:01",
                    "lastComments": [{
                        "id": 3,
                        "content": "l3",
                        "created_at": "2026-10-16T08:30:02",
                    }],
                }],
            }])
        );
    }
}
