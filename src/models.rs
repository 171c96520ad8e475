use chrono::{NaiveDateTime, SubsecRound, Utc};
use diesel::{insert_into, ExpressionMethods, QueryDsl, RunQueryDsl};

use crate::db_conn::Conn;
use crate::schema::*;

pub type MR<T> = Result<T, diesel::result::Error>;

no_arg_sql_function!(
    last_insert_rowid,
    diesel::sql_types::Integer,
    "Represents the sql last_insert_rowid() function"
);

macro_rules! get {
    ($table:ident) => {
        pub fn get(conn: &Conn, id: i32) -> MR<Self> {
            $table::table.find(id).first(conn)
        }
    };
}

macro_rules! create {
    ($table:ident, $new:expr, $conn:expr) => {{
        insert_into($table::table).values(&$new).execute($conn)?;
        // sqlite has no RETURNING here, read the row back on the same connection
        let id = diesel::select(last_insert_rowid).get_result::<i32>($conn)?;
        Self::get($conn, id)
    }};
}

/// Creation time of a new row: UTC, whole seconds.
fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

#[derive(Queryable, Identifiable, Debug, Clone)]
#[table_name = "posts"]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    pub views: i32,
}

#[derive(Insertable)]
#[table_name = "posts"]
struct NewPost<'a> {
    title: &'a str,
    content: &'a str,
    created_at: NaiveDateTime,
}

impl Post {
    get!(posts);

    pub fn create(conn: &Conn, title: &str, content: &str) -> MR<Self> {
        let new_post = NewPost {
            title,
            content,
            created_at: now(),
        };
        create!(posts, new_post, conn)
    }

    pub fn list(conn: &Conn) -> MR<Vec<Self>> {
        posts::table.order(posts::id.asc()).load(conn)
    }

    /// Bumps the view counter in place; a missing post is `NotFound`.
    pub fn add_view(conn: &Conn, id: i32) -> MR<()> {
        let n = diesel::update(posts::table.find(id))
            .set(posts::views.eq(posts::views + 1))
            .execute(conn)?;
        match n {
            0 => Err(diesel::result::Error::NotFound),
            _ => Ok(()),
        }
    }
}

#[derive(Queryable, Identifiable, Associations, Debug, Clone)]
#[belongs_to(Post)]
#[table_name = "comments"]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "comments"]
struct NewComment<'a> {
    post_id: i32,
    content: &'a str,
    created_at: NaiveDateTime,
}

impl Comment {
    get!(comments);

    pub fn create(conn: &Conn, post_id: i32, content: &str) -> MR<Self> {
        let p = Post::get(conn, post_id)?;
        let new_comment = NewComment {
            post_id: p.id,
            content,
            created_at: now(),
        };
        create!(comments, new_comment, conn)
    }

    pub fn gets_by_post_id(conn: &Conn, post_id: i32) -> MR<Vec<Self>> {
        comments::table
            .filter(comments::post_id.eq(post_id))
            .order(comments::id.asc())
            .load(conn)
    }
}

#[derive(Queryable, Identifiable, Associations, Debug, Clone)]
#[belongs_to(Comment)]
#[table_name = "nested_comments"]
pub struct NestedComment {
    pub id: i32,
    pub comment_id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "nested_comments"]
struct NewNestedComment<'a> {
    comment_id: i32,
    content: &'a str,
    created_at: NaiveDateTime,
}

impl NestedComment {
    get!(nested_comments);

    pub fn create(conn: &Conn, comment_id: i32, content: &str) -> MR<Self> {
        let c = Comment::get(conn, comment_id)?;
        let new_nested = NewNestedComment {
            comment_id: c.id,
            content,
            created_at: now(),
        };
        create!(nested_comments, new_nested, conn)
    }

    pub fn owning_post_id(&self, conn: &Conn) -> MR<i32> {
        comments::table
            .find(self.comment_id)
            .select(comments::post_id)
            .first(conn)
    }
}

#[derive(Queryable, Identifiable, Associations, Debug, Clone)]
#[belongs_to(NestedComment)]
#[table_name = "last_comments"]
pub struct LastComment {
    pub id: i32,
    pub nested_comment_id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "last_comments"]
struct NewLastComment<'a> {
    nested_comment_id: i32,
    content: &'a str,
    created_at: NaiveDateTime,
}

impl LastComment {
    get!(last_comments);

    pub fn create(conn: &Conn, nested_comment_id: i32, content: &str) -> MR<Self> {
        let nc = NestedComment::get(conn, nested_comment_id)?;
        let new_last = NewLastComment {
            nested_comment_id: nc.id,
            content,
            created_at: now(),
        };
        create!(last_comments, new_last, conn)
    }

    pub fn owning_post_id(&self, conn: &Conn) -> MR<i32> {
        nested_comments::table
            .inner_join(comments::table)
            .filter(nested_comments::id.eq(self.nested_comment_id))
            .select(comments::post_id)
            .first(conn)
    }
}

#[derive(Queryable, Identifiable, Associations, Debug, Clone)]
#[belongs_to(Post)]
#[table_name = "open_graphs"]
pub struct OpenGraph {
    pub id: i32,
    pub post_id: i32,
}

// no route reads link previews yet
#[allow(dead_code)]
impl OpenGraph {
    get!(open_graphs);

    pub fn gets_by_post_id(conn: &Conn, post_id: i32) -> MR<Vec<Self>> {
        open_graphs::table
            .filter(open_graphs::post_id.eq(post_id))
            .order(open_graphs::id.asc())
            .load(conn)
    }
}
