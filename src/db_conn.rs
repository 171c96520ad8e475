use rocket_sync_db_pools::{database, diesel};

pub type Conn = diesel::SqliteConnection;

#[database("blog_db")]
pub struct Db(Conn);
