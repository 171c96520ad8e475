use rocket::serde::json::{Json, Value};

/// Generic event channel: logs one message and sends it straight back.
///
/// Nothing is broadcast and no other route publishes here.
#[post("/socket/<event>", data = "<msg>")]
pub fn echo(event: &str, msg: Json<Value>) -> Json<Value> {
    info!("received {} event: {}", event, msg.0);
    msg
}
