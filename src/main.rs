#[macro_use]
extern crate rocket;

#[macro_use]
extern crate diesel;

#[macro_use]
extern crate diesel_migrations;

mod aggregate;
mod api;
mod cors;
mod db_conn;
mod models;
mod schema;


use cors::Cors;
use db_conn::Db;
use rocket::fairing::{self, AdHoc};
use rocket::{Build, Rocket};

embed_migrations!("migrations");

#[launch]
fn rocket() -> _ {
    load_env();
    build(rocket::build())
}

fn build(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount(
            "/api",
            routes![
                api::post::publish_post,
                api::post::publish_post_get,
                api::post::get_list,
                api::post::get_one,
                api::comment::add_comment,
                api::comment::add_nested_comment,
                api::comment::add_last_comment,
                api::comment::add_reply_get,
                api::socket::echo,
            ],
        )
        .mount("/", routes![cors::options_handler])
        .register(
            "/",
            catchers![
                api::catch_400_error,
                api::catch_404_error,
                api::catch_405_error,
                api::catch_422_error,
                api::catch_500_error,
            ],
        )
        .attach(Db::fairing())
        .attach(AdHoc::try_on_ignite("Diesel Migrations", run_migrations))
        .attach(Cors::from_env())
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    let db = match Db::get_one(&rocket).await {
        Some(db) => db,
        None => {
            error!("no database connection for migrations");
            return Err(rocket);
        }
    };
    match db.run(|c| embedded_migrations::run(c)).await {
        Ok(()) => Ok(rocket),
        Err(e) => {
            error!("failed to run database migrations: {}", e);
            Err(rocket)
        }
    }
}

fn load_env() {
    match dotenv::dotenv() {
        Ok(path) => eprintln!("Configuration read from {}", path.display()),
        Err(ref e) if e.not_found() => eprintln!("Warning: no .env was found"),
        Err(e) => eprintln!("Warning: .env could not be read: {}", e),
    }
}
