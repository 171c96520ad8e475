use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::Header;
use rocket::{Request, Response};
use std::env;
use std::path::PathBuf;

pub struct Cors {
    pub whitelist: Vec<String>,
}

impl Cors {
    /// Reads `FRONTEND_WHITELIST`, comma separated; `*` (the default) allows any origin.
    pub fn from_env() -> Self {
        Cors {
            whitelist: env::var("FRONTEND_WHITELIST")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    fn allows(&self, origin: &str) -> bool {
        self.whitelist.iter().any(|o| o == "*" || o == origin)
    }
}

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, request: &'r Request<'_>, response: &mut Response<'r>) {
        if let Some(origin) = request
            .headers()
            .get_one("Origin")
            .and_then(|origin| self.allows(origin).then(|| origin))
        {
            response.set_header(Header::new(
                "Access-Control-Allow-Origin",
                origin.to_string(),
            ));
            response.set_header(Header::new(
                "Access-Control-Allow-Methods",
                "POST, GET, OPTIONS",
            ));
            response.set_header(Header::new("Access-Control-Allow-Headers", "Content-Type"));
        }
    }
}

#[options("/<_path..>")]
pub async fn options_handler(_path: PathBuf) {}
