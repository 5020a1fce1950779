use std::net::SocketAddr;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tempfile::TempDir;
use uuid::Uuid;

use galleria::config::{Config, DEFAULT_RESET_TTL_MINUTES};

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01\x08\x06\0\0\0\x1f\x15\xc4\x89";
pub const GIF: &[u8] = b"GIF89a\x01\0\x01\0\x80\0\0\0\0\0\xff\xff\xff!\xf9\x04\x01\0\0\0\0";

/// A running test server instance with a dedicated test database and image
/// directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: PgPool,
    pub client: Client,
    pub db_name: String,
    pub images: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/signup"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("sign up request failed")
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Response {
        self.client
            .post(self.url("/signin"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .expect("sign in request failed")
    }

    /// Sign up a fresh account and return its session token.
    pub async fn signed_up(&self, email: &str) -> String {
        let resp = self.sign_up(email, "secret").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "sign up did not redirect");
        session_cookie(&resp).expect("sign up did not set a session cookie")
    }

    pub async fn get(&self, path: &str, session: Option<&str>) -> Response {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = session {
            req = req.header("cookie", format!("session={token}"));
        }
        req.send().await.expect("get request failed")
    }

    pub async fn post_form(&self, path: &str, session: Option<&str>, form: &[(&str, &str)]) -> Response {
        let mut req = self.client.post(self.url(path)).form(form);
        if let Some(token) = session {
            req = req.header("cookie", format!("session={token}"));
        }
        req.send().await.expect("post request failed")
    }

    /// Create a gallery and return its id, taken from the edit redirect.
    pub async fn create_gallery(&self, session: &str, title: &str) -> i64 {
        let resp = self.post_form("/galleries", Some(session), &[("title", title)]).await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "create gallery did not redirect");
        let location = location(&resp);
        location
            .strip_prefix("/galleries/")
            .and_then(|rest| rest.strip_suffix("/edit"))
            .and_then(|id| id.parse().ok())
            .unwrap_or_else(|| panic!("unexpected redirect: {location}"))
    }

    pub async fn publish(&self, session: &str, gallery_id: i64, title: &str) -> Response {
        self.post_form(
            &format!("/galleries/{gallery_id}/edit"),
            Some(session),
            &[("title", title), ("visibility", "public")],
        )
        .await
    }

    pub async fn upload(
        &self,
        session: &str,
        gallery_id: i64,
        files: &[(&str, &'static [u8])],
    ) -> Response {
        let mut form = Form::new();
        for (name, contents) in files {
            form = form.part("images", Part::bytes(*contents).file_name(name.to_string()));
        }
        self.client
            .post(self.url(&format!("/galleries/{gallery_id}/images")))
            .header("cookie", format!("session={session}"))
            .multipart(form)
            .send()
            .await
            .expect("upload request failed")
    }
}

/// The `session` value from a response's Set-Cookie headers, if one was set.
/// A cleared cookie yields an empty string.
pub fn session_cookie(resp: &Response) -> Option<String> {
    resp.headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| v.strip_prefix("session="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

pub fn location(resp: &Response) -> String {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Spawn a test app with a fresh temporary database.
pub async fn spawn_app() -> TestApp {
    let _ = dotenvy::dotenv();

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");

    let db_name = format!("galleria_test_{}", Uuid::now_v7().simple());

    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect to postgres for test DB creation");

    sqlx::query(&format!("CREATE DATABASE \"{db_name}\""))
        .execute(&admin_pool)
        .await
        .expect("Failed to create test database");

    admin_pool.close().await;

    let test_url = base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/{db_name}"))
        .unwrap_or_else(|| base_url.clone());

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&test_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    let images = tempfile::tempdir().expect("Failed to create image directory");

    let config = Config {
        database_url: test_url,
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost:0".to_string(),
        images_dir: images.path().to_path_buf(),
        token_bytes: 32,
        reset_ttl_minutes: DEFAULT_RESET_TTL_MINUTES,
        max_upload_size: 5 * 1024 * 1024,
        cookie_secure: false,
        log_level: "warn".to_string(),
        smtp: None,
    };

    let app = galleria::build_app(pool.clone(), config);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Server failed");
    });

    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        addr,
        pool,
        client,
        db_name,
        images,
    }
}

/// Drop the test database after tests complete.
pub async fn cleanup(app: TestApp) {
    let db_name = app.db_name.clone();
    app.pool.close().await;

    let base_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for tests");
    let admin_pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&admin_url(&base_url))
        .await
        .expect("Failed to connect for cleanup");

    let _ = sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\" WITH (FORCE)"))
        .execute(&admin_pool)
        .await;

    admin_pool.close().await;
}

fn admin_url(base_url: &str) -> String {
    base_url
        .rsplit_once('/')
        .map(|(base, _)| format!("{base}/postgres"))
        .unwrap_or_else(|| base_url.to_string())
}
