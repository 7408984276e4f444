use std::time::Duration;

use axum::{Router, http::HeaderMap, http::StatusCode, routing::get};

use dysphoria_info::config::Config;
use dysphoria_info::scrapper::{NO_MATCH_SENTINEL, ScrapeError, Scrapper};

const FIXTURE: &str = r#"
<html>
  <head><title>Fixture</title></head>
  <body>
    <p>I have dysphoria about X</p>
    <p>unrelated text</p>
    <p>more dysphoria notes</p>
  </body>
</html>
"#;

mod test_helpers {
    use super::*;

    pub async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    /// Serves the fixture only to callers that send a browser-like User-Agent.
    pub fn fixture_app() -> Router {
        Router::new().route(
            "/",
            get(|headers: HeaderMap| async move {
                let user_agent = headers
                    .get("user-agent")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default();
                if user_agent.starts_with("Mozilla/5.0") {
                    Ok(axum::response::Html(FIXTURE))
                } else {
                    Err(StatusCode::FORBIDDEN)
                }
            }),
        )
    }

    pub fn scrapper_for(url: String) -> Scrapper {
        let config = Config::default();
        Scrapper::new(config.http_client().unwrap(), url, config.max_paragraphs)
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_returns_matching_paragraphs_in_order() {
    let base = spawn_server(fixture_app()).await;
    let scrapper = scrapper_for(format!("{base}/"));

    let result = scrapper.scrape("dysphoria").await.unwrap();
    assert_eq!(result, "I have dysphoria about X\n\nmore dysphoria notes");
}

#[tokio::test]
async fn test_match_ignores_case() {
    let base = spawn_server(fixture_app()).await;
    let scrapper = scrapper_for(format!("{base}/"));

    let result = scrapper.scrape("DYSPHORIA").await.unwrap();
    assert_eq!(result, "I have dysphoria about X\n\nmore dysphoria notes");
}

#[tokio::test]
async fn test_no_match_returns_sentinel() {
    let base = spawn_server(fixture_app()).await;
    let scrapper = scrapper_for(format!("{base}/"));

    let result = scrapper.scrape("estrogen").await.unwrap();
    assert_eq!(result, NO_MATCH_SENTINEL);
    assert!(!result.is_empty());
}

#[tokio::test]
async fn test_caps_number_of_paragraphs() {
    let page = "<p>voice one</p><p>voice two</p><p>voice three</p><p>voice four</p>";
    let app = Router::new().route("/", get(move || async move { axum::response::Html(page) }));
    let base = spawn_server(app).await;
    let config = Config::default();
    let scrapper = Scrapper::new(config.http_client().unwrap(), format!("{base}/"), 2);

    let result = scrapper.scrape("voice").await.unwrap();
    assert_eq!(result, "voice one\n\nvoice two");
}

#[tokio::test]
async fn test_error_status_is_an_error() {
    let app = Router::new().route("/", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = spawn_server(app).await;
    let scrapper = scrapper_for(format!("{base}/"));

    let err = scrapper.scrape("dysphoria").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Status { status: 500 }));
    assert_eq!(err.to_string(), "source page returned HTTP 500");
}

#[tokio::test]
async fn test_missing_user_agent_is_rejected_upstream() {
    let base = spawn_server(fixture_app()).await;
    let scrapper = Scrapper::new(reqwest::Client::new(), format!("{base}/"), 3);

    let err = scrapper.scrape("dysphoria").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Status { status: 403 }));
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let app = Router::new().route(
        "/",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            axum::response::Html(FIXTURE)
        }),
    );
    let base = spawn_server(app).await;
    let config = Config {
        request_timeout: Duration::from_secs(1),
        ..Config::default()
    };
    let scrapper = Scrapper::new(config.http_client().unwrap(), format!("{base}/"), 3);

    let err = scrapper.scrape("dysphoria").await.unwrap_err();
    assert!(matches!(err, ScrapeError::Request(ref e) if e.is_timeout()));
}
