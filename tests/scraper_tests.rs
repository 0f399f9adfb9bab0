use stream_feedback::{
    ExtractionResult, Fetcher, FetcherConfig, LogLevelGuard, MetadataExtractor, PageScraper,
    SelectorSet, DESCRIPTION_NOT_FOUND, FOLLOWERS_NOT_FOUND, TITLE_NOT_FOUND, VIEWERS_NOT_FOUND,
};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHANNEL_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta property="og:title" content="speedrunner - Twitch">
    <meta property="og:description" content="Any% attempts every night">
</head>
<body><p class="live-viewers-class"> 1,204 </p></body>
</html>"#;

async fn serve(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_og_tags_extracted_verbatim() {
    let _guard = LogLevelGuard::set_level("debug");
    let server = MockServer::start().await;
    serve(&server, "/speedrunner", 200, CHANNEL_PAGE).await;

    let link = format!("{}/speedrunner", server.uri());
    let result = PageScraper::new().scrape(&link).await;

    let metadata = result.metadata().expect("expected a success record");
    assert_eq!(result.link(), link);
    assert_eq!(metadata.title, "speedrunner - Twitch");
    assert_eq!(metadata.description, "Any% attempts every night");
    assert_eq!(metadata.followers, FOLLOWERS_NOT_FOUND);
    assert_eq!(metadata.viewers, "1,204");
}

#[tokio::test]
async fn test_page_without_tags_uses_placeholders() {
    let server = MockServer::start().await;
    serve(&server, "/bare", 200, "<html><body>nothing here</body></html>").await;

    let result = PageScraper::new()
        .scrape(&format!("{}/bare", server.uri()))
        .await;

    let metadata = result.metadata().expect("expected a success record");
    assert_eq!(metadata.title, TITLE_NOT_FOUND);
    assert_eq!(metadata.description, DESCRIPTION_NOT_FOUND);
    assert_eq!(metadata.viewers, VIEWERS_NOT_FOUND);
}

#[tokio::test]
async fn test_error_status_becomes_failure_record() {
    let server = MockServer::start().await;
    serve(&server, "/doesnotexist12345", 404, "not found").await;

    let link = format!("{}/doesnotexist12345", server.uri());
    let result = PageScraper::new().scrape(&link).await;

    match result {
        ExtractionResult::Failure { link: failed, error } => {
            assert_eq!(failed, link);
            assert!(error.contains("404"), "unexpected error: {error}");
        }
        other => panic!("Expected failure record, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unreachable_host_becomes_failure_record() {
    let fetcher = Fetcher::new_with_config(FetcherConfig {
        timeout: Duration::from_secs(2),
        ..FetcherConfig::default()
    });
    let scraper = PageScraper::new_with_fetcher(fetcher);

    let result = scraper.scrape("http://127.0.0.1:1/channel").await;
    assert!(!result.is_success());
    assert_eq!(result.link(), "http://127.0.0.1:1/channel");
    assert!(result.error().unwrap().starts_with("Failed to fetch content"));
}

#[tokio::test]
async fn test_unparseable_link_becomes_failure_record() {
    let result = PageScraper::new().scrape("twitch.tv/no-scheme").await;
    assert_eq!(result.link(), "twitch.tv/no-scheme");
    assert!(result.error().unwrap().starts_with("Failed to parse URL"));
}

#[tokio::test]
async fn test_scrape_all_keeps_one_outcome_per_link_in_order() {
    let server = MockServer::start().await;
    serve(&server, "/a", 200, CHANNEL_PAGE).await;
    serve(&server, "/b", 500, "oops").await;
    serve(&server, "/c", 200, "<html></html>").await;

    let links = vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
        "not a url".to_string(),
        format!("{}/c", server.uri()),
    ];
    let outcomes = PageScraper::new().scrape_all(&links).await;

    assert_eq!(outcomes.len(), links.len());
    for (outcome, link) in outcomes.iter().zip(&links) {
        assert_eq!(outcome.link(), link);
    }
    let successes: Vec<bool> = outcomes.iter().map(ExtractionResult::is_success).collect();
    assert_eq!(successes, vec![true, false, false, true]);
}

#[tokio::test]
async fn test_scrape_all_with_no_links() {
    let links: Vec<String> = Vec::new();
    assert!(PageScraper::new().scrape_all(&links).await.is_empty());
}

#[tokio::test]
async fn test_updated_selectors_apply_without_touching_callers() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/redesigned",
        200,
        r#"<div data-a-target="followers-count">88K</div>"#,
    )
    .await;

    let extractor = MetadataExtractor::with_selectors(SelectorSet {
        followers: "div[data-a-target='followers-count']".to_string(),
        ..SelectorSet::default()
    })
    .unwrap();
    let scraper = PageScraper::new().with_extractor(extractor);

    let result = scraper
        .scrape(&format!("{}/redesigned", server.uri()))
        .await;
    assert_eq!(result.metadata().unwrap().followers, "88K");
}
