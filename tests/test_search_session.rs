use async_trait::async_trait;
use mockito::{Matcher, Server};
use recipe_finder::config::SearchConfig;
use recipe_finder::pacing::Pacer;
use recipe_finder::{FinderError, MemoryStore, SearchSession, SpoonacularClient};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Clone, Default)]
struct CountingPacer {
    pauses: Arc<Mutex<Vec<Duration>>>,
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self, delay: Duration) {
        self.pauses.lock().unwrap().push(delay);
    }
}

fn session(server: &Server, pacer: CountingPacer) -> SearchSession {
    let api = SpoonacularClient::with_base_url("test_key".to_string(), server.url());
    SearchSession::new(
        Box::new(api),
        Box::new(MemoryStore::new()),
        Box::new(pacer),
        &SearchConfig::default(),
    )
}

fn results_page(first_id: i64, count: i64) -> String {
    let results: Vec<String> = (first_id..first_id + count)
        .map(|id| format!(r#"{{"id": {id}, "title": "Pasta {id}", "readyInMinutes": {id}}}"#))
        .collect();
    format!(r#"{{"results": [{}]}}"#, results.join(","))
}

#[tokio::test]
async fn test_dish_search_pages_by_offset() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "pasta".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
            Matcher::UrlEncoded("number".into(), "12".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(results_page(1, 12))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "pasta".into()),
            Matcher::UrlEncoded("offset".into(), "12".into()),
            Matcher::UrlEncoded("number".into(), "12".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(results_page(13, 4))
        .create_async()
        .await;

    let mut session = session(&server, CountingPacer::default());

    let outcome = session.search_by_dish("pasta").await.unwrap();
    assert_eq!(outcome.count, 12);
    assert!(outcome.has_more);

    let outcome = session.next_page().await.unwrap().unwrap();
    assert_eq!(outcome.page, 1);
    assert_eq!(outcome.count, 4);
    assert!(!outcome.has_more);
    assert_eq!(session.results()[0].title, "Pasta 13");

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_dish_search_sends_diet_filters() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), "salad".into()),
            Matcher::UrlEncoded("diet".into(), "vegan,ketogenic".into()),
        ]))
        .with_status(200)
        .with_body(results_page(1, 2))
        .create_async()
        .await;

    let mut session = session(&server, CountingPacer::default());
    session.set_filters(["vegan", "ketogenic"]);
    session.search_by_dish("salad").await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_ingredient_search_skips_failed_detail() {
    let mut server = Server::new_async().await;

    let matches: Vec<String> = (1..=15)
        .map(|id| format!(r#"{{"id": {id}, "title": "Match {id}", "usedIngredientCount": 2}}"#))
        .collect();
    let find = server
        .mock("GET", "/recipes/findByIngredients")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("ingredients".into(), "egg,flour".into()),
            Matcher::UrlEncoded("number".into(), "12".into()),
        ]))
        .with_status(200)
        .with_body(format!("[{}]", matches.join(",")))
        .create_async()
        .await;

    let mut details = Vec::new();
    for id in 1..=15 {
        let mock = server
            .mock("GET", format!("/recipes/{id}/information").as_str())
            .match_query(Matcher::Any);
        let mock = if id == 5 {
            mock.with_status(500).with_body("boom")
        } else {
            mock.with_status(200)
                .with_body(format!(r#"{{"id": {id}, "title": "Detail {id}"}}"#))
        };
        let expected = if id <= 12 { 1 } else { 0 };
        details.push(mock.expect(expected).create_async().await);
    }

    let pacer = CountingPacer::default();
    let mut session = session(&server, pacer.clone());
    session.add_ingredient("Egg");
    session.add_ingredient("flour");
    session.add_ingredient("egg ");

    let outcome = session.search_by_ingredients().await.unwrap();

    assert_eq!(outcome.count, 11);
    let titles: Vec<&str> = session.results().iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles[3], "Detail 4");
    assert_eq!(titles[4], "Detail 6");
    assert_eq!(pacer.pauses.lock().unwrap().len(), 11);
    assert_eq!(session.recent_searches(), ["Recipes with: egg, flour"]);

    find.assert_async().await;
    for mock in &details {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_api_failure_is_search_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(402)
        .with_body(r#"{"message": "Your daily points limit has been reached."}"#)
        .create_async()
        .await;

    let mut session = session(&server, CountingPacer::default());
    let err = session.search_by_dish("pasta").await.unwrap_err();

    assert!(matches!(err, FinderError::Search(_)));
    assert!(session.results().is_empty());
    assert_eq!(session.recent_searches(), ["pasta"]);
}

#[tokio::test]
async fn test_no_results_is_empty_result_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/recipes/complexSearch")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"results": [], "totalResults": 0}"#)
        .create_async()
        .await;

    let mut session = session(&server, CountingPacer::default());
    let err = session.search_by_dish("xyzzy").await.unwrap_err();

    assert!(err.is_empty_result());
}
