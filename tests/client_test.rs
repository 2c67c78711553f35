//! `UnderstatClient` against a local HTTP double, in both provider modes.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shotmap_lib::api::{ProviderMode, ProviderSettings, ShotProvider, UnderstatClient};
use shotmap_lib::errors::FetchStage;
use shotmap_lib::flex_id::MatchId;
use shotmap_lib::league::{League, Season};
use shotmap_lib::pipeline::ShotDataScraper;
use shotmap_lib::ShotError;

fn client(base_url: &str, mode: ProviderMode) -> UnderstatClient {
    UnderstatClient::new(ProviderSettings {
        base_url: base_url.to_string(),
        mode,
        timeout: Duration::from_secs(5),
        ..Default::default()
    })
    .unwrap()
}

fn season() -> Season {
    Season::new("2024").unwrap()
}

/// Escape every non-alphanumeric byte as `\xNN`, the way Understat pages embed JSON.
fn js_escape(raw: &str) -> String {
    raw.bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() {
                (b as char).to_string()
            } else {
                format!("\\x{:02X}", b)
            }
        })
        .collect()
}

fn page(var: &str, payload: &serde_json::Value) -> String {
    format!(
        "<html><script>\n  var {} = JSON.parse('{}');\n</script></html>",
        var,
        js_escape(&payload.to_string())
    )
}

fn stage_of(err: &ShotError) -> Option<FetchStage> {
    match err {
        ShotError::DataSource { stage, .. } => Some(*stage),
        _ => None,
    }
}

#[tokio::test]
async fn test_api_league_matches_sends_ajax_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getLeagueData/EPL/2024"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "teams": {},
            "dates": [
                {"id": "007", "isResult": true, "datetime": "2024-08-16 19:00:00"},
                {"id": 26603, "isResult": false, "datetime": "2025-05-25 15:00:00"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let matches = client(&server.uri(), ProviderMode::Api)
        .league_matches(League::Epl, &season())
        .await
        .unwrap();

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].id.as_str(), "007");
    assert_eq!(matches[0].datetime.as_deref(), Some("2024-08-16 19:00:00"));
    assert_eq!(matches[1].id, MatchId::from("26603"));
}

#[tokio::test]
async fn test_api_match_shots_uses_exact_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getMatchData/007"))
        .and(header("X-Requested-With", "XMLHttpRequest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rosters": {},
            "shots": {
                "h": [{"id": "1", "X": "0.9", "Y": "0.5", "xG": "0.3"}],
                "a": [{"id": "2", "X": "0.1", "Y": "0.4", "xG": "0.05"},
                      {"id": "3", "X": "0.2", "Y": "0.6", "xG": "0.02"}]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let shots = client(&server.uri(), ProviderMode::Api)
        .match_shots(&MatchId::from("007"))
        .await
        .unwrap();

    assert_eq!(shots.home.len(), 1);
    assert_eq!(shots.away.len(), 2);
    assert_eq!(shots.away[1].get("id"), Some(&json!("3")));
}

#[tokio::test]
async fn test_page_mode_decodes_embedded_payloads() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/league/La_Liga/2024"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(
            "datesData",
            &json!([{"id": "22275", "datetime": "2024-09-01 18:30:00"}]),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/match/22275"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page(
            "shotsData",
            &json!({"h": [{"player": "José", "X": "0.8", "Y": "0.5", "xG": "0.2"}], "a": []}),
        )))
        .mount(&server)
        .await;

    let c = client(&server.uri(), ProviderMode::Page);
    let matches = c.league_matches(League::LaLiga, &season()).await.unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].id.as_str(), "22275");

    let shots = c.match_shots(&matches[0].id).await.unwrap();
    assert_eq!(shots.home[0].get("player"), Some(&json!("José")));
    assert!(shots.away.is_empty());
}

#[tokio::test]
async fn test_page_without_payload_is_extract_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/match/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client(&server.uri(), ProviderMode::Page)
        .match_shots(&MatchId::from("1"))
        .await
        .unwrap_err();
    assert_eq!(stage_of(&err), Some(FetchStage::Extract));
}

#[tokio::test]
async fn test_http_error_status_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getMatchData/404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server.uri(), ProviderMode::Api)
        .match_shots(&MatchId::from("404"))
        .await
        .unwrap_err();
    assert_eq!(stage_of(&err), Some(FetchStage::Status));
    assert!(err.to_string().contains("/getMatchData/404"));
}

#[tokio::test]
async fn test_garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getLeagueData/RFPL/2024"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<!doctype html><p>blocked</p>"))
        .mount(&server)
        .await;

    let err = client(&server.uri(), ProviderMode::Api)
        .league_matches(League::Rfpl, &season())
        .await
        .unwrap_err();
    assert_eq!(stage_of(&err), Some(FetchStage::Decode));
}

#[tokio::test]
async fn test_unreachable_host_is_request_error() {
    // Port 1 is reserved and nothing listens there.
    let c = client("http://127.0.0.1:1", ProviderMode::Api);

    let err = c.league_matches(League::Epl, &season()).await.unwrap_err();
    assert_eq!(stage_of(&err), Some(FetchStage::Request));

    let err = c.match_shots(&MatchId::from("1")).await.unwrap_err();
    assert_eq!(stage_of(&err), Some(FetchStage::Request));
}

#[tokio::test]
async fn test_scraper_over_http_normalizes_past_matches() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/getLeagueData/Serie_A/2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dates": [
                {"id": "10", "datetime": "2020-01-05 14:00:00"},
                {"id": "11", "datetime": "2999-01-05 14:00:00"}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getMatchData/10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "shots": {"h": [{"X": "0.5", "Y": "0.5", "xG": "0.1"}], "a": []}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/getMatchData/11"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let scraper = ShotDataScraper::new(client(&server.uri(), ProviderMode::Api));
    let report = scraper.run(&[League::SerieA], &season()).await.unwrap();

    assert_eq!(report.matches, 1);
    assert_eq!(report.dataset.len(), 1);
    let row = &report.dataset.rows()[0];
    assert_eq!(row.number("X"), Some(60.0));
    assert_eq!(row.number("Y"), Some(40.0));
    assert_eq!(row.number("xG"), Some(0.1));
    assert_eq!(row.league(), Some("Serie_A"));
}
