//! End-to-end tests of the engine against a mock football API

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use football_analytics::{
    analytics::{ComparisonEngine, DataQuality, DataSources, StatsEngine},
    api::{http::fail_fast_client, ApiClient},
    config::{ApiConfig, CacheTtls, RetryPolicy},
    core::{CacheLayer, ManualClock},
    storage::FootballDatabase,
    FootballError, LeagueCode, Season, TeamId,
};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const TTL: Duration = Duration::from_secs(3600);

struct Harness {
    stats: StatsEngine<ApiClient>,
    comparison: ComparisonEngine<ApiClient>,
    clock: Arc<ManualClock>,
}

fn api_config(server: &MockServer) -> ApiConfig {
    ApiConfig::default()
        .with_base_url(format!("{}/v4", server.uri()))
        .with_api_key("test-token")
        .with_timeout(Duration::from_secs(2))
        .with_retry(RetryPolicy {
            max_retries: 1,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            backoff_multiplier: 2.0,
        })
}

fn harness(client: ApiClient) -> Harness {
    let store = FootballDatabase::new_in_memory().unwrap();
    store.seed_sample_data().unwrap();

    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
    ));
    let cache = Arc::new(CacheLayer::with_clock(clock.clone()));
    let ttl = CacheTtls {
        default: TTL,
        fixtures: TTL / 2,
    };
    let sources = Arc::new(DataSources::new(Arc::new(store), client, cache, ttl));

    Harness {
        stats: StatsEngine::new(sources.clone()),
        comparison: ComparisonEngine::new(sources),
        clock,
    }
}

fn league() -> LeagueCode {
    LeagueCode::new("PD")
}

fn season() -> Season {
    Season::new(2024)
}

fn standings_body() -> serde_json::Value {
    json!({
        "standings": [
            {
                "type": "HOME",
                "table": [
                    { "position": 1, "team": { "id": 81, "name": "FC Barcelona" }, "points": 35 }
                ]
            },
            {
                "type": "TOTAL",
                "table": [
                    { "position": 2, "team": { "id": 81, "name": "FC Barcelona" }, "points": 63, "goalDifference": 34, "playedGames": 28 },
                    { "position": 1, "team": { "id": 86, "name": "Real Madrid CF" }, "points": 65, "goalDifference": 36, "playedGames": 28 },
                    { "position": 3, "team": { "id": 4242, "name": "Unknown FC" }, "points": 20, "goalDifference": -10, "playedGames": 28 }
                ]
            }
        ]
    })
}

async fn mount_standings(server: &MockServer, times: u64) {
    Mock::given(method("GET"))
        .and(path("/v4/competitions/PD/standings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(standings_body()))
        .up_to_n_times(times)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_live_standings_are_reconciled_and_cached() {
    let server = MockServer::start().await;
    mount_standings(&server, 1).await;

    let h = harness(ApiClient::new(&api_config(&server)).unwrap());

    let first = h.stats.standings(&league(), season()).await.unwrap();
    assert_eq!(first.quality, DataQuality::Fresh);
    assert_eq!(first.data.len(), 3);
    assert_eq!(first.data[0].team.name, "Real Madrid CF");
    assert_eq!(first.data[0].team_id, Some(TeamId::new(1)));
    assert_eq!(first.data[1].team_id, Some(TeamId::new(2)));
    assert_eq!(first.data[2].team_id, None);

    // Served from cache: the mock only answers once.
    let second = h.stats.standings(&league(), season()).await.unwrap();
    assert_eq!(second.quality, DataQuality::Fresh);
    assert_eq!(second.fetched_at, first.fetched_at);
}

#[tokio::test]
async fn test_expired_standings_fall_back_to_stale_copy() {
    let server = MockServer::start().await;
    mount_standings(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v4/competitions/PD/standings"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let h = harness(ApiClient::new(&api_config(&server)).unwrap());

    let fresh = h.stats.standings(&league(), season()).await.unwrap();
    h.clock.advance(TTL * 2);

    let stale = h.stats.standings(&league(), season()).await.unwrap();
    assert_eq!(stale.quality, DataQuality::Stale);
    assert_eq!(stale.fetched_at, fresh.fetched_at);
    assert_eq!(stale.data[0].points, 65);
}

#[tokio::test]
async fn test_unreachable_api_degrades_to_stored_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let h = harness(fail_fast_client(&api_config(&server)).unwrap());

    let table = h.stats.standings(&league(), season()).await.unwrap();
    assert_eq!(table.quality, DataQuality::Degraded);
    assert_eq!(table.fetched_at, None);
    assert_eq!(table.data.len(), 10);
    assert_eq!(table.data[0].team.name, "Real Madrid");
    assert_eq!(table.data[0].rank, 1);
    assert!(table.data.windows(2).all(|w| w[0].points >= w[1].points));

    let scorers = h.stats.top_scorers(&league(), season(), 3).await.unwrap();
    assert_eq!(scorers.quality, DataQuality::Degraded);
    assert_eq!(scorers.data.len(), 3);
    assert!(scorers.data.windows(2).all(|w| w[0].goals >= w[1].goals));
}

#[tokio::test]
async fn test_fixtures_without_fallback_surface_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v4/competitions/PD/matches"))
        .and(query_param("status", "SCHEDULED"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let h = harness(fail_fast_client(&api_config(&server)).unwrap());
    let err = h.stats.fixtures(&league()).await.unwrap_err();

    assert!(matches!(err, FootballError::ApiUnavailable { attempts: 1, .. }));
}

#[tokio::test]
async fn test_dashboard_combines_store_and_live_feed() {
    let server = MockServer::start().await;
    mount_standings(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/v4/competitions/PD/scorers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "scorers": [{
                "player": { "id": 3, "name": "Robert Lewandowski", "nationality": "Poland", "section": "Offence" },
                "team": { "id": 81, "name": "FC Barcelona" },
                "goals": 22,
                "assists": 3,
                "playedMatches": 27
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(ApiClient::new(&api_config(&server)).unwrap());
    let dashboard = h.stats.dashboard(&league(), season()).await.unwrap();

    assert_eq!(dashboard.quality, DataQuality::Fresh);
    assert_eq!(dashboard.summary.teams, 10);
    assert_eq!(dashboard.summary.players, 15);
    assert_eq!(
        dashboard.leader.as_ref().map(|l| l.team.name.as_str()),
        Some("Real Madrid CF")
    );
    assert_eq!(
        dashboard.top_scorer.as_ref().map(|s| s.goals),
        Some(22)
    );
    assert!(!dashboard.positions.is_empty());
}

#[tokio::test]
async fn test_store_metrics_do_not_touch_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(ApiClient::new(&api_config(&server)).unwrap());

    let metrics = h.stats.team_metrics(TeamId::new(1), season()).await.unwrap();
    assert_eq!(metrics.points, 65);

    let players = h.stats.player_metrics(TeamId::new(2), season()).await.unwrap();
    assert!(!players.is_empty());

    let form = h.stats.team_form(TeamId::new(2), season(), 5).await.unwrap();
    assert_eq!(form.results.len(), 2);

    let comparison = h
        .comparison
        .compare(&[TeamId::new(1), TeamId::new(2), TeamId::new(1)], season())
        .await
        .unwrap();
    assert_eq!(comparison.len(), 2);
}

#[tokio::test]
async fn test_unknown_team_is_not_found() {
    let server = MockServer::start().await;
    let h = harness(ApiClient::new(&api_config(&server)).unwrap());

    let err = h
        .stats
        .team_metrics(TeamId::new(99), season())
        .await
        .unwrap_err();
    assert!(matches!(err, FootballError::NotFound { .. }));

    let err = h
        .comparison
        .compare(&[TeamId::new(1), TeamId::new(99)], season())
        .await
        .unwrap_err();
    assert!(matches!(err, FootballError::NotFound { .. }));
}
