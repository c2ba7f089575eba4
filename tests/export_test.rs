use tempfile::TempDir;
use tourney_engine::adapters::{csv_export, roster_file};
use tourney_engine::app::simulation::simulate;
use tourney_engine::{EngineConfig, Entrant, EventId, MemoryStore, TournamentEngine, TournamentService};

#[tokio::test]
async fn test_export_simulated_event() {
    let temp_dir = TempDir::new().unwrap();
    let roster_path = temp_dir.path().join("roster.json");
    let entries: Vec<serde_json::Value> = (1..=6)
        .map(|i| serde_json::json!({"id": i, "name": format!("Team {}", i), "rating": 1500 + i}))
        .collect();
    std::fs::write(&roster_path, serde_json::to_string(&entries).unwrap()).unwrap();

    let roster: Vec<Entrant> = roster_file::load_roster(&roster_path).unwrap();
    let store = MemoryStore::new();
    let service = TournamentService::new(
        store.clone(),
        store,
        TournamentEngine::new(EngineConfig::default()),
    );
    let event = EventId(1);
    let report = simulate(&service, event, roster).await.unwrap();

    let fixtures_path = temp_dir.path().join("out").join("fixtures.csv");
    let ratings_path = temp_dir.path().join("out").join("ratings.json");
    let stages = service.stages(event).await.unwrap();
    let final_roster = service.roster(event).await.unwrap();
    csv_export::export_fixtures(&fixtures_path, &stages, &final_roster).unwrap();
    roster_file::save_ratings(&ratings_path, &report.commit).unwrap();

    let csv = std::fs::read_to_string(&fixtures_path).unwrap();
    // header + 15 group fixtures + 2 + 2 + 1 knockout fixtures
    assert_eq!(csv.lines().count(), 1 + 15 + 5);
    assert!(csv.lines().skip(1).all(|line| line.ends_with(",true")));
    assert!(csv.contains("R3-1"));

    let ratings: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&ratings_path).unwrap()).unwrap();
    assert_eq!(ratings["entrants"].as_array().unwrap().len(), 6);
}
