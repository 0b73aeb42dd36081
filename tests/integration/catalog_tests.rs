//! Scrape-and-persist tests: the catalog file as the display layer sees it

use crate::{create_test_config, mount_page, mount_status, wiki_page};
use recycling_tracker::catalog::{load_catalog, CatalogWriter};
use recycling_tracker::crawler::{scrape, ScrapeMode};
use recycling_tracker::output::CatalogStatistics;
use tempfile::TempDir;
use wiremock::MockServer;

const LISTING: &str = r#"
    <table>
        <tr><th>Name</th></tr>
        <tr><td><a href="/wiki/Ferro">Ferro</a></td></tr>
        <tr><td><a href="/wiki/Anvil">Anvil</a></td></tr>
    </table>"#;

const FERRO: &str = r#"
    <h2>Recycling and salvaging</h2>
    <table>
        <tr><th>Item</th><th>Recycling results</th><th>Salvaging results</th></tr>
        <tr><td>Ferro</td><td>Metal Parts x4, Rubber Parts x2</td><td>Metal Parts x1</td></tr>
    </table>"#;

#[tokio::test]
async fn test_scrape_writes_loadable_catalog() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Weapons", &wiki_page(LISTING)).await;
    mount_page(&server, "/wiki/Ferro", &wiki_page(FERRO)).await;
    mount_status(&server, "/wiki/Anvil", 502).await;
    mount_status(&server, "/wiki/Shields", 404).await;

    let temp_dir = TempDir::new().unwrap();
    let catalog_path = temp_dir.path().join("output").join("recycling_data.json");

    let mut config = create_test_config(
        &server,
        &[("Weapons", "/wiki/Weapons"), ("Shields", "/wiki/Shields")],
    );
    config.output.catalog_path = catalog_path.display().to_string();

    let result = scrape(&config, ScrapeMode::Categories).await.unwrap();
    assert!(catalog_path.exists());
    assert!(!CatalogWriter::new(&catalog_path).temp_path().exists());

    // The file on disk is exactly what the scrape returned
    let loaded = load_catalog(&catalog_path).unwrap();
    assert_eq!(loaded, result.catalog);

    // Categories keep their configured order on disk and after loading
    let order: Vec<&str> = loaded.categories.keys().map(String::as_str).collect();
    assert_eq!(order, vec!["Weapons", "Shields"]);
    let raw = std::fs::read_to_string(&catalog_path).unwrap();
    assert!(raw.find("\"Weapons\"").unwrap() < raw.find("\"Shields\"").unwrap());

    let ferro = &loaded.categories["Weapons"][0];
    let materials: Vec<(&str, u64)> = ferro
        .materials
        .iter()
        .map(|m| (m.name.as_str(), m.quantity))
        .collect();
    assert_eq!(
        materials,
        vec![
            ("Metal Parts", 4),
            ("Rubber Parts", 2),
            ("(Salvage) Metal Parts", 1),
        ]
    );

    assert_eq!(loaded.metadata.total_items, 2);
    assert_eq!(loaded.metadata.categories_count, 2);
    assert_eq!(loaded.metadata.failed_categories, 1);
    assert_eq!(loaded.metadata.failed_items, 1);

    let stats = CatalogStatistics::from_catalog(&loaded);
    assert_eq!(stats.items_by_category["Shields"], 0);
    assert_eq!(stats.items_with_materials, 1);
    assert_eq!(stats.salvage_entries, 1);
    assert_eq!(stats.distinct_materials.len(), 2);
}

#[tokio::test]
async fn test_catalog_json_layout() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Loot", &wiki_page(LISTING)).await;
    mount_page(&server, "/wiki/Ferro", &wiki_page(FERRO)).await;
    mount_page(&server, "/wiki/Anvil", &wiki_page("<p>No data yet.</p>")).await;

    let temp_dir = TempDir::new().unwrap();
    let catalog_path = temp_dir.path().join("loot.json");

    let mut config = create_test_config(&server, &[]);
    config.output.catalog_path = catalog_path.display().to_string();

    scrape(&config, ScrapeMode::Loot).await.unwrap();

    let raw = std::fs::read_to_string(&catalog_path).unwrap();
    // Pretty printed with a two-space indent
    assert!(raw.starts_with("{\n  \"categories\": {\n    \"Loot\": ["));

    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let item = &value["categories"]["Loot"][0];
    assert_eq!(item["name"], "Ferro");
    assert_eq!(item["category"], "Loot");
    assert_eq!(item["materials"][0]["name"], "Metal Parts");
    assert_eq!(item["materials"][0]["quantity"], 4);
    assert_eq!(value["categories"]["Loot"][1]["materials"], serde_json::json!([]));

    let metadata = &value["metadata"];
    assert_eq!(metadata["version"], "1.0");
    assert_eq!(metadata["total_items"], 2);
    assert_eq!(metadata["categories_count"], 1);
    assert!(metadata["elapsed_seconds"].is_f64());
    assert!(metadata["scraped_at"].as_str().unwrap().ends_with('Z'));
}
