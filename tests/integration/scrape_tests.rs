//! End-to-end scrape tests against a mock wiki

use crate::{create_test_config, mount_page, mount_status, wiki_page};
use recycling_tracker::crawler::{run_scrape, ScrapeMode};
use recycling_tracker::{Material, TrackerError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WIDGET_LISTING: &str = r#"
    <p>Weapons in Arc Raiders.</p>
    <table class="wikitable">
        <tr><th>Name</th><th>Rarity</th></tr>
        <tr><td><a href="/wiki/Widget">Widget</a></td><td>Common</td></tr>
    </table>"#;

const WIDGET_PAGE: &str = r#"
    <p>The Widget is a weapon.</p>
    <h2>Recycled &amp; Salvaged Materials</h2>
    <ul><li>Steel (5)</li><li>Polymer x3</li></ul>
    <h2>Trivia</h2>
    <ul><li>Gold (9)</li></ul>"#;

#[tokio::test]
async fn test_widget_end_to_end() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Weapons", &wiki_page(WIDGET_LISTING)).await;
    mount_page(&server, "/wiki/Widget", &wiki_page(WIDGET_PAGE)).await;

    let config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    let result = run_scrape(&config, ScrapeMode::Categories).await.unwrap();

    assert!(result.is_complete());
    let catalog = &result.catalog;
    assert_eq!(catalog.categories.len(), 1);

    let weapons = &catalog.categories["Weapons"];
    assert_eq!(weapons.len(), 1);
    assert_eq!(weapons[0].name, "Widget");
    assert_eq!(weapons[0].category, "Weapons");
    assert_eq!(weapons[0].url, format!("{}/wiki/Widget", server.uri()));
    assert_eq!(
        weapons[0].materials,
        vec![Material::new("Steel", 5), Material::new("Polymer", 3)]
    );

    assert_eq!(catalog.metadata.version, "1.0");
    assert_eq!(catalog.metadata.total_items, 1);
    assert_eq!(catalog.metadata.categories_count, 1);
    assert_eq!(catalog.metadata.failed_categories, 0);
    assert_eq!(catalog.metadata.failed_items, 0);
    assert_eq!(catalog.metadata.scraped_at.len(), "2025-01-01T00:00:00Z".len());
}

#[tokio::test]
async fn test_missing_section_is_not_a_failure() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Weapons", &wiki_page(WIDGET_LISTING)).await;
    mount_page(
        &server,
        "/wiki/Widget",
        &wiki_page("<h2>Description</h2><ul><li>Steel (5)</li></ul>"),
    )
    .await;

    let config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    let result = run_scrape(&config, ScrapeMode::Categories).await.unwrap();

    assert!(result.failed_items.is_empty());
    let widget = &result.catalog.categories["Weapons"][0];
    assert_eq!(widget.name, "Widget");
    assert!(widget.materials.is_empty());
}

#[tokio::test]
async fn test_failed_category_contributes_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/wiki/Augments"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;
    mount_page(&server, "/wiki/Weapons", &wiki_page(WIDGET_LISTING)).await;
    mount_page(&server, "/wiki/Widget", &wiki_page(WIDGET_PAGE)).await;

    let config = create_test_config(
        &server,
        &[("Augments", "/wiki/Augments"), ("Weapons", "/wiki/Weapons")],
    );
    let result = run_scrape(&config, ScrapeMode::Categories).await.unwrap();

    assert_eq!(result.failed_categories.len(), 1);
    let failure = &result.failed_categories[0];
    assert_eq!(failure.name, "Augments");
    assert_eq!(failure.url, format!("{}/wiki/Augments", server.uri()));
    assert!(failure.error.contains("500"));

    // The failed category is still present, and the run carried on
    assert!(result.catalog.categories["Augments"].is_empty());
    assert_eq!(result.catalog.categories["Weapons"].len(), 1);
    assert_eq!(result.catalog.metadata.categories_count, 2);
    assert_eq!(result.catalog.metadata.failed_categories, 1);
    assert_eq!(result.catalog.metadata.total_items, 1);
}

#[tokio::test]
async fn test_failed_item_is_kept_without_materials() {
    let server = MockServer::start().await;
    let listing = r#"
        <a href="/wiki/Widget">Widget</a>
        <a href="/wiki/Gizmo">Gizmo</a>"#;
    mount_page(&server, "/wiki/Weapons", &wiki_page(listing)).await;
    mount_page(&server, "/wiki/Widget", &wiki_page(WIDGET_PAGE)).await;
    mount_status(&server, "/wiki/Gizmo", 404).await;

    let config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    let result = run_scrape(&config, ScrapeMode::Categories).await.unwrap();

    let weapons = &result.catalog.categories["Weapons"];
    assert_eq!(weapons.len(), 2);
    assert_eq!(weapons[0].materials.len(), 2);
    assert_eq!(weapons[1].name, "Gizmo");
    assert!(weapons[1].materials.is_empty());

    assert_eq!(result.failed_items.len(), 1);
    assert_eq!(result.failed_items[0].name, "Gizmo");
    assert_eq!(result.catalog.metadata.failed_items, 1);
    assert_eq!(result.catalog.metadata.total_items, 2);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Weapons", &wiki_page(WIDGET_LISTING)).await;
    // First request fails, later ones fall through to the page below
    Mock::given(method("GET"))
        .and(path("/wiki/Widget"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, "/wiki/Widget", &wiki_page(WIDGET_PAGE)).await;

    let config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    let result = run_scrape(&config, ScrapeMode::Categories).await.unwrap();

    assert!(result.is_complete());
    assert_eq!(result.catalog.categories["Weapons"][0].materials.len(), 2);
}

#[tokio::test]
async fn test_anchor_scan_listing() {
    let server = MockServer::start().await;
    let listing = r##"
        <p>See <a href="/wiki/Category:Weapons">all weapons</a>.</p>
        <ul>
            <li><a href="/wiki/Widget">Widget</a></li>
            <li><a href="/wiki/Widget#Recycling">Widget recycling</a></li>
            <li><a href="/wiki/Weapons">Weapons</a></li>
            <li><a href="https://elsewhere.example/wiki/Gizmo">Gizmo</a></li>
            <li><a href="/wiki/Widget">Widget again</a></li>
        </ul>"##;
    mount_page(&server, "/wiki/Weapons", &wiki_page(listing)).await;
    mount_page(&server, "/wiki/Widget", &wiki_page(WIDGET_PAGE)).await;

    let config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    let result = run_scrape(&config, ScrapeMode::Categories).await.unwrap();

    let names: Vec<&str> = result.catalog.categories["Weapons"]
        .iter()
        .map(|item| item.name.as_str())
        .collect();
    assert_eq!(names, vec!["Widget"]);
}

#[tokio::test]
async fn test_loot_mode() {
    let server = MockServer::start().await;
    let loot = r#"
        <table>
            <tr><th>Item</th><th>Value</th></tr>
            <tr><td><a href="/wiki/Rusted_Gear">Rusted Gear</a></td><td>250</td></tr>
            <tr><td><a href="/wiki/Wires">Wires</a></td><td>80</td></tr>
        </table>"#;
    let gear = r#"
        <h3>Recycling</h3>
        <table>
            <tr><th>Material</th><th>Qty</th></tr>
            <tr><td>Metal Parts</td><td>3</td></tr>
        </table>
        <h3>Salvaging</h3>
        <p>Metal Parts: 1</p>"#;
    mount_page(&server, "/wiki/Loot", &wiki_page(loot)).await;
    mount_page(&server, "/wiki/Rusted_Gear", &wiki_page(gear)).await;
    mount_page(&server, "/wiki/Wires", &wiki_page("<p>Basic material.</p>")).await;

    let config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    let result = run_scrape(&config, ScrapeMode::Loot).await.unwrap();

    let catalog = &result.catalog;
    assert_eq!(catalog.categories.keys().collect::<Vec<_>>(), vec!["Loot"]);
    assert_eq!(catalog.metadata.categories_count, 1);

    let loot = &catalog.categories["Loot"];
    assert_eq!(loot.len(), 2);
    assert_eq!(loot[0].name, "Rusted Gear");
    assert_eq!(loot[0].category, "Loot");
    assert_eq!(
        loot[0].materials,
        vec![
            Material::new("Metal Parts", 3),
            Material::new("(Salvage) Metal Parts", 1),
        ]
    );
    assert!(loot[1].materials.is_empty());
}

#[tokio::test]
async fn test_non_html_item_is_recorded() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Weapons", &wiki_page(WIDGET_LISTING)).await;
    Mock::given(method("GET"))
        .and(path("/wiki/Widget"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    let result = run_scrape(&config, ScrapeMode::Categories).await.unwrap();

    assert_eq!(result.failed_items.len(), 1);
    assert!(result.failed_items[0].error.contains("application/json"));
}

#[tokio::test]
async fn test_invalid_content_selector_is_fatal() {
    let server = MockServer::start().await;
    let mut config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    config.scraper.content_selector = "div[".to_string();

    let err = run_scrape(&config, ScrapeMode::Categories).await.unwrap_err();
    assert!(matches!(err, TrackerError::Config(_)));
}

#[tokio::test]
async fn test_relative_category_url_uses_base_url() {
    let server = MockServer::start().await;
    mount_page(&server, "/wiki/Weapons", &wiki_page(WIDGET_LISTING)).await;
    mount_page(&server, "/wiki/Widget", &wiki_page(WIDGET_PAGE)).await;

    let mut config = create_test_config(&server, &[("Weapons", "/wiki/Weapons")]);
    config.categories[0].url = "/wiki/Weapons".to_string();

    let result = run_scrape(&config, ScrapeMode::Categories).await.unwrap();

    assert!(result.is_complete());
    assert_eq!(
        result.catalog.categories["Weapons"][0].url,
        format!("{}/wiki/Widget", server.uri())
    );
}
