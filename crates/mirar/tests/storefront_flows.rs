//! End-to-end scenario flows against the mock storefront.

use mirar::{
    session, Harness, MirarError, MockDom, MockElement, MockPage, Scenario, Selector, StoreConfig,
    StoreDriver,
};

const ROOT: &str = "https://store.example/";

fn consent_button() -> MockElement {
    MockElement::new("button")
        .with_text("Accept")
        .vanishes_on_click()
}

fn catalog_link() -> MockElement {
    MockElement::new("a")
        .also_matching("a[href=\"/collections/all\"]")
        .with_text("Catalog")
        .navigates_to("/collections/all")
}

fn about_link() -> MockElement {
    MockElement::new("a")
        .also_matching("a[href=\"/pages/about\"]")
        .with_text("About")
        .navigates_to("/pages/about")
}

fn menu_toggle() -> MockElement {
    MockElement::new("button.menu-drawer__toggle").hidden()
}

fn homepage() -> MockDom {
    MockDom::new()
        .with(consent_button())
        .with(menu_toggle())
        .with(MockElement::new("img").also_matching("img.banner-image"))
        .with(MockElement::new("p").with_text("Taste the harvest"))
        .with(MockElement::new(".product-card").also_matching("[class*=\"product\"]"))
        .with(about_link())
        .with(catalog_link())
}

fn about_dom() -> MockDom {
    MockDom::new()
        .with(MockElement::new("h1").with_text("Our story"))
        .with(MockElement::new("p").with_text("RealBeans has roasted in Antwerp since 1801"))
}

fn catalog_dom(product_hrefs: &[&str]) -> MockDom {
    let mut dom = MockDom::new()
        .with(MockElement::new(".product-card").also_matching("[class*=\"product\"]"))
        .with(MockElement::new(".price").with_text("€ 9,95"));
    for href in product_hrefs {
        dom = dom.with(MockElement::new("a[href*=\"/products/\"]").navigates_to(*href));
    }
    dom
}

fn product_dom(options: Vec<Option<String>>) -> MockDom {
    MockDom::new()
        .with(MockElement::new("select[name=\"id\"]").with_options(options))
        .with(MockElement::new("h1").with_text("Colombia Single Origin"))
        .with(MockElement::new(".price").with_text("€ 9,95"))
}

fn full_store() -> MockPage {
    MockPage::new()
        .route(ROOT, homepage())
        .route("https://store.example/pages/about", about_dom())
        .route(
            "https://store.example/collections/all",
            catalog_dom(&["/products/a", "/products/b"]),
        )
        .route(
            "https://store.example/products/a",
            product_dom(vec![Some(String::new()), None, Some("SKU-1".into())]),
        )
}

fn config() -> StoreConfig {
    StoreConfig::new(ROOT).without_failure_screenshots()
}

#[tokio::test]
async fn bootstrap_dismisses_consent_and_lands_on_root() {
    let mut page = full_store();
    session::establish(&mut page, &config()).await.unwrap();
    assert_eq!(page.current_url().await.unwrap(), ROOT);
    assert!(!page
        .exists(&Selector::css_with_text("button", "Accept"))
        .await
        .unwrap());
}

#[tokio::test]
async fn full_suite_passes_against_complete_store() {
    let mut page = full_store();
    let report = Harness::new(config()).run_all(&mut page).await;
    assert!(report.all_passed(), "failures: {:?}", report.failures());
    assert_eq!(report.total(), 5);
}

#[tokio::test]
async fn product_detail_clicks_first_product_link() {
    let mut page = full_store();
    let harness = Harness::with_scenarios(config(), vec![Scenario::ProductDetail]);
    let report = harness.run_all(&mut page).await;
    assert!(report.all_passed(), "failures: {:?}", report.failures());
    let url = page.current_url().await.unwrap();
    assert!(url.contains("/products/"), "landed on {url}");
    assert!(url.ends_with("/products/a"));
}

#[tokio::test]
async fn product_detail_selects_first_valid_variant() {
    let mut page = full_store();
    let harness = Harness::with_scenarios(config(), vec![Scenario::ProductDetail]);
    let report = harness.run_all(&mut page).await;
    assert!(report.all_passed());
    assert_eq!(page.selections().len(), 1);
    assert_eq!(page.selections()[0].1, "SKU-1");
}

#[tokio::test]
async fn product_detail_succeeds_on_empty_catalog() {
    let mut page = MockPage::new()
        .route(ROOT, homepage())
        .route("https://store.example/collections/all", catalog_dom(&[]));
    let harness = Harness::with_scenarios(config(), vec![Scenario::ProductDetail]);
    let report = harness.run_all(&mut page).await;
    assert!(report.all_passed(), "failures: {:?}", report.failures());
}

#[tokio::test]
async fn product_without_variant_selector_checks_heading_and_price() {
    let product = MockDom::new()
        .with(MockElement::new("h1").with_text("House Blend"))
        .with(MockElement::new(".price").with_text("€ 7,50"));
    let mut page = MockPage::new()
        .route(ROOT, homepage())
        .route(
            "https://store.example/collections/all",
            catalog_dom(&["/products/house-blend"]),
        )
        .route("https://store.example/products/house-blend", product);
    let harness = Harness::with_scenarios(config(), vec![Scenario::ProductDetail]);
    let report = harness.run_all(&mut page).await;
    assert!(report.all_passed(), "failures: {:?}", report.failures());
}

#[tokio::test]
async fn password_gated_store_is_probed_after_unlock() {
    let gate = MockDom::new()
        .with(MockElement::new("input[name=\"password\"]"))
        .with(
            MockElement::new("button[type=\"submit\"]")
                .with_text("Enter")
                .navigates_to(ROOT),
        );
    let mut page = full_store()
        .redirect_once(ROOT, "https://store.example/password")
        .route("https://store.example/password", gate);

    let harness = Harness::with_scenarios(
        config().with_password("staging-only"),
        vec![Scenario::HomepageContent],
    );
    let report = harness.run_all(&mut page).await;
    assert!(report.all_passed(), "failures: {:?}", report.failures());
    assert_eq!(page.fills()[0].1, "staging-only");
}

#[tokio::test]
async fn missing_catalog_link_fails_only_catalog_scenarios() {
    let homepage_without_catalog = MockDom::new()
        .with(MockElement::new("img"))
        .with(MockElement::new("p").with_text("Taste the harvest"))
        .with(MockElement::new(".product-card").also_matching("[class*=\"product\"]"))
        .with(about_link());
    let mut page = MockPage::new()
        .route(ROOT, homepage_without_catalog)
        .route("https://store.example/pages/about", about_dom());

    let report = Harness::new(config()).run_all(&mut page).await;
    assert_eq!(report.total(), 5);
    assert_eq!(report.passed_count(), 2);
    for failure in report.failures() {
        assert!(
            failure.error.as_deref().unwrap().contains("catalog link"),
            "unexpected failure: {failure:?}"
        );
    }
}

#[tokio::test]
async fn suppressed_application_errors_do_not_fail_scenarios() {
    let mut page = full_store();
    page.inject_app_error("storefront threw during hydration");
    let harness = Harness::with_scenarios(config(), vec![Scenario::HomepageContent]);
    let report = harness.run_all(&mut page).await;
    assert!(report.all_passed());
    assert_eq!(report.results[0].suppressed_errors, 1);
}

#[tokio::test]
async fn wrong_landing_url_reports_navigation_mismatch() {
    let mut page = full_store().redirect_once(ROOT, "https://elsewhere.example/");
    let err = session::establish(&mut page, &config()).await.unwrap_err();
    assert!(matches!(err, MirarError::NavigationMismatch { .. }));
}
