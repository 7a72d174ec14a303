//! Storefront scenarios.
//!
//! Five independent probes, each a straight-line sequence of conditional
//! steps over a [`StorefrontTargets`] catalog. Probes are idempotent and
//! order-agnostic: each starts from a bootstrapped session and shares no
//! state with its siblings.
//!
//! The selector catalog deliberately casts a wide net per role. The
//! storefront's markup is not under this suite's control, so every role is
//! an ordered list of alternatives from most specific to most generic,
//! resolved first-match-wins.

use crate::config::StoreConfig;
use crate::driver::StoreDriver;
use crate::probe::{
    assert_present, assert_url, click_if_present, first_matching_link, resolve_target,
    select_first_valid_option,
};
use crate::result::{MirarError, MirarResult};
use crate::target::{ConditionalTarget, Selector};
use crate::wait::UrlPattern;
use std::time::Duration;
use tracing::{debug, info};

/// Selector catalog for the storefront's UI roles
#[derive(Debug, Clone)]
pub struct StorefrontTargets {
    /// Menu toggle of a collapsed navigation drawer (optional)
    pub menu_toggle: ConditionalTarget,
    /// Link to the about page (required)
    pub about_link: ConditionalTarget,
    /// Link to the catalog listing (required)
    pub catalog_link: ConditionalTarget,
    /// Banner-like imagery on the homepage (required)
    pub banner_image: ConditionalTarget,
    /// Any generic textual content (required)
    pub text_content: ConditionalTarget,
    /// Heading or paragraph prose (required)
    pub prose: ConditionalTarget,
    /// A product-card-like element (required)
    pub product_card: ConditionalTarget,
    /// A product-like or price-like element (required)
    pub product_or_price: ConditionalTarget,
    /// A link to a product detail page (optional)
    pub product_link: ConditionalTarget,
    /// A variant selection control on a product page (optional)
    pub variant_select: ConditionalTarget,
    /// A price-like element (required)
    pub price: ConditionalTarget,
    /// A product title heading (required)
    pub product_heading: ConditionalTarget,
}

impl StorefrontTargets {
    /// Build the catalog for a configured store
    #[must_use]
    pub fn for_config(config: &StoreConfig) -> Self {
        let brand = &config.brand;
        Self {
            menu_toggle: ConditionalTarget::new("menu toggle")
                .alt(Selector::css("button[aria-controls=\"HeaderMenu\"]"))
                .alt(Selector::css("summary[aria-expanded=\"false\"]"))
                .alt(Selector::css("button.menu-drawer__toggle"))
                .alt(Selector::css("[class*=\"menu-toggle\"]")),
            about_link: ConditionalTarget::new("about link")
                .alt(Selector::css("a[href=\"/pages/about\"]"))
                .alt(Selector::css_with_text("a", "About"))
                .required(true),
            catalog_link: ConditionalTarget::new("catalog link")
                .alt(Selector::css("a[href=\"/collections/all\"]"))
                .alt(Selector::css_with_text("a", "Catalog"))
                .alt(Selector::css_with_text("a", "All"))
                .required(true),
            banner_image: ConditionalTarget::new("banner image")
                .alt(Selector::css(format!("img[alt*=\"{brand}\"]")))
                .alt(Selector::css(format!("img[src*=\"{brand}_banner\"]")))
                .alt(Selector::css("img.banner-image"))
                .alt(Selector::css("img"))
                .required(true),
            text_content: ConditionalTarget::new("text content")
                .alt(Selector::css("p"))
                .alt(Selector::css("h1"))
                .alt(Selector::css("h2"))
                .alt(Selector::css(".section__heading"))
                .alt(Selector::css(".text-content"))
                .alt(Selector::css("body"))
                .required(true),
            prose: ConditionalTarget::new("prose")
                .alt(Selector::css("p"))
                .alt(Selector::css("h1"))
                .alt(Selector::css("h2"))
                .required(true),
            product_card: ConditionalTarget::new("product card")
                .alt(Selector::css(".product-card"))
                .alt(Selector::css(".product-item"))
                .alt(Selector::css("[data-product-card]"))
                .alt(Selector::css("[class*=\"product\"]"))
                .required(true),
            product_or_price: ConditionalTarget::new("product or price")
                .alt(Selector::css(".product-card"))
                .alt(Selector::css(".product-item"))
                .alt(Selector::css("[class*=\"product\"]"))
                .alt(Selector::css(".price"))
                .alt(Selector::css("[class*=\"price\"]"))
                .required(true),
            product_link: ConditionalTarget::new("product link")
                .alt(Selector::css("a[href*=\"/products/\"]")),
            variant_select: ConditionalTarget::new("variant selector")
                .alt(Selector::css("select[name=\"id\"]"))
                .alt(Selector::css("select.variant-selector"))
                .alt(Selector::css("select[data-variant-selector]")),
            price: ConditionalTarget::new("price")
                .alt(Selector::css(".price"))
                .alt(Selector::css("[class*=\"price\"]"))
                .required(true),
            product_heading: ConditionalTarget::new("product heading")
                .alt(Selector::css("h1"))
                .alt(Selector::css("h2"))
                .alt(Selector::css(".product-title"))
                .required(true),
        }
    }
}

/// A named storefront probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    /// Homepage shows banner imagery, content, and product cards
    HomepageContent,
    /// About page is reachable and carries the expected copy
    AboutPage,
    /// Catalog listing is reachable and shows products
    CatalogListing,
    /// Catalog shows products or prices, without any sort interaction
    CatalogProductsUnsorted,
    /// Product detail page works, including variant selection when offered
    ProductDetail,
}

impl Scenario {
    /// All scenarios, in declaration order
    pub const ALL: [Self; 5] = [
        Self::HomepageContent,
        Self::AboutPage,
        Self::CatalogListing,
        Self::CatalogProductsUnsorted,
        Self::ProductDetail,
    ];

    /// Stable name of this scenario
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HomepageContent => "homepage_content",
            Self::AboutPage => "about_page",
            Self::CatalogListing => "catalog_listing",
            Self::CatalogProductsUnsorted => "catalog_products_unsorted",
            Self::ProductDetail => "product_detail",
        }
    }

    /// Look up a scenario by its stable name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// Run this probe against a bootstrapped session
    pub async fn run<D: StoreDriver + ?Sized>(
        &self,
        driver: &mut D,
        config: &StoreConfig,
    ) -> MirarResult<()> {
        let targets = StorefrontTargets::for_config(config);
        match self {
            Self::HomepageContent => homepage_content(driver, &targets, config).await,
            Self::AboutPage => about_page(driver, &targets, config).await,
            Self::CatalogListing => catalog_listing(driver, &targets, config).await,
            Self::CatalogProductsUnsorted => {
                catalog_products_unsorted(driver, &targets, config).await
            }
            Self::ProductDetail => product_detail(driver, &targets, config).await,
        }
    }
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Open a collapsed navigation drawer if one is present
async fn open_menu_if_collapsed<D: StoreDriver + ?Sized>(
    driver: &mut D,
    targets: &StorefrontTargets,
) -> MirarResult<()> {
    let outcome = click_if_present(driver, &targets.menu_toggle, true).await?;
    if outcome.performed() {
        debug!("navigation drawer opened");
    }
    Ok(())
}

/// Navigate to the catalog listing via the menu
async fn goto_catalog<D: StoreDriver + ?Sized>(
    driver: &mut D,
    targets: &StorefrontTargets,
    config: &StoreConfig,
) -> MirarResult<()> {
    open_menu_if_collapsed(driver, targets).await?;
    first_matching_link(driver, &targets.catalog_link, config.timeouts.command()).await?;
    assert_url(
        driver,
        &UrlPattern::Contains("/collections".into()),
        config.timeouts.response(),
    )
    .await
}

async fn homepage_content<D: StoreDriver + ?Sized>(
    driver: &mut D,
    targets: &StorefrontTargets,
    config: &StoreConfig,
) -> MirarResult<()> {
    let command = config.timeouts.command();
    assert_present(driver, &targets.banner_image, command).await?;
    assert_present(driver, &targets.text_content, command).await?;
    debug!("basic content check passed");
    assert_present(driver, &targets.product_card, command).await
}

async fn about_page<D: StoreDriver + ?Sized>(
    driver: &mut D,
    targets: &StorefrontTargets,
    config: &StoreConfig,
) -> MirarResult<()> {
    open_menu_if_collapsed(driver, targets).await?;
    first_matching_link(driver, &targets.about_link, config.timeouts.command()).await?;
    assert_url(
        driver,
        &UrlPattern::Contains("/pages/about".into()),
        config.timeouts.response(),
    )
    .await?;

    let command = config.timeouts.command();
    for marker in &config.about_markers {
        let copy = ConditionalTarget::new(format!("about copy {marker:?}"))
            .alt(Selector::text(marker.clone()))
            .required(true);
        assert_present(driver, &copy, command).await?;
    }
    assert_present(driver, &targets.prose, command).await
}

async fn catalog_listing<D: StoreDriver + ?Sized>(
    driver: &mut D,
    targets: &StorefrontTargets,
    config: &StoreConfig,
) -> MirarResult<()> {
    goto_catalog(driver, targets, config).await?;
    assert_present(driver, &targets.product_card, config.timeouts.command()).await
}

async fn catalog_products_unsorted<D: StoreDriver + ?Sized>(
    driver: &mut D,
    targets: &StorefrontTargets,
    config: &StoreConfig,
) -> MirarResult<()> {
    goto_catalog(driver, targets, config).await?;
    debug!("checking for product elements");
    assert_present(driver, &targets.product_or_price, config.timeouts.command()).await?;
    debug!("product check completed");
    Ok(())
}

async fn product_detail<D: StoreDriver + ?Sized>(
    driver: &mut D,
    targets: &StorefrontTargets,
    config: &StoreConfig,
) -> MirarResult<()> {
    goto_catalog(driver, targets, config).await?;

    // The catalog's contents are outside this suite's control; an empty
    // catalog is not a failure
    let Some(link) = resolve_target(driver, &targets.product_link, Duration::ZERO)
        .await?
        .cloned()
    else {
        info!("no product links found, skipping product detail checks");
        return Ok(());
    };

    if !driver.click_first(&link, true).await? {
        return Err(MirarError::Interaction {
            role: targets.product_link.role().to_string(),
            message: format!("{link} matched but was not clickable"),
        });
    }
    assert_url(
        driver,
        &UrlPattern::Contains("/products/".into()),
        config.timeouts.response(),
    )
    .await?;

    let command = config.timeouts.command();
    let variant = resolve_target(driver, &targets.variant_select, Duration::ZERO)
        .await?
        .cloned();
    if let Some(select) = variant {
        match select_first_valid_option(driver, &select).await? {
            Some(value) => debug!(%value, "variant selected"),
            None => info!("variant selector has no usable option, selection skipped"),
        }
        assert_present(driver, &targets.price, command).await
    } else {
        assert_present(driver, &targets.product_heading, command).await?;
        assert_present(driver, &targets.price, command).await
    }
}
