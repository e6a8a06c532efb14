//! Server-rendered storefront page.
//!
//! `GET /` renders the same filtered, sorted view the terminal client shows, driven by the
//! `search`, `category`, `sort` and `view` query parameters.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};
use tracing::error;

use storefront_core::catalog::{self, CatalogQuery, CatalogStats, CategoryFilter, Layout, SortOrder};
use storefront_core::domain::product::Product;
use storefront_db::CatalogStore;

const INDEX_TEMPLATE: &str = "storefront/index.html";

#[derive(Clone)]
pub struct StorefrontState {
    store: CatalogStore,
    templates: Arc<Tera>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorefrontParams {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: Option<String>,
    pub view: Option<String>,
}

#[derive(Debug, Serialize)]
struct ProductCard<'a> {
    id: String,
    name: &'a str,
    price: String,
    image: &'a str,
    category: &'a str,
}

#[derive(Debug, Serialize)]
struct SortChoice {
    value: &'static str,
    label: &'static str,
    selected: bool,
}

pub fn init_templates() -> Result<Arc<Tera>, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(
        INDEX_TEMPLATE,
        include_str!("../../../templates/storefront/index.html"),
    )?;
    Ok(Arc::new(tera))
}

pub fn router(store: CatalogStore, templates: Arc<Tera>) -> Router {
    Router::new().route("/", get(index)).with_state(StorefrontState { store, templates })
}

pub async fn index(
    State(state): State<StorefrontState>,
    Query(params): Query<StorefrontParams>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let products = state.store.list().await.map_err(|e| {
        (StatusCode::INTERNAL_SERVER_ERROR, Html(format!("<h1>Error</h1><p>{}</p>", e.user_message())))
    })?;

    let query = CatalogQuery {
        search: params.search.unwrap_or_default(),
        category: params.category.as_deref().map(CategoryFilter::from).unwrap_or_default(),
        sort: params.sort.as_deref().and_then(|raw| raw.parse().ok()).unwrap_or_default(),
    };
    let layout: Layout = params.view.as_deref().and_then(|raw| raw.parse().ok()).unwrap_or_default();

    let context = build_context(&products, &query, layout);
    let html = state.templates.render(INDEX_TEMPLATE, &context).map_err(|e| {
        error!(event_name = "storefront.render.failed", error = ?e, "storefront page render failed");
        (StatusCode::INTERNAL_SERVER_ERROR, Html("<h1>Template Error</h1>".to_string()))
    })?;

    Ok(Html(html))
}

fn build_context(products: &[Product], query: &CatalogQuery, layout: Layout) -> Context {
    let visible: Vec<ProductCard<'_>> = catalog::apply(products, query)
        .into_iter()
        .map(|product| ProductCard {
            id: product.id.to_string(),
            name: &product.name,
            price: product.price.to_string(),
            image: &product.image,
            category: product.category_label(),
        })
        .collect();
    let sort_choices: Vec<SortChoice> = SortOrder::ALL
        .into_iter()
        .map(|order| SortChoice {
            value: order.as_str(),
            label: order.description(),
            selected: order == query.sort,
        })
        .collect();
    let stats = CatalogStats::from_products(products);

    let mut context = Context::new();
    context.insert("products", &visible);
    context.insert("total_count", &products.len());
    context.insert("categories", &catalog::categories(products));
    context.insert("selected_category", query.category.label());
    context.insert("search", &query.search);
    context.insert("sort_choices", &sort_choices);
    context.insert("layout", &layout);
    context.insert("filtered", &query.is_filtered());
    context.insert(
        "stats",
        &serde_json::json!({
            "count": stats.count,
            "total_value": format!("{:.2}", stats.total_value),
            "average_price": format!("{:.2}", stats.average_price),
        }),
    );
    context
}
