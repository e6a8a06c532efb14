//! Client-side catalog state: the last fetched snapshot, the derived view, and the editor.
//!
//! Every operation that talks to the service takes `&mut self`, so one client never has two
//! requests in flight and an older response cannot overwrite newer state.

use tracing::{debug, info, warn};

use storefront_core::catalog::{self, CatalogQuery, CatalogStats, CategoryFilter, Layout, SortOrder};
use storefront_core::domain::product::{Product, ProductId};

use crate::api::CatalogApi;
use crate::error::ClientError;
use crate::form::ProductForm;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Catalog,
    Editor,
}

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

pub struct CatalogClient<A> {
    api: A,
    products: Vec<Product>,
    state: LoadState,
    query: CatalogQuery,
    layout: Layout,
    view: View,
    editing: Option<ProductId>,
    form: ProductForm,
}

impl<A: CatalogApi> CatalogClient<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            products: Vec::new(),
            state: LoadState::Loading,
            query: CatalogQuery::default(),
            layout: Layout::default(),
            view: View::Catalog,
            editing: None,
            form: ProductForm::default(),
        }
    }

    pub async fn load(&mut self) -> Result<(), ClientError> {
        self.state = LoadState::Loading;
        match self.api.list().await {
            Ok(products) => {
                debug!(event_name = "client.catalog.loaded", count = products.len(), "catalog loaded");
                self.products = products;
                self.state = LoadState::Ready;
                Ok(())
            }
            Err(error) => {
                warn!(event_name = "client.catalog.load_failed", error = %error, "catalog load failed");
                self.products.clear();
                self.state = LoadState::Failed(error.to_string());
                Err(error)
            }
        }
    }

    pub async fn retry(&mut self) -> Result<(), ClientError> {
        self.load().await
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn visible(&self) -> Vec<&Product> {
        catalog::apply(&self.products, &self.query)
    }

    pub fn categories(&self) -> Vec<String> {
        catalog::categories(&self.products)
    }

    pub fn stats(&self) -> CatalogStats {
        CatalogStats::from_products(&self.products)
    }

    pub fn query(&self) -> &CatalogQuery {
        &self.query
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search = search.into();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.query.category = category;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.query.sort = sort;
    }

    pub fn clear_filters(&mut self) {
        self.query.clear_filters();
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    pub fn toggle_layout(&mut self) {
        self.layout = match self.layout {
            Layout::Grid => Layout::List,
            Layout::List => Layout::Grid,
        };
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn editing(&self) -> Option<&ProductId> {
        self.editing.as_ref()
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn open_create(&mut self) {
        self.editing = None;
        self.form = ProductForm::default();
        self.view = View::Editor;
    }

    pub fn open_edit(&mut self, id: &ProductId) -> Result<(), ClientError> {
        let product = self.find(id)?;
        self.form = ProductForm::from_product(product);
        self.editing = Some(*id);
        self.view = View::Editor;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.form = ProductForm::default();
        self.view = View::Catalog;
    }

    /// Validates `form`, then creates or updates depending on the edit target. The snapshot only
    /// changes once the service has accepted the request.
    pub async fn submit(&mut self, form: ProductForm) -> Result<Product, ClientError> {
        let input = match form.validate() {
            Ok(input) => input,
            Err(errors) => {
                self.form = form;
                return Err(ClientError::Invalid(errors));
            }
        };

        let saved = match self.editing {
            Some(id) => self.api.update(&id, &input).await,
            None => self.api.create(&input).await,
        };
        let product = match saved {
            Ok(product) => product,
            Err(error) => {
                self.form = form;
                return Err(error);
            }
        };

        match self.products.iter_mut().find(|existing| existing.id == product.id) {
            Some(existing) => *existing = product.clone(),
            None => self.products.push(product.clone()),
        }
        info!(event_name = "client.product.saved", product_id = %product.id, "product saved");

        self.cancel_edit();
        Ok(product)
    }

    pub async fn delete(
        &mut self,
        id: &ProductId,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, ClientError> {
        let prompt = {
            let product = self.find(id)?;
            format!("Delete \"{}\"? This cannot be undone.", product.name)
        };
        if !confirm.confirm(&prompt) {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.api.delete(id).await?;
        self.products.retain(|product| &product.id != id);
        info!(event_name = "client.product.deleted", product_id = %id, "product deleted");
        Ok(DeleteOutcome::Deleted)
    }

    fn find(&self, id: &ProductId) -> Result<&Product, ClientError> {
        self.products
            .iter()
            .find(|product| &product.id == id)
            .ok_or(ClientError::UnknownProduct(*id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal::Decimal;

    use storefront_core::catalog::{CategoryFilter, Layout, SortOrder};
    use storefront_core::domain::product::{
        NewProduct, Price, Product, ProductId, ProductInput, ProductPatch,
    };

    use super::{CatalogClient, Confirm, DeleteOutcome, LoadState, View};
    use crate::api::CatalogApi;
    use crate::error::ClientError;
    use crate::form::ProductForm;

    /// Catalog service double backed by a vector.
    #[derive(Default)]
    struct FakeApi {
        products: Mutex<Vec<Product>>,
        calls: Mutex<Vec<&'static str>>,
        fail_next: Mutex<Option<ClientError>>,
    }

    impl FakeApi {
        fn seeded(products: Vec<Product>) -> Self {
            Self { products: Mutex::new(products), ..Self::default() }
        }

        fn record(&self, call: &'static str) -> Result<(), ClientError> {
            self.calls.lock().expect("calls").push(call);
            match self.fail_next.lock().expect("fail_next").take() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        }

        fn fail_with(&self, status: u16, message: &str) {
            *self.fail_next.lock().expect("fail_next") =
                Some(ClientError::Api { status, message: message.to_string() });
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().expect("calls").clone()
        }
    }

    #[async_trait]
    impl CatalogApi for FakeApi {
        async fn list(&self) -> Result<Vec<Product>, ClientError> {
            self.record("list")?;
            Ok(self.products.lock().expect("products").clone())
        }

        async fn create(&self, input: &ProductInput) -> Result<Product, ClientError> {
            self.record("create")?;
            let new_product = NewProduct::try_from(input.clone())
                .map_err(|e| ClientError::Api { status: 400, message: e.to_string() })?;
            let product = Product::create(new_product, Utc::now());
            self.products.lock().expect("products").push(product.clone());
            Ok(product)
        }

        async fn update(
            &self,
            id: &ProductId,
            input: &ProductInput,
        ) -> Result<Product, ClientError> {
            self.record("update")?;
            let patch = ProductPatch::try_from(input.clone())
                .map_err(|e| ClientError::Api { status: 400, message: e.to_string() })?;
            let mut products = self.products.lock().expect("products");
            let slot = products.iter_mut().find(|product| &product.id == id).ok_or(
                ClientError::Api { status: 404, message: "Product not found".to_string() },
            )?;
            *slot = slot.clone().apply(patch, Utc::now());
            Ok(slot.clone())
        }

        async fn delete(&self, id: &ProductId) -> Result<String, ClientError> {
            self.record("delete")?;
            let mut products = self.products.lock().expect("products");
            let before = products.len();
            products.retain(|product| &product.id != id);
            if products.len() == before {
                return Err(ClientError::Api { status: 404, message: "Product not found".into() });
            }
            Ok("Product deleted".to_string())
        }
    }

    struct Answer(bool);

    impl Confirm for Answer {
        fn confirm(&self, prompt: &str) -> bool {
            assert!(prompt.contains("cannot be undone"));
            self.0
        }
    }

    fn product(name: &str, cents: i64, category: Option<&str>) -> Product {
        Product::create(
            NewProduct {
                name: name.to_string(),
                price: Price::new(Decimal::new(cents, 2)).expect("positive"),
                image: format!("https://img.example/{name}.png"),
                category: category.map(str::to_string),
            },
            Utc::now(),
        )
    }

    fn seed() -> Vec<Product> {
        vec![
            product("Pixel Buds", 9900, Some("Audio")),
            product("Desk Lamp", 3500, None),
            product("Speaker", 4500, Some("Audio")),
        ]
    }

    async fn ready_client() -> CatalogClient<FakeApi> {
        let mut client = CatalogClient::new(FakeApi::seeded(seed()));
        client.load().await.expect("load");
        client
    }

    fn widget_form() -> ProductForm {
        ProductForm {
            name: "Widget".to_string(),
            price: "9.99".to_string(),
            image: "http://x/y.png".to_string(),
            category: String::new(),
        }
    }

    #[tokio::test]
    async fn load_moves_from_loading_to_ready() {
        let mut client = CatalogClient::new(FakeApi::seeded(seed()));
        assert_eq!(client.state(), &LoadState::Loading);

        client.load().await.expect("load");

        assert_eq!(client.state(), &LoadState::Ready);
        assert_eq!(client.products().len(), 3);
        assert_eq!(client.categories(), vec!["all", "Audio", "Uncategorized"]);
    }

    #[tokio::test]
    async fn failed_load_is_recoverable_by_retry() {
        let api = FakeApi::seeded(seed());
        api.fail_with(500, "Server error");
        let mut client = CatalogClient::new(api);

        let error = client.load().await.expect_err("first load fails");
        assert_eq!(error.status(), Some(500));
        assert_eq!(client.state(), &LoadState::Failed("Server error".to_string()));
        assert!(client.products().is_empty());

        client.retry().await.expect("retry succeeds");
        assert_eq!(client.state(), &LoadState::Ready);
        assert_eq!(client.products().len(), 3);
    }

    #[tokio::test]
    async fn search_filter_and_sort_drive_the_visible_view() {
        let mut client = ready_client().await;

        client.set_search("SPEAK");
        let visible = client.visible();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Speaker");

        client.clear_filters();
        client.set_category(CategoryFilter::from("Audio"));
        client.set_sort(SortOrder::PriceAsc);
        let names: Vec<&str> = client.visible().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Speaker", "Pixel Buds"]);

        client.clear_filters();
        assert_eq!(client.visible().len(), 3);
        assert_eq!(client.query().sort, SortOrder::PriceAsc);

        client.toggle_layout();
        assert_eq!(client.layout(), Layout::List);
    }

    #[tokio::test]
    async fn create_appends_server_record_and_returns_to_catalog() {
        let mut client = ready_client().await;
        client.open_create();
        assert_eq!(client.view(), View::Editor);

        let created = client.submit(widget_form()).await.expect("create");

        assert_eq!(client.view(), View::Catalog);
        assert_eq!(client.editing(), None);
        assert_eq!(client.products().len(), 4);
        assert_eq!(client.products().last(), Some(&created));
        assert_eq!(created.price.amount(), Decimal::new(999, 2));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_service() {
        let mut client = ready_client().await;
        client.open_create();

        let error = client
            .submit(ProductForm { price: "0".to_string(), ..widget_form() })
            .await
            .expect_err("invalid price");

        match error {
            ClientError::Invalid(errors) => {
                assert_eq!(errors.price, Some("Price must be a positive number"))
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(client.api.calls(), vec!["list"]);
        assert_eq!(client.view(), View::Editor);
        assert_eq!(client.form().price, "0");
    }

    #[tokio::test]
    async fn edit_replaces_record_in_place() {
        let mut client = ready_client().await;
        let lamp = client.products()[1].clone();

        client.open_edit(&lamp.id).expect("open edit");
        assert_eq!(client.form().name, "Desk Lamp");
        let form = ProductForm { price: "40".to_string(), ..client.form().clone() };

        let updated = client.submit(form).await.expect("update");

        assert_eq!(updated.id, lamp.id);
        assert_eq!(updated.price.amount(), Decimal::new(40, 0));
        assert_eq!(client.products()[1], updated);
        assert_eq!(client.products().len(), 3);
        assert_eq!(client.editing(), None);
    }

    #[tokio::test]
    async fn failed_submit_leaves_snapshot_untouched() {
        let mut client = ready_client().await;
        let before = client.products().to_vec();
        client.api.fail_with(500, "Server error");
        client.open_create();

        let error = client.submit(widget_form()).await.expect_err("server failure");

        assert_eq!(error.to_string(), "Server error");
        assert_eq!(client.products(), before.as_slice());
        assert_eq!(client.view(), View::Editor);
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let mut client = ready_client().await;
        let target = client.products()[0].id;

        let outcome = client.delete(&target, &Answer(false)).await.expect("cancelled");
        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(client.products().len(), 3);
        assert_eq!(client.api.calls(), vec!["list"]);

        let outcome = client.delete(&target, &Answer(true)).await.expect("deleted");
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(client.products().iter().all(|product| product.id != target));
        assert_eq!(client.api.calls(), vec!["list", "delete"]);
    }

    #[tokio::test]
    async fn unknown_product_cannot_be_edited_or_deleted() {
        let mut client = ready_client().await;
        let stranger = ProductId::new();

        assert!(matches!(client.open_edit(&stranger), Err(ClientError::UnknownProduct(_))));
        assert!(matches!(
            client.delete(&stranger, &Answer(true)).await,
            Err(ClientError::UnknownProduct(_))
        ));
    }
}
