use storefront_client::{CatalogApi, CatalogClient};
use storefront_core::catalog::{CategoryFilter, Layout, SortOrder};

use crate::commands::{loaded_client, render, CommandResult};

#[derive(Debug, Clone, Default)]
pub struct ListArgs {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort: SortOrder,
    pub layout: Layout,
}

pub fn run(args: ListArgs, base_url: Option<String>) -> CommandResult {
    match loaded_client("list", base_url) {
        Ok((_runtime, mut client)) => CommandResult::text(view(&mut client, args)),
        Err(failure) => failure,
    }
}

/// Applies the arguments to a loaded client and renders what it shows.
pub fn view<A: CatalogApi>(client: &mut CatalogClient<A>, args: ListArgs) -> String {
    if let Some(search) = args.search {
        client.set_search(search);
    }
    if let Some(category) = args.category.as_deref() {
        client.set_category(CategoryFilter::from(category));
    }
    client.set_sort(args.sort);
    client.set_layout(args.layout);

    render::catalog(
        &client.visible(),
        client.products().len(),
        client.layout(),
        &client.stats(),
        &client.categories(),
    )
}
