use storefront_client::ProductForm;
use storefront_core::domain::product::ProductId;

use crate::commands::{client_failure, loaded_client, CommandResult};

/// Fields given on the command line; anything left out keeps its current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateArgs {
    pub name: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
}

impl UpdateArgs {
    pub fn overlay(self, current: &ProductForm) -> ProductForm {
        ProductForm {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            price: self.price.unwrap_or_else(|| current.price.clone()),
            image: self.image.unwrap_or_else(|| current.image.clone()),
            category: self.category.unwrap_or_else(|| current.category.clone()),
        }
    }
}

pub fn run(raw_id: &str, args: UpdateArgs, base_url: Option<String>) -> CommandResult {
    let id = match ProductId::parse(raw_id) {
        Ok(id) => id,
        Err(error) => {
            return CommandResult::failure("update", "validation", error.user_message(), 6)
        }
    };
    let (runtime, mut client) = match loaded_client("update", base_url) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    if let Err(error) = client.open_edit(&id) {
        return client_failure("update", error);
    }
    let form = args.overlay(client.form());

    match runtime.block_on(client.submit(form)) {
        Ok(product) => CommandResult::success(
            "update",
            format!("updated product {} ({}, ${})", product.id, product.name, product.price),
        ),
        Err(error) => client_failure("update", error),
    }
}
