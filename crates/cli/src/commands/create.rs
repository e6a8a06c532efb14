use storefront_client::ProductForm;

use crate::commands::{client_failure, loaded_client, CommandResult};

pub fn run(form: ProductForm, base_url: Option<String>) -> CommandResult {
    let (runtime, mut client) = match loaded_client("create", base_url) {
        Ok(loaded) => loaded,
        Err(failure) => return failure,
    };

    client.open_create();
    match runtime.block_on(client.submit(form)) {
        Ok(product) => CommandResult::success(
            "create",
            format!("created product {} ({}, ${})", product.id, product.name, product.price),
        ),
        Err(error) => client_failure("create", error),
    }
}
