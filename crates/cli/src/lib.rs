pub mod commands;

use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;

use storefront_client::ProductForm;
use storefront_core::catalog::{Layout, SortOrder};

use commands::list::ListArgs;
use commands::update::UpdateArgs;

#[derive(Debug, Parser)]
#[command(
    name = "storefront",
    about = "StoreFront catalog CLI",
    long_about = "Browse and edit the product catalog through the StoreFront service, apply migrations, and inspect configuration.",
    after_help = "Examples:\n  storefront list --search lamp --sort price-asc\n  storefront create --name Widget --price 9.99 --image http://x/y.png\n  storefront delete <id> --yes"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Catalog service base URL (overrides client.base_url)")]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Show the catalog with optional search, category filter and sort")]
    List {
        #[arg(long, help = "Case-insensitive substring of the product name")]
        search: Option<String>,
        #[arg(long, help = "Category label, `Uncategorized`, or `all`")]
        category: Option<String>,
        #[arg(long, default_value = "name-asc", help = "name-asc|name-desc|price-asc|price-desc")]
        sort: SortOrder,
        #[arg(long, default_value = "grid", help = "grid|list")]
        layout: Layout,
    },
    #[command(about = "Create a product")]
    Create(FormArgs),
    #[command(about = "Update a product; omitted fields keep their current values")]
    Update {
        id: String,
        #[command(flatten)]
        fields: PatchArgs,
    },
    #[command(about = "Delete a product after confirmation")]
    Delete {
        id: String,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

#[derive(Debug, Args)]
struct FormArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    price: String,
    #[arg(long)]
    image: String,
    #[arg(long, default_value = "")]
    category: String,
}

#[derive(Debug, Args)]
struct PatchArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    price: Option<String>,
    #[arg(long)]
    image: Option<String>,
    #[arg(long, help = "New category; an empty value clears it")]
    category: Option<String>,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let base_url = cli.base_url;

    let result = match cli.command {
        Command::List { search, category, sort, layout } => {
            commands::list::run(ListArgs { search, category, sort, layout }, base_url)
        }
        Command::Create(form) => commands::create::run(
            ProductForm {
                name: form.name,
                price: form.price,
                image: form.image,
                category: form.category,
            },
            base_url,
        ),
        Command::Update { id, fields } => commands::update::run(
            &id,
            UpdateArgs {
                name: fields.name,
                price: fields.price,
                image: fields.image,
                category: fields.category,
            },
            base_url,
        ),
        Command::Delete { id, yes } => commands::delete::run(&id, yes, base_url),
        Command::Migrate => commands::migrate::run(),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
