use std::fmt::Write;

use storefront_core::catalog::{CatalogStats, Layout};
use storefront_core::domain::product::Product;

const NAME_WIDTH: usize = 28;
const CATEGORY_WIDTH: usize = 16;

/// Terminal rendering of a catalog view.
pub fn catalog(
    visible: &[&Product],
    total: usize,
    layout: Layout,
    stats: &CatalogStats,
    categories: &[String],
) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} products | total value ${:.2} | average price ${:.2}",
        stats.count, stats.total_value, stats.average_price
    );
    let _ = writeln!(out, "categories: {}", categories.join(", "));
    let _ = writeln!(out);

    if visible.is_empty() {
        out.push_str(if total == 0 { "No products yet." } else { "No products match the current filters." });
        return out;
    }

    match layout {
        Layout::Grid => grid(&mut out, visible),
        Layout::List => list(&mut out, visible),
    }
    let _ = write!(out, "showing {} of {total}", visible.len());
    out
}

fn grid(out: &mut String, visible: &[&Product]) {
    let _ = writeln!(
        out,
        "{:<36}  {:<NAME_WIDTH$}  {:>10}  {:<CATEGORY_WIDTH$}",
        "ID", "NAME", "PRICE", "CATEGORY"
    );
    for product in visible {
        let _ = writeln!(
            out,
            "{:<36}  {:<NAME_WIDTH$}  {:>10}  {:<CATEGORY_WIDTH$}",
            product.id.to_string(),
            truncate(&product.name, NAME_WIDTH),
            format!("${}", product.price),
            truncate(product.category_label(), CATEGORY_WIDTH),
        );
    }
}

fn list(out: &mut String, visible: &[&Product]) {
    for product in visible {
        let _ = writeln!(out, "{} (${})", product.name, product.price);
        let _ = writeln!(out, "  id:       {}", product.id);
        let _ = writeln!(out, "  category: {}", product.category_label());
        let _ = writeln!(out, "  image:    {}", product.image);
        let _ = writeln!(out, "  updated:  {}", product.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}
