//! Catalog commands: products, product detail, categories.

use lotus_core::CategoryId;
use lotus_storefront::StoreError;
use lotus_storefront::api::ProductRef;
use lotus_storefront::state::AppState;

/// List products, optionally filtered by search text or category id.
pub async fn products(
    state: &AppState,
    search: Option<&str>,
    category: Option<i32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let products = state
        .api()
        .products(search, category.map(CategoryId::new))
        .await?;

    if products.is_empty() {
        println!("No products found.");
        return Ok(());
    }

    for product in &products {
        println!("{}", listing_line(product));
    }

    Ok(())
}

/// Show one product in detail.
pub async fn product(state: &AppState, slug: &str) -> Result<(), Box<dyn std::error::Error>> {
    let product = match state.api().product_by_slug(slug).await {
        Ok(product) => product,
        Err(StoreError::NotFound(_)) => {
            println!("No product with slug `{slug}`.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("{}", product.product_name);
    println!("Price: {}", product.price);
    if product.in_stock() {
        println!("In stock: {} available", product.stock_quantity);
    } else {
        println!("Out of stock");
    }
    if let Some(category) = &product.category {
        println!("Category: {}", category.category_name);
    }
    if let Some(description) = &product.description {
        println!();
        println!("{description}");
    }
    if let Some(thumbnail) = product.thumbnail() {
        println!();
        println!("Image: {}", thumbnail.image_url);
    }
    println!();
    println!("Add it with: lotus cart add {slug}");

    Ok(())
}

/// List product categories.
pub async fn categories(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let categories = state.api().categories().await?;

    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }

    for category in &categories {
        match category.id {
            Some(id) => println!("{:>4}  {}", id.to_string(), category.category_name),
            None => println!("      {}", category.category_name),
        }
    }

    Ok(())
}

fn listing_line(product: &ProductRef) -> String {
    let stock = if product.in_stock() {
        format!("{} in stock", product.stock_quantity)
    } else {
        "out of stock".to_string()
    };

    let category = product
        .category
        .as_ref()
        .map(|category| format!("  ({})", category.category_name))
        .unwrap_or_default();

    format!(
        "{:<36} {:>14}  {}  [{}]{}",
        product.product_name,
        product.price.to_string(),
        stock,
        product.slug,
        category
    )
}
