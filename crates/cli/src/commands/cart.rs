//! Cart commands: show, add, set quantity, remove, clear.
//!
//! Destructive actions (remove, clear) ask for confirmation unless `--yes`
//! is passed. Quantity decrements stop at 1 - removing a line is its own
//! explicit command, matching the backend's asymmetry between implicit
//! merge-on-add and explicit removal.

use lotus_core::CartLineId;
use lotus_storefront::StoreError;
use lotus_storefront::cart::Cart;
use lotus_storefront::state::AppState;

use super::{confirm, or_login_hint};

/// Show the cart with line ids, line totals, and the subtotal.
pub async fn show(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let Some(cart) = or_login_hint(state.cart().load().await)? else {
        return Ok(());
    };

    render(&cart);
    Ok(())
}

/// Add a product to the cart by slug.
///
/// The requested quantity is clamped into `1..=stock` before the call is
/// issued; the backend still has the final word and its verdict is read
/// back from the authoritative reload.
pub async fn add(
    state: &AppState,
    slug: &str,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let product = match state.api().product_by_slug(slug).await {
        Ok(product) => product,
        Err(StoreError::NotFound(_)) => {
            println!("No product with slug `{slug}`.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    if !product.in_stock() {
        println!("{} is out of stock.", product.product_name);
        return Ok(());
    }

    let clamped = quantity.clamp(1, product.stock_quantity);
    if clamped != quantity {
        println!(
            "Quantity adjusted to {clamped} ({} available).",
            product.stock_quantity
        );
    }

    let result = state.cart().add_line(product.id, clamped).await;
    let Some(cart) = or_login_hint(result)? else {
        return Ok(());
    };

    println!("Added {} x{clamped}.", product.product_name);
    render(&cart);
    Ok(())
}

/// Set the quantity of a cart line.
pub async fn set_quantity(
    state: &AppState,
    line: i32,
    quantity: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if quantity < 1 {
        println!("Quantity cannot go below 1. Use `lotus cart remove {line}` to delete the line.");
        return Ok(());
    }

    let result = state.cart().set_quantity(CartLineId::new(line), quantity).await;
    match result {
        Ok(cart) => render(&cart),
        Err(StoreError::Unauthenticated) => {
            println!("You are not signed in. Run `lotus login <email>` first.");
        }
        // Stock bound or similar - show the backend's message as-is and
        // leave the cart unchanged.
        Err(err @ (StoreError::Rejected(_) | StoreError::NotFound(_))) => {
            println!("Could not update quantity: {err}");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Remove one line after confirmation.
pub async fn remove(
    state: &AppState,
    line: i32,
    yes: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !yes && !confirm("Remove this line from the cart?")? {
        println!("Kept.");
        return Ok(());
    }

    let result = state.cart().remove_line(CartLineId::new(line)).await;
    match result {
        Ok(cart) => {
            println!("Removed.");
            render(&cart);
            if cart.is_empty() {
                println!("Browse `lotus products` to keep shopping.");
            }
        }
        Err(StoreError::Unauthenticated) => {
            println!("You are not signed in. Run `lotus login <email>` first.");
        }
        Err(err @ StoreError::NotFound(_)) => println!("Could not remove line: {err}"),
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// Empty the cart after confirmation.
pub async fn clear(state: &AppState, yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes && !confirm("Remove every line from the cart?")? {
        println!("Kept.");
        return Ok(());
    }

    let Some(cart) = or_login_hint(state.cart().clear().await)? else {
        return Ok(());
    };

    render(&cart);
    Ok(())
}

/// Print the cart with per-line totals and the derived subtotal.
fn render(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    for line in cart.lines() {
        println!(
            "#{:<5} {:<36} {:>14} x{:<3} = {}",
            line.id.to_string(),
            line.product.product_name,
            line.product.price.to_string(),
            line.quantity,
            line.line_total()
        );
    }
    println!(
        "Subtotal ({} line{}): {}",
        cart.len(),
        if cart.len() == 1 { "" } else { "s" },
        cart.subtotal()
    );
}
