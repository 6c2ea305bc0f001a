//! Order commands: checkout and history.

use lotus_storefront::StoreError;
use lotus_storefront::checkout::OrderDraft;
use lotus_storefront::state::AppState;

/// Convert the cart into an order.
///
/// The flow loads the authoritative cart on entry; an empty cart routes
/// back to browsing instead of proceeding. Shipping details come from the
/// command line, so a failed submission can be retried with the exact same
/// invocation.
pub async fn checkout(
    state: &AppState,
    phone: String,
    address: String,
    note: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut flow = match state.begin_checkout().await {
        Ok(flow) => flow,
        Err(StoreError::Unauthenticated) => {
            println!("You are not signed in. Run `lotus login <email>` first.");
            return Ok(());
        }
        Err(StoreError::EmptyCart) => {
            println!("Your cart is empty - nothing to check out.");
            println!("Browse `lotus products` and `lotus cart add <slug>` to fill it.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("Checking out:");
    for line in flow.cart().lines() {
        println!(
            "  {} x{} = {}",
            line.product.product_name,
            line.quantity,
            line.line_total()
        );
    }
    println!("Subtotal: {}", flow.subtotal());
    println!("Payment: cash on delivery");
    println!();

    let draft = OrderDraft {
        phone,
        address,
        note: note.unwrap_or_default(),
    };

    match flow.submit(&draft).await {
        Ok(order) => {
            println!(
                "Order #{} placed - total {} ({}).",
                order.id,
                order.total_amount,
                order.status.label()
            );
            println!("See it with `lotus orders`.");
        }
        Err(err @ (StoreError::Validation(_) | StoreError::Rejected(_))) => {
            println!("Could not place the order: {err}");
            println!("Fix the details and run the same command again.");
        }
        Err(err) => return Err(err.into()),
    }

    Ok(())
}

/// List the identity's orders, newest first (backend ordering).
pub async fn list(state: &AppState) -> Result<(), Box<dyn std::error::Error>> {
    let Some(orders) = super::or_login_hint(state.orders().list().await)? else {
        return Ok(());
    };

    if orders.is_empty() {
        println!("No orders yet.");
        return Ok(());
    }

    for order in &orders {
        println!(
            "#{:<5} {}  {}  {} {}",
            order.id.to_string(),
            order.created_at.format("%Y-%m-%d %H:%M"),
            order.total_amount,
            order.status.badge(),
            order.status.label()
        );
        for item in &order.order_items {
            println!("       {} x{} = {}", item.product_name, item.quantity, item.line_total());
        }
        println!("       Deliver to: {} ({})", order.address, order.phone);
        if let Some(note) = order.note.as_deref().filter(|note| !note.is_empty()) {
            println!("       Note: {note}");
        }
        println!();
    }

    Ok(())
}
