//! Cart commands.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use dialoguer::Confirm;
use folio_checkout::CartStore;
use folio_commerce::prelude::Cart;
use folio_data::{ApiError, StoreApi};

use super::{CartArgs, CartCommand};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    let api: Arc<dyn StoreApi> = ctx.backend()?;
    let store = CartStore::new(api);

    match args.command {
        Some(CartCommand::Show) | None => show_cart(&store, ctx).await,
        Some(CartCommand::Add { book, quantity }) => {
            let result = store.add(book, quantity).await;
            report_edit(result, &format!("Added {quantity} × book {book}"), ctx)
        }
        Some(CartCommand::Update { book, quantity }) => {
            let result = store.update_quantity(book, quantity).await;
            report_edit(result, &format!("Book {book} quantity set to {quantity}"), ctx)
        }
        Some(CartCommand::Remove { book }) => {
            let result = store.remove(book).await;
            report_edit(result, &format!("Removed book {book}"), ctx)
        }
        Some(CartCommand::Clear { yes }) => clear_cart(&store, yes, ctx).await,
    }
}

async fn show_cart(store: &CartStore, ctx: &Context) -> Result<()> {
    let spinner = ctx.output.spinner("Loading cart...");
    let result = store.refresh().await;
    spinner.finish_and_clear();
    let cart = result.context("Failed to load cart")?;

    if ctx.output.is_json() {
        let total = cart.total()?;
        ctx.output.json(&serde_json::json!({
            "cart": cart,
            "total": total.to_decimal(),
            "display": total.display(),
        }));
        return Ok(());
    }

    print_cart(&cart, ctx)
}

/// Print cart lines and total.
pub fn print_cart(cart: &Cart, ctx: &Context) -> Result<()> {
    ctx.output.header("Cart");

    if cart.is_empty() {
        ctx.output.info("Your cart is empty.");
        return Ok(());
    }

    let widths = [36, 5, 10, 10];
    ctx.output
        .table_row(&["TITLE", "QTY", "PRICE", "SUBTOTAL"], &widths);
    for item in &cart.items {
        let subtotal = item.line_total()?;
        ctx.output.table_row(
            &[
                &item.book_title,
                &item.quantity.to_string(),
                &item.book_price.display(),
                &subtotal.display(),
            ],
            &widths,
        );
    }

    println!();
    ctx.output.kv("items", &cart.item_count().to_string());
    ctx.output.kv("total", &cart.total()?.display());
    Ok(())
}

/// Print the cart a cart edit returned.
fn report_edit(result: Result<Cart, ApiError>, done: &str, ctx: &Context) -> Result<()> {
    let cart = result.context("Failed to update cart")?;

    if ctx.output.is_json() {
        let total = cart.total()?;
        ctx.output.json(&serde_json::json!({
            "cart": cart,
            "total": total.to_decimal(),
            "display": total.display(),
        }));
        return Ok(());
    }

    ctx.output.success(done);
    print_cart(&cart, ctx)
}

async fn clear_cart(store: &CartStore, yes: bool, ctx: &Context) -> Result<()> {
    if !yes && !ctx.output.is_json() {
        let confirmed = Confirm::new()
            .with_prompt("Remove every item from your cart?")
            .default(false)
            .interact()?;
        if !confirmed {
            ctx.output.info("Cart left unchanged.");
            return Ok(());
        }
    }

    store.clear().await.context("Failed to clear cart")?;
    ctx.output.success("Cart cleared");
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "cleared": true }));
    }
    Ok(())
}
