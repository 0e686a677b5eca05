//! Order history commands.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use folio_checkout::OrderHistoryStore;
use folio_commerce::prelude::Order;
use folio_data::StoreApi;

use super::{OrdersArgs, OrdersCommand};
use crate::context::Context;
use crate::output::{format_order_date, status_badge};

/// Run the orders command.
pub async fn run(args: OrdersArgs, ctx: &Context) -> Result<()> {
    match args.command {
        Some(OrdersCommand::List) | None => list_orders(args.limit, ctx).await,
    }
}

async fn list_orders(limit: Option<usize>, ctx: &Context) -> Result<()> {
    let api: Arc<dyn StoreApi> = ctx.backend()?;
    let store = OrderHistoryStore::new(api);

    let spinner = ctx.output.spinner("Loading orders...");
    let result = store.refresh().await;
    spinner.finish_and_clear();
    let mut orders = result.context("Failed to load order history")?;

    // Newest first
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));
    if let Some(limit) = limit {
        orders.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header("Orders");
    if orders.is_empty() {
        ctx.output.info("No orders yet.");
        return Ok(());
    }

    let widths = [18, 18, 10, 12, 12];
    ctx.output
        .table_row(&["ORDER", "DATE", "TOTAL", "PAYMENT", "STATUS"], &widths);
    for order in &orders {
        print_order_row(order, &widths, ctx);
    }
    Ok(())
}

fn print_order_row(order: &Order, widths: &[usize], ctx: &Context) {
    let date = order
        .order_date
        .as_deref()
        .map(format_order_date)
        .unwrap_or_default();
    let status = order
        .status
        .as_deref()
        .map(status_badge)
        .unwrap_or_default();
    ctx.output.table_row(
        &[
            &order.reference(),
            &date,
            &order.total_amount.display(),
            order.payment_method.as_deref().unwrap_or("-"),
            &status,
        ],
        widths,
    );
}
