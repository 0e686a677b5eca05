//! Promo code commands.

use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use folio_checkout::CartStore;
use folio_data::StoreApi;

use super::{PromoArgs, PromoCommand};
use crate::context::Context;

/// Run the promo command.
pub async fn run(args: PromoArgs, ctx: &Context) -> Result<()> {
    match args.command {
        PromoCommand::Validate { code } => validate(&code, ctx).await,
    }
}

async fn validate(code: &str, ctx: &Context) -> Result<()> {
    let code = code.trim();
    if code.is_empty() {
        bail!("Promo code must not be empty");
    }

    let api: Arc<dyn StoreApi> = ctx.backend()?;
    let cart = CartStore::new(api.clone());

    let spinner = ctx.output.spinner("Checking promo code...");
    let result = async {
        cart.refresh().await.context("Failed to load cart")?;
        let total = cart.total().await?;
        let validation = api
            .validate_promo(code, total)
            .await
            .context("Failed to validate promo code")?;
        anyhow::Ok((total, validation))
    }
    .await;
    spinner.finish_and_clear();
    let (total, validation) = result?;

    if ctx.output.is_json() {
        ctx.output.json(&validation);
        return Ok(());
    }

    let message = validation.message.clone().unwrap_or_default();
    if validation.valid {
        let line = format!("{code} is valid. {message}");
        ctx.output.success(line.trim_end());
        ctx.output.kv("cart total", &total.display());
        if let Some(discount) = validation.discount {
            ctx.output.kv("discount", &discount.display());
        }
        if let Some(discounted) = validation.discounted_total {
            ctx.output.kv("new total", &discounted.display());
        }
    } else if message.is_empty() {
        ctx.output.warn(&format!("{code} is not a valid promo code."));
    } else {
        ctx.output.warn(&message);
    }
    Ok(())
}
