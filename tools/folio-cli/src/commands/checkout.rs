//! Checkout command.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context as _, Result};
use async_trait::async_trait;
use dialoguer::Confirm;
use folio_checkout::{
    CardState, CartStore, CheckoutSession, Confirmation, Navigator, OrderHistoryStore,
    PaymentProvider, ProviderError, Route, Severity, SimulatedWallet, SubmitOutcome,
};
use folio_commerce::prelude::{PaymentIntent, PaymentMode, Receipt};
use folio_data::StoreApi;

use super::cart::print_cart;
use super::CheckoutArgs;
use crate::context::Context;
use crate::output::Output;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let mode = PaymentMode::from(args.mode);
    let address = args.address.replace("\\n", "\n");

    let api: Arc<dyn StoreApi> = ctx.backend()?;
    let cart = Arc::new(CartStore::new(api.clone()));
    let orders = Arc::new(OrderHistoryStore::new(api.clone()));

    let spinner = ctx.output.spinner("Loading cart...");
    let loaded = cart.refresh().await;
    spinner.finish_and_clear();
    let snapshot = loaded.context("Failed to load cart")?;

    if !ctx.output.is_json() {
        print_cart(&snapshot, ctx)?;
    }

    let navigator = Arc::new(ReceiptPrinter {
        output: ctx.output.clone(),
    });
    let session = CheckoutSession::new(api, cart.clone(), orders, navigator)
        .with_card_provider(Arc::new(ConsoleCardProvider {
            auto_confirm: args.yes,
        }))
        .with_wallet(Arc::new(SimulatedWallet::new(Duration::from_millis(
            ctx.config.checkout.wallet_delay_ms,
        ))));

    session.select_mode(mode).await;
    session.set_shipping_address(address).await;
    session.set_promo_code(args.promo).await;

    if mode == PaymentMode::Card {
        let spinner = ctx.output.spinner("Preparing card payment...");
        let state = session.sync_payment_intent().await;
        spinner.finish_and_clear();
        if let CardState::Unavailable { .. } = state {
            if let Some(notice) = session.notice().await {
                bail!(notice.text);
            }
        }
    }

    if !args.yes && !ctx.output.is_json() {
        let total = cart.total().await?;
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Place a {} order for {}?",
                mode.display_name(),
                total.display()
            ))
            .default(true)
            .interact()?;
        if !confirmed {
            ctx.output.info("Checkout cancelled.");
            return Ok(());
        }
    }

    let spinner = match mode {
        PaymentMode::Card => None,
        PaymentMode::Wallet | PaymentMode::CashOnDelivery => {
            Some(ctx.output.spinner("Placing order..."))
        }
    };
    let outcome = session.submit().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match outcome {
        SubmitOutcome::Placed(order) => {
            if ctx.output.is_json() {
                ctx.output.json(&Receipt::from_order(&order));
            } else if let Some(notice) = session.notice().await {
                ctx.output.notice(&notice);
            }
            Ok(())
        }
        SubmitOutcome::Pending(status) => {
            if ctx.output.is_json() {
                ctx.output
                    .json(&serde_json::json!({ "pending": status.as_str() }));
            } else if let Some(notice) = session.notice().await {
                ctx.output.notice(&notice);
            }
            Ok(())
        }
        SubmitOutcome::Failed(err) => {
            let notice = err.notice();
            tracing::debug!(error = %err, "checkout failed");
            if notice.severity == Severity::Error {
                Err(anyhow!(notice.text))
            } else {
                ctx.output.notice(&notice);
                Ok(())
            }
        }
        SubmitOutcome::InFlight => bail!("A checkout is already in progress"),
    }
}

/// Confirms card payments on the console.
///
/// Card details are entered on the provider's hosted page; the console only
/// asks the shopper to confirm that the payment went through.
struct ConsoleCardProvider {
    auto_confirm: bool,
}

#[async_trait]
impl PaymentProvider for ConsoleCardProvider {
    async fn collect_payment_details(
        &self,
        intent: &PaymentIntent,
    ) -> Result<Confirmation, ProviderError> {
        let intent_id = intent
            .id
            .clone()
            .ok_or_else(|| ProviderError::Submission("Payment intent has no id".to_string()))?;

        if self.auto_confirm {
            return Ok(Confirmation::succeeded(intent_id));
        }

        let prompt = format!(
            "Confirm card payment of {} for intent {}?",
            intent.amount.display(),
            intent_id
        );
        let confirmed = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await
        .map_err(|e| ProviderError::Unavailable(e.to_string()))?
        .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        if confirmed {
            Ok(Confirmation::succeeded(intent_id))
        } else {
            Err(ProviderError::Cancelled)
        }
    }
}

/// Prints the receipt when the session navigates to it.
struct ReceiptPrinter {
    output: Output,
}

impl Navigator for ReceiptPrinter {
    fn navigate(&self, route: Route) {
        let Route::Receipt(order) = route;
        self.output.header("Receipt");
        for line in Receipt::from_order(&order).lines() {
            self.output.line(&line);
        }
    }
}
