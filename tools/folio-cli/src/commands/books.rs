//! Catalogue commands.

use anyhow::{Context as _, Result};
use folio_commerce::prelude::Book;
use folio_data::StoreApi;

use super::{BookFilterArgs, BooksArgs, BooksCommand};
use crate::context::Context;

/// Run the books command.
pub async fn run(args: BooksArgs, ctx: &Context) -> Result<()> {
    let filter = match args.command {
        Some(BooksCommand::List(filter)) => filter,
        None => args.filter,
    };
    list_books(&filter, ctx).await
}

async fn list_books(filter: &BookFilterArgs, ctx: &Context) -> Result<()> {
    let api = ctx.backend()?;
    let query = filter.query();

    let spinner = ctx.output.spinner("Loading books...");
    let result = api.list_books(&query).await;
    spinner.finish_and_clear();
    let mut books = result.context("Failed to load books")?;

    if let Some(limit) = filter.limit {
        books.truncate(limit);
    }

    if ctx.output.is_json() {
        ctx.output.json(&books);
        return Ok(());
    }

    ctx.output.header("Books");
    if books.is_empty() {
        if query.is_empty() {
            ctx.output.info("The catalogue is empty.");
        } else {
            ctx.output.info("No books match those filters.");
        }
        return Ok(());
    }

    let widths = [6, 34, 24, 9, 9];
    ctx.output
        .table_row(&["ID", "TITLE", "AUTHORS", "PRICE", "STOCK"], &widths);
    for book in &books {
        ctx.output.table_row(
            &[
                &book.id.to_string(),
                &fit(&book.title, widths[1]),
                &fit(&book.authors(), widths[2]),
                &book.price.display(),
                &stock_label(book),
            ],
            &widths,
        );
    }

    println!();
    ctx.output
        .info("Add a book with `folio cart add <ID> --quantity <N>`.");
    Ok(())
}

fn stock_label(book: &Book) -> String {
    if book.is_purchasable() {
        book.quantity.to_string()
    } else {
        "sold out".to_string()
    }
}

/// Shorten `text` to at most `width` characters, marking the cut.
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit() {
        assert_eq!(fit("Emma", 10), "Emma");
        assert_eq!(fit("The Left Hand of Darkness", 10), "The Left …");
        assert_eq!(fit("The Left Hand of Darkness", 10).chars().count(), 10);
    }
}
