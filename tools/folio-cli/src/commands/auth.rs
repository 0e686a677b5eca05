//! Bearer token commands.

use anyhow::{bail, Context as _, Result};
use chrono::{DateTime, Local};
use dialoguer::{Input, Password};
use folio_data::{StoreApi, TokenStore};

use super::{AuthArgs, AuthCommand};
use crate::context::Context;

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Login { username, password } => login(username, password, ctx).await,
        AuthCommand::SetToken { token } => set_token(&token, ctx),
        AuthCommand::Clear => clear_token(ctx),
        AuthCommand::Status => status(ctx),
    }
}

async fn login(username: Option<String>, password: Option<String>, ctx: &Context) -> Result<()> {
    let username = match username.filter(|u| !u.trim().is_empty()) {
        Some(username) => username.trim().to_string(),
        None if ctx.output.is_json() => bail!("--username is required with --json"),
        None => Input::<String>::new().with_prompt("Username").interact_text()?,
    };
    let password = match password.filter(|p| !p.is_empty()) {
        Some(password) => password,
        None if ctx.output.is_json() => bail!("--password is required with --json"),
        None => Password::new().with_prompt("Password").interact()?,
    };

    let api = ctx.backend()?;
    let spinner = ctx.output.spinner("Logging in...");
    let result = api.login(&username, &password).await;
    spinner.finish_and_clear();
    let token = result.context("Login failed")?;

    let store = ctx.token_store();
    store.save(&token).context("Failed to save token")?;
    tracing::info!(username = %username, "logged in");

    ctx.output.success(&format!("Logged in as {username}"));
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "authenticated": true,
            "username": username,
            "path": store.path().display().to_string(),
        }));
    }
    Ok(())
}

fn set_token(token: &str, ctx: &Context) -> Result<()> {
    let token = token.trim().trim_start_matches("Bearer ").trim();
    if token.is_empty() {
        bail!("Token must not be empty");
    }

    let store = ctx.token_store();
    store.save(token).context("Failed to save token")?;

    ctx.output
        .success(&format!("Token saved to {}", store.path().display()));
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "saved": true,
            "path": store.path().display().to_string(),
        }));
    }
    Ok(())
}

fn clear_token(ctx: &Context) -> Result<()> {
    let store = ctx.token_store();
    store.clear().context("Failed to clear token")?;
    ctx.output.success("Token cleared");
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "cleared": true }));
    }
    Ok(())
}

fn status(ctx: &Context) -> Result<()> {
    let store = ctx.token_store();
    let token = store.load().context("Failed to read token")?;

    let saved_at = std::fs::metadata(store.path())
        .and_then(|m| m.modified())
        .ok()
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string());

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "authenticated": token.is_some(),
            "path": store.path().display().to_string(),
            "savedAt": saved_at,
        }));
        return Ok(());
    }

    ctx.output.header("Authentication");
    match token {
        Some(token) => {
            ctx.output.kv("token", &mask(&token));
            if let Some(saved_at) = saved_at {
                ctx.output.kv("saved", &saved_at);
            }
        }
        None => {
            ctx.output.kv("token", "none");
            ctx.output.info("Run `folio auth login` to sign in.");
        }
    }
    ctx.output.kv("file", &store.path().display().to_string());
    Ok(())
}

/// Show only the ends of a token.
fn mask(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask("short"), "*****");
        assert_eq!(mask("eyJhbGciOiJIUzI1NiJ9.payload"), "eyJh…load");
    }
}
