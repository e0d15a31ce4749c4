//! # Imageline Main Entry Point
//!
//! Drives the client core from the command line: exchange an
//! authorization code, page through the feed, toggle a like, and show the
//! profile, all through the same controller the library exposes.

use std::sync::Arc;

use anyhow::{Context, Result};

use imageline::cmd_args::CommandLineArgs;
use imageline::config::{self, IniProfileStore};
use imageline::{AppController, FileTokenStore, HttpClient, Presentation};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = CommandLineArgs::parse();

    let profile_path = config::get_profile_path();
    let profiles = IniProfileStore::new(&profile_path);
    let client = profiles.load_profile(args.profile())?.with_context(|| {
        format!(
            "profile '{}' not found in '{}'; add a [{}] section with access_key and secret_key",
            args.profile(),
            profile_path,
            args.profile()
        )
    })?;

    let mut app = AppController::new(
        client,
        Arc::new(HttpClient::new()),
        Box::new(FileTokenStore::from_env()),
        Box::new(present_to_stdout),
    )?;

    if args.logout() {
        app.logout();
        println!("Logged out");
        return Ok(());
    }

    if let Some(code) = args.auth_code() {
        app.login(
            code,
            Box::new(|result| match result {
                Ok(_) => println!("Logged in"),
                Err(e) => eprintln!("Login failed: {e}"),
            }),
        );
        app.run_until_idle().await;
    }

    if app.token().is_none() {
        println!("Open this URL to authorize, then rerun with --auth-code <code>:");
        println!("{}", app.authorization_request_url()?);
        return Ok(());
    }

    for _ in 0..args.pages() {
        app.load_next_page(Box::new(|result| {
            if let Err(e) = result {
                eprintln!("Feed page failed: {e}");
            }
        }));
        app.run_until_idle().await;
    }

    if let Some(index) = args.like() {
        app.toggle_like(
            index,
            Box::new(move |result| match result {
                Ok(()) => println!("Toggled like on photo {index}"),
                Err(e) => eprintln!("Like toggle failed: {e}"),
            }),
        );
        app.run_until_idle().await;
    }

    app.load_profile(Box::new(|result| {
        if let Err(e) = result {
            eprintln!("Profile fetch failed: {e}");
        }
    }));
    app.run_until_idle().await;

    if let Some(username) = app.profile().map(|p| p.username.clone()) {
        app.load_avatar(&username, Box::new(|_| {}));
        app.run_until_idle().await;
    }

    Ok(())
}

fn present_to_stdout(view: Presentation) {
    match view {
        Presentation::Feed(lines) => {
            println!("── Feed ──");
            for line in lines {
                println!("{line}");
            }
        }
        Presentation::Profile(lines) => {
            println!("── Profile ──");
            for line in lines {
                println!("{line}");
            }
        }
        Presentation::Alert(message) => println!("! {message}"),
    }
}
