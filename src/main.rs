//! Menu Bot - Main Entry Point
//!
//! A demo bot serving a small fruit catalog as an inline keyboard menu.
//! Every screen is rebuilt purely from the callback payload of the pressed
//! button; the process keeps no per-user state.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use tgnav::api::{
    AnswerCallbackQuery, Bot, CallbackQuery, EditMessageText, GetUpdates, InlineKeyboardButton,
    InlineKeyboardMarkup, Message, SendMessage, Update,
};
use tgnav::config::BotConfig;
use tgnav::nav::{ListItem, NavState, back_rows, paginated_list};

const FRUITS: &[&str] = &[
    "Apple",
    "Banana",
    "Cherry",
    "Dragonfruit",
    "Elderberry",
    "Fig",
    "Grape",
    "Honeydew",
];

const PAGE_SIZE: usize = 3;

/// Message text plus the keyboard below it.
type Screen = (String, InlineKeyboardMarkup);

/// Inline keyboard menu demo over callback navigation.
#[derive(Parser, Debug)]
#[command(name = "menu_bot")]
#[command(about = "Serve a paginated fruit catalog as an inline keyboard menu")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Long poll timeout in seconds.
    #[arg(long, default_value_t = 30)]
    poll_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let config =
        BotConfig::from_env().context("Failed to load bot configuration from environment")?;

    let bot = config.client().context("Failed to build the Bot API client")?;

    let me = bot.get_me().await.context("Failed to reach the Bot API")?;
    info!("Running as {}", me.display_name());
    info!("Bot is running. Use Ctrl+C to stop.");

    let mut offset = 0_i64;
    loop {
        let poll = bot.get_updates(
            GetUpdates::new()
                .with_offset(offset)
                .with_timeout(args.poll_timeout)
                .with_allowed_updates(&["message", "callback_query"]),
        );

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
            polled = poll => match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);
                        if let Err(error) = handle_update(&bot, update).await {
                            warn!("Update handling failed: {error:#}");
                        }
                    }
                }
                Err(error) => {
                    error!("Polling failed: {error}");
                    tokio::time::sleep(Duration::from_secs(3)).await;
                }
            },
        }
    }

    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn handle_update(bot: &Bot, update: Update) -> Result<()> {
    if let Some(message) = update.message {
        handle_message(bot, &message).await?;
    }
    if let Some(query) = update.callback_query {
        handle_callback(bot, query).await?;
    }
    Ok(())
}

async fn handle_message(bot: &Bot, message: &Message) -> Result<()> {
    let Some(text) = message.text.as_deref() else {
        return Ok(());
    };

    if text.starts_with("/start") || text.starts_with("/menu") {
        let (body, markup) = home_screen();
        bot.send_message(SendMessage::new(message.chat.id, body).with_reply_markup(markup))
            .await
            .context("Failed to send the menu")?;
    }
    Ok(())
}

async fn handle_callback(bot: &Bot, query: CallbackQuery) -> Result<()> {
    bot.answer_callback_query(AnswerCallbackQuery::new(query.id.as_str()))
        .await
        .context("Failed to answer the callback query")?;

    let state = NavState::decode(query.data.as_deref().unwrap_or_default());
    debug!("Callback navigation: {state}");

    let (body, markup) = render_screen(&state);

    // Redraw in place when the pressed keyboard still hangs under a
    // message; otherwise start a fresh one.
    match query.message {
        Some(message) => {
            let edit = EditMessageText::new(message.chat.id, message.message_id, body)
                .with_reply_markup(markup);
            match bot.edit_message_text(edit).await {
                Ok(_) => {}
                Err(error) if error.is_message_not_modified() => {
                    debug!("Menu unchanged, nothing to redraw");
                }
                Err(error) => {
                    return Err(error).context("Failed to update the menu message");
                }
            }
        }
        None => {
            bot.send_message(SendMessage::new(query.from.id, body).with_reply_markup(markup))
                .await
                .context("Failed to resend the menu")?;
        }
    }
    Ok(())
}

fn render_screen(state: &NavState) -> Screen {
    match state.action() {
        "fruits" => fruits_screen(state),
        "detail" => detail_screen(state),
        "about" => about_screen(state),
        // Unknown action or a stale payload: fall back to the root.
        _ => home_screen(),
    }
}

fn home_screen() -> Screen {
    let state = NavState::new("home", &[]);
    let rows = vec![
        vec![InlineKeyboardButton::callback(
            "Browse fruits",
            state.push("fruits", &["1"]).encode(),
        )],
        vec![InlineKeyboardButton::callback(
            "About",
            state.push("about", &[]).encode(),
        )],
    ];
    (
        "Fruit catalog. Pick a shelf:".to_owned(),
        InlineKeyboardMarkup::new(rows),
    )
}

fn fruits_screen(state: &NavState) -> Screen {
    let total_pages = i64::try_from(FRUITS.len().div_ceil(PAGE_SIZE)).unwrap_or(1);
    let page = state.page().clamp(1, total_pages);
    let start = usize::try_from(page - 1).unwrap_or(0) * PAGE_SIZE;
    let end = (start + PAGE_SIZE).min(FRUITS.len());

    let list = paginated_list(
        &FRUITS[start..end],
        page,
        total_pages,
        |index, fruit| {
            let page_field = page.to_string();
            let index_field = (start + index).to_string();
            let detail = state.push("detail", &[page_field.as_str(), index_field.as_str()]);
            ListItem::Button(InlineKeyboardButton::callback(*fruit, detail.encode()))
        },
        || {
            (
                InlineKeyboardButton::callback("« Prev", state.prev_page(&[]).encode()),
                InlineKeyboardButton::callback("Next »", state.next_page(&[]).encode()),
            )
        },
    );

    let mut rows = list.button_rows;
    rows.extend(back_rows(
        state,
        || ("« Back".to_owned(), Vec::new()),
        || ("Main menu".to_owned(), Vec::new()),
    ));

    (
        format!("Fruits, page {page} of {total_pages}:"),
        InlineKeyboardMarkup::new(rows),
    )
}

fn detail_screen(state: &NavState) -> Screen {
    let fruit = state
        .data()
        .get(1)
        .and_then(|field| field.parse::<usize>().ok())
        .and_then(|index| FRUITS.get(index));
    let Some(fruit) = fruit else {
        // Stale button from an older catalog layout.
        return home_screen();
    };

    // Back returns to the list page this detail was opened from.
    let page_field = state.page().max(1).to_string();
    let rows = back_rows(
        state,
        || ("« Back to the list".to_owned(), vec![page_field.clone()]),
        || ("Main menu".to_owned(), Vec::new()),
    );

    (
        format!("{fruit}\n\nIn stock. Tap back to keep browsing."),
        InlineKeyboardMarkup::new(rows),
    )
}

fn about_screen(state: &NavState) -> Screen {
    let rows = back_rows(
        state,
        || ("« Back".to_owned(), Vec::new()),
        || ("Main menu".to_owned(), Vec::new()),
    );
    (
        "Every button press carries the full menu position in its callback \
         data. Restart the bot and old keyboards keep working."
            .to_owned(),
        InlineKeyboardMarkup::new(rows),
    )
}
