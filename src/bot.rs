use std::sync::Arc;

use anyhow::Result;
use teloxide::payloads::{EditMessageTextSetters, SendMessageSetters};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode};
use tracing::{info, warn};

use crate::config::Config;
use crate::extract;
use crate::pipeline::Pipeline;
use crate::reply::{self, Choice, ChoiceAction, ReplyPayload};

/// Telegram caps callback payloads at 64 bytes.
const MAX_CALLBACK_DATA_BYTES: usize = 64;

/// Telegram message size limit, with headroom for markup.
const MAX_MESSAGE_CHARS: usize = 4000;

/// Shared application state
pub struct AppState {
    config: Config,
    pipeline: Pipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: Pipeline) -> Self {
        Self { config, pipeline }
    }
}

/// Start the Telegram bot
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let bot = Bot::new(&state.config.telegram.bot_token);

    info!("Starting Telegram bot...");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(handle_callback));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("bot"))
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_message(bot: Bot, msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let text = match msg.text() {
        Some(t) => t.to_string(),
        None => return Ok(()),
    };

    let sender = msg
        .from
        .as_ref()
        .map(|user| user.first_name.clone())
        .unwrap_or_else(|| "there".to_string());

    info!("Message from {}: {}", sender, text);

    if text == "/start" {
        return send_welcome(&bot, &msg, &sender).await;
    }

    if text == "/download" {
        bot.send_message(msg.chat.id, "Usage: /download <url>").await?;
        return Ok(());
    }

    if let Some(rest) = text.strip_prefix("/download ") {
        let url = rest.trim();
        if url.is_empty() {
            bot.send_message(msg.chat.id, "Usage: /download <url>").await?;
            return Ok(());
        }
        return process_url(&bot, &msg, &state, url).await;
    }

    match extract::extract(&text) {
        Some(url) => process_url(&bot, &msg, &state, url).await,
        None => {
            bot.send_message(msg.chat.id, reply::compose_missing_url().text)
                .await?;
            Ok(())
        }
    }
}

/// Send a progress message, run the pipeline, then edit the progress
/// message in place with the outcome.
async fn process_url(bot: &Bot, msg: &Message, state: &AppState, url: &str) -> ResponseResult<()> {
    let progress = bot
        .send_message(msg.chat.id, "🔄 Processing your URL...")
        .await?;

    let payload = state.pipeline.run(url).await;
    deliver(bot, msg.chat.id, progress.id, &payload).await
}

/// Replace an earlier message with a composed reply, chunking text that
/// exceeds Telegram's limit.
async fn deliver(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    payload: &ReplyPayload,
) -> ResponseResult<()> {
    let keyboard = build_keyboard(&payload.choices);
    let mut chunks = split_message(&payload.text, MAX_MESSAGE_CHARS).into_iter();

    if let Some(first) = chunks.next() {
        let request = bot.edit_message_text(chat_id, message_id, first);
        match keyboard {
            Some(markup) => request.reply_markup(markup).await?,
            None => request.await?,
        };
    }

    for chunk in chunks {
        bot.send_message(chat_id, chunk).await.ok();
    }

    Ok(())
}

async fn handle_callback(bot: Bot, query: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    bot.answer_callback_query(query.id.clone()).await?;

    let data = match query.data.as_deref() {
        Some(d) => d,
        None => return Ok(()),
    };

    let message = match query.message.as_ref() {
        Some(m) => m,
        None => return Ok(()),
    };
    let chat_id = message.chat().id;
    let message_id = message.id();

    if let Some(platform) = data.strip_prefix("help:") {
        bot.edit_message_text(
            chat_id,
            message_id,
            format!("Send any {} URL to download!", help_label(platform)),
        )
        .await?;
        return Ok(());
    }

    if let Some(url) = data.strip_prefix("retry:") {
        info!("Retrying download for {}", url);
        let payload = state.pipeline.retry(url).await;
        return deliver(&bot, chat_id, message_id, &payload).await;
    }

    warn!("Unknown callback payload: {}", data);
    Ok(())
}

async fn send_welcome(bot: &Bot, msg: &Message, sender: &str) -> ResponseResult<()> {
    let text = format!(
        "👋 Welcome *{}*!\n\n\
         🤖 *Social Media Downloader Bot*\n\n\
         Send me any social media URL to download content!\n\
         Supported: YouTube, Instagram, Facebook, Twitter/X, TikTok and more.\n\n\
         Commands:\n\
         /download <url> - Download a specific URL",
        sender
    );

    let keyboard = InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("📸 Instagram", "help:instagram"),
            InlineKeyboardButton::callback("🎬 YouTube", "help:youtube"),
        ],
        vec![
            InlineKeyboardButton::callback("📘 Facebook", "help:facebook"),
            InlineKeyboardButton::callback("🐦 Twitter/X", "help:twitter"),
        ],
        vec![InlineKeyboardButton::callback("🎵 TikTok", "help:tiktok")],
    ]);

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Markdown)
        .reply_markup(keyboard)
        .await?;

    Ok(())
}

fn help_label(platform: &str) -> &str {
    match platform {
        "instagram" => "📸 Instagram",
        "youtube" => "🎬 YouTube",
        "facebook" => "📘 Facebook",
        "twitter" => "🐦 Twitter/X",
        "tiktok" => "🎵 TikTok",
        other => other,
    }
}

/// Build an inline keyboard from reply choices. Direct links that do not
/// parse as URLs and retry payloads too large for Telegram's callback-data
/// limit are dropped rather than mangled.
fn build_keyboard(choices: &[Choice]) -> Option<InlineKeyboardMarkup> {
    if choices.is_empty() {
        return None;
    }

    let buttons: Vec<InlineKeyboardButton> = choices
        .iter()
        .filter_map(|choice| match &choice.action {
            ChoiceAction::DirectLink(link) => Some(InlineKeyboardButton::url(
                choice.label.clone(),
                link.parse().ok()?,
            )),
            ChoiceAction::Retry(url) => {
                let data = format!("retry:{}", url);
                if data.len() > MAX_CALLBACK_DATA_BYTES {
                    return None;
                }
                Some(InlineKeyboardButton::callback(choice.label.clone(), data))
            }
        })
        .collect();

    if buttons.is_empty() {
        None
    } else {
        Some(InlineKeyboardMarkup::new(vec![buttons]))
    }
}

/// Split long messages for Telegram's 4096 char limit
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < text.len() {
        let mut end = (start + max_len).min(text.len());
        // Walk back to a valid UTF-8 char boundary so slicing doesn't panic
        while end > start && !text.is_char_boundary(end) {
            end -= 1;
        }
        let actual_end = if end < text.len() {
            text[start..end]
                .rfind('\n')
                .or_else(|| text[start..end].rfind(' '))
                .map(|pos| start + pos + 1)
                .unwrap_or(end)
        } else {
            end
        };

        chunks.push(text[start..actual_end].to_string());
        start = actual_end;
    }

    chunks
}
