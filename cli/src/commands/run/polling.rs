//! # dictbot Update Polling Loop
//!
//! File: cli/src/commands/run/polling.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Long-polls the Telegram Bot API and answers every text message.
//!
//! ## Architecture
//!
//! 1. `getUpdates` is called with the offset after the last seen update.
//! 2. Each text message is handled on its own task in a `JoinSet`, sharing
//!    the bot and the Telegram client through `Arc`s. Messages do not wait
//!    on each other.
//! 3. A failed poll is logged and retried after `RETRY_DELAY`; it never ends
//!    the loop.
//! 4. When the shutdown future resolves, polling stops and in-flight replies
//!    are awaited before returning.
//!
use super::bot::DictionaryBot;
use crate::common::network::telegram::{TelegramClient, Update};
use crate::core::error::Result;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// # Run Polling Loop (`run_polling`)
///
/// Receives updates until `shutdown` resolves.
///
/// ## Arguments
///
/// * `telegram`: Bot API client used for polling and replies.
/// * `bot`: Message handler shared by all reply tasks.
/// * `poll_timeout`: Long-poll duration passed to `getUpdates`.
/// * `shutdown`: Future that ends the loop when it completes.
pub async fn run_polling<S>(
    telegram: Arc<TelegramClient>,
    bot: Arc<DictionaryBot>,
    poll_timeout: Duration,
    shutdown: S,
) -> Result<()>
where
    S: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut offset: Option<i64> = None;
    let mut tasks = JoinSet::new();

    loop {
        while let Some(finished) = tasks.try_join_next() {
            log_task_outcome(finished);
        }

        let polled = tokio::select! {
            _ = &mut shutdown => break,
            polled = telegram.get_updates(offset, poll_timeout) => polled,
        };

        match polled {
            Ok(updates) => {
                if !updates.is_empty() {
                    debug!("Received {} updates", updates.len());
                }
                for update in updates {
                    offset = Some(update.update_id + 1);
                    dispatch(update, &bot, &telegram, &mut tasks);
                }
            }
            Err(e) => {
                warn!(
                    "Polling for updates failed: {:#}. Retrying in {:?}.",
                    e, RETRY_DELAY
                );
                tokio::select! {
                    _ = &mut shutdown => break,
                    _ = tokio::time::sleep(RETRY_DELAY) => {}
                }
            }
        }
    }

    info!(
        "Stopped polling, waiting for {} in-flight replies.",
        tasks.len()
    );
    while let Some(finished) = tasks.join_next().await {
        log_task_outcome(finished);
    }
    Ok(())
}

/// Spawns the reply task for one update, if it carries text.
fn dispatch(
    update: Update,
    bot: &Arc<DictionaryBot>,
    telegram: &Arc<TelegramClient>,
    tasks: &mut JoinSet<()>,
) {
    let Some(message) = update.message else {
        debug!("Skipping update {} without a message", update.update_id);
        return;
    };
    let Some(text) = message.text else {
        debug!(
            "Skipping non-text message {} in chat {}",
            message.message_id, message.chat.id
        );
        return;
    };

    let chat_id = message.chat.id;
    let bot = Arc::clone(bot);
    let telegram = Arc::clone(telegram);
    tasks.spawn(async move {
        if let Some(reply) = bot.handle_guarded(text).await {
            if let Err(e) = telegram.send_reply(chat_id, &reply).await {
                error!("Failed to send reply to chat {}: {:#}", chat_id, e);
            }
        }
    });
}

fn log_task_outcome(finished: std::result::Result<(), tokio::task::JoinError>) {
    if let Err(e) = finished {
        error!("Reply task ended abnormally: {}", e);
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::network::dictionary::DictionaryClient;
    use crate::commands::run::bot::HELP_MESSAGE;
    use crate::core::formatting::FormatLimits;
    use axum::{extract::State, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use tokio::net::TcpListener;
    use tokio::sync::Notify;

    const TOKEN: &str = "42:poll";

    #[derive(Default)]
    struct FakeTelegram {
        polls: Mutex<Vec<Value>>,
        sent: Mutex<Vec<Value>>,
        replied: Notify,
    }

    async fn get_updates(
        State(fake): State<Arc<FakeTelegram>>,
        Json(params): Json<Value>,
    ) -> Json<Value> {
        let first = {
            let mut polls = fake.polls.lock().expect("polls lock");
            polls.push(params);
            polls.len() == 1
        };
        if first {
            return Json(json!({"ok": true, "result": [
                {"update_id": 5, "message": {"message_id": 1, "chat": {"id": 42}, "text": "/help"}},
                {"update_id": 6, "message": {"message_id": 2, "chat": {"id": 42}}},
                {
                    "update_id": 7,
                    "message": {"message_id": 3, "chat": {"id": 42}, "text": "/settings"}
                }
            ]}));
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
        Json(json!({"ok": true, "result": []}))
    }

    async fn send_message(
        State(fake): State<Arc<FakeTelegram>>,
        Json(params): Json<Value>,
    ) -> Json<Value> {
        fake.sent.lock().expect("sent lock").push(params);
        fake.replied.notify_one();
        Json(json!({"ok": true, "result": {"message_id": 10}}))
    }

    #[tokio::test]
    async fn test_polling_replies_and_advances_offset() -> Result<()> {
        let fake = Arc::new(FakeTelegram::default());
        let router = Router::new()
            .route(&format!("/bot{}/getUpdates", TOKEN), post(get_updates))
            .route(&format!("/bot{}/sendMessage", TOKEN), post(send_message))
            .with_state(fake.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let telegram = Arc::new(TelegramClient::new(
            &format!("http://{}", addr),
            TOKEN,
            Duration::from_secs(1),
        )?);
        let client = DictionaryClient::new("http://127.0.0.1:9/en", Duration::from_secs(1))?;
        let bot = Arc::new(DictionaryBot::new(client, FormatLimits::default()));

        let watcher = fake.clone();
        let shutdown = async move {
            watcher.replied.notified().await;
            while watcher.polls.lock().expect("polls lock").len() < 2 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        };

        tokio::time::timeout(
            Duration::from_secs(5),
            run_polling(telegram, bot, Duration::from_secs(1), shutdown),
        )
        .await??;

        let sent = fake.sent.lock().expect("sent lock").clone();
        assert_eq!(sent.len(), 1, "only /help should get a reply");
        assert_eq!(sent[0]["chat_id"], json!(42));
        assert_eq!(sent[0]["text"], json!(HELP_MESSAGE));

        let polls = fake.polls.lock().expect("polls lock").clone();
        assert!(polls[0].get("offset").is_none());
        assert_eq!(polls[1]["offset"], json!(8));
        Ok(())
    }

    #[tokio::test]
    async fn test_shutdown_during_retry_delay_returns() -> Result<()> {
        // Nothing listens here, so every poll fails and the loop backs off.
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);

        let telegram = Arc::new(TelegramClient::new(
            &format!("http://{}", addr),
            TOKEN,
            Duration::from_secs(1),
        )?);
        let client = DictionaryClient::new("http://127.0.0.1:9/en", Duration::from_secs(1))?;
        let bot = Arc::new(DictionaryBot::new(client, FormatLimits::default()));

        let shutdown = tokio::time::sleep(Duration::from_millis(300));
        tokio::time::timeout(
            Duration::from_secs(3),
            run_polling(telegram, bot, Duration::from_secs(1), shutdown),
        )
        .await??;
        Ok(())
    }
}
