mod callback;
mod command;
mod render;

use std::sync::Arc;

use command::Command;
use teloxide::{
  ApiError, Bot, RequestError,
  dispatching::{Dispatcher, HandlerExt, UpdateFilterExt},
  prelude::*,
  types::{CallbackQuery, ChatId, InlineKeyboardMarkup, Message, MessageId, ParseMode, Update},
};

use crate::{prelude::*, screen::BotIdentity, state::AppState};

pub struct Plugin;

#[async_trait]
impl super::Plugin for Plugin {
  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()> {
    run_bot(app).await;
    Ok(())
  }
}

#[async_trait]
impl BotIdentity for Bot {
  async fn bot_username(&self) -> Result<String> {
    let me = self.get_me().await?;
    me.user
      .username
      .clone()
      .ok_or_else(|| Error::Internal("Bot account has no username".into()))
  }
}

pub async fn run_bot(app: Arc<AppState>) {
  info!("Starting Telegram bot...");

  let bot = app.bot.clone();

  let handler = teloxide::dptree::entry()
    .branch(Update::filter_message().filter_command::<Command>().endpoint({
      let app = app.clone();
      move |bot: Bot, msg: Message, cmd: Command| {
        let app = app.clone();
        let user_id = msg.from.as_ref().map_or(msg.chat.id.0, |u| u.id.0 as i64);
        let reply = ReplyBot::new(bot, user_id, msg.chat.id, msg.id);
        async move {
          let result = command::handle(&app, &reply, &msg, cmd).await;
          reply.track_blocked(&app, result).await
        }
      }
    }))
    .branch(Update::filter_callback_query().endpoint({
      let app = app.clone();
      move |bot: Bot, query: CallbackQuery| {
        let app = app.clone();
        callback_handle(app, bot, query)
      }
    }));

  Dispatcher::builder(bot, handler).build().dispatch().await;
}

async fn callback_handle(
  app: Arc<AppState>,
  bot: Bot,
  query: CallbackQuery,
) -> ResponseResult<()> {
  if let Some(data) = query.data
    && let Some(msg) = query.message.as_ref()
  {
    let bot =
      ReplyBot::new(bot, query.from.id.0 as i64, msg.chat().id, msg.id());

    // answer callback to remove loading state
    bot.inner.answer_callback_query(query.id.clone()).await?;

    let result = callback::handle(&app, &bot, &data).await;
    bot.track_blocked(&app, result).await
  } else {
    Ok(())
  }
}

#[derive(Debug, Clone)]
struct ReplyBot {
  inner: Bot,
  pub user_id: i64,
  pub chat_id: ChatId,
  pub message_id: MessageId,
}

impl ReplyBot {
  pub fn new(
    inner: Bot,
    user_id: i64,
    chat_id: ChatId,
    message_id: MessageId,
  ) -> Self {
    Self { inner, user_id, chat_id, message_id }
  }

  async fn reply_html(
    &self,
    text: impl Into<String>,
  ) -> ResponseResult<Message> {
    self
      .inner
      .send_message(self.chat_id, text.into())
      .parse_mode(ParseMode::Html)
      .await
  }

  async fn reply_with_keyboard(
    &self,
    text: impl Into<String>,
    keyboard: InlineKeyboardMarkup,
  ) -> ResponseResult<Message> {
    self
      .inner
      .send_message(self.chat_id, text.into())
      .parse_mode(ParseMode::Html)
      .reply_markup(keyboard)
      .await
  }

  pub async fn edit_with_keyboard(
    &self,
    text: impl Into<String>,
    keyboard: InlineKeyboardMarkup,
  ) -> ResponseResult<()> {
    self
      .inner
      .edit_message_text(self.chat_id, self.message_id, text.into())
      .parse_mode(ParseMode::Html)
      .reply_markup(keyboard)
      .await?;
    Ok(())
  }

  /// Flags the user when Telegram reports that they blocked the bot.
  async fn track_blocked(
    &self,
    app: &AppState,
    result: ResponseResult<()>,
  ) -> ResponseResult<()> {
    if let Err(RequestError::Api(ApiError::BotBlocked)) = &result {
      warn!("User {} blocked the bot", self.user_id);
      if let Err(err) = app.sv().user.set_bot_blocked(self.user_id, true).await {
        error!("Failed to mark user {} as bot-blocked: {err}", self.user_id);
      }
      return Ok(());
    }
    result
  }
}
