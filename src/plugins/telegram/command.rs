use teloxide::{prelude::*, utils::command::BotCommands};

use super::{ReplyBot, callback};
use crate::{
  entity::Locale,
  prelude::*,
  state::{AppState, Services},
};

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
pub enum Command {
  /// Deep links arrive as `/start <payload>`
  Start(String),
  Menu,
  Help,
}

const HELP: &str = "\
Use /start or /menu to open the main menu.
Invite friends from the menu to earn discounts.";

pub async fn handle(
  app: &AppState,
  bot: &ReplyBot,
  msg: &Message,
  cmd: Command,
) -> ResponseResult<()> {
  let Some(from) = msg.from.as_ref() else {
    return Ok(());
  };

  match cmd {
    Command::Start(payload) => {
      if let Err(err) = register(&app.sv(), &Visitor::from(from), &payload).await
      {
        error!("Failed to register user {}: {err}", bot.user_id);
        bot.reply_html(callback::FAILURE).await?;
        return Ok(());
      }
      callback::send_menu(app, bot).await?;
    }
    Command::Menu => {
      callback::send_menu(app, bot).await?;
    }
    Command::Help => {
      bot.reply_html(HELP).await?;
    }
  }

  Ok(())
}

/// Sender of a command, detached from the Telegram payload.
#[derive(Debug, Clone)]
struct Visitor {
  telegram_id: i64,
  username: Option<String>,
  name: String,
  language_code: Option<String>,
}

impl From<&teloxide::types::User> for Visitor {
  fn from(user: &teloxide::types::User) -> Self {
    Self {
      telegram_id: user.id.0 as i64,
      username: user.username.clone(),
      name: user.full_name(),
      language_code: user.language_code.clone(),
    }
  }
}

/// Registers the sender on first contact, honouring a referral payload.
async fn register(
  sv: &Services<'_>,
  visitor: &Visitor,
  payload: &str,
) -> Result<()> {
  let telegram_id = visitor.telegram_id;

  let (user, created) = sv
    .user
    .get_or_create(
      telegram_id,
      visitor.username.as_deref(),
      &visitor.name,
      Locale::from_language_code(visitor.language_code.as_deref()),
    )
    .await?;

  if user.is_bot_blocked {
    sv.user.set_bot_blocked(telegram_id, false).await?;
  }

  if !created {
    return Ok(());
  }

  if let Some(referrer) = sv.user.resolve_referrer(payload).await? {
    match sv.user.attach_referrer(telegram_id, referrer.telegram_id).await {
      Ok(_) => {}
      Err(Error::Referral(reason)) => {
        warn!("Ignoring referral of {telegram_id}: {reason}");
      }
      Err(err) => return Err(err),
    }
  }

  Ok(())
}
