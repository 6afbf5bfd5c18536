use reqwest::Url;
use teloxide::{
  prelude::*,
  types::{InlineKeyboardButton, InlineKeyboardMarkup},
};

use super::{ReplyBot, render};
use crate::{
  model::Profile,
  prelude::*,
  screen::{self, Menu},
  state::AppState,
};

pub const FAILURE: &str = "Something went wrong, please try again later.";
const NOT_REGISTERED: &str = "Use /start to register first.";
const NO_SUBSCRIPTION: &str = "You have no active subscription.";

/// Callback data enum - provides type-safe callback handling
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Callback {
  Menu,
  Devices,
  Invite,
  InvitedUsers,
}

impl Callback {
  pub fn to_data(self) -> String {
    match self {
      Callback::Menu => "menu",
      Callback::Devices => "devices",
      Callback::Invite => "invite",
      Callback::InvitedUsers => "invited",
    }
    .to_string()
  }

  pub fn from_data(data: &str) -> Option<Self> {
    match data {
      "menu" => Some(Callback::Menu),
      "devices" => Some(Callback::Devices),
      "invite" => Some(Callback::Invite),
      "invited" => Some(Callback::InvitedUsers),
      _ => None,
    }
  }
}

fn url(raw: &str) -> Option<Url> {
  Url::parse(raw).ok()
}

fn main_menu(menu: &Menu) -> InlineKeyboardMarkup {
  let mut rows = Vec::new();

  if menu.connectable
    && let Some(link) =
      menu.subscription.as_ref().and_then(|sub| url(&sub.subscription_url))
  {
    rows.push(vec![InlineKeyboardButton::url("🔌 Connect", link)]);
  }

  if menu.has_subscription {
    rows.push(vec![InlineKeyboardButton::callback(
      "📱 Devices",
      Callback::Devices.to_data(),
    )]);
  }

  rows.push(vec![InlineKeyboardButton::callback(
    "👥 Invite friends",
    Callback::Invite.to_data(),
  )]);

  if let Some(link) = url(&menu.miniapp_url) {
    rows.push(vec![InlineKeyboardButton::url("🛒 Open shop", link)]);
  }
  if let Some(link) = url(&menu.support) {
    rows.push(vec![InlineKeyboardButton::url("💬 Support", link)]);
  }

  InlineKeyboardMarkup::new(rows)
}

fn invite_keyboard() -> InlineKeyboardMarkup {
  InlineKeyboardMarkup::new(vec![
    vec![InlineKeyboardButton::callback(
      "📋 Invited users",
      Callback::InvitedUsers.to_data(),
    )],
    vec![InlineKeyboardButton::callback(
      "« Back to Menu",
      Callback::Menu.to_data(),
    )],
  ])
}

fn back_keyboard(to: Callback) -> InlineKeyboardMarkup {
  let text = match to {
    Callback::Menu => "« Back to Menu",
    _ => "« Back",
  };
  InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
    text,
    to.to_data(),
  )]])
}

async fn profile(app: &AppState, user_id: i64) -> Result<Profile> {
  app.sv().user.profile(user_id).await?.ok_or(Error::UserNotFound)
}

/// Renders the main menu of `user_id` together with its keyboard.
pub async fn menu_view(
  app: &AppState,
  user_id: i64,
) -> Result<(String, InlineKeyboardMarkup)> {
  let sv = app.sv();
  let profile = profile(app, user_id).await?;
  let menu = screen::menu(&app.config, &profile, &sv.plan, &sv.subscription).await?;
  let data = screen::data(&menu)?;

  let mut text = render::fill(render::MENU, &data);
  if menu.has_subscription {
    text += &render::fill(render::MENU_SUBSCRIPTION, &data);
  } else {
    text += render::MENU_NO_SUBSCRIPTION;
  }
  if menu.trial_available {
    text += render::MENU_TRIAL;
  }

  Ok((text, main_menu(&menu)))
}

async fn devices_view(app: &AppState, bot: &ReplyBot) -> Result<String> {
  let profile = profile(app, bot.user_id).await?;
  let devices = screen::devices(&profile, &app.panel).await?;

  let mut text = render::fill(render::DEVICES, &screen::data(&devices)?);
  if devices.devices_empty {
    text += render::DEVICES_EMPTY;
  }
  for device in &devices.devices {
    text += &render::fill(render::DEVICE, &screen::data(device)?);
  }

  Ok(text)
}

async fn invite_view(app: &AppState, bot: &ReplyBot) -> Result<String> {
  let sv = app.sv();
  let profile = profile(app, bot.user_id).await?;
  let invite =
    screen::invite(&profile, &sv.user, &sv.transaction, &bot.inner).await?;

  Ok(render::fill(render::INVITE, &screen::data(&invite)?))
}

async fn invited_users_view(app: &AppState, bot: &ReplyBot) -> Result<String> {
  let profile = profile(app, bot.user_id).await?;
  let invited = screen::invited_users(&profile, &app.sv().user).await?;

  Ok(render::fill(render::INVITED_USERS, &screen::data(&invited)?))
}

/// User-facing text for errors that are not Telegram failures.
fn explain(user_id: i64, err: &Error) -> &'static str {
  match err {
    Error::UserNotFound => NOT_REGISTERED,
    Error::NoCurrentSubscription(_) => NO_SUBSCRIPTION,
    err => {
      error!("Failed to render screen for {user_id}: {err}");
      FAILURE
    }
  }
}

/// Sends the main menu as a new message.
pub async fn send_menu(app: &AppState, bot: &ReplyBot) -> ResponseResult<()> {
  match menu_view(app, bot.user_id).await {
    Ok((text, keyboard)) => {
      bot.reply_with_keyboard(text, keyboard).await?;
    }
    Err(Error::Telegram(err)) => return Err(err),
    Err(err) => {
      bot.reply_html(explain(bot.user_id, &err)).await?;
    }
  }
  Ok(())
}

pub async fn handle(
  app: &AppState,
  bot: &ReplyBot,
  data: &str,
) -> ResponseResult<()> {
  let Some(callback) = Callback::from_data(data) else {
    debug!("Unknown callback `{data}` from {}", bot.user_id);
    return Ok(());
  };

  let view = match callback {
    Callback::Menu => menu_view(app, bot.user_id).await,
    Callback::Devices => devices_view(app, bot)
      .await
      .map(|text| (text, back_keyboard(Callback::Menu))),
    Callback::Invite => {
      invite_view(app, bot).await.map(|text| (text, invite_keyboard()))
    }
    Callback::InvitedUsers => invited_users_view(app, bot)
      .await
      .map(|text| (text, back_keyboard(Callback::Invite))),
  };

  match view {
    Ok((text, keyboard)) => bot.edit_with_keyboard(text, keyboard).await,
    Err(Error::Telegram(err)) => Err(err),
    Err(err) => {
      let text = explain(bot.user_id, &err);
      bot.edit_with_keyboard(text, back_keyboard(Callback::Menu)).await
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::{PlanType, SubscriptionStatus};
  use crate::screen::SubscriptionSummary;

  fn menu(connectable: bool, has_subscription: bool) -> Menu {
    Menu {
      user_id: "42".into(),
      user_name: "Alice".into(),
      personal_discount: 0,
      support: "https://t.me/support".into(),
      has_subscription,
      miniapp_url: "https://shop.example/app".into(),
      status: has_subscription.then_some(SubscriptionStatus::Active),
      is_trial: false,
      trial_available: !has_subscription,
      has_device_limit: false,
      connectable,
      subscription: has_subscription.then(|| SubscriptionSummary {
        plan_type: PlanType::Unlimited,
        traffic_limit: "∞".into(),
        device_limit: "∞".into(),
        expire_time: "10 days".into(),
        subscription_url: "https://sub.example/abc".into(),
      }),
    }
  }

  fn labels(keyboard: &InlineKeyboardMarkup) -> Vec<&str> {
    keyboard
      .inline_keyboard
      .iter()
      .flatten()
      .map(|button| button.text.as_str())
      .collect()
  }

  #[test]
  fn test_callback_data() {
    for callback in [
      Callback::Menu,
      Callback::Devices,
      Callback::Invite,
      Callback::InvitedUsers,
    ] {
      assert_eq!(Callback::from_data(&callback.to_data()), Some(callback));
    }
    assert_eq!(Callback::from_data("buy"), None);
  }

  #[test]
  fn test_main_menu_with_subscription() {
    let keyboard = main_menu(&menu(true, true));
    assert_eq!(
      labels(&keyboard),
      ["🔌 Connect", "📱 Devices", "👥 Invite friends", "🛒 Open shop", "💬 Support"]
    );
  }

  #[test]
  fn test_main_menu_without_subscription() {
    let mut menu = menu(false, false);
    menu.miniapp_url = String::new();

    let keyboard = main_menu(&menu);
    assert_eq!(labels(&keyboard), ["👥 Invite friends", "💬 Support"]);
  }
}
