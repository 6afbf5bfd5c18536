use reqwest::Url;

use crate::prelude::*;

pub const UNLIMITED: &str = "∞";

pub fn format_date(date: DateTime) -> String {
  date.format("%d.%m.%Y %H:%M").to_string()
}

pub fn format_duration(duration: TimeDelta) -> String {
  format!(
    "{}d {}h {}m",
    duration.num_days(),
    duration.num_hours() % 24,
    duration.num_minutes() % 60
  )
}

/// Traffic cap in GB, `0` meaning unlimited.
pub fn format_traffic_limit(limit: i32) -> String {
  if limit > 0 { format!("{limit} GB") } else { UNLIMITED.into() }
}

/// Device cap, `0` meaning unlimited.
pub fn format_device_limit(limit: i32) -> String {
  if limit > 0 { limit.to_string() } else { UNLIMITED.into() }
}

/// Time left until `expire_at`, or the expiry date once it has passed.
pub fn format_expire_time(expire_at: DateTime, now: DateTime) -> String {
  if expire_at > now {
    format_duration(expire_at - now)
  } else {
    format!("expired {}", format_date(expire_at))
  }
}

/// Chat link to `username` with a prefilled message.
pub fn username_url(username: &str, text: &str) -> Result<Url> {
  let username = username.trim_start_matches('@');
  Url::parse_with_params(&format!("https://t.me/{username}"), [("text", text)])
    .map_err(|err| Error::Internal(format!("Invalid username `{username}`: {err}")))
}

pub fn referral_link(bot_username: &str, telegram_id: i64) -> String {
  format!("https://t.me/{bot_username}?start=ref-{telegram_id}")
}

/// Joins `items` into one bulleted line per item.
///
/// An empty input still yields the leading marker.
pub fn bullet_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
  let items: Vec<_> = items.into_iter().collect();
  format!("• {}", items.join("\n• "))
}
