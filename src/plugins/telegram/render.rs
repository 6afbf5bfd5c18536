//! Fills HTML message templates from screen maps.

use json::{Map, Value};
use teloxide::utils::html;

pub const MENU: &str = "\
👤 <b>{user_name}</b> (<code>{user_id}</code>)
💸 Personal discount: {personal_discount}%";

pub const MENU_SUBSCRIPTION: &str = "

📦 <b>Subscription:</b> {status} ({type})
📊 Traffic: {traffic_limit}
📱 Devices: {device_limit}
⏳ Expires: {expire_time}";

pub const MENU_NO_SUBSCRIPTION: &str = "

You have no subscription yet.";

pub const MENU_TRIAL: &str = "
🎁 A free trial is available for you!";

pub const DEVICES: &str = "📱 <b>Devices</b> {current_count}/{max_count}\n";

pub const DEVICES_EMPTY: &str = "\nNo devices are connected yet.";

pub const DEVICE: &str = "\n• {platform} {device_model}\n  <code>{hwid}</code>";

pub const INVITE: &str = "\
👥 <b>Invite friends</b>

Invited: {referral_count}
Payments by invited: {referral_payments}
Earned discount: {referral_earned}%

Your link:
<code>{referral_link}</code>";

pub const INVITED_USERS: &str = "\
👥 <b>Invited users</b> ({invited_user_count})

{invited_users}";

fn display(value: &Value) -> String {
  match value {
    Value::Null => "-".into(),
    Value::String(text) => html::escape(text),
    other => html::escape(&other.to_string()),
  }
}

/// Replaces every `{key}` of `template` with the escaped value of `key`.
///
/// Substituted values are never scanned again; unknown keys stay as is.
pub fn fill(template: &str, data: &Map<String, Value>) -> String {
  let mut text = String::with_capacity(template.len());
  let mut rest = template;

  while let Some(open) = rest.find('{') {
    text.push_str(&rest[..open]);
    let tail = &rest[open..];

    match tail.find('}').and_then(|close| {
      data.get(&tail[1..close]).map(|value| (close, value))
    }) {
      Some((close, value)) => {
        text.push_str(&display(value));
        rest = &tail[close + 1..];
      }
      None => {
        text.push('{');
        rest = &tail[1..];
      }
    }
  }

  text.push_str(rest);
  text
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_fill_escapes_values() {
    let data = json::json!({
      "user_name": "<Tom & Jerry>",
      "user_id": "42",
      "personal_discount": 5,
    });

    let text = fill(MENU, data.as_object().unwrap());

    assert!(text.contains("<b>&lt;Tom &amp; Jerry&gt;</b>"));
    assert!(text.contains("<code>42</code>"));
    assert!(text.contains("discount: 5%"));
  }

  #[test]
  fn test_fill_null_and_unknown_keys() {
    let data = json::json!({ "platform": null, "hwid": "a1" });

    let text = fill(DEVICE, data.as_object().unwrap());

    assert!(text.contains("• - {device_model}"));
    assert!(text.contains("<code>a1</code>"));
  }

  #[test]
  fn test_fill_does_not_expand_values() {
    let data = json::json!({
      "platform": "{hwid}",
      "device_model": "{device_model}",
      "hwid": "a1",
    });

    let text = fill(DEVICE, data.as_object().unwrap());

    assert_eq!(text, "\n• {hwid} {device_model}\n  <code>a1</code>");
  }
}
