use serde::Serialize;

use super::DeviceRegistry;
use crate::{model::Profile, prelude::*, remnawave::Device};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Devices {
  pub current_count: usize,
  pub max_count: String,
  pub devices: Vec<Device>,
  /// Templates branch on emptiness rather than on the count
  pub devices_empty: bool,
}

/// Devices registered under the user's current subscription.
///
/// Fails with [`Error::NoCurrentSubscription`] before contacting the
/// registry when there is no current subscription.
pub async fn devices(
  profile: &Profile,
  registry: &impl DeviceRegistry,
) -> Result<Devices> {
  let Some(subscription) = &profile.current_subscription else {
    return Err(Error::NoCurrentSubscription(profile.telegram_id()));
  };

  let devices = registry.devices(profile).await?;

  Ok(Devices {
    current_count: devices.len(),
    max_count: utils::format_device_limit(subscription.device_limit),
    devices_empty: devices.is_empty(),
    devices,
  })
}
