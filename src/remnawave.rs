//! Minimal client for the Remnawave panel API.

use reqwest::{Client as Http, Url};
use serde::{Deserialize, Serialize};

use crate::{model::Profile, prelude::*, screen::DeviceRegistry};

/// A client device bound to a panel user by hardware id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(deserialize = "camelCase"))]
pub struct Device {
  pub hwid: String,
  pub platform: Option<String>,
  pub device_model: Option<String>,
  pub user_agent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
  response: T,
}

#[derive(Debug, Deserialize)]
struct DeviceList {
  #[serde(default)]
  devices: Vec<Device>,
}

#[derive(Clone)]
pub struct Client {
  http: Http,
  base_url: Url,
  token: String,
}

impl Client {
  pub fn new(base_url: &str, token: impl Into<String>) -> anyhow::Result<Self> {
    let mut base_url = Url::parse(base_url)
      .with_context(|| format!("Invalid panel url `{base_url}`"))?;
    // `join` replaces the last segment unless the path ends with `/`
    if !base_url.path().ends_with('/') {
      let path = format!("{}/", base_url.path());
      base_url.set_path(&path);
    }
    let http = Http::builder()
      .timeout(Duration::from_secs(15))
      .build()
      .context("Failed to build panel http client")?;

    Ok(Self { http, base_url, token: token.into() })
  }

  fn endpoint(&self, path: &str) -> Result<Url> {
    self
      .base_url
      .join(path)
      .map_err(|err| Error::Internal(format!("Bad panel path `{path}`: {err}")))
  }

  pub async fn user_devices(&self, user_uuid: uuid::Uuid) -> Result<Vec<Device>> {
    let url = self.endpoint(&format!("api/hwid/devices/{user_uuid}"))?;

    let list: Envelope<DeviceList> = self
      .http
      .get(url)
      .bearer_auth(&self.token)
      .send()
      .await?
      .error_for_status()?
      .json()
      .await?;

    Ok(list.response.devices)
  }
}

#[async_trait]
impl DeviceRegistry for Client {
  async fn devices(&self, profile: &Profile) -> Result<Vec<Device>> {
    let subscription = profile
      .current_subscription
      .as_ref()
      .ok_or(Error::NoCurrentSubscription(profile.telegram_id()))?;

    self.user_devices(subscription.user_remna_id).await
  }
}
