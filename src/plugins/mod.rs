pub mod server;
pub mod telegram;

use std::sync::Arc;

use tokio::time::sleep;

use crate::{prelude::*, state::AppState};

/// Long-running part of the application, restarted when it stops.
#[async_trait]
pub trait Plugin: Send + Sync {
  fn name(&self) -> &'static str {
    std::any::type_name::<Self>()
  }

  async fn start(&self, app: Arc<AppState>) -> anyhow::Result<()>;
}

/// Restart delay after a plugin stops or crashes.
const RESTART_DELAY: Duration = Duration::from_secs(5);

#[derive(Default)]
pub struct App {
  plugins: Vec<Arc<dyn Plugin>>,
}

impl App {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register<P: Plugin + 'static>(mut self, plugin: P) -> Self {
    self.plugins.push(Arc::new(plugin));
    self
  }

  /// Spawns every plugin under its own supervisor.
  pub fn run(self, app: Arc<AppState>) {
    for plugin in self.plugins {
      tokio::spawn(supervise(plugin, app.clone()));
    }
  }
}

async fn supervise(plugin: Arc<dyn Plugin>, app: Arc<AppState>) {
  let name = plugin.name();
  info!("SYSTEM: Service `{name}` initialized");

  loop {
    let handle = tokio::spawn({
      let plugin = plugin.clone();
      let app = app.clone();
      async move { plugin.start(app).await }
    });

    match handle.await {
      Ok(Ok(())) => warn!("Service `{name}` stopped unexpectedly"),
      Ok(Err(err)) => error!("Service `{name}` crashed with error: {err:#}"),
      Err(err) if err.is_cancelled() => {
        info!("Service `{name}` shutdown");
        break;
      }
      Err(_) => error!("Service `{name}` PANICKED!"),
    }

    sleep(RESTART_DELAY).await;
    info!("SYSTEM: Restarting service `{name}`...");
  }
}
