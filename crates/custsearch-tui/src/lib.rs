//! custsearch TUI: ratatui autocomplete over the customer search service.

pub mod app;
pub mod event;
pub mod theme;
pub mod widgets;

pub use app::App;

use custsearch_client::{
    spawn_controller, ControllerSettings, HttpTransport, RetryPolicy, SearchClient,
};
use custsearch_core::config::Config;

/// Start the TUI against the search service at `base_url` (or the configured
/// one). Blocks until the user quits.
pub fn run(config: Config, base_url: Option<String>) -> anyhow::Result<()> {
    let base_url = base_url.unwrap_or_else(|| config.client.base_url.clone());
    tracing::info!(%base_url, "starting tui");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let (controller, events) = {
        let _guard = runtime.enter();
        let client = SearchClient::new(
            HttpTransport::new(base_url),
            RetryPolicy::from_config(&config.client),
        )
        .with_min_characters(config.search.min_characters);
        spawn_controller(client, ControllerSettings::from_config(&config))
    };

    let theme = theme::Theme::from_config(&config.ui);
    let result = App::new(config, theme, controller, events).run();

    runtime.shutdown_timeout(std::time::Duration::from_millis(200));
    result
}
