use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::{DisplayPort, RenderOutcome, Renderer, WeatherClient};

/// Turns a user activation (search button, Enter key) into a lookup.
///
/// Every activation spawns its own task. Nothing is debounced or cancelled,
/// so overlapping lookups race and whichever response arrives last is what
/// stays on the display.
#[derive(Debug)]
pub struct QueryTrigger<C, D> {
    renderer: Arc<Renderer<C, D>>,
}

impl<C, D> Clone for QueryTrigger<C, D> {
    fn clone(&self) -> Self {
        Self { renderer: Arc::clone(&self.renderer) }
    }
}

impl<C, D> QueryTrigger<C, D>
where
    C: WeatherClient + 'static,
    D: DisplayPort + 'static,
{
    pub fn new(renderer: Renderer<C, D>) -> Self {
        Self { renderer: Arc::new(renderer) }
    }

    pub fn renderer(&self) -> &Renderer<C, D> {
        &self.renderer
    }

    /// `input` is the text field's current value, used as is.
    pub fn activate(&self, input: &str) -> JoinHandle<RenderOutcome> {
        debug!(input, "Search activated");

        let renderer = Arc::clone(&self.renderer);
        let city = input.to_owned();
        tokio::spawn(async move { renderer.fetch_and_render(&city).await })
    }
}
