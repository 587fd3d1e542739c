use crate::state::messages::UiEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Periodic reload of the tournament on screen.
/// Only signals the UI loop; it knows which tournament is active.
pub struct PeriodicRefresher {
    ui_events: mpsc::Sender<UiEvent>,
    period: Duration,
}

impl PeriodicRefresher {
    pub fn new(ui_events: mpsc::Sender<UiEvent>, period: Duration) -> Self {
        Self { ui_events, period }
    }

    pub async fn run(self) {
        let mut refresh_interval = interval(self.period);
        // Skip the immediate first tick so startup loading isn't double-triggered.
        refresh_interval.tick().await;

        loop {
            refresh_interval.tick().await;
            if self.ui_events.send(UiEvent::RefreshDue).await.is_err() {
                break;
            }
        }
    }
}
