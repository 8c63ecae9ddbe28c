use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;

use crate::state::AppState;

/// GET /api/events - SSE stream of wizard lifecycle events. The SSE event
/// name is the wizard event kind; the data is the JSON-encoded event.
pub async fn sse_events(State(app): State<AppState>) -> impl axum::response::IntoResponse {
    let rx = app.event_tx.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| {
        // Lagged receivers skip what they missed.
        let ev = msg.ok()?;
        let data = serde_json::to_value(&ev).ok()?;
        let kind = data
            .get("event")
            .and_then(|k| k.as_str())
            .unwrap_or("update")
            .to_string();
        Some(Ok::<Event, Infallible>(
            Event::default().event(kind).data(data.to_string()),
        ))
    });
    Sse::new(stream).keep_alive(KeepAlive::default())
}
