//! Server-Sent Events (SSE) stream of submission outcomes, so every open
//! console page learns about predictions made from other tabs.

use axum::response::sse::{Event, KeepAlive, Sse};
use axum::extract::State;
use futures_core::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::state::{AppEvent, SharedState};

pub async fn sse_handler(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("SSE subscriber connected");
    // A lagging subscriber skips what it missed instead of being disconnected.
    let stream = BroadcastStream::new(state.subscribe())
        .filter_map(|received| received.ok().and_then(to_sse).map(Ok));

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn to_sse(event: AppEvent) -> Option<Event> {
    Event::default().json_data(&event).ok()
}
