//! Live views over server-sent events.
//!
//! Each connection opens a store subscription; the subscription handle lives
//! inside the stream, so dropping the connection aborts the background task.
//! Every SSE event carries a complete view (a full board or inbox), never a
//! delta, so a client that misses events is still consistent after the next
//! one.

use axum::{
  extract::State,
  http::HeaderMap,
  response::{
    IntoResponse,
    sse::{Event, KeepAlive, Sse},
  },
};
use serde::Serialize;
use skillswap_core::{auth::AuthProvider, store::ExchangeStore};
use skillswap_live::SubscriptionHandle;
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};

use crate::{ApiState, auth, error::ApiError};

pub async fn swaps<S, A, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
  S: ExchangeStore + 'static,
  A: AuthProvider,
{
  let principal = auth::require_principal(&state, &headers).await?;
  let (rx, handle) = state.live.open_swap_board(principal.id);
  Ok(sse_from(rx, handle))
}

pub async fn notifications<S, A, M>(
  State(state): State<ApiState<S, A, M>>,
  headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError>
where
  S: ExchangeStore + 'static,
  A: AuthProvider,
{
  let principal = auth::require_principal(&state, &headers).await?;
  let (rx, handle) = state.live.open_notification_feed(principal.id);
  Ok(sse_from(rx, handle))
}

fn sse_from<T: Serialize + Send + 'static>(
  rx: mpsc::Receiver<T>,
  handle: SubscriptionHandle,
) -> impl IntoResponse {
  let stream = ReceiverStream::new(rx).map(move |view| {
    // Tie the subscription's lifetime to the stream: client disconnect
    // drops the closure, which drops the handle, which aborts the task.
    let _subscription = &handle;
    Event::default().json_data(&view)
  });
  Sse::new(stream).keep_alive(KeepAlive::default())
}
