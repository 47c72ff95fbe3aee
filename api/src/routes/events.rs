use std::convert::Infallible;

use axum::{
    body::Body,
    extract::State,
    http::{
        StatusCode,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONNECTION, CONTENT_TYPE},
    },
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tracing::Instrument;
use util::state::AppState;
use util::stream::{ChannelConnection, StreamSession, connection::DEFAULT_BUFFER};

/// GET /events
///
/// Opens a `text/event-stream` that pushes one frame per tick:
///
/// ```text
/// data: {"usage":12.5,"timestamp":1700000000}
///
/// ```
///
/// ### Responses
/// - `200 OK` with the stream, once the baseline sample succeeded
/// - `500 Internal Server Error` with a plain-text description when the
///   baseline sample fails; no stream is opened
pub async fn stream_cpu_usage(State(app_state): State<AppState>) -> Response {
    let (conn, frames) = ChannelConnection::channel(DEFAULT_BUFFER);

    let session = match StreamSession::start(
        app_state.sampler(),
        conn,
        app_state.stream_interval(),
    ) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(error = %e, "Initial CPU sample failed, refusing stream");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let span = tracing::info_span!("cpu_stream");
    tokio::spawn(
        async move {
            let end = session.run().await;
            tracing::info!(?end, "Stream session closed");
        }
        .instrument(span),
    );

    (
        [
            (CONTENT_TYPE, "text/event-stream"),
            (CACHE_CONTROL, "no-cache"),
            (CONNECTION, "keep-alive"),
            (ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        ],
        Body::from_stream(frame_stream(frames)),
    )
        .into_response()
}

/// Turns the session's outbound channel into a response body stream.
///
/// Dropping the stream (client gone) drops the receiver, which is what the
/// session observes as a disconnect.
fn frame_stream(
    rx: mpsc::Receiver<Bytes>,
) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
    futures::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|frame| (Ok(frame), rx))
    })
}
