//! Lazily-connected text-to-speech event stream.

use crate::endpoint::error::EndpointError;
use crate::endpoint::http::{SseEvent, SseParser};
use crate::endpoint::types::SpeechRequest;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use url::Url;

type EventStream = Pin<Box<dyn Stream<Item = Result<SseEvent, EndpointError>> + Send>>;
type BodyStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

/// Handle to a server-sent-event speech stream.
///
/// Nothing is sent until the first poll. A failed connect or a non-success
/// status yields a single error item; the stream ends after any error.
/// Dropping the handle cancels the request.
pub struct SpeechStream {
    url: Url,
    payload: SpeechRequest,
    events: EventStream,
}

impl SpeechStream {
    pub(crate) fn new(url: Url, payload: SpeechRequest, request: reqwest::RequestBuilder) -> Self {
        let state = State::Pending {
            request,
            url: url.clone(),
        };

        Self {
            url,
            payload,
            events: Box::pin(futures::stream::unfold(state, next_event)),
        }
    }

    /// Target URL of the stream.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// JSON payload posted when the stream connects.
    pub fn payload(&self) -> &SpeechRequest {
        &self.payload
    }
}

impl std::fmt::Debug for SpeechStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpeechStream")
            .field("url", &self.url.as_str())
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

impl Stream for SpeechStream {
    type Item = Result<SseEvent, EndpointError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.events.as_mut().poll_next(cx)
    }
}

enum State {
    Pending {
        request: reqwest::RequestBuilder,
        url: Url,
    },
    Open(OpenStream),
    Done,
}

struct OpenStream {
    body: BodyStream,
    parser: SseParser,
    queued: VecDeque<SseEvent>,
    url: Url,
}

async fn next_event(state: State) -> Option<(Result<SseEvent, EndpointError>, State)> {
    let mut open = match state {
        State::Pending { request, url } => match connect(request, &url).await {
            Ok(open) => open,
            Err(e) => {
                tracing::warn!(
                    endpoint = "speech",
                    url = %url,
                    error = %e,
                    "Endpoint request failed"
                );
                return Some((Err(e), State::Done));
            }
        },
        State::Open(open) => open,
        State::Done => return None,
    };

    loop {
        if let Some(event) = open.queued.pop_front() {
            return Some((Ok(event), State::Open(open)));
        }

        match open.body.next().await {
            Some(Ok(chunk)) => {
                let events = open.parser.feed_bytes(&chunk);
                open.queued.extend(events);
            }
            Some(Err(e)) => {
                let err = EndpointError::Stream(e.to_string());
                tracing::warn!(
                    endpoint = "speech",
                    url = %open.url,
                    error = %err,
                    "Speech stream interrupted"
                );
                return Some((Err(err), State::Done));
            }
            None => {
                if open.parser.has_pending() {
                    tracing::debug!(url = %open.url, "Discarding incomplete trailing event");
                }
                tracing::debug!(url = %open.url, "Speech stream closed");
                return None;
            }
        }
    }
}

async fn connect(request: reqwest::RequestBuilder, url: &Url) -> Result<OpenStream, EndpointError> {
    tracing::debug!(endpoint = "speech", url = %url, "Opening speech stream");

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EndpointError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(OpenStream {
        body: Box::pin(response.bytes_stream()),
        parser: SseParser::new(),
        queued: VecDeque::new(),
        url: url.clone(),
    })
}
