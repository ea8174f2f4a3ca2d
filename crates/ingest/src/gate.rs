//! The integration point between the host http layer and downstream handlers.
//!
//! For each request the gate decides whether ingestion applies, runs
//! aggregation, classification and contained decoding in sequence, attaches
//! the result to the request and calls the continuation.
//!
//! The continuation is taken by value as an [`FnOnce`] and is called exactly
//! once whenever ingestion does not halt the request. It is never called when
//! the request is rejected, when the body stream fails, or when the gate's
//! future is dropped before completion.

use std::fmt::Display;
use std::future::Future;

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use http::request::Parts;
use http::Request;
use http_body::Body;
use tracing::{debug, error, warn};

use crate::aggregator::aggregate;
use crate::config::IngestConfig;
use crate::containment::Containment;
use crate::decoder::DecoderSet;
use crate::outcome::{ParseOutcome, Rejection};
use crate::{ContentTypeTag, DecodedBody, IngestError};

/// A request after ingestion: the body slot holds the decoded body, or
/// `None` when ingestion was skipped.
pub type IngestedRequest = Request<Option<DecodedBody>>;

/// How the gate finished a request that did not fail at the stream level.
#[derive(Debug)]
pub enum Gated<T> {
    /// The continuation ran and returned `T`
    Continued(T),
    /// Ingestion halted the request; the continuation did not run
    Rejected(Rejection),
}

impl<T> Gated<T> {
    /// Collapses both branches into one value.
    pub fn unwrap_or_else<F: FnOnce(Rejection) -> T>(self, f: F) -> T {
        match self {
            Gated::Continued(t) => t,
            Gated::Rejected(rejection) => f(rejection),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PipelineGate {
    config: IngestConfig,
    containment: Containment,
    decoders: DecoderSet,
}

impl PipelineGate {
    pub fn new(config: IngestConfig) -> Self {
        let containment = Containment::new(config.policy());
        Self { config, containment, decoders: DecoderSet::standard() }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Returns true if ingestion runs for a request with this head and body.
    ///
    /// Bypassed methods never ingest. Other requests ingest when they declare
    /// a body through `content-length` or `transfer-encoding`, or when the body
    /// itself is not already at its end.
    pub fn applies<B: Body>(&self, head: &Parts, body: &B) -> bool {
        if self.config.bypasses(&head.method) {
            return false;
        }

        let declared = head.headers.contains_key(CONTENT_LENGTH) || head.headers.contains_key(TRANSFER_ENCODING);
        declared || !body.is_end_stream()
    }

    /// Runs ingestion for one request and returns its outcome.
    ///
    /// `Err` is returned only for [`IngestError::Stream`]; every other failure
    /// becomes [`ParseOutcome::Failed`].
    pub async fn ingest<B>(&self, head: &Parts, body: B) -> Result<ParseOutcome, IngestError>
    where
        B: Body<Data = Bytes>,
        B::Error: Display,
    {
        if !self.applies(head, &body) {
            debug!(method = %head.method, path = head.uri.path(), "skip body ingestion");
            return Ok(ParseOutcome::Skipped);
        }

        let buffer = match self.collect(body).await {
            Ok(buffer) => buffer,
            Err(e) => {
                return match e.rejection() {
                    Some(rejection) => {
                        warn!(cause = %e, path = head.uri.path(), "reject request body");
                        Ok(ParseOutcome::Failed(rejection))
                    }
                    None => {
                        error!(cause = %e, path = head.uri.path(), "request body stream failed");
                        Err(e)
                    }
                };
            }
        };

        let tag = ContentTypeTag::from_headers(&head.headers);
        debug!(content_type = %tag, size = buffer.len(), "decode request body");
        Ok(self.containment.decode(&self.decoders, tag, &buffer))
    }

    /// Ingests the request body and hands the request on to `next`.
    ///
    /// `next` receives the request with the decoded body attached and is
    /// called exactly once, unless ingestion rejects the request (then
    /// `Ok(Gated::Rejected)`) or the body stream fails (then `Err`).
    pub async fn run<B, F, Fut>(&self, request: Request<B>, next: F) -> Result<Gated<Fut::Output>, IngestError>
    where
        B: Body<Data = Bytes>,
        B::Error: Display,
        F: FnOnce(IngestedRequest) -> Fut,
        Fut: Future,
    {
        let (head, body) = request.into_parts();

        let attachment = match self.ingest(&head, body).await?.into_attachment() {
            Ok(attachment) => attachment,
            Err(rejection) => return Ok(Gated::Rejected(rejection)),
        };

        let output = next(Request::from_parts(head, attachment)).await;
        Ok(Gated::Continued(output))
    }

    async fn collect<B>(&self, body: B) -> Result<Bytes, IngestError>
    where
        B: Body<Data = Bytes>,
        B::Error: Display,
    {
        let limit = self.config.max_body_size();
        match self.config.timeout() {
            Some(after) => tokio::time::timeout(after, aggregate(body, limit))
                .await
                .map_err(|_elapsed| IngestError::timeout(after))?,
            None => aggregate(body, limit).await,
        }
    }
}
