use tracing::warn;

use crate::config::RecoveryPolicy;
use crate::decoder::{BodyDecoder, DecoderSet};
use crate::error::{DecodeError, IngestError};
use crate::outcome::ParseOutcome;
use crate::{ContentTypeTag, DecodedBody};

/// Runs a decoder and turns its failure into an outcome according to one
/// [`RecoveryPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Containment {
    policy: RecoveryPolicy,
}

impl Containment {
    pub fn new(policy: RecoveryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RecoveryPolicy {
        self.policy
    }

    /// Decodes `buf` with `decoders` and contains any failure.
    pub fn decode<J, F>(&self, decoders: &DecoderSet<J, F>, tag: ContentTypeTag, buf: &[u8]) -> ParseOutcome
    where
        J: BodyDecoder,
        F: BodyDecoder,
    {
        self.contain(tag, decoders.decode(tag, buf))
    }

    /// Keeps a decoded body, or applies the policy to a decode failure.
    pub fn contain(&self, tag: ContentTypeTag, result: Result<DecodedBody, DecodeError>) -> ParseOutcome {
        let error = match result {
            Ok(body) => return ParseOutcome::Decoded(body),
            Err(e) => IngestError::from(e),
        };

        match (self.policy, error.rejection()) {
            (RecoveryPolicy::SurfaceError, Some(rejection)) => {
                warn!(content_type = %tag, cause = %error, "failed to decode request body, rejecting request");
                ParseOutcome::Failed(rejection)
            }
            _ => {
                warn!(content_type = %tag, cause = %error, "failed to decode request body, continue with empty body");
                ParseOutcome::Decoded(DecodedBody::new())
            }
        }
    }
}
