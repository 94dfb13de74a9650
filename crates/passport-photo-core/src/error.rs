//! Error taxonomy for photo analysis.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a file or upload into a [`crate::PhotoImage`].
#[derive(Debug, Error)]
pub enum ImageLoadError {
    /// The file could not be read.
    #[error("failed to read image {}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The bytes are not a decodable image.
    #[error("failed to decode image {source_name}: {source}")]
    Decode {
        /// Path or upload name of the image.
        source_name: String,
        /// Underlying decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The image decoded but has no pixels.
    #[error("image {0} has zero width or height")]
    EmptyImage(String),
}

/// Failure talking to one of the perception services.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure: connection refused, timeout, TLS error.
    #[error("{service} request failed: {message}")]
    Request {
        /// Service that was being called.
        service: &'static str,
        /// Transport error description.
        message: String,
    },

    /// The service answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    Status {
        /// Service that was being called.
        service: &'static str,
        /// HTTP status code.
        status: u16,
        /// Response body, as text.
        body: String,
    },

    /// The service answered with a body that does not match its contract.
    #[error("{service} returned an unexpected response: {message}")]
    Response {
        /// Service that was being called.
        service: &'static str,
        /// What was wrong with the body.
        message: String,
    },
}

impl GatewayError {
    /// Name of the service the error came from.
    #[must_use]
    pub const fn service(&self) -> &'static str {
        match self {
            Self::Request { service, .. }
            | Self::Status { service, .. }
            | Self::Response { service, .. } => service,
        }
    }
}

/// A face record lacks an attribute the rule evaluators depend on.
///
/// This means the face service changed its contract or was asked for the
/// wrong attributes; it is never defaulted away.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("detected face is missing the `{attribute}` attribute")]
pub struct PreconditionError {
    /// Wire name of the missing attribute.
    pub attribute: &'static str,
}

/// Failure of a whole analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A perception service call failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The selected face cannot be evaluated.
    #[error(transparent)]
    Precondition(#[from] PreconditionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_names_service() {
        let err = GatewayError::Status {
            service: "face",
            status: 401,
            body: "denied".into(),
        };
        assert_eq!(err.service(), "face");
        assert_eq!(err.to_string(), "face returned HTTP 401: denied");
    }

    #[test]
    fn test_precondition_message() {
        let err = PreconditionError {
            attribute: "headPose",
        };
        assert_eq!(
            err.to_string(),
            "detected face is missing the `headPose` attribute"
        );
    }

    #[test]
    fn test_analysis_error_is_transparent() {
        let err = AnalysisError::from(GatewayError::Request {
            service: "vision",
            message: "timed out".into(),
        });
        assert_eq!(err.to_string(), "vision request failed: timed out");
    }
}
