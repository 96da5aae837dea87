#![allow(clippy::missing_errors_doc)]

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use fleetsim_core::GeoPoint;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SCENARIO_DOMAIN: &str = "fleet";
const SCENARIO_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded scenario payload.
pub(crate) const SCENARIO_HEADER: &str = "fleet:v1";
/// Delimiter used to separate the prefix, route count and payload.
const FIELD_DELIMITER: char = ':';

/// Scripted fleet description the CLI can emit and consume as one token.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct FleetScenario {
    /// Routes to assemble, one equipment per entry.
    pub routes: Vec<ScenarioRoute>,
}

impl FleetScenario {
    /// Encodes the scenario into a single-line string suitable for clipboard
    /// transfer.
    #[must_use]
    pub(crate) fn encode(&self) -> String {
        let json = serde_json::to_vec(&self.routes).expect("scenario serialization never fails");
        let encoded = STANDARD_NO_PAD.encode(json);
        format!("{SCENARIO_HEADER}:{}:{encoded}", self.routes.len())
    }

    /// Decodes a scenario from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, ScenarioTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ScenarioTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(ScenarioTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(ScenarioTransferError::MissingVersion)?;
        let count = parts.next().ok_or(ScenarioTransferError::MissingCount)?;
        let payload = parts.next().ok_or(ScenarioTransferError::MissingPayload)?;

        if domain != SCENARIO_DOMAIN {
            return Err(ScenarioTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SCENARIO_VERSION {
            return Err(ScenarioTransferError::UnsupportedVersion(
                version.to_owned(),
            ));
        }

        let expected = count
            .trim()
            .parse::<usize>()
            .map_err(|_| ScenarioTransferError::InvalidCount(count.to_owned()))?;
        let bytes = STANDARD_NO_PAD.decode(payload.as_bytes())?;
        let routes: Vec<ScenarioRoute> = serde_json::from_slice(&bytes)?;

        if routes.len() != expected {
            return Err(ScenarioTransferError::CountMismatch {
                expected,
                found: routes.len(),
            });
        }

        Ok(Self { routes })
    }
}

/// One equipment's scripted route within a scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct ScenarioRoute {
    /// Waypoints appended in order.
    pub waypoints: Vec<GeoPoint>,
    /// Whether the session starts this equipment after assembly.
    pub start: bool,
}

/// Errors that can occur while decoding scenario transfer strings.
#[derive(Debug, Error)]
pub(crate) enum ScenarioTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("scenario payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded scenario.
    #[error("scenario string is missing the prefix")]
    MissingPrefix,
    /// The encoded scenario did not contain a version segment.
    #[error("scenario string is missing the version")]
    MissingVersion,
    /// The encoded scenario did not include the route count.
    #[error("scenario string is missing the route count")]
    MissingCount,
    /// The encoded scenario did not include the payload segment.
    #[error("scenario string is missing the payload")]
    MissingPayload,
    /// The encoded scenario used an unexpected prefix segment.
    #[error("scenario prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded scenario used an unsupported version identifier.
    #[error("scenario version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The route count could not be parsed from the encoded scenario.
    #[error("could not parse route count '{0}'")]
    InvalidCount(String),
    /// The route count disagreed with the decoded payload.
    #[error("scenario names {expected} route(s) but carries {found}")]
    CountMismatch {
        /// Count named in the header.
        expected: usize,
        /// Routes found in the payload.
        found: usize,
    },
    /// The base64 payload could not be decoded.
    #[error("could not decode scenario payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    /// The decoded payload could not be deserialised.
    #[error("could not parse scenario payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),
}
