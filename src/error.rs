//! Error types for radar commands and point set loading.

use thiserror::Error;

use crate::radar::SetId;

/// Errors raised by the command surface and by point set validation.
///
/// Every variant is reported before any state is touched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RadarError {
    #[error("invalid rotation amount '{input}': expected a finite number of degrees")]
    InvalidRotationInput { input: String },

    #[error("invalid direction '{input}': expected left or right")]
    InvalidDirection { input: String },

    #[error("unknown point set '{input}': expected blue or red")]
    InvalidPointSetName { input: String },

    #[error("invalid {set} point set: {reason}")]
    InvalidPointSet { set: SetId, reason: String },
}

impl RadarError {
    pub fn invalid_rotation(input: impl Into<String>) -> Self {
        RadarError::InvalidRotationInput {
            input: input.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = RadarError::invalid_rotation("abc");
        assert_eq!(
            err.to_string(),
            "invalid rotation amount 'abc': expected a finite number of degrees"
        );

        let err = RadarError::InvalidPointSet {
            set: SetId::Red,
            reason: "set is empty".to_string(),
        };
        assert_eq!(err.to_string(), "invalid red point set: set is empty");

        let err = "green".parse::<SetId>().unwrap_err();
        assert_eq!(
            err,
            RadarError::InvalidPointSetName {
                input: "green".to_string()
            }
        );
        assert_eq!(
            err.to_string(),
            "unknown point set 'green': expected blue or red"
        );
    }
}
