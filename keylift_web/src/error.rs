// Copyright 2025 the Keylift Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use keylift_adapt::ParamsError;

/// Why a browser host could not be set up.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum LiftError {
    /// No global `window` object (for example inside a worker).
    #[error("no global `window` object")]
    NoWindow,
    /// The window has no document.
    #[error("window has no document")]
    NoDocument,
    /// The document has no `<body>` yet.
    #[error("document has no body")]
    NoBody,
    /// The supplied configuration was rejected.
    #[error(transparent)]
    Params(#[from] ParamsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use keylift_adapt::AdaptationParams;

    #[test]
    fn invalid_params_convert_and_keep_their_message() {
        let err = AdaptationParams::default()
            .with_safe_input_padding(-4.0)
            .validate()
            .map_err(LiftError::from)
            .unwrap_err();
        assert!(matches!(err, LiftError::Params(ParamsError::Negative { .. })));
        assert_eq!(
            err.to_string(),
            "`safeInputPadding` must not be negative (got -4)"
        );
    }

    #[test]
    fn missing_dom_pieces_are_named() {
        assert_eq!(LiftError::NoBody.to_string(), "document has no body");
    }
}
