// SPDX-License-Identifier: Apache-2.0

//! Error conversion from revq-core errors to MCP errors.

use revq_core::RevqError;
use rmcp::model::{ErrorCode, ErrorData};

/// Convert `RevqError` into a typed MCP error based on error variant.
///
/// Maps error variants to appropriate MCP error codes:
/// - `Config`, `Validation` -> `INVALID_PARAMS`
/// - `NotAuthenticated`, `InvalidCredentials` -> `INVALID_REQUEST`
/// - All others -> `INTERNAL_ERROR`
pub fn revq_error_to_mcp(err: &RevqError) -> ErrorData {
    let code = match err {
        RevqError::Config { .. } | RevqError::Validation { .. } => ErrorCode::INVALID_PARAMS,
        RevqError::NotAuthenticated | RevqError::InvalidCredentials => ErrorCode::INVALID_REQUEST,
        _ => ErrorCode::INTERNAL_ERROR,
    };

    match code {
        ErrorCode::INVALID_PARAMS => ErrorData::invalid_params(err.to_string(), None),
        ErrorCode::INVALID_REQUEST => ErrorData::invalid_request(err.to_string(), None),
        _ => ErrorData::internal_error(err.to_string(), None),
    }
}

/// Convert any error implementing Display into an MCP internal error.
pub fn generic_to_mcp_error<E: std::fmt::Display>(err: E) -> ErrorData {
    ErrorData::internal_error(err.to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_string_error_with_generic() {
        let err = generic_to_mcp_error("something went wrong");
        assert_eq!(err.code, ErrorCode::INTERNAL_ERROR);
        assert!(err.message.contains("something went wrong"));
    }

    #[test]
    fn config_maps_to_invalid_params() {
        let err = RevqError::Config {
            message: "bad pattern".to_string(),
        };
        let mcp_err = revq_error_to_mcp(&err);
        assert_eq!(mcp_err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn validation_maps_to_invalid_params() {
        let err = RevqError::Validation {
            message: "missing field".to_string(),
        };
        let mcp_err = revq_error_to_mcp(&err);
        assert_eq!(mcp_err.code, ErrorCode::INVALID_PARAMS);
    }

    #[test]
    fn not_authenticated_maps_to_invalid_request() {
        let mcp_err = revq_error_to_mcp(&RevqError::NotAuthenticated);
        assert_eq!(mcp_err.code, ErrorCode::INVALID_REQUEST);
    }

    #[test]
    fn invalid_credentials_maps_to_invalid_request() {
        let mcp_err = revq_error_to_mcp(&RevqError::InvalidCredentials);
        assert_eq!(mcp_err.code, ErrorCode::INVALID_REQUEST);
    }

    #[test]
    fn github_error_maps_to_internal_error() {
        let err = RevqError::GitHub {
            message: "rate limited".to_string(),
        };
        let mcp_err = revq_error_to_mcp(&err);
        assert_eq!(mcp_err.code, ErrorCode::INTERNAL_ERROR);
    }

    #[test]
    fn rate_limited_maps_to_internal_error() {
        let err = RevqError::RateLimited { retry_after: 60 };
        let mcp_err = revq_error_to_mcp(&err);
        assert_eq!(mcp_err.code, ErrorCode::INTERNAL_ERROR);
    }
}
