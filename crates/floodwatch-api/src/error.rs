use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use floodwatch_core::error::{
    AuthError, CatalogError, ComputeError, ConfigError, GeometryError, ProcessingError,
};
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<GeometryError> for ApiError {
    fn from(err: GeometryError) -> Self {
        Self::bad_request("Invalid geometry provided").with_details(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let status = match &err {
            AuthError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AuthError::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            AuthError::Network { .. } | AuthError::MalformedResponse { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        Self::internal("Imagery provider authentication failed")
            .with_status(status)
            .with_details(err.to_string())
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self::internal("Catalog search failed")
            .with_status(StatusCode::BAD_GATEWAY)
            .with_details(err.to_string())
    }
}

impl From<ProcessingError> for ApiError {
    fn from(err: ProcessingError) -> Self {
        let status = match &err {
            ProcessingError::InvalidBand { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_GATEWAY,
        };
        Self::internal("Band processing failed")
            .with_status(status)
            .with_details(err.to_string())
    }
}

impl From<ComputeError> for ApiError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::Geometry(inner) => inner.into(),
            ComputeError::Auth(inner) => inner.into(),
            ComputeError::Catalog(inner) => inner.into(),
            ComputeError::NoCoverage { window } => {
                Self::not_found("No radar data available").with_details(window)
            }
            ComputeError::BackendUnavailable { detail } => {
                Self::internal("Raster backend is not initialized").with_details(detail)
            }
            ComputeError::Render { detail } => Self::internal("Overlay rendering failed")
                .with_status(StatusCode::BAD_GATEWAY)
                .with_details(detail),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        Self::internal("Server misconfiguration").with_details(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_errors_are_client_errors() {
        let err: ApiError = GeometryError::TooFewPoints { found: 2 }.into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rate_limits_map_to_429() {
        let err: ApiError = AuthError::RateLimited { attempts: 3 }.into();
        assert_eq!(err.status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn invalid_band_is_unprocessable() {
        let err: ApiError = ProcessingError::InvalidBand {
            name: "HH".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn missing_coverage_is_not_found() {
        let err: ApiError = ComputeError::NoCoverage {
            window: "2020-01-05/2020-01-15".to_string(),
        }
        .into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn nested_geometry_failures_keep_their_status() {
        let err: ApiError =
            ComputeError::Geometry(GeometryError::TooFewPoints { found: 1 }).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
