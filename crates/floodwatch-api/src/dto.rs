//! Request and response bodies.

pub mod request;
pub mod response;

pub use request::{
    BandImageRequest, ContourRequest, CreateReportRequest, FloodDifferenceRequest,
    FloodMappingRequest, GeometryDto, LatLng,
};
pub use response::{
    BandImageResponse, ContourResponse, DifferenceDates, DifferenceParameters,
    FloodDifferenceResponse, FloodMappingResponse, HealthResponse, LocationEntry,
};
