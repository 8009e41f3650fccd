// Domain layer - Request/response payloads exchanged with the prediction backend
pub mod dashboard;
pub mod location;
pub mod model;
pub mod prediction;
pub mod upload;
pub mod validation;
