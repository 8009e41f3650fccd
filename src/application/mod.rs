// Application layer - Use cases over the prediction backend
pub mod backend;
pub mod dashboard_service;
pub mod relay_service;

#[cfg(test)]
pub mod fake_backend;
