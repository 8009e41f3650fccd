// Application state for HTTP handlers
use crate::application::dashboard_service::DashboardService;
use crate::application::relay_service::RelayService;

#[derive(Clone)]
pub struct AppState {
    pub relay_service: RelayService,
    pub dashboard_service: DashboardService,
}
