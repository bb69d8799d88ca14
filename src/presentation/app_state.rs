// Application state for HTTP handlers
use crate::application::assistant_service::AssistantService;
use crate::application::record_service::RecordService;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::timeline_service::TimelineService;

#[derive(Clone)]
pub struct AppState {
    pub timeline_service: TimelineService,
    pub streaming_service: StreamingDashboardService,
    pub record_service: RecordService,
    pub assistant_service: AssistantService,
}
