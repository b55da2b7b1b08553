use std::path::PathBuf;
use std::sync::Arc;

use floodwatch_engine::MappingService;
use floodwatch_imagery::ImageryAcquisition;

use crate::store::ReportStore;

#[derive(Clone)]
pub struct AppState {
    pub imagery: Arc<dyn ImageryAcquisition>,
    pub mapping: Arc<MappingService>,
    pub reports: Arc<dyn ReportStore>,
    pub image_dir: PathBuf,
}

impl AppState {
    pub fn new(
        imagery: Arc<dyn ImageryAcquisition>,
        mapping: Arc<MappingService>,
        reports: Arc<dyn ReportStore>,
        image_dir: PathBuf,
    ) -> Self {
        Self {
            imagery,
            mapping,
            reports,
            image_dir,
        }
    }
}
