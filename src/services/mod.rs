use crate::db::store::Stores;

pub mod alerts;
pub mod cameras;
pub mod detections;
pub mod images;
pub mod motions;
pub(crate) mod validation;

pub use alerts::AlertService;
pub use cameras::CameraService;
pub use detections::DetectionService;
pub use images::ImageService;
pub use motions::MotionService;

/// How an update payload is merged over the stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    /// PUT: required fields must be supplied
    Full,
    /// PATCH: only supplied fields change
    Partial,
}

impl UpdateMode {
    fn requires_all(self) -> bool {
        self == UpdateMode::Full
    }
}

/// All record services over one set of stores
#[derive(Clone)]
pub struct Services {
    pub cameras: CameraService,
    pub motions: MotionService,
    pub images: ImageService,
    pub detections: DetectionService,
    pub alerts: AlertService,
}

impl Services {
    pub fn new(stores: Stores) -> Self {
        Self {
            cameras: CameraService::new(stores.clone()),
            motions: MotionService::new(stores.clone()),
            images: ImageService::new(stores.clone()),
            detections: DetectionService::new(stores.clone()),
            alerts: AlertService::new(stores),
        }
    }

    /// Services over a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Stores::memory())
    }
}
