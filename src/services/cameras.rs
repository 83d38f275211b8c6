use super::{validation, UpdateMode};
use crate::db::models::{Camera, CameraFields, CameraPayload, Image, MotionEvent, Resolution};
use crate::db::store::{Stores, DUPLICATE_ADDRESS};
use crate::error::{Error, ValidationErrors};
use anyhow::Result;
use log::info;

const ADDRESS_MAX_LEN: usize = 200;
const STATUS_MAX_LEN: usize = 20;

fn not_found(id: i64) -> Error {
    Error::NotFound(format!("camera with id {}", id))
}

/// Camera records and the listings nested under a camera
#[derive(Clone)]
pub struct CameraService {
    stores: Stores,
}

impl CameraService {
    pub fn new(stores: Stores) -> Self {
        Self { stores }
    }

    pub async fn list(&self) -> Result<Vec<Camera>> {
        self.stores.cameras.list().await
    }

    pub async fn count(&self) -> Result<i64> {
        self.stores.cameras.count().await
    }

    pub async fn get(&self, id: i64) -> Result<Camera> {
        self.stores
            .cameras
            .get(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn create(&self, payload: CameraPayload) -> Result<Camera> {
        let fields = self.validate(payload, None, true).await?;
        let camera = self.stores.cameras.insert(&fields).await?;
        info!("Created camera {} at {}", camera.id, camera.address);
        Ok(camera)
    }

    pub async fn update(&self, id: i64, payload: CameraPayload, mode: UpdateMode) -> Result<Camera> {
        let current = self.get(id).await?;
        let fields = self
            .validate(payload, Some(&current), mode.requires_all())
            .await?;

        self.stores
            .cameras
            .update(id, &fields)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    pub async fn find_by_address(&self, address: &str) -> Result<Option<Camera>> {
        self.stores.cameras.get_by_address(address).await
    }

    /// Removes the camera together with everything recorded from it.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.stores.cameras.delete(id).await? {
            return Err(not_found(id).into());
        }
        info!("Deleted camera {}", id);
        Ok(())
    }

    /// Motion events of a camera; empty when the camera does not exist.
    pub async fn motions(&self, id: i64) -> Result<Vec<MotionEvent>> {
        self.stores.motions.list_by_camera(id).await
    }

    /// Images whose motion event belongs to the camera.
    pub async fn images(&self, id: i64) -> Result<Vec<Image>> {
        self.stores.images.list_by_camera(id).await
    }

    async fn validate(
        &self,
        payload: CameraPayload,
        current: Option<&Camera>,
        require: bool,
    ) -> Result<CameraFields> {
        let mut errors = ValidationErrors::default();

        let address = validation::required(
            &mut errors,
            "address",
            payload.address,
            current.map(|c| c.address.clone()),
            require,
        );
        if let Some(address) = &address {
            if validation::url(&mut errors, "address", address, ADDRESS_MAX_LEN) {
                let owner = self.stores.cameras.get_by_address(address).await?;
                if owner.map_or(false, |owner| Some(owner.id) != current.map(|c| c.id)) {
                    errors.add("address", DUPLICATE_ADDRESS);
                }
            }
        }

        let resolution = match payload.resolution {
            Some(value) => match value.parse::<Resolution>() {
                Ok(resolution) => Some(resolution),
                Err(message) => {
                    errors.add("resolution", message);
                    None
                }
            },
            None => validation::required(
                &mut errors,
                "resolution",
                None,
                current.map(|c| c.resolution),
                require,
            ),
        };

        let fps = payload
            .fps
            .or(current.map(|c| i64::from(c.fps)))
            .unwrap_or(i64::from(CameraFields::DEFAULT_FPS));
        validation::integer(&mut errors, "fps", fps, Some(1), Some(i64::from(i32::MAX)));

        let motion_sensitivity = payload
            .motion_sensitivity
            .or(current.map(|c| c.motion_sensitivity))
            .unwrap_or(CameraFields::DEFAULT_MOTION_SENSITIVITY);
        validation::number(
            &mut errors,
            "motion_sensitivity",
            motion_sensitivity,
            Some(0.0),
            Some(1.0),
        );

        let status = payload
            .status
            .or(current.map(|c| c.status.clone()))
            .unwrap_or_else(|| CameraFields::DEFAULT_STATUS.to_string());
        validation::text(&mut errors, "status", &status, STATUS_MAX_LEN);

        errors.into_result()?;

        let (Some(address), Some(resolution), Ok(fps)) = (address, resolution, i32::try_from(fps))
        else {
            return Err(Error::Internal("camera fields incomplete after validation".into()).into());
        };

        Ok(CameraFields {
            address,
            resolution,
            fps,
            motion_sensitivity,
            status,
        })
    }
}
