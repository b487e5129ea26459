//! Proctoring Monitor: tab tracking, camera stream ownership, input restriction.

mod camera;
mod tab_tracker;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::runtime::Handle;
use tracing::{info, warn};

use quiz_core::input::{InputPolicy, InputVerdict, KeyCombo};

pub use camera::{CameraDevice, CameraStream, NoCamera};
pub use tab_tracker::{TabTracker, Visibility};

/// Camera state as shown next to the preview element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraStatus {
    #[default]
    Off,
    Requesting,
    Live,
    Unavailable,
}

#[derive(Default)]
struct CameraSlot {
    generation: u64,
    active: bool,
    stream: Option<CameraStream>,
    status: CameraStatus,
}

impl CameraSlot {
    fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            info!(label = stream.label(), "releasing camera stream");
            stream.release();
        }
    }
}

pub struct ProctoringMonitor {
    runtime: Handle,
    device: Arc<dyn CameraDevice>,
    camera: Arc<Mutex<CameraSlot>>,
    tracker: TabTracker,
    policy: InputPolicy,
    active: bool,
}

impl ProctoringMonitor {
    #[must_use]
    pub fn new(runtime: Handle, device: Arc<dyn CameraDevice>) -> Self {
        Self {
            tracker: TabTracker::new(runtime.clone()),
            runtime,
            device,
            camera: Arc::new(Mutex::new(CameraSlot::default())),
            policy: InputPolicy::proctored(),
            active: false,
        }
    }

    /// Start monitoring.
    ///
    /// `on_second` runs once per second while tracking. The camera is
    /// requested in the background; `on_camera` is told whether it went live.
    /// A denied or missing camera is logged and never blocks the session.
    pub fn start<F, C>(&mut self, on_second: F, on_camera: C)
    where
        F: Fn() + Send + 'static,
        C: FnOnce(CameraStatus) + Send + 'static,
    {
        self.teardown();
        self.active = true;
        self.tracker.start(on_second);

        let generation = {
            let mut slot = self.lock_camera();
            slot.generation += 1;
            slot.active = true;
            slot.status = CameraStatus::Requesting;
            slot.generation
        };

        let device = Arc::clone(&self.device);
        let camera = Arc::clone(&self.camera);
        self.runtime.spawn(async move {
            let result = device.acquire().await;
            let mut slot = camera.lock().unwrap_or_else(PoisonError::into_inner);
            let status = match result {
                Ok(stream) if slot.active && slot.generation == generation => {
                    info!(label = stream.label(), "camera stream live");
                    slot.stream = Some(stream);
                    CameraStatus::Live
                }
                Ok(stream) => {
                    // Session ended while the grant was pending.
                    stream.release();
                    return;
                }
                Err(err) => {
                    warn!(error = %err, "camera unavailable, continuing without preview");
                    if slot.generation != generation {
                        return;
                    }
                    CameraStatus::Unavailable
                }
            };
            slot.status = status;
            drop(slot);
            on_camera(status);
        });
    }

    /// Forward a host visibility change. Returns `true` for a tab switch.
    pub fn visibility_changed(&mut self, next: Visibility) -> bool {
        self.active && self.tracker.visibility_changed(next)
    }

    /// Verdict for a key press; everything passes while inactive.
    #[must_use]
    pub fn check_input(&self, combo: &KeyCombo) -> InputVerdict {
        if self.active {
            self.policy.check(combo)
        } else {
            InputVerdict::Allow
        }
    }

    #[must_use]
    pub fn blocks_context_menu(&self) -> bool {
        self.active && self.policy.blocks_context_menu()
    }

    /// The policy currently in force.
    #[must_use]
    pub fn input_policy(&self) -> InputPolicy {
        if self.active {
            self.policy.clone()
        } else {
            InputPolicy::permissive()
        }
    }

    #[must_use]
    pub fn camera_status(&self) -> CameraStatus {
        self.lock_camera().status
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Release the camera and stop tab tracking. Idempotent.
    pub fn teardown(&mut self) {
        self.tracker.stop();
        let mut slot = self.lock_camera();
        slot.active = false;
        slot.release();
        if slot.status != CameraStatus::Unavailable {
            slot.status = CameraStatus::Off;
        }
        drop(slot);
        self.active = false;
    }

    fn lock_camera(&self) -> std::sync::MutexGuard<'_, CameraSlot> {
        self.camera.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for ProctoringMonitor {
    fn drop(&mut self) {
        self.teardown();
    }
}
