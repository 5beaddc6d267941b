//! Registry commands sent from guard/camera entities to the detection engine.
//!
//! Commands are queued and applied at the next tick boundary, so registry
//! mutation never interleaves with an evaluation pass.

use serde::{Deserialize, Serialize};

use crate::components::{AudioZone, AudioZoneId, Detector, DetectorId, Obstacle};
use crate::types::Position;

/// All possible registry mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RegistryCommand {
    // --- Detector lifecycle ---
    /// Register a detector spawned by its owning entity.
    AddDetector { detector: Detector },
    /// Unregister a detector. Unknown ids are ignored.
    RemoveDetector { id: DetectorId },
    /// Owner pushes the detector's current pose.
    UpdatePose {
        id: DetectorId,
        position: Position,
        facing: f64,
    },
    /// Enable or disable a detector (e.g., camera switched off).
    SetActive { id: DetectorId, active: bool },

    // --- Audio zones ---
    AddAudioZone { zone: AudioZone },
    RemoveAudioZone { id: AudioZoneId },

    // --- Level geometry ---
    AddObstacle { obstacle: Obstacle },
    ClearObstacles,
}
