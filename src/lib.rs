pub mod math;
pub mod core;
pub mod bodies;

/// Re-export common types for easier usage
pub use crate::core::{
    BodyHandle, Notification, NotificationSink, ObserverHandle, Outbox, ProximityController,
    StreamingConfig, World, WorldBorder,
};
pub use crate::bodies::{Body, BodyMotion, LoadState, Pose, SeparatingAxes, TransformManager};
pub use crate::math::{Aabb, Orientation, Vector3};

/// Error types for body streaming
pub mod error {
    use crate::math::{Aabb, Real};
    use thiserror::Error;

    #[derive(Error, Debug, Clone, PartialEq)]
    pub enum StreamingError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        /// The derived bounding box is implausibly large. Raised only when pose
        /// or cell data is already corrupt; there is no recovery path.
        #[error("Unexpectedly large body bounding box (average edge {average_edge_length}): {bounds}")]
        GeometryInvariantViolation {
            average_edge_length: Real,
            bounds: Aabb,
        },
    }

    impl StreamingError {
        /// True for errors that indicate corrupted state rather than bad input
        pub fn is_fatal(&self) -> bool {
            matches!(self, StreamingError::GeometryInvariantViolation { .. })
        }
    }
}

/// Result type for streaming operations
pub type Result<T> = std::result::Result<T, error::StreamingError>;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
