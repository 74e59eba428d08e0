//! glance-aws — AWS implementations of the glance service traits.
//!
//! Wraps the async Textract and Rekognition SDK clients behind the blocking
//! [`glance_core::TextService`] and [`glance_core::FaceService`] interfaces.

pub mod rekognition;
pub mod session;
pub mod textract;

pub use rekognition::RekognitionService;
pub use session::{AwsSession, SessionError};
pub use textract::TextractService;
