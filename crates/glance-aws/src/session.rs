use crate::rekognition::RekognitionService;
use crate::textract::TextractService;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Runtime;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Shared AWS configuration plus the runtime that drives SDK calls.
///
/// Credentials and (unless overridden) region come from the SDK's default
/// provider chain. Service handles created from one session share its
/// runtime and block the calling thread on every request.
pub struct AwsSession {
    runtime: Arc<Runtime>,
    config: SdkConfig,
}

impl AwsSession {
    /// Resolve AWS configuration, optionally pinning the region.
    pub fn load(region: Option<&str>) -> Result<Self, SessionError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = runtime.block_on(loader.load());

        tracing::info!(region = ?config.region(), "AWS configuration loaded");

        Ok(Self {
            runtime: Arc::new(runtime),
            config,
        })
    }

    pub fn textract(&self) -> TextractService {
        TextractService::new(
            Arc::clone(&self.runtime),
            aws_sdk_textract::Client::new(&self.config),
        )
    }

    pub fn rekognition(&self) -> RekognitionService {
        RekognitionService::new(
            Arc::clone(&self.runtime),
            aws_sdk_rekognition::Client::new(&self.config),
        )
    }
}
