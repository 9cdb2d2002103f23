//! Generation DTOs

use serde::{Deserialize, Serialize};

use crate::validation::{self, ValidationErrors};

/// Body of `POST /generate-image`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub width: u32,
    pub height: u32,
    #[serde(rename = "num_inference_steps")]
    pub steps: u32,
}

impl GenerationRequest {
    pub const DEFAULT_SIZE: u32 = 1024;
    pub const DEFAULT_STEPS: u32 = 9;

    /// Creates a request for `prompt` with default dimensions and steps
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            width: Self::DEFAULT_SIZE,
            height: Self::DEFAULT_SIZE,
            steps: Self::DEFAULT_STEPS,
        }
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = steps;
        self
    }

    /// Runs every local validation rule against this request
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validation::validate(self)
    }
}

/// Response of `POST /generate-image`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateImageResponse {
    pub job_id: String,
    pub image_name: String,
    pub status: String,
}
