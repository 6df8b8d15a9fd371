mod error;
mod ids;
mod pipeline;

pub use error::PipelineError;
pub use pipeline::SubmissionPipeline;
