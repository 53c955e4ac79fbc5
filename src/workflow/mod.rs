pub mod run_ctx;
pub mod submission_flow;

pub use run_ctx::RunCtx;
pub use submission_flow::SubmissionFlow;
