pub mod dom;
pub mod loaders;
pub mod plan;
pub mod question;
pub mod result;

pub use dom::{DomTree, NodeId};
pub use loaders::{load_schema_file, save_schema_file};
pub use plan::{Answer, AnswerMap, PlannedSequence, RunPlan};
pub use question::{FormSchema, Question, QuestionKind};
pub use result::{ResultSet, RunResult};
