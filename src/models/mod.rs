pub mod loaders;
pub mod question;
pub mod test_plan;
pub mod weightage;

pub use loaders::{load_all_plans, load_plan, load_question_bank};
pub use question::{Difficulty, QuestionBankItem, QuestionFilters};
pub use test_plan::{TestDefinition, TestKind, TestPlan, TestQuestionRef};
pub use weightage::{DistributionResult, LessonDistribution, LessonWeightConfig, SubjectWeightConfig};
