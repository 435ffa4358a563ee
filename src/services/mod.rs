pub mod question_bank;
pub mod sampler;
pub mod shortfall_writer;
pub mod test_store;

pub use question_bank::{HttpQuestionBank, JsonQuestionBank, QuestionBank, QuestionBankSource};
pub use sampler::{SampleResult, Sampler, Shortfall};
pub use shortfall_writer::ShortfallWriter;
pub use test_store::{JsonTestStore, SaveResponse, TestStore};
