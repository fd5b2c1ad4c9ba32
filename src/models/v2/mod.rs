//! QTI 2.x model family

pub mod assessment_item;
pub mod interactions;
pub mod stimulus;

pub use assessment_item::AssessmentItem;
pub use assessment_test::AssessmentTest;
pub use non_assessment_test::NonAssessmentTest;
pub use stimulus::Stimulus;
