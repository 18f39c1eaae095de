mod auth_vm;
mod authoring_vm;
mod dashboard_vm;
mod quiz_vm;

pub use auth_vm::{AuthCopyVm, StrengthVm, map_auth_copy, map_password_strength};
pub use authoring_vm::{OptionLineVm, QuestionItemVm, map_question_items, question_count_label};
pub use dashboard_vm::{
    ConceptGapVm, InterventionVm, StudentDetailVm, StudentRowVm, SummaryCardVm, map_intervention,
    map_student_detail, map_student_row, map_summary_cards,
};
pub use quiz_vm::{
    ConceptBadgeVm, OptionVm, QuestionVm, QuizScreen, ResultsVm, RiskBadgeVm, TimerVm,
    map_quiz_screen, map_timer,
};
