mod dashboard;
mod login;
mod quiz;
mod quiz_setup;
mod state;
pub(crate) mod task;

pub use dashboard::TeacherDashboardView;
pub use login::{LoginView, landing_route};
pub use quiz::QuizView;
pub use quiz_setup::QuizSetupView;
pub use state::{ViewError, ViewState, view_state_from_resource};

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;
