use dioxus::prelude::*;

/// User-facing failure of a screen load or action. Details go to the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    /// The analysis server could not be reached or answered with an error.
    Network,
    NotFound,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Network => {
                "Could not reach the analysis server. Please check your connection and try again."
            }
            Self::NotFound => "That record could not be found.",
            Self::Unknown => "Something went wrong. Please try again.",
        }
    }
}

impl From<services::DashboardError> for ViewError {
    fn from(err: services::DashboardError) -> Self {
        match err {
            services::DashboardError::Api(services::ApiError::HttpStatus(status))
                if status == services::api::StatusCode::NOT_FOUND =>
            {
                Self::NotFound
            }
            services::DashboardError::Api(_) => Self::Network,
            _ => Self::Unknown,
        }
    }
}

impl From<services::AuthoringError> for ViewError {
    fn from(err: services::AuthoringError) -> Self {
        match err {
            services::AuthoringError::Api(_) => Self::Network,
            _ => Self::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::api::StatusCode;
    use services::{ApiError, AuthoringError, DashboardError};

    #[test]
    fn missing_student_maps_to_not_found() {
        let err = DashboardError::Api(ApiError::HttpStatus(StatusCode::NOT_FOUND));
        assert_eq!(ViewError::from(err), ViewError::NotFound);
        let err = DashboardError::Api(ApiError::HttpStatus(StatusCode::BAD_GATEWAY));
        assert_eq!(ViewError::from(err), ViewError::Network);
    }

    #[test]
    fn empty_bank_is_not_a_network_error() {
        assert_eq!(
            ViewError::from(AuthoringError::EmptyQuestionList),
            ViewError::Unknown
        );
    }
}
