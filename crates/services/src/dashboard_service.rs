use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gaps_core::dashboard::DashboardView;
use gaps_core::model::{Dashboard, StudentDetail, StudentId};
use gaps_core::report::{CSV_FILE_NAME, JSON_FILE_NAME, Report};

use crate::Clock;
use crate::api::QuizBackend;
use crate::error::DashboardError;

/// Paths written by `DashboardService::export_report`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedReport {
    pub csv_path: PathBuf,
    pub json_path: PathBuf,
}

/// Teacher dashboard loading, reset and export.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    backend: Arc<dyn QuizBackend>,
}

impl DashboardService {
    #[must_use]
    pub fn new(clock: Clock, backend: Arc<dyn QuizBackend>) -> Self {
        Self { clock, backend }
    }

    /// Fetch the aggregate and derive everything the screen shows.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Api` if the backend call fails.
    pub async fn load(&self) -> Result<DashboardView, DashboardError> {
        let dashboard = self.backend.fetch_dashboard().await.map_err(|err| {
            tracing::error!(error = %err, "failed to load dashboard");
            err
        })?;
        tracing::debug!(
            students = dashboard.students.len(),
            concepts = dashboard.concept_analysis.len(),
            "dashboard loaded"
        );
        Ok(DashboardView::new(dashboard))
    }

    /// # Errors
    ///
    /// Returns `DashboardError::Api` if the backend call fails.
    pub async fn student_detail(
        &self,
        student_id: &StudentId,
    ) -> Result<StudentDetail, DashboardError> {
        let detail = self
            .backend
            .fetch_student_detail(student_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, %student_id, "failed to load student detail");
                err
            })?;
        Ok(detail)
    }

    /// Delete all results, then reload. Callers confirm with the user first.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Api` if either call fails.
    pub async fn reset_and_reload(&self) -> Result<DashboardView, DashboardError> {
        self.backend.reset_data().await.map_err(|err| {
            tracing::error!(error = %err, "failed to reset data");
            err
        })?;
        tracing::info!("all student results deleted");
        self.load().await
    }

    /// # Errors
    ///
    /// Returns `DashboardError::Report` when there are no students.
    pub fn build_report(&self, dashboard: &Dashboard) -> Result<Report, DashboardError> {
        Ok(Report::build(dashboard, self.clock.now())?)
    }

    /// Write the CSV and JSON reports into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::Report` when there are no students, or
    /// `DashboardError::Io` if a file cannot be written.
    pub fn export_report(
        &self,
        dashboard: &Dashboard,
        dir: &Path,
    ) -> Result<ExportedReport, DashboardError> {
        let report = self.build_report(dashboard)?;
        fs::create_dir_all(dir)?;

        let csv_path = dir.join(CSV_FILE_NAME);
        fs::write(&csv_path, report.to_csv())?;
        let json_path = dir.join(JSON_FILE_NAME);
        fs::write(&json_path, report.to_json_pretty()?)?;

        tracing::info!(
            students = report.students.len(),
            dir = %dir.display(),
            "report exported"
        );
        Ok(ExportedReport {
            csv_path,
            json_path,
        })
    }
}
