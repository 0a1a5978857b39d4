use schoolhub_models::reports::{AdminStats, Report, ReportKind};
use schoolhub_store::SchoolStore;

pub struct ReportService;

impl ReportService {
    pub async fn stats(store: &SchoolStore) -> AdminStats {
        store
            .read(|state| {
                AdminStats::compute(
                    &state.data.students,
                    state.data.teachers.len(),
                    state.data.classes.len(),
                )
            })
            .await
    }

    pub async fn report(store: &SchoolStore, kind: ReportKind) -> Report {
        store
            .read(|state| Report::build(kind, &state.data.students))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stats_for_default_data() {
        let store = SchoolStore::in_memory().await.unwrap();
        let stats = ReportService::stats(&store).await;
        assert_eq!(stats.total_students, 2);
        assert_eq!(stats.total_teachers, 2);
        assert_eq!(stats.total_classes, 3);
        assert_eq!(stats.average_attendance, 89);

        let report = ReportService::report(&store, ReportKind::Attendance).await;
        assert_eq!(report.points.len(), 2);
        assert_eq!(report.summary.unwrap().highest, 92.0);
    }
}
