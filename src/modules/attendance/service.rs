use std::collections::HashMap;

use anyhow::anyhow;
use schoolhub_core::AppError;
use schoolhub_models::attendance::{
    AttendanceEntry, AttendanceRecord, AttendanceStatus, SaveAttendanceDto,
};
use schoolhub_store::SchoolStore;
use tracing::{info, instrument};

use crate::middleware::auth::AuthUser;
use crate::utils::clock::{format_date, today};

pub struct AttendanceService;

impl AttendanceService {
    /// Record a register for every student in the class. Students without
    /// a mark are saved as not marked.
    #[instrument(skip(store, user, dto), fields(class = %dto.class_name))]
    pub async fn save(
        store: &SchoolStore,
        user: &AuthUser,
        dto: SaveAttendanceDto,
    ) -> Result<AttendanceRecord, AppError> {
        let class_name = dto.class_name.trim().to_string();
        let record = store
            .mutate(|tx| {
                if !tx.data.classes.contains(&class_name) {
                    return Err(AppError::bad_request(anyhow!("Unknown class {}", class_name)));
                }
                let marks: HashMap<_, _> = dto
                    .records
                    .iter()
                    .map(|mark| (mark.student_id, mark.status))
                    .collect();
                let roster: Vec<_> = tx.data.students_in_class(&class_name).collect();
                if let Some(stray) = marks.keys().find(|id| !roster.iter().any(|s| s.id == **id)) {
                    return Err(AppError::bad_request(anyhow!(
                        "Student {} is not in class {}",
                        stray,
                        class_name
                    )));
                }

                let record = AttendanceRecord {
                    date: dto.date.map(format_date).unwrap_or_else(today),
                    class_name: class_name.clone(),
                    records: roster
                        .iter()
                        .map(|student| AttendanceEntry {
                            student_id: student.id,
                            student_name: student.name.clone(),
                            status: marks
                                .get(&student.id)
                                .copied()
                                .unwrap_or(AttendanceStatus::NotMarked),
                        })
                        .collect(),
                    taken_by: user.name().to_string(),
                };
                tx.attendance_history.push(record.clone());
                tx.audit(
                    user.username(),
                    "save_attendance",
                    format!("Attendance saved for class {}", class_name),
                );
                Ok(record)
            })
            .await?;

        info!(
            present = record.count(AttendanceStatus::Present),
            absent = record.count(AttendanceStatus::Absent),
            "Register saved"
        );
        Ok(record)
    }

    /// Saved registers, newest first, optionally for one class.
    pub async fn history(store: &SchoolStore, class_name: Option<&str>) -> Vec<AttendanceRecord> {
        store
            .read(|state| {
                state
                    .attendance_history
                    .iter()
                    .rev()
                    .filter(|r| class_name.is_none_or(|c| r.class_name == c))
                    .cloned()
                    .collect()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use schoolhub_auth::Session;
    use schoolhub_models::Role;
    use schoolhub_models::attendance::AttendanceMark;

    fn teacher() -> AuthUser {
        AuthUser(Session {
            token: "t".to_string(),
            user_id: 1,
            username: "wilson".to_string(),
            role: Role::Teacher,
            name: "Mr. Wilson".to_string(),
            login_time: Utc::now(),
            last_activity: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_register_covers_whole_class() {
        let store = SchoolStore::in_memory().await.unwrap();
        let roster: Vec<_> = store
            .read(|s| s.data.students_in_class("10A").map(|st| st.id).collect())
            .await;
        assert!(!roster.is_empty());

        let dto = SaveAttendanceDto {
            class_name: "10A".to_string(),
            date: None,
            records: vec![AttendanceMark {
                student_id: roster[0],
                status: AttendanceStatus::Present,
            }],
        };
        let record = AttendanceService::save(&store, &teacher(), dto).await.unwrap();
        assert_eq!(record.records.len(), roster.len());
        assert_eq!(record.taken_by, "Mr. Wilson");
        assert_eq!(record.date, today());
        assert_eq!(record.count(AttendanceStatus::Present), 1);

        assert_eq!(AttendanceService::history(&store, Some("10A")).await.len(), 1);
        assert!(AttendanceService::history(&store, Some("11A")).await.is_empty());
    }

    #[tokio::test]
    async fn test_student_from_another_class_is_rejected() {
        let store = SchoolStore::in_memory().await.unwrap();
        let outsider = store
            .read(|s| s.data.students_in_class("10B").map(|st| st.id).next())
            .await
            .unwrap();
        let dto = SaveAttendanceDto {
            class_name: "10A".to_string(),
            date: None,
            records: vec![AttendanceMark {
                student_id: outsider,
                status: AttendanceStatus::Absent,
            }],
        };
        let err = AttendanceService::save(&store, &teacher(), dto).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
