use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::Role;
use schoolhub_models::homework::{
    AssignHomeworkDto, CreateAssignmentDto, DEFAULT_DUE_DAYS, Homework, HomeworkStatus,
};
use schoolhub_store::{SchoolState, SchoolStore};
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::utils::clock::{format_date, today, today_plus_days};

pub fn child_class(state: &SchoolState, parent_name: &str) -> Option<String> {
    state
        .data
        .students
        .iter()
        .find(|s| s.parent.as_deref() == Some(parent_name))
        .map(|s| s.class_name.clone())
}

fn ensure_class(state: &SchoolState, class_name: &str) -> Result<(), AppError> {
    if state.data.classes.iter().any(|c| c == class_name) {
        Ok(())
    } else {
        Err(AppError::bad_request(anyhow!("Unknown class {}", class_name)))
    }
}

pub struct HomeworkService;

impl HomeworkService {
    /// Staff see every item; parents see their child's class only.
    pub async fn list(store: &SchoolStore, user: &AuthUser) -> Vec<Homework> {
        store
            .read(|state| match user.role() {
                Role::Parent => match child_class(state, user.name()) {
                    Some(class_name) => state
                        .data
                        .homework
                        .iter()
                        .filter(|hw| hw.class_name == class_name)
                        .cloned()
                        .collect(),
                    None => Vec::new(),
                },
                _ => state.data.homework.clone(),
            })
            .await
    }

    /// Quick assignment, due a week from today unless a date is given.
    #[instrument(skip(store, dto), fields(class = %dto.class_name))]
    pub async fn assign(
        store: &SchoolStore,
        actor: &str,
        dto: AssignHomeworkDto,
    ) -> Result<Homework, AppError> {
        store
            .mutate(|tx| {
                let class_name = dto.class_name.trim().to_string();
                ensure_class(tx, &class_name)?;
                let homework = Homework {
                    id: tx.next_id(),
                    class_name,
                    subject: dto.subject.trim().to_string(),
                    title: None,
                    task: dto.task.trim().to_string(),
                    due_date: dto
                        .due_date
                        .map(format_date)
                        .unwrap_or_else(|| today_plus_days(DEFAULT_DUE_DAYS)),
                    status: HomeworkStatus::Pending,
                    total_marks: None,
                    created_by: None,
                    created_date: None,
                };
                tx.data.homework.push(homework.clone());
                tx.audit(
                    actor,
                    "assign_homework",
                    format!("{} homework assigned to {}", homework.subject, homework.class_name),
                );
                Ok(homework)
            })
            .await
    }

    /// Graded assignment with a title and total marks.
    #[instrument(skip(store, user, dto), fields(title = %dto.title))]
    pub async fn create_assignment(
        store: &SchoolStore,
        user: &AuthUser,
        dto: CreateAssignmentDto,
    ) -> Result<Homework, AppError> {
        store
            .mutate(|tx| {
                let class_name = dto.class_name.trim().to_string();
                ensure_class(tx, &class_name)?;
                let homework = Homework {
                    id: tx.next_id(),
                    class_name,
                    subject: dto.subject.trim().to_string(),
                    title: Some(dto.title.trim().to_string()),
                    task: dto.description.trim().to_string(),
                    due_date: format_date(dto.due_date),
                    status: HomeworkStatus::Active,
                    total_marks: Some(dto.total_marks),
                    created_by: Some(user.name().to_string()),
                    created_date: Some(today()),
                };
                tx.data.homework.push(homework.clone());
                tx.audit(
                    user.username(),
                    "create_assignment",
                    format!(
                        "Assignment \"{}\" created for class {}",
                        dto.title.trim(),
                        homework.class_name
                    ),
                );
                Ok(homework)
            })
            .await
    }

    /// A parent marks homework for their child's class as done.
    #[instrument(skip(store, user))]
    pub async fn mark_complete(
        store: &SchoolStore,
        user: &AuthUser,
        id: RecordId,
    ) -> Result<Homework, AppError> {
        store
            .mutate(|tx| {
                let class_name = child_class(tx, user.name())
                    .ok_or_else(|| AppError::not_found(anyhow!("No child is linked to this account")))?;
                let homework = tx
                    .data
                    .homework
                    .iter_mut()
                    .find(|hw| hw.id == id && hw.class_name == class_name)
                    .ok_or_else(|| AppError::not_found(anyhow!("Homework not found")))?;
                homework.status = HomeworkStatus::Completed;
                let homework = homework.clone();
                tx.audit(
                    user.username(),
                    "complete_homework",
                    format!("{} homework marked complete", homework.subject),
                );
                Ok(homework)
            })
            .await
    }

    #[instrument(skip(store))]
    pub async fn delete(store: &SchoolStore, actor: &str, id: RecordId) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let index = tx
                    .data
                    .homework
                    .iter()
                    .position(|hw| hw.id == id)
                    .ok_or_else(|| AppError::not_found(anyhow!("Homework not found")))?;
                let removed = tx.data.homework.remove(index);
                tx.audit(
                    actor,
                    "delete_homework",
                    format!("{} homework for {} deleted", removed.subject, removed.class_name),
                );
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use schoolhub_auth::Session;

    fn user(role: Role, name: &str) -> AuthUser {
        AuthUser(Session {
            token: "t".to_string(),
            user_id: 1,
            username: "someone".to_string(),
            role,
            name: name.to_string(),
            login_time: Utc::now(),
            last_activity: Utc::now(),
        })
    }

    #[tokio::test]
    async fn test_assign_defaults_and_parent_filter() {
        let store = SchoolStore::in_memory().await.unwrap();
        let dto = AssignHomeworkDto {
            class_name: "10B".to_string(),
            subject: "English".to_string(),
            task: "Read chapter 4".to_string(),
            due_date: None,
        };
        let hw = HomeworkService::assign(&store, "teacher", dto).await.unwrap();
        assert_eq!(hw.status, HomeworkStatus::Pending);
        assert_eq!(hw.due_date, today_plus_days(7));

        let staff = HomeworkService::list(&store, &user(Role::Teacher, "Mr. Wilson")).await;
        assert!(staff.iter().any(|h| h.id == hw.id));

        // Parent with no linked child sees nothing.
        let parent = HomeworkService::list(&store, &user(Role::Parent, "Nobody")).await;
        assert!(parent.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_class_is_rejected() {
        let store = SchoolStore::in_memory().await.unwrap();
        let dto = AssignHomeworkDto {
            class_name: "99Z".to_string(),
            subject: "Math".to_string(),
            task: "Anything".to_string(),
            due_date: None,
        };
        let err = HomeworkService::assign(&store, "teacher", dto).await.unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST);
    }
}
