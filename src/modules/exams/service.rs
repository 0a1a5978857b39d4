use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::exams::{CreateExamDto, DEFAULT_EXAM_DURATION, DEFAULT_TOTAL_MARKS, Exam};
use schoolhub_store::SchoolStore;
use tracing::instrument;

use crate::utils::clock::format_date;

pub struct ExamService;

impl ExamService {
    pub async fn list(store: &SchoolStore) -> Vec<Exam> {
        let mut exams = store.read(|state| state.data.exams.clone()).await;
        exams.sort_by(|a, b| a.date.cmp(&b.date));
        exams
    }

    #[instrument(skip(store, dto), fields(subject = %dto.subject, class = %dto.class_name))]
    pub async fn create(store: &SchoolStore, actor: &str, dto: CreateExamDto) -> Result<Exam, AppError> {
        store
            .mutate(|tx| {
                let class_name = dto.class_name.trim().to_string();
                if !tx.data.classes.contains(&class_name) {
                    return Err(AppError::bad_request(anyhow!("Unknown class {}", class_name)));
                }
                let exam = Exam {
                    id: tx.next_id(),
                    subject: dto.subject.trim().to_string(),
                    class_name,
                    date: format_date(dto.date),
                    duration: dto
                        .duration
                        .map(|d| d.trim().to_string())
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| DEFAULT_EXAM_DURATION.to_string()),
                    total_marks: dto.total_marks.unwrap_or(DEFAULT_TOTAL_MARKS),
                };
                tx.data.exams.push(exam.clone());
                tx.audit(
                    actor,
                    "add_exam",
                    format!("{} exam scheduled for {} on {}", exam.subject, exam.class_name, exam.date),
                );
                Ok(exam)
            })
            .await
    }

    #[instrument(skip(store))]
    pub async fn delete(store: &SchoolStore, actor: &str, id: RecordId) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let index = tx
                    .data
                    .exams
                    .iter()
                    .position(|e| e.id == id)
                    .ok_or_else(|| AppError::not_found(anyhow!("Exam not found")))?;
                let removed = tx.data.exams.remove(index);
                tx.audit(
                    actor,
                    "delete_exam",
                    format!("{} exam for {} cancelled", removed.subject, removed.class_name),
                );
                Ok(())
            })
            .await
    }
}
