use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::teachers::{CreateTeacherDto, Teacher, default_teacher_email};
use schoolhub_store::SchoolStore;
use tracing::instrument;

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub struct TeacherService;

impl TeacherService {
    pub async fn list(store: &SchoolStore) -> Vec<Teacher> {
        store.read(|state| state.data.teachers.clone()).await
    }

    /// Add a teacher. The e-mail defaults to the name without spaces at
    /// `school.com`, and classes must already exist.
    #[instrument(skip(store, dto), fields(name = %dto.name))]
    pub async fn create(
        store: &SchoolStore,
        actor: &str,
        dto: CreateTeacherDto,
    ) -> Result<Teacher, AppError> {
        store
            .mutate(|tx| {
                if let Some(unknown) = dto.classes.iter().find(|c| !tx.data.classes.contains(*c)) {
                    return Err(AppError::bad_request(anyhow!("Unknown class {}", unknown)));
                }

                let name = dto.name.trim().to_string();
                let teacher = Teacher {
                    id: tx.next_id(),
                    email: non_blank(dto.email).unwrap_or_else(|| default_teacher_email(&name)),
                    name,
                    subject: dto.subject.trim().to_string(),
                    classes: dto.classes,
                    phone: non_blank(dto.phone),
                    qualification: non_blank(dto.qualification),
                    experience: non_blank(dto.experience),
                };
                tx.data.teachers.push(teacher.clone());
                tx.audit(
                    actor,
                    "add_teacher",
                    format!("Teacher {} added ({})", teacher.name, teacher.subject),
                );
                Ok(teacher)
            })
            .await
    }

    #[instrument(skip(store))]
    pub async fn delete(store: &SchoolStore, actor: &str, id: RecordId) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let index = tx
                    .data
                    .teachers
                    .iter()
                    .position(|t| t.id == id)
                    .ok_or_else(|| AppError::not_found(anyhow!("Teacher with id {} not found", id)))?;
                let removed = tx.data.teachers.remove(index);
                tx.audit(
                    actor,
                    "delete_teacher",
                    format!("Teacher {} deleted", removed.name),
                );
                Ok(())
            })
            .await
    }
}
