use anyhow::anyhow;
use schoolhub_core::AppError;
use schoolhub_models::Role;
use schoolhub_models::classes::{ClassSummary, CreateClassDto};
use schoolhub_store::{SchoolState, SchoolStore};
use tracing::instrument;

/// Classes a teacher account teaches: those on the teacher record with the
/// same name or e-mail, or every class when no record matches.
pub fn teacher_classes(state: &SchoolState, name: &str, email: &str) -> Vec<String> {
    state
        .data
        .teachers
        .iter()
        .find(|t| t.name == name || t.email.eq_ignore_ascii_case(email))
        .map(|t| t.classes.clone())
        .unwrap_or_else(|| state.data.classes.clone())
}

pub fn summaries(state: &SchoolState, classes: &[String]) -> Vec<ClassSummary> {
    classes
        .iter()
        .map(|name| ClassSummary {
            name: name.clone(),
            student_count: state.data.students_in_class(name).count(),
        })
        .collect()
}

pub struct ClassService;

impl ClassService {
    /// Every class for admins and parents, the teacher's own classes for
    /// teachers.
    pub async fn list(store: &SchoolStore, role: Role, username: &str) -> Vec<ClassSummary> {
        store
            .read(|state| {
                let classes = match (role, state.user(username, role)) {
                    (Role::Teacher, Some(user)) => teacher_classes(state, &user.name, &user.email),
                    _ => state.data.classes.clone(),
                };
                summaries(state, &classes)
            })
            .await
    }

    #[instrument(skip(store, dto), fields(class = %dto.name))]
    pub async fn create(
        store: &SchoolStore,
        actor: &str,
        dto: CreateClassDto,
    ) -> Result<ClassSummary, AppError> {
        let name = dto.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::unprocessable(anyhow!("Class name is required")));
        }

        store
            .mutate(|tx| {
                if tx.data.classes.contains(&name) {
                    return Err(AppError::conflict(anyhow!("Class {} already exists", name)));
                }
                tx.data.classes.push(name.clone());
                tx.audit(actor, "add_class", format!("Class {} added", name));
                Ok(ClassSummary {
                    student_count: tx.data.students_in_class(&name).count(),
                    name: name.clone(),
                })
            })
            .await
    }

    /// Remove a class name. Students, teachers and records that mention it
    /// are left untouched.
    #[instrument(skip(store))]
    pub async fn delete(store: &SchoolStore, actor: &str, name: &str) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let index = tx
                    .data
                    .classes
                    .iter()
                    .position(|c| c == name)
                    .ok_or_else(|| AppError::not_found(anyhow!("Class {} not found", name)))?;
                tx.data.classes.remove(index);
                tx.audit(actor, "delete_class", format!("Class {} deleted", name));
                Ok(())
            })
            .await
    }
}
