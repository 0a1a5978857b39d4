use anyhow::anyhow;
use schoolhub_core::{AppError, RecordId};
use schoolhub_models::Role;
use schoolhub_models::students::{
    BulkStudentEditDto, CreateStudentDto, Fees, Student, StudentSearchParams, UpdateMarksDto,
    UpdateStudentDto, default_marks,
};
use schoolhub_store::SchoolStore;
use tracing::{info, instrument};

use crate::middleware::auth::AuthUser;

fn student_not_found(id: RecordId) -> AppError {
    AppError::not_found(anyhow!("Student with id {} not found", id))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parents only ever see the students linked to their account name.
fn visible_to(user: &AuthUser, student: &Student) -> bool {
    user.role() != Role::Parent || student.parent.as_deref() == Some(user.name())
}

pub struct StudentService;

impl StudentService {
    #[instrument(skip(store, user), fields(username = %user.username()))]
    pub async fn list(
        store: &SchoolStore,
        user: &AuthUser,
        params: StudentSearchParams,
    ) -> Vec<Student> {
        let query = params.q.unwrap_or_default();
        store
            .read(|state| {
                state
                    .data
                    .students
                    .iter()
                    .filter(|s| visible_to(user, s))
                    .filter(|s| s.matches(&query))
                    .filter(|s| params.class.as_deref().is_none_or(|c| s.class_name == c))
                    .cloned()
                    .collect()
            })
            .await
    }

    pub async fn get(
        store: &SchoolStore,
        user: &AuthUser,
        id: RecordId,
    ) -> Result<Student, AppError> {
        store
            .read(|state| state.data.student(id).cloned())
            .await
            .filter(|s| visible_to(user, s))
            .ok_or_else(|| student_not_found(id))
    }

    /// The first student linked to a parent account, if any.
    pub async fn child_of(store: &SchoolStore, parent_name: &str) -> Option<Student> {
        store
            .read(|state| {
                state
                    .data
                    .students
                    .iter()
                    .find(|s| s.parent.as_deref() == Some(parent_name))
                    .cloned()
            })
            .await
    }

    #[instrument(skip(store, dto), fields(name = %dto.name))]
    pub async fn create(
        store: &SchoolStore,
        actor: &str,
        default_fee: f64,
        dto: CreateStudentDto,
    ) -> Result<Student, AppError> {
        let student = store
            .mutate(|tx| {
                let student = Student {
                    id: tx.next_id(),
                    name: dto.name.trim().to_string(),
                    class_name: dto.class_name.trim().to_string(),
                    attendance: 100,
                    marks: default_marks(),
                    fees: Fees::new(dto.fees_total.unwrap_or(default_fee)),
                    gpa: 0.0,
                    parent: non_blank(dto.parent),
                    email: non_blank(dto.email),
                    phone: non_blank(dto.phone),
                    dob: non_blank(dto.dob),
                    address: non_blank(dto.address),
                };
                tx.data.students.push(student.clone());
                tx.audit(
                    actor,
                    "add_student",
                    format!("Student {} added to {}", student.name, student.class_name),
                );
                Ok::<_, AppError>(student)
            })
            .await?;

        info!(student_id = student.id, "Student created");
        Ok(student)
    }

    #[instrument(skip(store, dto))]
    pub async fn update(
        store: &SchoolStore,
        actor: &str,
        id: RecordId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        store
            .mutate(|tx| {
                let student = tx.data.student_mut(id).ok_or_else(|| student_not_found(id))?;
                if let Some(name) = non_blank(dto.name) {
                    student.name = name;
                }
                if let Some(class_name) = non_blank(dto.class_name) {
                    student.class_name = class_name;
                }
                if let Some(attendance) = dto.attendance {
                    student.attendance = attendance;
                }
                if let Some(total) = dto.fees_total {
                    student.fees.total = total;
                    student.fees.paid = student.fees.paid.min(total);
                }
                if dto.email.is_some() {
                    student.email = non_blank(dto.email);
                }
                if dto.phone.is_some() {
                    student.phone = non_blank(dto.phone);
                }
                if dto.dob.is_some() {
                    student.dob = non_blank(dto.dob);
                }
                if dto.address.is_some() {
                    student.address = non_blank(dto.address);
                }
                if dto.parent.is_some() {
                    student.parent = non_blank(dto.parent);
                }
                let updated = student.clone();
                tx.audit(actor, "edit_student", format!("Student {} updated", updated.name));
                Ok(updated)
            })
            .await
    }

    /// Remove exactly the student with `id`.
    #[instrument(skip(store))]
    pub async fn delete(store: &SchoolStore, actor: &str, id: RecordId) -> Result<(), AppError> {
        store
            .mutate(|tx| {
                let index = tx
                    .data
                    .students
                    .iter()
                    .position(|s| s.id == id)
                    .ok_or_else(|| student_not_found(id))?;
                let removed = tx.data.students.remove(index);
                tx.audit(
                    actor,
                    "delete_student",
                    format!("Student {} deleted", removed.name),
                );
                Ok(())
            })
            .await
    }

    /// Delete every listed student that exists. Unknown ids are ignored.
    #[instrument(skip(store, ids), fields(requested = ids.len()))]
    pub async fn bulk_delete(
        store: &SchoolStore,
        actor: &str,
        ids: Vec<RecordId>,
    ) -> Result<usize, AppError> {
        store
            .mutate(|tx| {
                let before = tx.data.students.len();
                tx.data.students.retain(|s| !ids.contains(&s.id));
                let deleted = before - tx.data.students.len();
                if deleted > 0 {
                    tx.audit(
                        actor,
                        "bulk_delete",
                        format!("Deleted {} students", deleted),
                    );
                }
                Ok::<_, AppError>(deleted)
            })
            .await
    }

    pub async fn class_roster(store: &SchoolStore, class_name: &str) -> Vec<Student> {
        store
            .read(|state| state.data.students_in_class(class_name).cloned().collect())
            .await
    }

    /// Merge `dto.marks` into the student's marks and recompute the GPA.
    #[instrument(skip(store, dto))]
    pub async fn update_marks(
        store: &SchoolStore,
        actor: &str,
        id: RecordId,
        dto: UpdateMarksDto,
    ) -> Result<Student, AppError> {
        store
            .mutate(|tx| {
                let student = tx.data.student_mut(id).ok_or_else(|| student_not_found(id))?;
                for (subject, mark) in dto.marks {
                    student.marks.insert(subject.trim().to_lowercase(), mark);
                }
                student.recompute_gpa();
                let updated = student.clone();
                tx.audit(
                    actor,
                    "update_marks",
                    format!("Marks updated for {} (GPA {:.2})", updated.name, updated.gpa),
                );
                Ok(updated)
            })
            .await
    }

    /// Apply a teacher's edits to several students of one class at once.
    /// Every id must belong to `class_name`; nothing is saved otherwise.
    #[instrument(skip(store, dto), fields(rows = dto.students.len()))]
    pub async fn bulk_class_edit(
        store: &SchoolStore,
        actor: &str,
        class_name: &str,
        dto: BulkStudentEditDto,
    ) -> Result<Vec<Student>, AppError> {
        store
            .mutate(|tx| {
                let mut updated = Vec::with_capacity(dto.students.len());
                for edit in dto.students {
                    let student = tx
                        .data
                        .student_mut(edit.id)
                        .filter(|s| s.class_name == class_name)
                        .ok_or_else(|| {
                            AppError::not_found(anyhow!(
                                "Student with id {} not found in class {}",
                                edit.id,
                                class_name
                            ))
                        })?;
                    if let Some(name) = non_blank(edit.name) {
                        student.name = name;
                    }
                    if let Some(attendance) = edit.attendance {
                        student.attendance = attendance;
                    }
                    if let Some(marks) = edit.marks {
                        for (subject, mark) in marks {
                            student.marks.insert(subject.trim().to_lowercase(), mark);
                        }
                        student.recompute_gpa();
                    }
                    updated.push(student.clone());
                }
                tx.audit(
                    actor,
                    "edit_class_students",
                    format!("Updated {} students in {}", updated.len(), class_name),
                );
                Ok(updated)
            })
            .await
    }
}
