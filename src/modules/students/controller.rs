use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use schoolhub_core::{AppError, ErrorResponse, RecordId};
use schoolhub_models::students::{
    BulkDeleteDto, BulkDeleteResponse, BulkStudentEditDto, CreateStudentDto, Student,
    StudentSearchParams, UpdateMarksDto, UpdateStudentDto,
};
use tracing::instrument;

use super::service::StudentService;
use crate::middleware::auth::AuthUser;
use crate::middleware::role::{RequireAdmin, RequireStaff};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List students, optionally filtered. Parents only see their own child.
#[utoipa::path(
    get,
    path = "/api/students",
    params(StudentSearchParams),
    responses(
        (status = 200, description = "Matching students", body = Vec<Student>),
        (status = 401, description = "Not signed in", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, user))]
pub async fn list_students(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<StudentSearchParams>,
) -> Json<Vec<Student>> {
    Json(StudentService::list(&state.store, &user, params).await)
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 200, description = "Student", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, user))]
pub async fn get_student(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<RecordId>,
) -> Result<Json<Student>, AppError> {
    Ok(Json(StudentService::get(&state.store, &user, id).await?))
}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 403, description = "Admin only", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, admin, dto))]
pub async fn create_student(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let default_fee = state.config.registration.default_student_fee;
    let student =
        StudentService::create(&state.store, admin.username(), default_fee, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, admin, dto))]
pub async fn update_student(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RecordId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update(&state.store, admin.username(), id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = i64, Path, description = "Student id")),
    responses(
        (status = 204, description = "Student deleted"),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, admin))]
pub async fn delete_student(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<RecordId>,
) -> Result<StatusCode, AppError> {
    StudentService::delete(&state.store, admin.username(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/students/bulk-delete",
    request_body = BulkDeleteDto,
    responses(
        (status = 200, description = "Number of students deleted", body = BulkDeleteResponse),
        (status = 422, description = "No ids given", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, admin, dto))]
pub async fn bulk_delete_students(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<BulkDeleteDto>,
) -> Result<Json<BulkDeleteResponse>, AppError> {
    let deleted = StudentService::bulk_delete(&state.store, admin.username(), dto.ids).await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}/marks",
    params(("id" = i64, Path, description = "Student id")),
    request_body = UpdateMarksDto,
    responses(
        (status = 200, description = "Marks saved, GPA recomputed", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse),
        (status = 422, description = "Marks out of range", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, staff, dto))]
pub async fn update_marks(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(id): Path<RecordId>,
    ValidatedJson(dto): ValidatedJson<UpdateMarksDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_marks(&state.store, staff.username(), id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    get,
    path = "/api/students/class/{class_name}",
    params(("class_name" = String, Path, description = "Class name, e.g. 10A")),
    responses(
        (status = 200, description = "Students in the class", body = Vec<Student>),
        (status = 403, description = "Staff only", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, _staff))]
pub async fn class_roster(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(class_name): Path<String>,
) -> Json<Vec<Student>> {
    Json(StudentService::class_roster(&state.store, &class_name).await)
}

#[utoipa::path(
    put,
    path = "/api/students/class/{class_name}",
    params(("class_name" = String, Path, description = "Class name, e.g. 10A")),
    request_body = BulkStudentEditDto,
    responses(
        (status = 200, description = "Updated students", body = Vec<Student>),
        (status = 404, description = "A student is not in the class", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, staff, dto))]
pub async fn bulk_class_edit(
    State(state): State<AppState>,
    RequireStaff(staff): RequireStaff,
    Path(class_name): Path<String>,
    ValidatedJson(dto): ValidatedJson<BulkStudentEditDto>,
) -> Result<Json<Vec<Student>>, AppError> {
    let students =
        StudentService::bulk_class_edit(&state.store, staff.username(), &class_name, dto).await?;
    Ok(Json(students))
}
