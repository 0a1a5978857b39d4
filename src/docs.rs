use schoolhub_auth::SessionStatus;
use schoolhub_core::ErrorResponse;
use schoolhub_models::announcements::{Announcement, CreateAnnouncementDto};
use schoolhub_models::attendance::{
    AttendanceEntry, AttendanceMark, AttendanceRecord, AttendanceStatus, SaveAttendanceDto,
};
use schoolhub_models::audit::AuditEntry;
use schoolhub_models::classes::{ClassSummary, CreateClassDto};
use schoolhub_models::events::{CreateEventDto, Event};
use schoolhub_models::exams::{CreateExamDto, Exam};
use schoolhub_models::homework::{AssignHomeworkDto, CreateAssignmentDto, Homework, HomeworkStatus};
use schoolhub_models::library::{
    Book, CreateBookDto, DocumentRecord, LibraryCatalog, LibraryItemKind, StudyMaterial, Syllabus,
    UpdateBookDto, UploadDocumentDto, UploadMaterialDto, UploadSyllabusDto,
};
use schoolhub_models::messages::{
    ChatGroup, Contact, ConversationSummary, GroupMessage, Message, PostGroupMessageDto,
    ReplyMessageDto, SendMessageDto,
};
use schoolhub_models::reports::{AdminStats, Report, ReportKind, ReportPoint, ReportSummary};
use schoolhub_models::students::{
    BulkDeleteDto, BulkDeleteResponse, BulkStudentEditDto, ClassStudentEdit, CreateStudentDto,
    Fees, RecordPaymentDto, Student, UpdateMarksDto, UpdateStudentDto,
};
use schoolhub_models::teachers::{CreateTeacherDto, Teacher};
use schoolhub_models::timetable::TimetableRow;
use schoolhub_models::transport::{AssignRouteStudentDto, CreateRouteDto, TransportRoute};
use schoolhub_models::users::{
    ChangePasswordDto, LoginRequest, RegisterRequestDto, Role, UpdateAccountDto, UserProfile,
};
use schoolhub_models::{BackupBundle, Collection, SchoolData};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::modules::account::model::AccountExport;
use crate::modules::auth::model::{LoginResponse, MessageResponse};
use crate::modules::data::model::{HistoryResponse, ThemeResponse};
use crate::modules::fees::model::{FeeRow, FeeSummary, PaymentReceipt};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::account::controller::get_profile,
        crate::modules::account::controller::update_profile,
        crate::modules::account::controller::change_password,
        crate::modules::account::controller::get_activity,
        crate::modules::account::controller::export_account,
        crate::modules::announcements::controller::list_announcements,
        crate::modules::announcements::controller::create_announcement,
        crate::modules::announcements::controller::delete_announcement,
        crate::modules::attendance::controller::save_attendance,
        crate::modules::attendance::controller::attendance_history,
        crate::modules::auth::controller::register_user,
        crate::modules::auth::controller::login_user,
        crate::modules::auth::controller::logout_user,
        crate::modules::auth::controller::session_status,
        crate::modules::auth::controller::extend_session,
        crate::modules::classes::controller::list_classes,
        crate::modules::classes::controller::create_class,
        crate::modules::classes::controller::delete_class,
        crate::modules::data::controller::export_collection,
        crate::modules::data::controller::toggle_theme,
        crate::modules::data::controller::backup,
        crate::modules::data::controller::restore,
        crate::modules::data::controller::reset,
        crate::modules::data::controller::undo,
        crate::modules::data::controller::redo,
        crate::modules::events::controller::list_events,
        crate::modules::events::controller::create_event,
        crate::modules::events::controller::delete_event,
        crate::modules::exams::controller::list_exams,
        crate::modules::exams::controller::create_exam,
        crate::modules::exams::controller::delete_exam,
        crate::modules::fees::controller::fee_summary,
        crate::modules::fees::controller::record_payment,
        crate::modules::fees::controller::pay_fees,
        crate::modules::homework::controller::list_homework,
        crate::modules::homework::controller::assign_homework,
        crate::modules::homework::controller::create_assignment,
        crate::modules::homework::controller::mark_complete,
        crate::modules::homework::controller::delete_homework,
        crate::modules::library::controller::get_catalog,
        crate::modules::library::controller::add_book,
        crate::modules::library::controller::edit_book,
        crate::modules::library::controller::borrow_book,
        crate::modules::library::controller::return_book,
        crate::modules::library::controller::upload_material,
        crate::modules::library::controller::upload_document,
        crate::modules::library::controller::upload_syllabus,
        crate::modules::library::controller::download_item,
        crate::modules::library::controller::delete_item,
        crate::modules::messages::controller::list_contacts,
        crate::modules::messages::controller::list_conversations,
        crate::modules::messages::controller::get_conversation,
        crate::modules::messages::controller::send_message,
        crate::modules::messages::controller::reply_message,
        crate::modules::messages::controller::list_groups,
        crate::modules::messages::controller::post_group_message,
        crate::modules::reports::controller::get_stats,
        crate::modules::reports::controller::get_report,
        crate::modules::students::controller::list_students,
        crate::modules::students::controller::get_student,
        crate::modules::students::controller::create_student,
        crate::modules::students::controller::update_student,
        crate::modules::students::controller::delete_student,
        crate::modules::students::controller::bulk_delete_students,
        crate::modules::students::controller::update_marks,
        crate::modules::students::controller::class_roster,
        crate::modules::students::controller::bulk_class_edit,
        crate::modules::teachers::controller::list_teachers,
        crate::modules::teachers::controller::create_teacher,
        crate::modules::teachers::controller::delete_teacher,
        crate::modules::timetable::controller::get_timetable,
        crate::modules::timetable::controller::save_timetable,
        crate::modules::timetable::controller::export_timetable,
        crate::modules::transport::controller::list_routes,
        crate::modules::transport::controller::create_route,
        crate::modules::transport::controller::delete_route,
        crate::modules::transport::controller::assign_student,
    ),
    components(
        schemas(
            ErrorResponse,
            Role,
            UserProfile,
            RegisterRequestDto,
            LoginRequest,
            LoginResponse,
            MessageResponse,
            SessionStatus,
            Student,
            Fees,
            CreateStudentDto,
            UpdateStudentDto,
            UpdateMarksDto,
            ClassStudentEdit,
            BulkStudentEditDto,
            BulkDeleteDto,
            BulkDeleteResponse,
            RecordPaymentDto,
            Teacher,
            CreateTeacherDto,
            ClassSummary,
            CreateClassDto,
            FeeRow,
            FeeSummary,
            PaymentReceipt,
            Announcement,
            CreateAnnouncementDto,
            Homework,
            HomeworkStatus,
            AssignHomeworkDto,
            CreateAssignmentDto,
            Message,
            Contact,
            ConversationSummary,
            SendMessageDto,
            ReplyMessageDto,
            ChatGroup,
            GroupMessage,
            PostGroupMessageDto,
            Event,
            CreateEventDto,
            Book,
            StudyMaterial,
            DocumentRecord,
            Syllabus,
            LibraryCatalog,
            LibraryItemKind,
            CreateBookDto,
            UpdateBookDto,
            UploadMaterialDto,
            UploadDocumentDto,
            UploadSyllabusDto,
            TransportRoute,
            CreateRouteDto,
            AssignRouteStudentDto,
            Exam,
            CreateExamDto,
            AttendanceStatus,
            AttendanceMark,
            AttendanceEntry,
            AttendanceRecord,
            SaveAttendanceDto,
            TimetableRow,
            AdminStats,
            ReportKind,
            ReportPoint,
            ReportSummary,
            Report,
            UpdateAccountDto,
            ChangePasswordDto,
            AuditEntry,
            AccountExport,
            Collection,
            SchoolData,
            BackupBundle,
            HistoryResponse,
            ThemeResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and sessions"),
        (name = "Students", description = "Student records, marks and class rosters"),
        (name = "Teachers", description = "Teacher records"),
        (name = "Classes", description = "Class list"),
        (name = "Fees", description = "Fee status and payments"),
        (name = "Announcements", description = "School announcements"),
        (name = "Homework", description = "Homework and graded assignments"),
        (name = "Messages", description = "Direct messages and chat groups"),
        (name = "Events", description = "School calendar"),
        (name = "Library", description = "Books, study materials, documents and syllabi"),
        (name = "Transport", description = "Bus routes"),
        (name = "Exams", description = "Exam schedule"),
        (name = "Attendance", description = "Class registers"),
        (name = "Timetable", description = "Weekly timetable"),
        (name = "Reports", description = "Administrator statistics and reports"),
        (name = "Account", description = "The signed-in user's own account"),
        (name = "Data", description = "Export, backup, restore, undo and theme")
    ),
    info(
        title = "Southern Cross SchoolHub API",
        version = "0.1.0",
        description = "School management: students, teachers, fees, messaging and more, backed by a key-value store.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("Session token")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_area() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/auth/login"));
        assert!(doc.paths.paths.contains_key("/api/students/{id}"));
        assert!(doc.paths.paths.contains_key("/api/library/{kind}/{id}/download"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
        assert!(components.schemas.contains_key("Student"));
    }
}
