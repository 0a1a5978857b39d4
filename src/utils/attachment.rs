use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use schoolhub_core::AppError;
use serde::Serialize;

/// Body served as a file download.
pub fn attachment(file_name: &str, content_type: &'static str, body: String) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", file_name.replace('"', ""));
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// Pretty-printed JSON download.
pub fn json_attachment<T: Serialize>(file_name: &str, value: &T) -> Result<Response, AppError> {
    let body = serde_json::to_string_pretty(value).map_err(AppError::internal)?;
    Ok(attachment(file_name, "application/json", body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_headers() {
        let response = json_attachment("students_export.json", &vec![1, 2]).unwrap();
        let headers = response.headers();
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"students_export.json\""
        );
    }
}
