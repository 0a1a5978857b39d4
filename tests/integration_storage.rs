use schoolhub::schoolhub_config::StorageConfig;
use schoolhub::schoolhub_store::SchoolStore;
use schoolhub::schoolhub_store::keys::{REGISTERED_USERS, SCHOOL_DATA};
use schoolhub::schoolhub_store::StoreError;

fn config(dir: &tempfile::TempDir) -> StorageConfig {
    StorageConfig {
        data_dir: dir.path().to_path_buf(),
        ..StorageConfig::default()
    }
}

#[tokio::test]
async fn test_changes_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let store = SchoolStore::open_dir(&config(&dir)).await.unwrap();
    store
        .mutate(|tx| {
            tx.data.classes.push("12C".to_string());
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();
    drop(store);

    assert!(dir.path().join(format!("{}.json", SCHOOL_DATA)).exists());

    let reopened = SchoolStore::open_dir(&config(&dir)).await.unwrap();
    let classes = reopened.read(|s| s.data.classes.clone()).await;
    assert!(classes.contains(&"12C".to_string()));
}

#[tokio::test]
async fn test_fresh_directory_starts_from_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = SchoolStore::open_dir(&config(&dir)).await.unwrap();

    let (students, users) = store
        .read(|s| (s.data.students.len(), s.users.len()))
        .await;
    assert_eq!(students, 2);
    assert_eq!(users, 0);
    assert!(!dir.path().join(format!("{}.json", REGISTERED_USERS)).exists());
}

#[tokio::test]
async fn test_corrupt_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(format!("{}.json", SCHOOL_DATA)), "not json").unwrap();

    let err = SchoolStore::open_dir(&config(&dir)).await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }));
}

#[tokio::test]
async fn test_second_instance_picks_up_new_account() {
    use chrono::Utc;
    use schoolhub::schoolhub_models::{Role, User};

    let dir = tempfile::tempdir().unwrap();
    let first = SchoolStore::open_dir(&config(&dir)).await.unwrap();
    let second = SchoolStore::open_dir(&config(&dir)).await.unwrap();

    first
        .mutate(|tx| {
            let id = tx.next_id();
            tx.users.push(User {
                id,
                role: Role::Teacher,
                name: "Ms. Johnson".to_string(),
                email: "johnson@school.com".to_string(),
                username: "johnson".to_string(),
                password: String::new(),
                phone: String::new(),
                address: String::new(),
                registered_date: Utc::now(),
                child_name: None,
                child_class: None,
            });
            Ok::<_, StoreError>(())
        })
        .await
        .unwrap();

    let report = second.sync_from_shared().await;
    assert_eq!(report.users, 1);
    assert!(second.read(|s| s.user("johnson", Role::Teacher).is_some()).await);

    // A second pass finds nothing new.
    assert!(second.sync_from_shared().await.is_empty());
}

#[tokio::test]
async fn test_opens_data_saved_by_browser_app() {
    use schoolhub::schoolhub_models::Role;
    use schoolhub::schoolhub_store::keys::SHARED_USERS_PREFIX;

    let dir = tempfile::tempdir().unwrap();
    let write = |key: &str, value: serde_json::Value| {
        std::fs::write(dir.path().join(format!("{}.json", key)), value.to_string()).unwrap();
    };

    write(
        REGISTERED_USERS,
        serde_json::json!([{
            "id": 1704880000000u64,
            "role": "teacher",
            "name": "Mr. Brown",
            "email": "brown@school.com",
            "username": "brown",
            "password": "Teacher2024",
            "phone": "",
            "address": "",
            "registeredDate": "2024-01-10",
            "lastLogin": null,
            "isActive": true
        }]),
    );
    write(
        SCHOOL_DATA,
        serde_json::json!({
            "students": [{
                "id": 1, "name": "John Doe", "class": "10A", "attendance": 85,
                "marks": {"math": 80, "english": 90, "science": 70},
                "fees": {"total": 5000, "paid": 3000}, "avatar": null, "gpa": "3.20"
            }],
            "teachers": [{
                "id": 1, "name": "Mr. Wilson", "subject": "Math", "classes": ["10A"],
                "email": "wilson@school.com", "experience": 12, "avatar": null
            }],
            "classes": ["10A"],
            "announcements": [],
            "homework": [{
                "id": 1, "class": "10A", "subject": "Math", "task": "Chapter 5 exercises",
                "dueDate": "2024-01-20", "status": "pending"
            }],
            "messages": [{
                "id": 1, "from": "Teacher", "to": "Parent", "subject": "Progress Update",
                "content": "Good progress", "date": "2024-01-10", "read": false
            }],
            "events": [],
            "library": [{
                "id": 1, "title": "Mathematics Grade 10", "author": "John Smith",
                "isbn": "123456789", "available": true, "borrowedBy": null
            }],
            "transport": [],
            "exams": []
        }),
    );
    write(
        &format!("{}1704880000000", SHARED_USERS_PREFIX),
        serde_json::json!([{
            "id": 1704880000001u64,
            "role": "parent",
            "name": "Mrs. Doe",
            "email": "doe@mail.com",
            "username": "mdoe",
            "password": "Parent2024",
            "phone": "",
            "address": "",
            "registeredDate": "2024-01-10",
            "lastLogin": null,
            "isActive": true
        }]),
    );

    let store = SchoolStore::open_dir(&config(&dir)).await.unwrap();

    let (gpa, experience, brown_date, parent) = store
        .read(|s| {
            (
                s.data.students[0].gpa,
                s.data.teachers[0].experience.clone(),
                s.user("brown", Role::Teacher).map(|u| u.registered_date.format("%Y-%m-%d").to_string()),
                s.user("mdoe", Role::Parent).map(|u| u.name.clone()),
            )
        })
        .await;
    assert_eq!(gpa, 3.2);
    assert_eq!(experience.as_deref(), Some("12"));
    assert_eq!(brown_date.as_deref(), Some("2024-01-10"));
    assert_eq!(parent.as_deref(), Some("Mrs. Doe"));

    // The fallback copy is consumed once merged.
    assert!(
        !dir.path()
            .join(format!("{}1704880000000.json", SHARED_USERS_PREFIX))
            .exists()
    );
}

#[tokio::test]
async fn test_mismatched_shape_is_reported_as_undecodable() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(format!("{}.json", REGISTERED_USERS)),
        r#"[{"id": 1, "role": "janitor"}]"#,
    )
    .unwrap();

    let err = SchoolStore::open_dir(&config(&dir)).await.unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { key: REGISTERED_USERS, .. }));
    assert!(err.to_string().contains("could not be decoded"));
}
