//! Fake data for local testing and demos.
//!
//! Records are generated in parallel with rayon, then written in a single
//! store change so one undo removes the whole batch.

pub mod models;
pub mod students;
pub mod teachers;

use std::time::Instant;

use schoolhub_models::students::{Fees, Student};
use schoolhub_models::teachers::{Teacher, default_teacher_email};
use schoolhub_store::{SchoolStore, StoreError};

pub use models::{SeedConfig, SeedSummary, StudentSeed, TeacherSeed};
pub use students::generate_students;
pub use teachers::generate_teachers;

/// Seeds students into every existing class and adds teachers.
pub async fn seed_all(store: &SchoolStore, config: SeedConfig) -> Result<SeedSummary, StoreError> {
    let start_time = Instant::now();
    let classes = store.read(|s| s.data.classes.clone()).await;

    println!("🌱 Seeding school data...");
    println!(
        "   - Classes: {} ({} students each)",
        classes.len(),
        config.students_per_class
    );
    println!("   - Teachers: {}", config.teachers);

    let gen_start = Instant::now();
    let student_seeds = generate_students(&classes, config.students_per_class);
    let teacher_seeds = generate_teachers(config.teachers, &classes);
    println!(
        "   ✓ Generated {} students and {} teachers in {:?}",
        student_seeds.len(),
        teacher_seeds.len(),
        gen_start.elapsed()
    );

    let fee_total = config.fee_total;
    let summary = store
        .mutate(move |tx| {
            let summary = SeedSummary {
                students: student_seeds.len(),
                teachers: teacher_seeds.len(),
            };
            for seed in student_seeds {
                let mut student = Student {
                    id: tx.next_id(),
                    name: seed.name,
                    class_name: seed.class_name,
                    attendance: seed.attendance,
                    marks: seed.marks,
                    fees: Fees::new(fee_total),
                    gpa: 0.0,
                    parent: None,
                    email: None,
                    phone: None,
                    dob: None,
                    address: None,
                };
                student.recompute_gpa();
                tx.data.students.push(student);
            }
            for seed in teacher_seeds {
                let email = default_teacher_email(&seed.name);
                let id = tx.next_id();
                tx.data.teachers.push(Teacher {
                    id,
                    name: seed.name,
                    subject: seed.subject,
                    classes: seed.classes,
                    email,
                    phone: None,
                    qualification: None,
                    experience: None,
                });
            }
            tx.audit(
                "cli",
                "seed_data",
                format!("Seeded {} students and {} teachers", summary.students, summary.teachers),
            );
            Ok::<_, StoreError>(summary)
        })
        .await?;

    println!("\n✅ Seeding completed in {:?}", start_time.elapsed());
    Ok(summary)
}
