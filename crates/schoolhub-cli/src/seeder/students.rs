use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use schoolhub_models::students::DEFAULT_SUBJECTS;

use super::models::StudentSeed;

/// Generates `per_class` students for every class, in parallel.
pub fn generate_students(classes: &[String], per_class: usize) -> Vec<StudentSeed> {
    classes
        .par_iter()
        .flat_map(|class_name| {
            (0..per_class)
                .map(|_| generate_student(class_name))
                .collect::<Vec<_>>()
        })
        .collect()
}

fn generate_student(class_name: &str) -> StudentSeed {
    let first_name: String = FirstName().fake();
    let last_name: String = LastName().fake();
    let marks = DEFAULT_SUBJECTS
        .iter()
        .map(|subject| (subject.to_string(), (45u32..101).fake::<u32>()))
        .collect();

    StudentSeed {
        name: format!("{} {}", first_name, last_name),
        class_name: class_name.to_string(),
        attendance: (70u32..101).fake::<u32>(),
        marks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_students_per_class() {
        let classes = vec!["10A".to_string(), "11A".to_string()];
        let students = generate_students(&classes, 3);
        assert_eq!(students.len(), 6);
        assert_eq!(students.iter().filter(|s| s.class_name == "11A").count(), 3);
        for student in &students {
            assert!(student.attendance <= 100);
            assert_eq!(student.marks.len(), DEFAULT_SUBJECTS.len());
            assert!(student.marks.values().all(|m| (45..=100).contains(m)));
        }
    }
}
