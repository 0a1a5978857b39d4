use fake::Fake;
use fake::faker::name::en::LastName;
use rayon::prelude::*;
use schoolhub_models::students::DEFAULT_SUBJECTS;

use super::models::TeacherSeed;

const TITLES: [&str; 4] = ["Mr.", "Ms.", "Mrs.", "Dr."];

/// Generates `count` teachers. Subjects rotate through the default
/// subjects and classes are handed out round-robin.
pub fn generate_teachers(count: usize, classes: &[String]) -> Vec<TeacherSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let title = TITLES[(0..TITLES.len()).fake::<usize>()];
            let last_name: String = LastName().fake();
            let assigned = if classes.is_empty() {
                Vec::new()
            } else {
                vec![classes[idx % classes.len()].clone()]
            };

            TeacherSeed {
                name: format!("{} {}", title, last_name),
                subject: capitalize(DEFAULT_SUBJECTS[idx % DEFAULT_SUBJECTS.len()]),
                classes: assigned,
            }
        })
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_teachers_round_robin() {
        let classes = vec!["10A".to_string(), "10B".to_string()];
        let teachers = generate_teachers(3, &classes);
        assert_eq!(teachers.len(), 3);
        assert_eq!(teachers[0].classes, vec!["10A"]);
        assert_eq!(teachers[1].classes, vec!["10B"]);
        assert_eq!(teachers[2].classes, vec!["10A"]);
        assert_eq!(teachers[0].subject, "Math");
    }

    #[test]
    fn test_generate_teachers_without_classes() {
        let teachers = generate_teachers(2, &[]);
        assert!(teachers.iter().all(|t| t.classes.is_empty()));
    }
}
