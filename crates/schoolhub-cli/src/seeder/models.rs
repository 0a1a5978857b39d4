//! Seeding configuration and generated records before ids are assigned.

use std::collections::BTreeMap;

pub struct StudentSeed {
    pub name: String,
    pub class_name: String,
    pub attendance: u32,
    pub marks: BTreeMap<String, u32>,
}

pub struct TeacherSeed {
    pub name: String,
    pub subject: String,
    pub classes: Vec<String>,
}

#[derive(Clone)]
pub struct SeedConfig {
    pub students_per_class: usize,
    pub teachers: usize,
    /// Fee total for every seeded student.
    pub fee_total: f64,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            students_per_class: 20,
            teachers: 5,
            fee_total: 5000.0,
        }
    }
}

impl SeedConfig {
    pub fn new(students_per_class: usize) -> Self {
        Self {
            students_per_class,
            ..Default::default()
        }
    }

    pub fn with_teachers(mut self, teachers: usize) -> Self {
        self.teachers = teachers;
        self
    }

    pub fn with_fee_total(mut self, fee_total: f64) -> Self {
        self.fee_total = fee_total;
        self
    }
}

/// What a seeding run added.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub students: usize,
    pub teachers: usize,
}
