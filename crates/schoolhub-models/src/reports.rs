//! Dashboard statistics and per-student reports.

use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::students::Student;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AdminStats {
    pub total_students: usize,
    pub total_teachers: usize,
    pub total_classes: usize,
    /// Mean attendance rounded to a whole percent, 0 with no students.
    pub average_attendance: u32,
    pub fees_collected: f64,
    pub fees_pending: f64,
}

impl AdminStats {
    pub fn compute(students: &[Student], total_teachers: usize, total_classes: usize) -> Self {
        let average_attendance = if students.is_empty() {
            0
        } else {
            let sum: u32 = students.iter().map(|s| s.attendance).sum();
            (f64::from(sum) / students.len() as f64).round() as u32
        };

        Self {
            total_students: students.len(),
            total_teachers,
            total_classes,
            average_attendance,
            fees_collected: students.iter().map(|s| s.fees.paid).sum(),
            fees_pending: students.iter().map(|s| s.fees.pending()).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Attendance,
    Grades,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Attendance => "attendance",
            ReportKind::Grades => "grades",
        }
    }

    fn value_for(&self, student: &Student) -> f64 {
        match self {
            ReportKind::Attendance => f64::from(student.attendance),
            ReportKind::Grades => student.gpa,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "attendance" => Ok(ReportKind::Attendance),
            "grades" => Ok(ReportKind::Grades),
            other => Err(format!("Unknown report type: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportPoint {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportSummary {
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Report {
    pub kind: ReportKind,
    pub points: Vec<ReportPoint>,
    /// Absent when there are no students.
    pub summary: Option<ReportSummary>,
    pub chart: String,
}

impl Report {
    pub fn build(kind: ReportKind, students: &[Student]) -> Self {
        let points: Vec<ReportPoint> = students
            .iter()
            .map(|s| ReportPoint {
                name: s.name.clone(),
                value: kind.value_for(s),
            })
            .collect();

        Self {
            kind,
            summary: summarize(&points),
            chart: bar_chart(&points),
            points,
        }
    }
}

pub fn summarize(points: &[ReportPoint]) -> Option<ReportSummary> {
    if points.is_empty() {
        return None;
    }
    let values = points.iter().map(|p| p.value);
    let sum: f64 = values.clone().sum();
    let average = (sum / points.len() as f64 * 100.0).round() / 100.0;

    Some(ReportSummary {
        average,
        highest: values.clone().fold(f64::MIN, f64::max),
        lowest: values.fold(f64::MAX, f64::min),
        count: points.len(),
    })
}

/// Monospace chart, one `█` per five points, names padded to 15 columns.
pub fn bar_chart(points: &[ReportPoint]) -> String {
    let mut chart = String::new();
    for point in points {
        let bar = "█".repeat((point.value / 5.0).round().max(0.0) as usize);
        let _ = writeln!(chart, "{:<15} |{} {}%", point.name, bar, point.value);
    }
    chart
}
