use schoolhub_core::RecordId;
use schoolhub_models::students::Student;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeeRow {
    pub student_id: RecordId,
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
    pub total: f64,
    pub paid: f64,
    pub pending: f64,
    pub settled: bool,
}

impl From<&Student> for FeeRow {
    fn from(student: &Student) -> Self {
        Self {
            student_id: student.id,
            name: student.name.clone(),
            class_name: student.class_name.clone(),
            total: student.fees.total,
            paid: student.fees.paid,
            pending: student.fees.pending(),
            settled: student.fees.is_settled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FeeSummary {
    pub students: Vec<FeeRow>,
    pub total_collected: f64,
    pub total_pending: f64,
}

impl FeeSummary {
    pub fn from_rows(students: Vec<FeeRow>) -> Self {
        Self {
            total_collected: students.iter().map(|r| r.paid).sum(),
            total_pending: students.iter().map(|r| r.pending).sum(),
            students,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentReceipt {
    /// Amount actually credited after capping at the outstanding balance.
    pub applied: f64,
    pub fees: FeeRow,
}
