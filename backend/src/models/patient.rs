use serde::Serialize;

/// A patient row as inserted by the seed operation. The table adds the
/// auto-incremented `patientId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedPatient {
    pub name: &'static str,
    /// `YYYY-MM-DD`; MySQL converts it to `DATETIME` on insert.
    pub date_of_birth: &'static str,
}

pub const SEED_PATIENTS: [SeedPatient; 4] = [
    SeedPatient {
        name: "Sara Brown",
        date_of_birth: "1901-01-01",
    },
    SeedPatient {
        name: "John Smith",
        date_of_birth: "1941-01-01",
    },
    SeedPatient {
        name: "Jack Ma",
        date_of_birth: "1961-01-30",
    },
    SeedPatient {
        name: "Elon Musk",
        date_of_birth: "1999-01-01",
    },
];
