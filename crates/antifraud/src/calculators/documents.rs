use serde::{Deserialize, Serialize};

const CPF_DIGITS: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpfRequest {
    pub cpf: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpfValidation {
    pub cpf: String,
    pub valid: bool,
}

/// Format-only CPF check: after dropping `.` and `-`, exactly 11 ASCII digits.
///
/// Check digits are not verified.
pub fn validate_cpf(cpf: &str) -> CpfValidation {
    let digits: String = cpf.chars().filter(|c| *c != '.' && *c != '-').collect();
    let valid = digits.len() == CPF_DIGITS && digits.chars().all(|c| c.is_ascii_digit());

    CpfValidation {
        cpf: cpf.to_string(),
        valid,
    }
}
