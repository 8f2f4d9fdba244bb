//! Client-side input checks, run before anything is dispatched to the
//! backend. A failed check blocks the request synchronously; the message
//! is shown to the user as-is, hence the Turkish wording.

use crate::model::{PaymentInput, StudentInput};

#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

fn fail(field: &'static str, message: &str) -> ValidationError {
    ValidationError {
        field,
        message: message.to_string(),
    }
}

/// Turkish mobile number: optional `+90` or `0` prefix, then ten digits
/// starting with 5.
pub fn validate_phone(raw: &str) -> Result<(), ValidationError> {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    let rest = cleaned
        .strip_prefix("+90")
        .or_else(|| cleaned.strip_prefix('0'))
        .unwrap_or(&cleaned);
    let ok = rest.len() == 10
        && rest.starts_with('5')
        && rest.chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(fail("phone", "Geçersiz telefon numarası"))
    }
}

/// National id: exactly eleven digits, not starting with zero.
pub fn validate_national_id(raw: &str) -> Result<(), ValidationError> {
    let t = raw.trim();
    let ok = t.len() == 11 && !t.starts_with('0') && t.chars().all(|c| c.is_ascii_digit());
    if ok {
        Ok(())
    } else {
        Err(fail("nationalId", "T.C. kimlik numarası 11 haneli olmalı"))
    }
}

pub fn validate_student_input(input: &StudentInput) -> Result<(), ValidationError> {
    if input.first_name.trim().is_empty() {
        return Err(fail("firstName", "Ad boş olamaz"));
    }
    if input.last_name.trim().is_empty() {
        return Err(fail("lastName", "Soyad boş olamaz"));
    }
    validate_national_id(&input.national_id)?;
    validate_phone(&input.phone)?;
    Ok(())
}

pub fn validate_payment_input(input: &PaymentInput) -> Result<(), ValidationError> {
    if !(input.amount > 0.0) {
        return Err(fail("amount", "Tutar sıfırdan büyük olmalı"));
    }
    if let (Some(n), Some(total)) = (input.installment_number, input.total_installments) {
        if n < 1 || n > total {
            return Err(fail(
                "installmentNumber",
                "Taksit numarası taksit sayısını aşamaz",
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaymentMethod, PaymentType};
    use chrono::NaiveDate;

    #[test]
    fn phone_accepts_common_spellings() {
        assert!(validate_phone("05321234567").is_ok());
        assert!(validate_phone("+90 532 123 45 67").is_ok());
        assert!(validate_phone("5321234567").is_ok());
    }

    #[test]
    fn phone_rejects_wrong_shapes() {
        assert!(validate_phone("0212 123 45 67").is_err()); // landline
        assert!(validate_phone("532123456").is_err()); // short
        assert!(validate_phone("telefon").is_err());
    }

    #[test]
    fn national_id_length_and_leading_digit() {
        assert!(validate_national_id("12345678901").is_ok());
        assert!(validate_national_id("01234567890").is_err());
        assert!(validate_national_id("123456789").is_err());
        assert!(validate_national_id("1234567890a").is_err());
    }

    #[test]
    fn student_input_requires_names() {
        let input = StudentInput {
            first_name: "  ".to_string(),
            last_name: "Yılmaz".to_string(),
            national_id: "12345678901".to_string(),
            phone: "05321234567".to_string(),
            gender: None,
            license_type: None,
            license_class_id: None,
            instructor_id: None,
        };
        let err = validate_student_input(&input).unwrap_err();
        assert_eq!(err.field, "firstName");
    }

    #[test]
    fn payment_amount_must_be_positive() {
        let mut input = PaymentInput {
            amount: 0.0,
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            method: PaymentMethod::Cash,
            payment_type: PaymentType::Payment,
            description: None,
            installment_number: None,
            total_installments: None,
            related_debt_id: None,
        };
        assert!(validate_payment_input(&input).is_err());
        input.amount = 100.0;
        assert!(validate_payment_input(&input).is_ok());
        input.installment_number = Some(3);
        input.total_installments = Some(2);
        assert!(validate_payment_input(&input).is_err());
    }
}
