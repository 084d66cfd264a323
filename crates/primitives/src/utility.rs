use validator::ValidationError;

const CONTACT_DIGITS: usize = 10;
const OTP_DIGITS: usize = 6;

pub fn validate_contact_number(contact: &str) -> Result<(), ValidationError> {
    if contact.len() != CONTACT_DIGITS || !contact.chars().all(|c| c.is_ascii_digit()) {
        return Err(error("contact_number_invalid", "digits", CONTACT_DIGITS));
    }
    Ok(())
}

pub fn validate_otp_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != OTP_DIGITS || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(error("otp_invalid_format", "digits", OTP_DIGITS));
    }
    Ok(())
}

/// Emails are keyed lower-cased everywhere.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn error(code: &'static str, param: &'static str, value: usize) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.add_param(param.into(), &value);
    err
}
