use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::api::errors::ApiError;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;
pub(crate) const MAX_SCORE_CEILING: i32 = 100;

pub(crate) fn validate_username(username: &str) -> Result<(), ApiError> {
    let valid = (3..=50).contains(&username.chars().count())
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid username format".to_string()))
    }
}

pub(crate) fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = email.len() <= 254
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        });
    if valid {
        Ok(())
    } else {
        Err(ApiError::BadRequest("Invalid email format".to_string()))
    }
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

pub(crate) fn validate_group_name(group_name: &str) -> Result<(), ApiError> {
    if group_name.trim().is_empty() || group_name.len() > 50 {
        Err(ApiError::BadRequest("Group name must be a non-empty string".to_string()))
    } else {
        Ok(())
    }
}

pub(crate) fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() || title.len() > 200 {
        Err(ApiError::BadRequest("Title must be a non-empty string".to_string()))
    } else {
        Ok(())
    }
}

pub(crate) fn validate_max_score(max_score: i32) -> Result<(), ApiError> {
    if (1..=MAX_SCORE_CEILING).contains(&max_score) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Maximum score must be between 1 and {MAX_SCORE_CEILING}"
        )))
    }
}

/// A grade is valid only inside `0..=max_score` for the graded assignment.
pub(crate) fn validate_score(score: i32, max_score: i32) -> Result<(), ApiError> {
    if (0..=max_score).contains(&score) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("Score must be between 0 and {max_score}")))
    }
}

/// Decode a base64 upload body, enforcing the configured size cap.
pub(crate) fn decode_upload(
    filename: &str,
    content_base64: &str,
    max_size_mb: u64,
) -> Result<Vec<u8>, ApiError> {
    if filename.trim().is_empty() || filename.len() > 255 {
        return Err(ApiError::BadRequest("Invalid file name".to_string()));
    }

    let bytes = BASE64
        .decode(content_base64.trim())
        .map_err(|_| ApiError::BadRequest("File content is not valid base64".to_string()))?;

    let max_bytes = max_size_mb * 1024 * 1024;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("File content is empty".to_string()));
    }
    if bytes.len() as u64 > max_bytes {
        return Err(ApiError::BadRequest(format!(
            "File exceeds the maximum size of {max_size_mb} MB"
        )));
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_rules() {
        assert!(validate_username("alice_01").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn email_rules() {
        assert!(validate_email("student@example.edu").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.edu").is_err());
    }

    #[test]
    fn max_score_bounds_are_inclusive() {
        assert!(validate_max_score(1).is_ok());
        assert!(validate_max_score(100).is_ok());
        assert!(validate_max_score(0).is_err());
        assert!(validate_max_score(101).is_err());
    }

    #[test]
    fn score_bounds_follow_the_assignment_maximum() {
        assert!(validate_score(0, 50).is_ok());
        assert!(validate_score(50, 50).is_ok());
        assert!(validate_score(-1, 50).is_err());
        assert!(validate_score(51, 50).is_err());
    }

    #[test]
    fn upload_decoding_rejects_bad_base64_and_oversize() {
        assert!(decode_upload("a.txt", "aGVsbG8=", 1).is_ok());
        assert!(decode_upload("a.txt", "not base64!!", 1).is_err());
        assert!(decode_upload("", "aGVsbG8=", 1).is_err());

        let two_mb = vec![0u8; 2 * 1024 * 1024];
        let encoded = BASE64.encode(&two_mb);
        assert!(decode_upload("big.bin", &encoded, 1).is_err());
        assert!(decode_upload("big.bin", &encoded, 2).is_ok());
    }
}
