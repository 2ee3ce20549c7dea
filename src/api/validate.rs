//! Input validation shared by the auth, post, comment and profile handlers.
//!
//! Every function returns the client-facing message on failure so handlers can
//! wrap it straight into a 400.

pub const MAX_POST_LENGTH: usize = 1000;
pub const MAX_COMMENT_LENGTH: usize = 500;
pub const MAX_BIO_LENGTH: usize = 500;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// `local@domain.tld` with no whitespace and exactly one `@`
pub fn validate_email_format(email: &str) -> Result<(), String> {
    let invalid = || "Invalid email format".to_string();

    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    // Needs a dot with something on both sides somewhere in the domain
    let has_dotted_domain = domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len());
    if !has_dotted_domain {
        return Err(invalid());
    }

    Ok(())
}

/// 3-20 ASCII letters, digits or underscores
pub fn validate_username_format(username: &str) -> Result<(), String> {
    let len = username.chars().count();
    let valid_chars = username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !(3..=20).contains(&len) || !valid_chars {
        return Err("Username must be 3-20 characters, alphanumeric and underscores only".to_string());
    }

    Ok(())
}

pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Trim and bound free-text content. `label` names the thing in messages ("Post", "Comment").
pub fn validate_content(content: Option<&str>, label: &str, max: usize) -> Result<String, String> {
    let trimmed = content.map(str::trim).unwrap_or_default();

    if trimmed.is_empty() {
        return Err(format!("{} content is required", label));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{} content must be at most {} characters", label, max));
    }

    Ok(trimmed.to_string())
}

pub fn validate_bio(bio: &str) -> Result<(), String> {
    if bio.chars().count() > MAX_BIO_LENGTH {
        return Err(format!("Bio must be at most {} characters", MAX_BIO_LENGTH));
    }
    Ok(())
}

/// Empty strings are stored as NULL
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Present and non-blank
pub fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
