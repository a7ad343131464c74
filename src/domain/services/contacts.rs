/// Normalizes an email for deduplication: trimmed and lowercased.
/// Returns None for values without a plausible local@domain shape.
pub fn normalize_email(raw: &str) -> Option<String> {
    let trimmed = raw.trim().to_lowercase();
    if trimmed.is_empty() {
        return None;
    }
    let at = trimmed.find('@')?;
    if at == 0 || at == trimmed.len() - 1 || !trimmed[at + 1..].contains('.') {
        return None;
    }
    Some(trimmed)
}

/// Normalizes a phone number for deduplication: strips everything except
/// digits, keeping one leading `+` if present.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let plus = trimmed.starts_with('+');
    let digits: String = trimmed.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 6 {
        return None;
    }
    if plus {
        Some(format!("+{}", digits))
    } else {
        Some(digits)
    }
}
