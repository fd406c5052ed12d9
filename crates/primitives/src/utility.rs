pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// `jane.doe@example.com` -> `ja***@example.com`, for log lines.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let visible: String = local.chars().take(2).collect();
            format!("{}***@{}", visible, domain)
        }
        None => "***".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_local_part() {
        assert_eq!(mask_email("jane.doe@example.com"), "ja***@example.com");
        assert_eq!(mask_email("j@x.io"), "j***@x.io");
        assert_eq!(mask_email("not-an-email"), "***");
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(normalize_email("  Jane@Example.COM "), "jane@example.com");
    }
}
