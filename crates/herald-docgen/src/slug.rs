//! File-name and link slugs for generated documents
//!
//! Slugs are lowercase, hyphen-separated and deterministic: the same
//! event or schema name always produces the same file name and link.

/// Generate a URL-safe slug from a display name.
///
/// CamelCase boundaries become hyphens (`PaymentReceived` ->
/// `payment-received`), non-alphanumeric characters become hyphens,
/// consecutive hyphens collapse.
pub fn slug(s: &str) -> String {
    let mut spaced = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_ascii_uppercase() && prev_lower {
            spaced.push('-');
        }
        prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        spaced.push(c);
    }

    spaced
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '-',
        })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Markdown file name for an event document
pub fn event_file_name(event_name: &str) -> String {
    format!("{}.md", slug(event_name))
}

/// Markdown file name for a schema document (relative to `schemas/`)
pub fn schema_file_name(clean_name: &str) -> String {
    format!("{}.md", slug(clean_name))
}

/// Sidebar link for an event document
pub fn event_link(event_name: &str) -> String {
    slug(event_name)
}

/// Sidebar link for a schema document
pub fn schema_link(clean_name: &str) -> String {
    format!("schemas/{}", slug(clean_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_camel_case() {
        assert_eq!(slug("PaymentReceived"), "payment-received");
        assert_eq!(slug("OrderShippedV2"), "order-shipped-v2");
    }

    #[test]
    fn test_slug_special_chars() {
        assert_eq!(slug("Acme.Billing.Money"), "acme-billing-money");
        assert_eq!(slug("my_event"), "my-event");
        assert_eq!(slug("---"), "");
    }

    #[test]
    fn test_file_names() {
        assert_eq!(event_file_name("PaymentReceived"), "payment-received.md");
        assert_eq!(schema_file_name("EnvelopeOfPayment"), "envelope-of-payment.md");
        assert_eq!(schema_link("Money"), "schemas/money");
    }
}
