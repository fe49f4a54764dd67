//! Message text and the messaging deep link.

use super::types::{ExportError, Message, Subject};

/// Fills `{name}`, `{id}`, and `{form}` in `template`.
///
/// Unknown placeholders are left as written.
pub fn fill_template(template: &str, subject: &Subject, form_name: &str) -> String {
    template
        .replace("{name}", &subject.name)
        .replace("{id}", &subject.identifier)
        .replace("{form}", form_name)
}

/// Builds `<base><digits>?text=<message>`.
///
/// # Returns
/// `None` when `contact` holds no digits.
pub fn handoff_url(base: &str, contact: &str, text: &str) -> Result<Option<String>, ExportError> {
    let digits: String = contact.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Ok(None);
    }

    let mut url = url::Url::parse(base)?.join(&digits)?;
    url.query_pairs_mut().append_pair("text", text);
    Ok(Some(url.into()))
}

/// Composes the handoff message for `subject`.
pub fn compose_message(
    template: &str,
    subject: &Subject,
    form_name: &str,
    handoff_base: &str,
) -> Result<Message, ExportError> {
    let text = fill_template(template, subject, form_name);
    let handoff_url = match subject.contact.as_deref() {
        Some(contact) => handoff_url(handoff_base, contact, &text)?,
        None => None,
    };
    Ok(Message { text, handoff_url })
}
