//! Rendering of a panel row into the Telegram notification text.

use crate::panel::RowRecord;

const NUMBER_MASK: &str = "***";

/// Keep the first 6 and last 3 characters of a number, mask the rest.
/// Short numbers overlap rather than being padded.
pub fn mask_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let head: String = chars.iter().take(6).collect();
    let tail: String = chars[chars.len().saturating_sub(3)..].iter().collect();
    format!("{head}{NUMBER_MASK}{tail}")
}

/// Escape text for Telegram's HTML parse mode.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn format_notification(row: &RowRecord, country: &str, otp: &str) -> String {
    let service = escape_html(&row.service_name);
    let time = escape_html(&row.timestamp);
    let number = escape_html(&mask_number(&row.phone_number));
    let otp = escape_html(otp);
    let body = escape_html(&row.raw_message);

    format!(
        "🔥 <b>{service} {country} RECEIVED!</b> ✨\n\n\
         <b>⏰ Time:</b> {time}\n\
         <b>🌍 Country:</b> {country}\n\
         <b>⚙️ Service:</b> {service}\n\
         <b>☎️ Number:</b> {number}\n\
         <b>🔑 OTP:</b> <code>{otp}</code>\n\
         <b>📩 Full Message:</b>\n<pre>{body}</pre>"
    )
}
