//! The `subscribers` command: show who receives which alerts.

use crate::notify::Subscriptions;

/// Formats the subscription table, one recipient per line.
pub fn format_subscribers(subscriptions: &Subscriptions) -> String {
    if subscriptions.is_empty() {
        return "No subscribers configured.".to_string();
    }

    let mut output = format!("{:<16} {}\n", "Chat ID", "Categories");
    output.push_str(&format!("{:-<16} {:-<10}\n", "", ""));

    for (recipient, categories) in subscriptions.iter() {
        let categories: Vec<&str> = categories.iter().map(String::as_str).collect();
        output.push_str(&format!("{:<16} {}\n", recipient, categories.join(", ")));
    }

    output.push_str(&format!("\n{} subscriber(s)", subscriptions.len()));
    output
}
