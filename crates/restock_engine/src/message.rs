//! Alert text assembly for the notification channels.

/// Title and body for a confirmed restock.
pub fn restock_message(name: &str, url: &str, confirmations: u32) -> (String, String) {
    let title = format!("Restock: {name}");
    let body = format!(
        "{name} looks purchasable again ({confirmations} consecutive confirmations).\n{url}"
    );
    (title, body)
}

/// Title and body for a persistent probe failure.
pub fn error_message(name: &str, reason: &str, streak: u32) -> (String, String) {
    let title = format!("Probe trouble: {name}");
    let body = format!("{name} has failed {streak} checks in a row. Last reason: {reason}");
    (title, body)
}
