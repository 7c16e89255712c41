//! Listener address resolution.

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// `BIND_ADDR` wins; otherwise `PORT` on all interfaces; otherwise [`DEFAULT_BIND_ADDR`].
pub fn bind_addr(lookup: impl Fn(&str) -> Option<String>) -> String {
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    if let Some(addr) = get("BIND_ADDR") {
        return addr;
    }
    match get("PORT") {
        Some(port) => format!("0.0.0.0:{port}"),
        None => DEFAULT_BIND_ADDR.to_string(),
    }
}
