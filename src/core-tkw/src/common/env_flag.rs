/// True if the env var is present and is one of "1", "true", "yes", or "y" (any case, surrounding
/// whitespace ignored). False otherwise.
pub fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| is_truthy_flag(&v))
}

fn is_truthy_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y")
}
