use std::sync::OnceLock;

/// Crate version, with the git revision appended as build metadata when the
/// binary was built from a checkout (`0.1.0+abc1234`, `0.1.0+abc1234-dirty`).
pub fn version_long() -> &'static str {
    static VERSION: OnceLock<String> = OnceLock::new();
    VERSION.get_or_init(|| {
        let base = env!("CARGO_PKG_VERSION");
        option_env!("VAXCTL_GIT_HASH").map_or_else(|| base.to_string(), |rev| format!("{base}+{rev}"))
    })
}

/// Value sent as the `User-Agent` header on every API request.
pub fn user_agent() -> &'static str {
    static UA: OnceLock<String> = OnceLock::new();
    UA.get_or_init(|| format!("vaxctl/{}", version_long()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_agent_carries_version() {
        assert!(user_agent().starts_with("vaxctl/"));
        assert!(user_agent().contains(env!("CARGO_PKG_VERSION")));
    }
}
