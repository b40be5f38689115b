//! Engine Configuration

/// Reconciliation policy knobs
#[derive(Clone, Copy, Debug, Default)]
pub struct EngineConfig {
    /// When true, a failed or erroring on-chain verification blocks the
    /// processor completion call. Default is the permissive behavior: the
    /// processor's confirmation is authoritative and the chain check is an
    /// audit signal recorded in payment metadata.
    pub strict_chain_verification: bool,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let strict = std::env::var("STRICT_CHAIN_VERIFICATION")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Self {
            strict_chain_verification: strict,
        }
    }
}
