//! Quota classes and request identities.
//!
//! Limits are static per class: they are part of the product's abuse policy,
//! not user configuration.

const DAY_SECS: u64 = 24 * 60 * 60;

/// Maximum length of a sanitized identity before it enters a key.
const MAX_IDENTITY_LEN: usize = 64;

/// Independent quota buckets. Exhausting one class never affects another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuotaClass {
    /// General tool usage, tiered by subscriber status.
    GeneralTool,
    /// Strain-insight lookups, keyed by installation id.
    Insight,
    /// COA analysis. Lower limit: its upstream computation is the most
    /// expensive call we make.
    Coa,
}

impl QuotaClass {
    /// Key prefix distinguishing this class's counters.
    pub fn prefix(self) -> &'static str {
        match self {
            QuotaClass::GeneralTool => "tool",
            QuotaClass::Insight => "insight",
            QuotaClass::Coa => "coa",
        }
    }

    /// Sliding-window duration in seconds. 24 hours for every class today.
    pub fn window_secs(self) -> u64 {
        DAY_SECS
    }

    /// Request allowance within one window for the given tier.
    pub fn limit_for(self, tier: Tier) -> u32 {
        match (self, tier) {
            (QuotaClass::GeneralTool, Tier::Anonymous) => 10,
            (QuotaClass::GeneralTool, Tier::Subscriber) => 30,
            (QuotaClass::Insight, _) => 50,
            (QuotaClass::Coa, _) => 5,
        }
    }
}

/// Rate-limit tier selected from the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Anonymous,
    Subscriber,
}

/// Who a request is attributed to.
///
/// The `ip:`/`sub:`/`install:` prefixes keep the three namespaces disjoint,
/// so an anonymous counter and a subscriber counter from the same network
/// address never collide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Client network address.
    Ip(String),
    /// Opaque subscriber token. Its presence, not its meaning, selects the
    /// subscriber tier.
    Subscriber(String),
    /// Client-supplied installation id.
    Install(String),
}

impl Identity {
    pub fn tier(&self) -> Tier {
        match self {
            Identity::Subscriber(_) => Tier::Subscriber,
            Identity::Ip(_) | Identity::Install(_) => Tier::Anonymous,
        }
    }

    /// Key component for this identity, always sanitized.
    ///
    /// IP separators are mapped to `_` first so distinct addresses stay
    /// distinct after sanitization.
    pub fn key_fragment(&self) -> String {
        match self {
            Identity::Ip(addr) => format!("ip:{}", sanitize_id(&addr.replace(['.', ':'], "_"))),
            Identity::Subscriber(token) => format!("sub:{}", sanitize_id(token)),
            Identity::Install(id) => format!("install:{}", sanitize_id(id)),
        }
    }
}

/// Reduce an untrusted identity string to `[A-Za-z0-9_]`, capped at 64
/// characters, so it can never inject key structure.
pub fn sanitize_id(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .take(MAX_IDENTITY_LEN)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_disallowed() {
        assert_eq!(sanitize_id("abc;DROP"), "abcDROP");
        assert_eq!(sanitize_id("a b\tc\n"), "abc");
        assert_eq!(sanitize_id("ratelimit:*:{evil}"), "ratelimitevil");
    }

    #[test]
    fn test_sanitize_caps_length() {
        let long = "x".repeat(200);
        assert_eq!(sanitize_id(&long).len(), 64);
    }

    #[test]
    fn test_ip_addresses_stay_distinct() {
        let a = Identity::Ip("1.2.3.4".into()).key_fragment();
        let b = Identity::Ip("12.3.4".into()).key_fragment();
        assert_ne!(a, b);
        assert_eq!(a, "ip:1_2_3_4");
    }

    #[test]
    fn test_fragments_are_namespaced() {
        assert!(Identity::Ip("1.2.3.4".into()).key_fragment().starts_with("ip:"));
        assert!(Identity::Subscriber("tok".into()).key_fragment().starts_with("sub:"));
        assert!(Identity::Install("dev1".into()).key_fragment().starts_with("install:"));
    }

    #[test]
    fn test_tier_selection() {
        assert_eq!(Identity::Subscriber("tok".into()).tier(), Tier::Subscriber);
        assert_eq!(Identity::Ip("1.2.3.4".into()).tier(), Tier::Anonymous);
        assert_eq!(Identity::Install("dev1".into()).tier(), Tier::Anonymous);
    }

    #[test]
    fn test_limits_are_static() {
        assert_eq!(QuotaClass::GeneralTool.limit_for(Tier::Anonymous), 10);
        assert_eq!(QuotaClass::GeneralTool.limit_for(Tier::Subscriber), 30);
        assert_eq!(QuotaClass::Insight.limit_for(Tier::Anonymous), 50);
        assert_eq!(QuotaClass::Coa.limit_for(Tier::Anonymous), 5);
    }
}
