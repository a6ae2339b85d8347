// ID Provider Port (for deterministic testing)

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new unique customer ID
    fn generate_id(&self) -> String;

    /// Generate the customer-facing queue token printed on the ticket
    fn generate_token(&self) -> String {
        self.generate_id()
    }
}

/// UUID v4 provider (production)
pub struct UuidProvider;

/// Length of the customer-facing queue token
const TOKEN_LEN: usize = 9;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }

    fn generate_token(&self) -> String {
        let simple = uuid::Uuid::new_v4().simple().to_string();
        simple[..TOKEN_LEN].to_string()
    }
}

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Deterministic IDs: `c-1`, `c-2`, ... and tokens `q-1`, `q-2`, ...
    #[derive(Default)]
    pub struct SequentialIdProvider {
        ids: AtomicU64,
        tokens: AtomicU64,
    }

    impl SequentialIdProvider {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl IdProvider for SequentialIdProvider {
        fn generate_id(&self) -> String {
            format!("c-{}", self.ids.fetch_add(1, Ordering::SeqCst) + 1)
        }

        fn generate_token(&self) -> String {
            format!("q-{}", self.tokens.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_tokens_are_short_and_unique() {
        let provider = UuidProvider;
        let a = provider.generate_token();
        let b = provider.generate_token();
        assert_eq!(a.len(), TOKEN_LEN);
        assert_ne!(a, b);
    }
}
