use serde::Deserialize;

/// Tuning knobs for a coordinator.
///
/// Deserializable so hosts can keep it next to their other settings; every
/// field falls back to its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Capacity of the channel sub-resources post their events into.
    pub mailbox_size: usize,
    /// Capacity of the channel clients send requests into.
    pub request_buffer: usize,
    /// Entries requested per photo or review page.
    pub page_size: usize,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            mailbox_size: 32,
            request_buffer: 32,
            page_size: 20,
        }
    }
}

impl CoordinatorConfig {
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: CoordinatorConfig = serde_json::from_str(r#"{"page_size": 50}"#).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.mailbox_size, 32);
    }
}
