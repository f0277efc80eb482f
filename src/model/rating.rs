use serde::{Deserialize, Serialize};

/// Rating statistics for an item.
///
/// The rating endpoint does not carry the average score; that scalar lives on
/// the item itself and is copied in with [`Rating::with_score`] once both have
/// loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub count: u32,
    #[serde(default = "default_max")]
    pub max: u32,
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of votes per star, lowest first.
    #[serde(default)]
    pub distribution: Vec<u32>,
}

fn default_max() -> u32 {
    5
}

impl Rating {
    pub fn new(count: u32) -> Self {
        Self {
            count,
            max: default_max(),
            rating: None,
            distribution: Vec::new(),
        }
    }

    pub fn with_distribution(mut self, distribution: Vec<u32>) -> Self {
        self.distribution = distribution;
        self
    }

    /// Returns this rating with its score field replaced by `score`.
    ///
    /// This is a plain field assignment: a `None` score overwrites any value.
    pub fn with_score(mut self, score: Option<f64>) -> Self {
        self.rating = score;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_score_assigns_field() {
        let rating = Rating::new(120).with_score(Some(4.5));
        assert_eq!(rating.rating, Some(4.5));
        assert_eq!(rating.count, 120);

        assert_eq!(rating.with_score(None).rating, None);
    }
}
