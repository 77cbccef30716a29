use tokio::sync::mpsc;

pub type ProgressSender = mpsc::UnboundedSender<UploadProgress>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: Option<u64>,
}

impl UploadProgress {
    /// Percentage in `[0, 100]`, or `None` when the total length is unknown.
    pub fn percent(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => {
                Some((self.loaded as f64 / total as f64 * 100.0).clamp(0.0, 100.0))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_requires_known_length() {
        let p = UploadProgress {
            loaded: 50,
            total: None,
        };
        assert_eq!(p.percent(), None);

        let p = UploadProgress {
            loaded: 0,
            total: Some(0),
        };
        assert_eq!(p.percent(), None);
    }

    #[test]
    fn percent_is_proportional_and_capped() {
        let p = UploadProgress {
            loaded: 25,
            total: Some(100),
        };
        assert_eq!(p.percent(), Some(25.0));

        let p = UploadProgress {
            loaded: 120,
            total: Some(100),
        };
        assert_eq!(p.percent(), Some(100.0));
    }
}
