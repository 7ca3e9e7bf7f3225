// error.rs — 核心错误类型

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("config parse error: {0}")]
    Parse(String),
}

/// Errors surfaced to the host. Neither variant is fatal to the core:
/// a missing texture leaves the mesh untextured and memory pressure tears
/// down owned resources.
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("texture unavailable ({origin}): {reason}")]
    TextureUnavailable { origin: String, reason: String },

    #[error("resources released after memory pressure")]
    ResourceExhaustion,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ViewerError {
    pub fn texture(origin: impl Into<String>, reason: impl ToString) -> Self {
        ViewerError::TextureUnavailable {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }

    pub fn is_texture_unavailable(&self) -> bool {
        matches!(self, ViewerError::TextureUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_error_display() {
        let err = ViewerError::texture("/tmp/pano.jpg", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "texture unavailable (/tmp/pano.jpg): No such file or directory"
        );
        assert!(err.is_texture_unavailable());
    }

    #[test]
    fn config_error_converts_transparently() {
        let err: ViewerError = ConfigError::Parse("expected value at line 1".into()).into();
        assert_eq!(err.to_string(), "config parse error: expected value at line 1");
        assert!(!err.is_texture_unavailable());
    }
}
