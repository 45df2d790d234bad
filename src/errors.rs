use std::path::PathBuf;
use thiserror::Error;

pub type AnalysisResult<T, E = AnalysisError> = Result<T, E>;

/// Context carried on every error surfaced from an `extract_*` entry point
/// (spec §7: "a single tagged error value carrying the original file path
/// and function name").
#[derive(Debug, Clone)]
pub struct Context {
    pub path: PathBuf,
    pub function: String,
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported language for {path}")]
    UnsupportedLanguage { path: PathBuf },

    #[error("function {function} not found in {path}")]
    FunctionNotFound { path: PathBuf, function: String },

    #[error("declaration for {function} in {path} has no block body")]
    BodyNotFound { path: PathBuf, function: String },

    #[error("cfg extraction failed for {function} in {path}: {source}")]
    CfgExtractionFailed {
        path: PathBuf,
        function: String,
        #[source]
        source: Box<AnalysisError>,
    },

    #[error("dfg extraction failed for {function} in {path}: {source}")]
    DfgExtractionFailed {
        path: PathBuf,
        function: String,
        #[source]
        source: Box<AnalysisError>,
    },

    #[error("tree-sitter language error: {0}")]
    TreeSitter(#[from] tree_sitter::LanguageError),
}

impl AnalysisError {
    pub fn context(&self) -> Option<Context> {
        match self {
            AnalysisError::FileRead { path, .. } | AnalysisError::UnsupportedLanguage { path } => {
                Some(Context {
                    path: path.clone(),
                    function: String::new(),
                })
            }
            AnalysisError::FunctionNotFound { path, function }
            | AnalysisError::BodyNotFound { path, function }
            | AnalysisError::CfgExtractionFailed { path, function, .. }
            | AnalysisError::DfgExtractionFailed { path, function, .. } => Some(Context {
                path: path.clone(),
                function: function.clone(),
            }),
            AnalysisError::TreeSitter(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_not_found_carries_context() {
        let err = AnalysisError::FunctionNotFound {
            path: PathBuf::from("a.py"),
            function: "f".to_owned(),
        };
        let ctx = err.context().expect("context");
        assert_eq!(ctx.path, PathBuf::from("a.py"));
        assert_eq!(ctx.function, "f");
        assert!(err.to_string().contains('f'));
    }

    #[test]
    fn cfg_extraction_failed_wraps_cause() {
        let inner = AnalysisError::BodyNotFound {
            path: PathBuf::from("a.go"),
            function: "g".to_owned(),
        };
        let wrapped = AnalysisError::CfgExtractionFailed {
            path: PathBuf::from("a.go"),
            function: "g".to_owned(),
            source: Box::new(inner),
        };
        assert!(wrapped.to_string().contains("cfg extraction failed"));
    }

    #[test]
    fn file_read_wraps_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = AnalysisError::FileRead {
            path: PathBuf::from("missing.rs"),
            source: io,
        };
        assert!(err.to_string().contains("missing.rs"));
    }
}
