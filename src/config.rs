//! Parser configuration.

use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::diagnostics::FileId;

/// Default nesting limit for the scanner's mode stack.
pub const DEFAULT_MAX_SCANNER_DEPTH: usize = 64;

/// Knobs for a single parse. Cheap to clone; the cancellation flag is shared.
#[derive(Clone, Debug)]
pub struct ParseOptions {
    pub file_id: FileId,
    /// Interpolation/raw-string frames deeper than this fault the scanner.
    pub max_scanner_depth: usize,
    pub record_telemetry: bool,
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self {
            file_id: FileId::UNKNOWN,
            max_scanner_depth: DEFAULT_MAX_SCANNER_DEPTH,
            record_telemetry: false,
            cancel: None,
        }
    }

    /// Defaults overridden by `BEEF_MAX_SCANNER_DEPTH` and `BEEF_PARSE_TELEMETRY`.
    #[must_use]
    pub fn from_env() -> Self {
        let depth = env::var("BEEF_MAX_SCANNER_DEPTH").ok();
        let telemetry = env::var("BEEF_PARSE_TELEMETRY").ok();
        apply_env_overrides(Self::new(), depth.as_deref(), telemetry.as_deref())
    }

    #[must_use]
    pub fn with_file_id(mut self, file_id: FileId) -> Self {
        self.file_id = file_id;
        self
    }

    #[must_use]
    pub fn with_max_scanner_depth(mut self, depth: usize) -> Self {
        self.max_scanner_depth = depth.max(1);
        self
    }

    #[must_use]
    pub fn with_telemetry(mut self, enabled: bool) -> Self {
        self.record_telemetry = enabled;
        self
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_env_overrides(
    mut options: ParseOptions,
    depth: Option<&str>,
    telemetry: Option<&str>,
) -> ParseOptions {
    if let Some(depth) = depth.and_then(|value| value.trim().parse::<usize>().ok()) {
        options = options.with_max_scanner_depth(depth);
    }
    if let Some(flag) = telemetry {
        options.record_telemetry = matches!(
            flag.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
    }
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_parse_depth_and_telemetry() {
        let options = apply_env_overrides(ParseOptions::new(), Some(" 8 "), Some("ON"));
        assert_eq!(options.max_scanner_depth, 8);
        assert!(options.record_telemetry);

        let untouched = apply_env_overrides(ParseOptions::new(), Some("deep"), None);
        assert_eq!(untouched.max_scanner_depth, DEFAULT_MAX_SCANNER_DEPTH);
        assert!(!untouched.record_telemetry);
    }

    #[test]
    fn cancel_flag_is_shared_between_clones() {
        let flag = Arc::new(AtomicBool::new(false));
        let options = ParseOptions::new().with_cancel_flag(Arc::clone(&flag));
        let clone = options.clone();
        assert!(!clone.is_cancelled());
        flag.store(true, Ordering::Relaxed);
        assert!(options.is_cancelled() && clone.is_cancelled());
    }

    #[test]
    fn depth_never_drops_to_zero() {
        assert_eq!(ParseOptions::new().with_max_scanner_depth(0).max_scanner_depth, 1);
    }
}
