//! Recoverable faults of one tick.

use thiserror::Error;

use crate::wallpaper::BackendError;

/// Why a tick did not complete.
///
/// The supervisor branches on the kind, never on the underlying error.
#[derive(Debug, Error)]
pub enum TickFault {
    /// The wallpaper surface is unusable and has to be re-acquired.
    #[error("wallpaper surface unavailable")]
    ApplierUnavailable(#[source] BackendError),
    /// Anything else, including panics inside the tick.
    #[error("tick failed: {0}")]
    Unclassified(String),
}

impl TickFault {
    /// Classifies a panic payload caught around a tick.
    #[must_use]
    pub fn from_panic(payload: &(dyn std::any::Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Self::Unclassified(format!("panic: {message}"))
    }
}

impl From<BackendError> for TickFault {
    fn from(err: BackendError) -> Self {
        if err.is_surface_fault() {
            Self::ApplierUnavailable(err)
        } else {
            Self::Unclassified(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallpaper::MonitorId;

    #[test]
    fn test_surface_errors_are_applier_unavailable() {
        let fault = TickFault::from(BackendError::Unavailable("explorer restarted".to_string()));
        assert!(matches!(fault, TickFault::ApplierUnavailable(_)));
    }

    #[test]
    fn test_other_backend_errors_are_unclassified() {
        let fault = TickFault::from(BackendError::MonitorNotFound(MonitorId::new("2")));
        assert!(matches!(fault, TickFault::Unclassified(msg) if msg.contains("monitor not found")));
    }

    fn panic_payload(f: impl FnOnce() + std::panic::UnwindSafe) -> Box<dyn std::any::Any + Send> {
        std::panic::catch_unwind(f).unwrap_err()
    }

    #[test]
    fn test_panic_payloads_are_unclassified() {
        let payload = panic_payload(|| panic!("boom"));
        let fault = TickFault::from_panic(payload.as_ref());
        assert!(matches!(fault, TickFault::Unclassified(msg) if msg.contains("boom")));

        let payload = panic_payload(|| panic!("{}", String::from("formatted")));
        let fault = TickFault::from_panic(payload.as_ref());
        assert!(matches!(fault, TickFault::Unclassified(msg) if msg.contains("formatted")));
    }
}
