use selector_core::scorm::Scorm12Api;
use tracing::debug;

/// Stand-in used when no host API exists and strict lookup is off.
///
/// Every mutating call reports success, reads return `""` and the last error
/// is always `0`, so content runs unchanged outside an LMS.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpApi;

impl Scorm12Api for NoOpApi {
    fn lms_initialize(&self, _arg: &str) -> String {
        debug!("LMSInitialize (no-op)");
        "true".to_owned()
    }

    fn lms_finish(&self, _arg: &str) -> String {
        debug!("LMSFinish (no-op)");
        "true".to_owned()
    }

    fn lms_get_value(&self, element: &str) -> String {
        debug!(element, "LMSGetValue (no-op)");
        String::new()
    }

    fn lms_set_value(&self, element: &str, value: &str) -> String {
        debug!(element, value, "LMSSetValue (no-op)");
        "true".to_owned()
    }

    fn lms_commit(&self, _arg: &str) -> String {
        debug!("LMSCommit (no-op)");
        "true".to_owned()
    }

    fn lms_get_last_error(&self) -> String {
        "0".to_owned()
    }

    fn lms_get_error_string(&self, _code: &str) -> String {
        "No error".to_owned()
    }

    fn lms_get_diagnostic(&self, _code: &str) -> String {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_success_and_empty_reads() {
        let api = NoOpApi;
        assert_eq!(api.lms_initialize(""), "true");
        assert_eq!(api.lms_set_value("cmi.suspend_data", "{}"), "true");
        assert_eq!(api.lms_get_value("cmi.suspend_data"), "");
        assert_eq!(api.lms_get_last_error(), "0");
        assert_eq!(api.lms_finish(""), "true");
    }
}
