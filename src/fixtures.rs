#[cfg(test)]
pub mod test {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::error::AdminError;
    use crate::maintenance::{AdminValidator, CacheFlush, SessionStore};

    /// A site configuration with comments, an inline comment and one value of
    /// each scalar type, plus an array.
    pub const SITE_CONFIG: &str = r#"# Site configuration
# Managed through the administration pages; hand edits are kept.

[general]
# Set to On once installation has completed
installed = false
base_url = "http://old.example.org"   # public address
session_lifetime = 30

[database]
driver = "mysql"
host = "localhost"
port = 3306
persistent = true

[cache]
object_cache = "none"
web_cache_hours = 1.5
locales = ["en_US", "fr_CA"]
"#;

    #[test]
    fn site_config_is_valid_toml() {
        let doc: toml::Table = toml::from_str(SITE_CONFIG).unwrap();
        assert_eq!(doc.len(), 3);
    }

    // -- Recording collaborators --------------------------------------------------

    /// Names of the collaborators called, in call order. Shared between the
    /// fakes handed to a handler and the test that inspects them.
    #[derive(Debug, Clone, Default)]
    pub struct Calls(Rc<RefCell<Vec<&'static str>>>);

    impl Calls {
        pub fn record(&self, name: &'static str) {
            self.0.borrow_mut().push(name);
        }

        /// Drain the recorded calls.
        pub fn take(&self) -> Vec<&'static str> {
            std::mem::take(&mut *self.0.borrow_mut())
        }
    }

    /// A session store or cache that records each call and reports a fixed
    /// number of removed entries.
    pub struct Recorder {
        name: &'static str,
        removed: usize,
        calls: Calls,
    }

    impl Recorder {
        pub fn new(name: &'static str, removed: usize, calls: &Calls) -> Self {
            Self {
                name,
                removed,
                calls: calls.clone(),
            }
        }
    }

    impl SessionStore for Recorder {
        fn delete_all_sessions(&self) -> Result<usize, AdminError> {
            self.calls.record(self.name);
            Ok(self.removed)
        }
    }

    impl CacheFlush for Recorder {
        fn flush(&self) -> Result<usize, AdminError> {
            self.calls.record(self.name);
            Ok(self.removed)
        }
    }

    /// Rejects every caller.
    pub struct Deny;

    impl AdminValidator for Deny {
        fn validate(&self) -> Result<(), AdminError> {
            Err(AdminError::Unauthorized("not an administrator".into()))
        }
    }

    #[test]
    fn calls_drain_in_order() {
        let calls = Calls::default();
        let a = Recorder::new("a", 1, &calls);
        let b = Recorder::new("b", 2, &calls);
        assert_eq!(b.flush().unwrap(), 2);
        assert_eq!(a.delete_all_sessions().unwrap(), 1);
        assert_eq!(calls.take(), ["b", "a"]);
        assert!(calls.take().is_empty());
    }
}
