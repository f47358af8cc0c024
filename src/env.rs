use std::collections::BTreeMap;

use crate::error::Error;

/// Environment that entries are written to and looked up from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEnv {
    kind: TargetEnvKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TargetEnvKind {
    /// The current process environment.
    ///
    /// Writes go through [`std::env::set_var`], which mutates global process
    /// state and is not thread-safe for concurrent environment access.
    Process,
    /// An in-memory map.
    Memory(BTreeMap<String, String>),
}

impl Default for TargetEnv {
    fn default() -> Self {
        Self::memory()
    }
}

impl TargetEnv {
    /// Create a process-environment target.
    ///
    /// # Safety
    ///
    /// The caller must ensure no other threads concurrently read or write the
    /// process environment for the duration of operations that may mutate this
    /// target.
    pub unsafe fn process() -> Self {
        Self {
            kind: TargetEnvKind::Process,
        }
    }

    /// Create an empty in-memory target.
    pub fn memory() -> Self {
        Self::from_memory(BTreeMap::new())
    }

    /// Create an in-memory target from an existing map.
    pub fn from_memory(map: BTreeMap<String, String>) -> Self {
        Self {
            kind: TargetEnvKind::Memory(map),
        }
    }

    pub fn is_process(&self) -> bool {
        matches!(self.kind, TargetEnvKind::Process)
    }

    pub fn as_memory(&self) -> Option<&BTreeMap<String, String>> {
        match &self.kind {
            TargetEnvKind::Memory(map) => Some(map),
            TargetEnvKind::Process => None,
        }
    }

    pub fn into_memory(self) -> Option<BTreeMap<String, String>> {
        match self.kind {
            TargetEnvKind::Memory(map) => Some(map),
            TargetEnvKind::Process => None,
        }
    }

    /// Look up `key`.
    ///
    /// A process value that is not valid Unicode is an [`Error::NotUnicode`].
    pub fn get(&self, key: &str) -> Result<Option<String>, Error> {
        match &self.kind {
            TargetEnvKind::Process => match std::env::var_os(key) {
                None => Ok(None),
                Some(value) => value.into_string().map(Some).map_err(|_| Error::NotUnicode {
                    key: key.to_owned(),
                }),
            },
            TargetEnvKind::Memory(map) => Ok(map.get(key).cloned()),
        }
    }

    /// Whether `key` is set to a non-empty value.
    pub(crate) fn has_value(&self, key: &str) -> bool {
        match &self.kind {
            TargetEnvKind::Process => std::env::var_os(key).is_some_and(|value| !value.is_empty()),
            TargetEnvKind::Memory(map) => map.get(key).is_some_and(|value| !value.is_empty()),
        }
    }

    pub(crate) fn set_var(&mut self, key: &str, value: &str) {
        match &mut self.kind {
            // SAFETY: a process target is only created through `process()`,
            // whose caller guarantees exclusive environment access.
            TargetEnvKind::Process => unsafe { std::env::set_var(key, value) },
            TargetEnvKind::Memory(map) => {
                map.insert(key.to_owned(), value.to_owned());
            }
        }
    }
}
