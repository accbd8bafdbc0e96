//! Script source port - where change-scripts come from

use crate::domain::result::Result;
use crate::domain::ScriptSet;

/// Enumerates the available change-scripts
///
/// Implementations return every script they can see, keyed by name with
/// whitespace-trimmed bodies. An empty set is valid. Failure to enumerate or
/// read the backing location is `Error::SourceUnavailable`.
pub trait ScriptSource {
    fn list_scripts(&self) -> Result<ScriptSet>;
}

impl<T: ScriptSource + ?Sized> ScriptSource for &T {
    fn list_scripts(&self) -> Result<ScriptSet> {
        (**self).list_scripts()
    }
}

impl<T: ScriptSource + ?Sized> ScriptSource for Box<T> {
    fn list_scripts(&self) -> Result<ScriptSet> {
        (**self).list_scripts()
    }
}
