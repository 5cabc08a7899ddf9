//! The connector handle
//!
//! [`Connector`] owns one boxed [`HostApplication`] connection, obtained
//! once at startup (typically from [`crate::host::HostLauncher`]) and
//! injected at construction, together with the indexing base applied to
//! every index-taking call.
//!
//! # Dead-connection policy
//!
//! Liveness is probed per call and never cached. A dead connection is not
//! exceptional: reads return empty, writes silently no-op. This is a
//! deliberate asymmetry against the hard errors raised for bad indices,
//! types and shapes: those are programmer errors, while the host quitting
//! underneath the caller is an ordinary end-of-session event.

use crate::error::Result;
use crate::host::HostApplication;
use crate::types::IndexingBase;

/// Connection handle driving one host application instance
///
/// All data-transfer, geometry and scene operations are defined in their
/// own modules as further `impl Connector` blocks; this module holds the
/// lifecycle surface.
pub struct Connector {
    pub(crate) host: Box<dyn HostApplication>,
    indexing: IndexingBase,
}

impl Connector {
    /// Create a connector over an established host connection.
    ///
    /// `indexing` is fixed for the life of the connector and applied
    /// uniformly to every channel, timepoint and sub-volume origin
    /// parameter.
    pub fn new(host: Box<dyn HostApplication>, indexing: IndexingBase) -> Self {
        tracing::info!("Connector created ({:?} indexing)", indexing);
        Self { host, indexing }
    }

    /// The indexing base this connector was constructed with
    pub fn indexing_base(&self) -> IndexingBase {
        self.indexing
    }

    /// Probe whether the host connection is live.
    ///
    /// This is a cheap remote probe, issued fresh on every call.
    pub fn is_alive(&self) -> bool {
        self.host.is_alive()
    }

    /// The host's version string
    pub fn version(&self) -> Result<String> {
        self.host.version()
    }

    /// The host's version encoded as a single comparable integer.
    ///
    /// Parses the first `major.minor.patch` triplet out of the version
    /// string; `9.5.1` becomes `9_050_100`. Returns `None` when the
    /// string carries no such triplet.
    pub fn version_as_integer(&self) -> Result<Option<u32>> {
        Ok(parse_version_triplet(&self.host.version()?)
            .map(|(major, minor, patch)| major * 1_000_000 + minor * 10_000 + patch * 100))
    }

    /// Ask the host application to quit and consume the connector.
    ///
    /// A connection that is already dead makes this a no-op.
    pub fn close(mut self) -> Result<()> {
        if !self.host.is_alive() {
            tracing::debug!("close: connection already dead, nothing to do");
            return Ok(());
        }
        tracing::info!("Closing host application");
        self.host.quit()
    }
}

/// Find the first `major.minor.patch` triplet in a version string
fn parse_version_triplet(version: &str) -> Option<(u32, u32, u32)> {
    for token in version.split_whitespace() {
        let mut parts = token.split('.');
        let triplet: (Option<u32>, Option<u32>, Option<u32>) = (
            parts.next().and_then(|p| p.parse().ok()),
            parts.next().and_then(|p| p.parse().ok()),
            parts.next().and_then(|p| p.parse().ok()),
        );
        if let (Some(major), Some(minor), Some(patch)) = triplet {
            return Some((major, minor, patch));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;

    #[test]
    fn test_connector_liveness_follows_host() {
        let mut host = MockHost::new();
        host.set_alive(false);
        let connector = Connector::new(Box::new(host), IndexingBase::ZeroBased);
        assert!(!connector.is_alive());
    }

    #[test]
    fn test_indexing_base_is_fixed() {
        let connector = Connector::new(Box::new(MockHost::new()), IndexingBase::OneBased);
        assert_eq!(connector.indexing_base(), IndexingBase::OneBased);
    }

    #[test]
    fn test_version_as_integer() {
        let host = MockHost::new().with_version("MockVis x64 9.5.1 [Nov 2019]");
        let connector = Connector::new(Box::new(host), IndexingBase::ZeroBased);
        assert_eq!(connector.version().unwrap(), "MockVis x64 9.5.1 [Nov 2019]");
        assert_eq!(connector.version_as_integer().unwrap(), Some(9_050_100));
    }

    #[test]
    fn test_version_without_triplet() {
        let host = MockHost::new().with_version("MockVis (development build)");
        let connector = Connector::new(Box::new(host), IndexingBase::ZeroBased);
        assert_eq!(connector.version_as_integer().unwrap(), None);
    }

    #[test]
    fn test_parse_version_triplet() {
        assert_eq!(parse_version_triplet("9.5.1"), Some((9, 5, 1)));
        assert_eq!(parse_version_triplet("x64 10.0.2 beta"), Some((10, 0, 2)));
        assert_eq!(parse_version_triplet("9.5"), None);
        assert_eq!(parse_version_triplet(""), None);
    }

    #[test]
    fn test_close_consumes_connector() {
        let connector = Connector::new(Box::new(MockHost::new()), IndexingBase::ZeroBased);
        assert!(connector.close().is_ok());
    }
}
