//! Periodic desktop detection.

use super::registry::RegistryReader;
use super::resolve::current_desktop;
use crate::model::DesktopInfo;

/// Re-reads the registry on every timer tick and reports changes.
pub struct DesktopPoller<R: RegistryReader> {
    reader: R,
    current: Option<DesktopInfo>,
}

impl<R: RegistryReader> DesktopPoller<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            current: None,
        }
    }

    /// Resolve again; `Some` only when the result differs from the last poll
    /// (the first poll always reports).
    pub fn poll(&mut self) -> Option<&DesktopInfo> {
        let info = current_desktop(&self.reader);
        if self.current.as_ref() == Some(&info) {
            return None;
        }
        self.current = Some(info);
        self.current.as_ref()
    }

    /// Last resolved desktop, or the fallback before the first poll.
    pub fn current(&self) -> DesktopInfo {
        self.current.clone().unwrap_or_default()
    }

    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::MemoryRegistry;
    use crate::model::constants::*;

    #[test]
    fn first_poll_reports_then_only_changes() {
        let mut poller = DesktopPoller::new(MemoryRegistry::new());
        assert_eq!(poller.poll().cloned(), Some(DesktopInfo::default()));
        assert_eq!(poller.poll(), None);

        let id = [7u8; 16];
        poller
            .reader_mut()
            .set_binary(REG_VIRTUAL_DESKTOPS, REG_VALUE_DESKTOP_IDS, [[1u8; 16], id].concat())
            .set_binary(REG_VIRTUAL_DESKTOPS, REG_VALUE_CURRENT_DESKTOP, id);
        assert_eq!(poller.poll().cloned(), Some(DesktopInfo::unnamed(2)));
        assert_eq!(poller.poll(), None);
        assert_eq!(poller.current().name, "Desktop 2");
    }
}
