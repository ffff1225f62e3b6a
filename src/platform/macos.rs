//! Frontmost-application probe backed by NSWorkspace.

#![allow(
    unsafe_code,
    reason = "the objc2 AppKit bindings expose these calls as unsafe"
)]

use super::{FocusProbe, FrontmostApp};
use objc2::rc::autoreleasepool;
use objc2_app_kit::NSWorkspace;

pub struct MacProbe;

impl MacProbe {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusProbe for MacProbe {
    fn frontmost_app(&self) -> Option<FrontmostApp> {
        autoreleasepool(|_pool| {
            let workspace = unsafe { NSWorkspace::sharedWorkspace() };
            let app = unsafe { workspace.frontmostApplication() }?;
            let identifier = unsafe { app.bundleIdentifier() }.map(|s| s.to_string());
            let name = unsafe { app.localizedName() }.map(|s| s.to_string());
            Some(FrontmostApp { identifier, name })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_reports_some_frontmost_app() {
        // Some application is always frontmost in a logged-in session.
        let probe = MacProbe::new();
        let _ = probe.frontmost_app();
    }
}
