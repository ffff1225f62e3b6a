pub mod types;

pub use types::{FocusProbe, FrontmostApp};

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(target_os = "macos")]
pub use macos::MacProbe as NativeProbe;

#[cfg(target_os = "linux")]
pub use linux::LinuxProbe as NativeProbe;

// Inert probe for platforms without an implementation: it reports nothing
// frontmost, so tracking never engages rather than erroring.
#[cfg(not(any(target_os = "macos", target_os = "linux")))]
pub struct NativeProbe;

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl NativeProbe {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl Default for NativeProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
impl FocusProbe for NativeProbe {
    fn frontmost_app(&self) -> Option<FrontmostApp> {
        None
    }
}
