/// A foreground application as reported by the OS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontmostApp {
    /// Stable identifier used for matching: the bundle identifier on
    /// macOS, the WM_CLASS instance on X11. Absent when the OS cannot
    /// name the application.
    pub identifier: Option<String>,
    /// Human-readable name, when the OS provides one.
    pub name: Option<String>,
}

pub trait FocusProbe: Send {
    /// The currently focused application, or `None` when nothing is
    /// frontmost or the desktop cannot be queried.
    fn frontmost_app(&self) -> Option<FrontmostApp>;
}
