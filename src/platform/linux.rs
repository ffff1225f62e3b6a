use super::{FocusProbe, FrontmostApp};
use log::warn;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{AtomEnum, ConnectionExt, Window};

pub struct LinuxProbe {
    conn: Option<x11rb::rust_connection::RustConnection>,
    root: Window,
}

impl Default for LinuxProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl LinuxProbe {
    pub fn new() -> Self {
        match x11rb::connect(None) {
            Ok((conn, screen_num)) => {
                let setup = conn.setup();
                let Some(screen) = setup.roots.get(screen_num) else {
                    warn!(
                        "Invalid X11 screen number {screen_num} (only {} screens); focus probing disabled",
                        setup.roots.len()
                    );
                    return Self { conn: None, root: 0 };
                };
                let root = screen.root;
                Self {
                    conn: Some(conn),
                    root,
                }
            }
            Err(e) => {
                // Allows running on Wayland or headless systems; the probe
                // just reports nothing frontmost.
                warn!("Failed to connect to X server: {e}; focus probing disabled");
                Self { conn: None, root: 0 }
            }
        }
    }

    fn get_atom(&self, name: &str) -> Option<u32> {
        self.conn
            .as_ref()?
            .intern_atom(false, name.as_bytes())
            .ok()?
            .reply()
            .ok()
            .map(|r| r.atom)
    }

    fn get_window_property(&self, window: Window, atom: u32) -> Option<String> {
        let reply = self
            .conn
            .as_ref()?
            .get_property(false, window, atom, AtomEnum::ANY, 0, 1024)
            .ok()?
            .reply()
            .ok()?;

        if reply.value.is_empty() {
            return None;
        }

        String::from_utf8(reply.value).ok()
    }

    fn active_window_id(&self) -> Option<Window> {
        let conn = self.conn.as_ref()?;
        let atom = self.get_atom("_NET_ACTIVE_WINDOW")?;
        let reply = conn
            .get_property(false, self.root, atom, AtomEnum::WINDOW, 0, 1)
            .ok()?
            .reply()
            .ok()?;

        let window = reply.value32()?.next().filter(|&window| window != 0);
        window
    }
}

impl FocusProbe for LinuxProbe {
    fn frontmost_app(&self) -> Option<FrontmostApp> {
        let window = self.active_window_id()?;

        // WM_CLASS is two null-terminated strings: instance then class.
        let class = self.get_window_property(window, AtomEnum::WM_CLASS.into())?;
        let mut parts = class.split('\0');
        let identifier = parts
            .next()
            .filter(|part| !part.is_empty())
            .map(str::to_string);
        let name = parts
            .next()
            .filter(|part| !part.is_empty())
            .map(str::to_string);

        Some(FrontmostApp { identifier, name })
    }
}
