//! Contains logic for reading the foreground window from different
//! environments. [GenericWindowManager] is the main artifact of this module
//! that abstracts the operations.

#[cfg(feature = "win")]
pub mod win;
#[cfg(feature = "x11")]
pub mod x11;

#[cfg(feature = "win")]
extern crate windows;

#[cfg(feature = "x11")]
extern crate xcb;

use std::sync::Arc;

use anyhow::Result;

/// Executable path reported when the process behind the foreground window
/// can't be resolved. It still participates in aggregation as its own app.
pub const UNKNOWN_EXE: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct ActiveWindowData {
    /// Title of the focused window. For example 'main.py - Visual Studio Code'
    pub window_title: Arc<str>,
    /// Full path to the executable owning the window, or [UNKNOWN_EXE]
    pub exe_path: Arc<str>,
}

/// Contract every platform backend must implement.
#[cfg_attr(test, mockall::automock)]
pub trait WindowManager {
    fn get_active_window_data(&mut self) -> Result<ActiveWindowData>;
}

/// Serves as a cross-compatible WindowManager implementation.
pub struct GenericWindowManager {
    inner: Box<dyn WindowManager>,
}

impl GenericWindowManager {
    pub fn new() -> Result<Self> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "win")] {
                use win::WindowsWindowManager;
                Ok(Self {
                    inner: Box::new(WindowsWindowManager::new()),
                })
            }
            else if #[cfg(feature = "x11")] {
                use x11::LinuxWindowManager;
                Ok(Self {
                    inner: Box::new(LinuxWindowManager::new()?),
                })
            }
            else {
                // This runtime error is needed to allow the project to be compiled for during testing.
                unimplemented!("No window manager was specified")
            }
        }
    }
}

impl WindowManager for GenericWindowManager {
    fn get_active_window_data(&mut self) -> Result<ActiveWindowData> {
        self.inner.get_active_window_data()
    }
}
