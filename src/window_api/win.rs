use anyhow::{Result, anyhow};
use tracing::{error, warn};
use windows::{
    Win32::{
        Foundation::{BOOL, CloseHandle, GetLastError, HANDLE, HWND},
        System::{
            Diagnostics::Debug::{
                FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS, FormatMessageW,
            },
            SystemServices::{LANG_ENGLISH, SUBLANG_ENGLISH_US},
            Threading::{
                OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION,
                QueryFullProcessImageNameW,
            },
        },
        UI::WindowsAndMessaging::{GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId},
    },
    core::PWSTR,
};

use super::{ActiveWindowData, UNKNOWN_EXE, WindowManager};

#[tracing::instrument]
pub fn get_active() -> Result<ActiveWindowData> {
    let window = unsafe { GetForegroundWindow() };

    if window.is_invalid() {
        return Err(anyhow!("Failed to get foreground window"));
    }

    let mut id = 0u32;
    unsafe { GetWindowThreadProcessId(window, Some(&mut id)) };
    if id == 0 {
        return Err(anyhow!("Failed to get active window {}", last_error_message()));
    }

    let mut text: [u16; 4096] = [0; 4096];

    // A window we can see might still belong to a process we can't open
    // (elevated, protected). The interval is kept with an unknown executable.
    let exe_path = match unsafe { get_window_process_path(id, &mut text) } {
        Ok(path) => path,
        Err(e) => {
            warn!("Failed to resolve process path for pid {id}: {e:?}");
            UNKNOWN_EXE.to_string()
        }
    };

    let title = unsafe { get_window_title(window, &mut text) };

    Ok(ActiveWindowData {
        exe_path: exe_path.into(),
        window_title: title.into(),
    })
}

fn last_error_message() -> String {
    let err = unsafe { GetLastError() };
    let mut message_buffer = [0u16; 2048];
    let size = unsafe {
        FormatMessageW(
            FORMAT_MESSAGE_FROM_SYSTEM | FORMAT_MESSAGE_IGNORE_INSERTS,
            None,
            err.0,
            LANG_ENGLISH | (SUBLANG_ENGLISH_US << 10),
            PWSTR::from_raw(message_buffer.as_mut_ptr()),
            2048,
            None,
        )
    };
    if size == 0 {
        format!("error code {}", err.0)
    } else {
        String::from_utf16_lossy(&message_buffer[0..size as usize])
    }
}

unsafe fn get_window_process_path(pid: u32, text: &mut [u16]) -> Result<String> {
    unsafe {
        let handle: HANDLE =
            OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, BOOL::from(false), pid)?;
        let mut length = text.len() as u32;
        let result = QueryFullProcessImageNameW(
            handle,
            PROCESS_NAME_WIN32,
            windows::core::PWSTR(text.as_mut_ptr()),
            &mut length,
        );
        CloseHandle(handle).inspect_err(|e| error!("Failed to close handle {e:?}"))?;
        result?;
        Ok(String::from_utf16_lossy(&text[..length as usize]))
    }
}

unsafe fn get_window_title(window_handle: HWND, text: &mut [u16]) -> String {
    let len = unsafe { GetWindowTextW(window_handle, text) };
    String::from_utf16_lossy(&text[..len as usize])
}

pub struct WindowsWindowManager {}

impl WindowsWindowManager {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for WindowsWindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager for WindowsWindowManager {
    fn get_active_window_data(&mut self) -> Result<ActiveWindowData> {
        get_active().inspect_err(|e| error!("Failed to get active window {e:?}"))
    }
}
