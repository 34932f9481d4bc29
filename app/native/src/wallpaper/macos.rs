//! macOS wallpaper backend.
//!
//! Uses `NSScreen` to enumerate displays and `NSWorkspace` to set the desktop
//! image of each one. Displays are identified by their `NSScreenNumber`.

use std::ffi::c_void;
use std::path::Path;

use objc::runtime::{BOOL, Class, Object, YES};
use objc::{msg_send, sel, sel_impl};

use super::{BackendError, MonitorId, WallpaperBackend};

/// `NSImageScaleProportionallyUpOrDown`.
const SCALE_PROPORTIONALLY_UP_OR_DOWN: usize = 3;

/// `NSUTF8StringEncoding`.
const UTF8_ENCODING: usize = 4;

/// Per-display wallpapers through `NSWorkspace`.
#[derive(Debug)]
pub struct MacOsBackend {
    /// Whether to scale to cover and crop. Set by `set_fill_mode`.
    fill: std::cell::Cell<bool>,
}

impl MacOsBackend {
    /// Connects to the shared workspace.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Unavailable`] if AppKit cannot be reached.
    pub fn connect() -> Result<Self, BackendError> {
        unsafe { shared_workspace()? };
        Ok(Self { fill: std::cell::Cell::new(false) })
    }
}

impl WallpaperBackend for MacOsBackend {
    fn name(&self) -> &'static str { "macos" }

    fn monitors(&self) -> Result<Vec<MonitorId>, BackendError> {
        unsafe {
            let screens = screens()?;
            let count: usize = msg_send![screens, count];

            let mut monitors = Vec::with_capacity(count);
            for index in 0..count {
                let screen: *mut Object = msg_send![screens, objectAtIndex: index];
                if let Some(number) = screen_number(screen) {
                    monitors.push(MonitorId::new(number.to_string()));
                }
            }
            Ok(monitors)
        }
    }

    fn set_fill_mode(&self) -> Result<(), BackendError> {
        unsafe { shared_workspace()? };
        self.fill.set(true);
        Ok(())
    }

    fn set_wallpaper(&self, monitor: &MonitorId, image: &Path) -> Result<(), BackendError> {
        unsafe {
            let workspace = shared_workspace()?;
            let screen = find_screen(monitor)?;

            let path = nsstring(&image.display().to_string());
            let url: *mut Object = msg_send![class("NSURL")?, fileURLWithPath: path];
            if url.is_null() {
                return Err(BackendError::SetFailed {
                    monitor: monitor.clone(),
                    reason: "failed to create URL from path".to_string(),
                });
            }

            let options = self.desktop_image_options()?;
            let mut error: *mut Object = std::ptr::null_mut();
            let success: BOOL = msg_send![
                workspace,
                setDesktopImageURL: url
                forScreen: screen
                options: options
                error: &mut error
            ];

            if success == YES {
                Ok(())
            } else {
                Err(BackendError::SetFailed { monitor: monitor.clone(), reason: error_message(error) })
            }
        }
    }
}

impl MacOsBackend {
    /// Builds the `setDesktopImageURL` options dictionary.
    unsafe fn desktop_image_options(&self) -> Result<*mut Object, BackendError> {
        let dictionary_class = class("NSMutableDictionary")?;
        let options: *mut Object = msg_send![dictionary_class, dictionary];

        if self.fill.get() {
            let scaling: *mut Object = msg_send![
                class("NSNumber")?,
                numberWithUnsignedInteger: SCALE_PROPORTIONALLY_UP_OR_DOWN
            ];
            let clipping: *mut Object = msg_send![class("NSNumber")?, numberWithBool: YES];

            unsafe {
                let _: () = msg_send![options, setObject: scaling forKey: nsstring("NSWorkspaceDesktopImageScalingKey")];
                let _: () = msg_send![options, setObject: clipping forKey: nsstring("NSWorkspaceDesktopImageAllowClippingKey")];
            }
        }

        Ok(options)
    }
}

fn class(name: &str) -> Result<&'static Class, BackendError> {
    Class::get(name).ok_or_else(|| BackendError::Unavailable(format!("{name} class not found")))
}

unsafe fn shared_workspace() -> Result<*mut Object, BackendError> {
    let workspace: *mut Object = msg_send![class("NSWorkspace")?, sharedWorkspace];
    if workspace.is_null() {
        return Err(BackendError::Unavailable("failed to get shared workspace".to_string()));
    }
    Ok(workspace)
}

unsafe fn screens() -> Result<*mut Object, BackendError> {
    let screens: *mut Object = msg_send![class("NSScreen")?, screens];
    if screens.is_null() {
        return Err(BackendError::Unavailable("failed to get screens".to_string()));
    }
    Ok(screens)
}

/// Reads `deviceDescription[NSScreenNumber]` of a screen.
unsafe fn screen_number(screen: *mut Object) -> Option<u32> {
    if screen.is_null() {
        return None;
    }

    let description: *mut Object = msg_send![screen, deviceDescription];
    if description.is_null() {
        return None;
    }

    let number: *mut Object =
        unsafe { msg_send![description, objectForKey: nsstring("NSScreenNumber")] };
    if number.is_null() {
        return None;
    }

    let value: u32 = msg_send![number, unsignedIntValue];
    Some(value)
}

unsafe fn find_screen(monitor: &MonitorId) -> Result<*mut Object, BackendError> {
    let screens = unsafe { screens()? };
    let count: usize = msg_send![screens, count];

    for index in 0..count {
        let screen: *mut Object = msg_send![screens, objectAtIndex: index];
        if unsafe { screen_number(screen) }.is_some_and(|n| n.to_string() == monitor.as_str()) {
            return Ok(screen);
        }
    }

    Err(BackendError::MonitorNotFound(monitor.clone()))
}

/// Creates an autoreleased `NSString` from a Rust string slice.
unsafe fn nsstring(s: &str) -> *mut Object {
    let Some(string_class) = Class::get("NSString") else {
        return std::ptr::null_mut();
    };

    msg_send![
        string_class,
        stringWithBytes: s.as_ptr().cast::<c_void>()
        length: s.len()
        encoding: UTF8_ENCODING
    ]
}

unsafe fn error_message(error: *mut Object) -> String {
    if error.is_null() {
        return "unknown error".to_string();
    }

    let description: *mut Object = msg_send![error, localizedDescription];
    if description.is_null() {
        return "unknown error".to_string();
    }

    let bytes: *const std::ffi::c_char = msg_send![description, UTF8String];
    if bytes.is_null() {
        return "unknown error".to_string();
    }

    unsafe { std::ffi::CStr::from_ptr(bytes) }.to_string_lossy().into_owned()
}
