//! Native window dressing for the popup.
//!
//! All AppKit calls MUST run on the main thread; we dispatch through Tauri's
//! run_on_main_thread and pass the NSWindow pointer as usize so the closure
//! stays Send. Failures here are cosmetic, so they are logged and swallowed:
//! the popup works without blur or rounded corners.

#[cfg(target_os = "macos")]
use cocoa::base::{id, nil, NO, YES};
#[cfg(target_os = "macos")]
use objc::{class, msg_send, sel, sel_impl};

#[cfg(target_os = "macos")]
const CORNER_RADIUS: f64 = 12.0;

// NSVisualEffectBlendingModeBehindWindow
#[cfg(target_os = "macos")]
const BLENDING_MODE_BEHIND_WINDOW: i64 = 0;

// NSVisualEffectMaterialHUDWindow
#[cfg(target_os = "macos")]
const MATERIAL_HUD_WINDOW: i64 = 13;

// NSVisualEffectStateActive
#[cfg(target_os = "macos")]
const STATE_ACTIVE: i64 = 1;

// NSViewWidthSizable | NSViewHeightSizable
#[cfg(target_os = "macos")]
const AUTORESIZE_WIDTH_HEIGHT: u64 = 18;

// NSWindowBelow
#[cfg(target_os = "macos")]
const WINDOW_BELOW: i64 = -1;

/// Set the whole-window opacity. Drives the fade-in animation.
#[cfg(target_os = "macos")]
pub fn set_window_opacity(window: &tauri::WebviewWindow, opacity: f64) {
    let ns_window_usize = match window.ns_window() {
        Ok(ptr) => ptr as usize,
        Err(e) => {
            eprintln!("[Effects] Failed to get NSWindow: {}", e);
            return;
        }
    };

    let dispatched = window.run_on_main_thread(move || unsafe {
        let ns_window = ns_window_usize as id;
        let _: () = msg_send![ns_window, setAlphaValue: opacity];
    });
    if let Err(e) = dispatched {
        eprintln!("[Effects] Failed to set window opacity: {}", e);
    }
}

#[cfg(not(target_os = "macos"))]
pub fn set_window_opacity(_window: &tauri::WebviewWindow, _opacity: f64) {}

/// Install a behind-window blur layer under the webview content.
/// Call once, right after the window is built and while it is still hidden.
#[cfg(target_os = "macos")]
pub fn apply_background_blur(window: &tauri::WebviewWindow) {
    let ns_window_usize = match window.ns_window() {
        Ok(ptr) => ptr as usize,
        Err(e) => {
            eprintln!("[Effects] Failed to get NSWindow: {}", e);
            return;
        }
    };

    let dispatched = window.run_on_main_thread(move || unsafe {
        let ns_window = ns_window_usize as id;
        let content_view: id = msg_send![ns_window, contentView];
        if content_view == nil {
            eprintln!("[Effects] No content view for blur");
            return;
        }

        let effect_view: id = msg_send![class!(NSVisualEffectView), alloc];
        let effect_view: id = msg_send![effect_view, init];
        let _: () = msg_send![effect_view, setBlendingMode: BLENDING_MODE_BEHIND_WINDOW];
        let _: () = msg_send![effect_view, setMaterial: MATERIAL_HUD_WINDOW];
        let _: () = msg_send![effect_view, setState: STATE_ACTIVE];

        let bounds: cocoa::foundation::NSRect = msg_send![content_view, bounds];
        let _: () = msg_send![effect_view, setFrame: bounds];
        let _: () = msg_send![effect_view, setAutoresizingMask: AUTORESIZE_WIDTH_HEIGHT];

        // Below the webview, above the window background.
        let _: () =
            msg_send![content_view, addSubview: effect_view positioned: WINDOW_BELOW relativeTo: nil];
        let _: () = msg_send![ns_window, setOpaque: NO];
    });
    if let Err(e) = dispatched {
        eprintln!("[Effects] Failed to apply background blur: {}", e);
    }
}

#[cfg(not(target_os = "macos"))]
pub fn apply_background_blur(_window: &tauri::WebviewWindow) {}

/// Round the window corners. Needs a layer-backed content view.
#[cfg(target_os = "macos")]
pub fn apply_rounded_corners(window: &tauri::WebviewWindow) {
    let ns_window_usize = match window.ns_window() {
        Ok(ptr) => ptr as usize,
        Err(e) => {
            eprintln!("[Effects] Failed to get NSWindow: {}", e);
            return;
        }
    };

    let dispatched = window.run_on_main_thread(move || unsafe {
        let ns_window = ns_window_usize as id;
        let content_view: id = msg_send![ns_window, contentView];
        if content_view == nil {
            return;
        }

        let _: () = msg_send![content_view, setWantsLayer: YES];
        let layer: id = msg_send![content_view, layer];
        if layer != nil {
            let _: () = msg_send![layer, setCornerRadius: CORNER_RADIUS];
            let _: () = msg_send![layer, setMasksToBounds: YES];
        }
    });
    if let Err(e) = dispatched {
        eprintln!("[Effects] Failed to apply rounded corners: {}", e);
    }
}

#[cfg(not(target_os = "macos"))]
pub fn apply_rounded_corners(_window: &tauri::WebviewWindow) {}

/// Bring the popup to the foreground and make it key, even when another app
/// is active. Tauri's set_focus alone is not reliable for a hidden accessory
/// window, so this orders the window front and activates the app directly.
#[cfg(target_os = "macos")]
pub fn force_foreground(window: &tauri::WebviewWindow) {
    let ns_window_usize = match window.ns_window() {
        Ok(ptr) => ptr as usize,
        Err(e) => {
            eprintln!("[Effects] Failed to get NSWindow: {}", e);
            return;
        }
    };

    let dispatched = window.run_on_main_thread(move || unsafe {
        let ns_window = ns_window_usize as id;
        let _: () = msg_send![ns_window, orderFrontRegardless];

        let ns_app: id = msg_send![class!(NSApplication), sharedApplication];
        let _: () = msg_send![ns_app, activateIgnoringOtherApps: YES];

        let _: () = msg_send![ns_window, makeKeyAndOrderFront: nil];
    });
    if let Err(e) = dispatched {
        eprintln!("[Effects] Failed to bring window to foreground: {}", e);
    }
}

#[cfg(not(target_os = "macos"))]
pub fn force_foreground(window: &tauri::WebviewWindow) {
    if let Err(e) = window.set_focus() {
        eprintln!("[Effects] Failed to focus window: {}", e);
    }
}
