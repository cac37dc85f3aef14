//! Logs every global keyboard and mouse event.
//!
//! Run with: cargo run --example logger
//!
//! Events arrive even while another window has focus. Press Ctrl+C to exit.

#[cfg(target_os = "windows")]
fn main() {
    use keybridge::{GlobalInput, KeyboardEvent, MouseEvent};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    println!("keybridge logger example");
    println!("Press Ctrl+C to exit\n");

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || flag.store(false, Ordering::SeqCst))
        .expect("Error setting Ctrl+C handler");

    let mut input = GlobalInput::native();
    input.subscribe_keyboard(|event: &mut KeyboardEvent| {
        if event.is_key_down {
            println!(
                "[KeyDown] {:?} modifiers: {:?}",
                event.key, event.modifiers
            );
        } else {
            println!("[KeyUp] {:?}", event.key);
        }
    });
    input.subscribe_mouse(|event: &mut MouseEvent| {
        if event.is_move {
            println!("[MouseMove] ({}, {})", event.x, event.y);
        } else if event.is_wheel {
            println!(
                "[MouseWheel] {} at ({}, {})",
                event.wheel_delta, event.x, event.y
            );
        } else if event.is_mouse_down {
            println!("[MouseDown] {:?} at ({}, {})", event.button, event.x, event.y);
        } else {
            println!("[MouseUp] {:?} at ({}, {})", event.button, event.x, event.y);
        }
    });

    if let Err(e) = input.start() {
        eprintln!("Error: {}", e);
        return;
    }

    // Stand-in for a host's per-frame update.
    while running.load(Ordering::SeqCst) {
        input.update();
        std::thread::sleep(Duration::from_millis(16));
    }

    if let Err(e) = input.stop() {
        eprintln!("Error: {}", e);
    }
    println!("Stopped.");
}

#[cfg(not(target_os = "windows"))]
fn main() {
    eprintln!("the logger example needs Windows low-level hooks");
}
