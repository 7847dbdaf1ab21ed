//! Lifecycle demonstration driver.
//!
//! Walks an [`OwnedHandle`] through its full lifecycle and reports each
//! step. Exits 0 on normal completion, 1 if any step misbehaves.
//!
//! Run with: cargo run --bin lifecycle_demo

use colored::Colorize;
use owned_cell::{ExhaustedAlloc, HandleError, OwnedHandle};
use std::process;

fn add(a: i32, b: i32) -> i32 {
    a + b
}

fn step(name: &str, detail: &str) {
    println!("{} {:<22} {}", "ok".green(), name.bold(), detail);
}

fn run() -> Result<(), String> {
    let mut handle = OwnedHandle::allocate().map_err(|e| e.to_string())?;
    step("allocate", "cell acquired, initial value 0");

    // A plain `fn` value, stored in a variable and invoked through it.
    let combine: fn(i32, i32) -> i32 = add;
    handle.write(combine(20, 15)).map_err(|e| e.to_string())?;
    step("write", "stored combine(20, 15)");

    let value = handle.read().map_err(|e| e.to_string())?;
    if value != 35 {
        return Err(format!("read returned {value}, expected 35"));
    }
    step("read", "value is 35");

    let bumped = handle.update(|v| v + 7).map_err(|e| e.to_string())?;
    if bumped != 42 {
        return Err(format!("update returned {bumped}, expected 42"));
    }
    step("update", "value bumped to 42");

    handle.release();
    if handle.is_present() {
        return Err("handle still present after release".into());
    }
    step("release", "cell freed, handle now absent");

    match handle.read() {
        Err(HandleError::UseAfterRelease { op }) => {
            step("read after release", &format!("`{op}` rejected as expected"));
        }
        Err(other) => return Err(format!("unexpected error: {other}")),
        Ok(v) => return Err(format!("read a value ({v}) from a released handle")),
    }

    handle.release();
    step("release again", "no-op, no double-free");

    match OwnedHandle::allocate_in(ExhaustedAlloc) {
        Err(HandleError::Allocation) => {
            step("exhausted allocate", "allocation failure surfaced, no handle produced");
        }
        Err(other) => return Err(format!("unexpected error: {other}")),
        Ok(_) => return Err("exhausted allocator produced a handle".into()),
    }

    Ok(())
}

fn main() {
    if let Err(msg) = run() {
        eprintln!("{} {}", "FAIL".bold().red(), msg);
        process::exit(1);
    }
    println!("{}", "lifecycle demo completed".green());
}
