//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] session entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod session;

pub use landmarks::{
    decode_frame,
    decode_frame_lossy,
    // Constants
    PERSON_STRIDE,
};

pub use session::RepSession;
