//! Browser bindings (wasm32 only): localStorage persistence and the
//! requestAnimationFrame/timer driver for the shuffle animation.

pub mod animation;
pub mod storage;
