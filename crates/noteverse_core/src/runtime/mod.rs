//! Frame pacing for the render/update cycle.

pub mod frame_loop;
