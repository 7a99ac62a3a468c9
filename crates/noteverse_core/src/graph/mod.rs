//! Derived relations between positioned notes.

pub mod proximity;
