//! Custom Bevy plugins

pub mod typeface;

pub use typeface::{TypefaceFont, TypefacePlugin};
