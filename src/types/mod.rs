//! Data types: the wire envelope and the render model mapped from it.

mod envelope;
mod ui;
mod value;

pub use envelope::*;
pub use ui::*;
pub use value::*;
