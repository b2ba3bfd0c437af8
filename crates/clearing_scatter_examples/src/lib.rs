#![forbid(unsafe_code)]

mod rendering;

pub use rendering::{
    init_tracing, print_pass_summary, render_pass_to_png, PrototypeStyle, RenderConfig,
};
