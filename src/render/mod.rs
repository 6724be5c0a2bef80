// 模板渲染模块

mod renderer;
mod resolver;

pub use renderer::{RenderOptions, Renderer, View};
pub use resolver::{PathResolver, RenderData};
