/// Live preview rendering.
pub mod renderer;
