mod app;
mod args;

pub use app::App;
pub use args::Cli;
