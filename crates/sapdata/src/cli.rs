mod app;
mod table;

pub use app::App;
