// Presentation layer: session state, loading indicator, results view and the
// interactive prompt loop.

pub mod clipboard;
pub mod dashboard;
pub mod history_view;
pub mod interactive;
pub mod loading;
pub mod session;
