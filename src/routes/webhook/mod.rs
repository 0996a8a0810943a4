mod handler;
mod model;

pub use handler::{delete_message, edit_message, execute_webhook, get_webhook};
