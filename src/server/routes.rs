mod get_capabilities;
mod get_columns;
mod get_health;
mod post_rows;

pub use get_capabilities::get_capabilities;
pub use get_columns::get_columns;
pub use get_health::get_health;
pub use post_rows::post_rows;
