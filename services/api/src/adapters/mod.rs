pub mod db;
pub mod image_host;

pub use db::DbAdapter;
pub use image_host::CloudinaryAdapter;
