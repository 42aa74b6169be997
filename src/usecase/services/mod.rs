pub mod list_controller;
pub mod paged_resource;
