pub mod dirs;
