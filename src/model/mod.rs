pub mod filebrowser;
