pub mod filebrowser;
pub mod snyk;
