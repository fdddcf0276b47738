pub mod provisioner;
pub mod uploader;

pub use provisioner::{BatchOutcome, ParentOutcome, Provisioner};
pub use uploader::ContentUploader;
