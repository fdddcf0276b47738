pub mod batch;
pub mod types;

pub use batch::{BatchItem, BatchPart};
pub use types::{
    ApiErrorBody, Content, CreateProjectRequest, FileType, Project, ScriptFile,
    UpdateContentRequest,
};
