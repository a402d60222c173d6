//! Attachment validation and the two conversion paths (inline encode,
//! batched upload).

pub mod encode;
pub mod pipeline;
pub mod uploader;
pub mod validator;
