/// Email composition: filename repair, attachments, bodies and MIME assembly
pub mod attachment;
pub mod composer;
pub mod filename;
pub mod html;

pub use attachment::AttachmentAssembler;
pub use composer::MessageComposer;
pub use filename::FilenameNormalizer;
pub use html::text_to_html;
