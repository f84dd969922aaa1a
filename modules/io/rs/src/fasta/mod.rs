mod reader;
mod record;
mod writer;

pub use reader::Reader;
pub use record::Record;
pub use writer::{Writer, DEFAULT_LINE_WIDTH};
