pub mod conversion_job;
pub mod converted_file;
pub mod input_source;
pub mod replace;
pub mod subtitle_finder;
pub mod subtitle_text;
pub mod target_encoding;
