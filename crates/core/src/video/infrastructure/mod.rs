pub mod ffmpeg_writer;
pub mod image_file_reader;
pub mod image_scaler;
