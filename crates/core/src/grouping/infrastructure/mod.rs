pub mod csv_manifest_writer;
pub mod fs_file_copier;
