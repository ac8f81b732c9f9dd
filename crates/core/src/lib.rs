//! Timelapse image tooling: encode a folder of JPEG frames into a video, or
//! split a folder of shots into time-based groups with a CSV manifest.

pub mod encoding {
    pub mod frame_layout;
}

pub mod grouping {
    pub mod domain {
        pub mod file_copier;
        pub mod file_record;
        pub mod group_error;
        pub mod manifest_writer;
        pub mod temporal_grouper;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod encode_frames_use_case;
    pub mod frame_preparer;
    pub mod group_files_use_case;
    pub mod infrastructure {
        pub mod threaded_frame_preparer;
    }
    pub mod pipeline_logger;
}

pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod image_listing;
    pub mod video_metadata;
}

pub mod video {
    pub mod domain {
        pub mod frame_scaler;
        pub mod image_reader;
        pub mod video_writer;
    }
    pub mod infrastructure;
}
