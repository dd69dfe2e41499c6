//! Local media artifacts: lookup by video id and thumbnail cropping.

pub mod crop;
pub mod files;

pub use crop::{crop_to_square, square_crop_box, CropBox, CropError};
pub use files::{
    backup_name, find_audio_file, find_image_file, image_name, list_audio_files,
    list_image_files,
};
