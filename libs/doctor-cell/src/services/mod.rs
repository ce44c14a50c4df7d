pub mod detail;
pub mod doctor;
pub mod gallery;

pub use detail::DoctorDetailView;
pub use doctor::DoctorService;
pub use gallery::{GalleryPhoto, PhotoGallery};
