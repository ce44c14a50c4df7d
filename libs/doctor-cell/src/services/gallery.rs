use serde::Serialize;

use crate::models::Doctor;

/// Order reported for the primary photo, which is always placed first.
pub const PRIMARY_ORDER: i32 = -1;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GalleryPhoto {
    pub url: String,
    pub order: i32,
    pub is_primary: bool,
}

/// A doctor's photos, primary first, then the rest by `order`. Navigation
/// wraps at both ends.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoGallery {
    photos: Vec<GalleryPhoto>,
}

impl PhotoGallery {
    pub fn from_doctor(doctor: &Doctor) -> Self {
        let primary = doctor
            .photo_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| GalleryPhoto {
                url: url.to_string(),
                order: PRIMARY_ORDER,
                is_primary: true,
            });

        let mut others: Vec<GalleryPhoto> = doctor
            .photos
            .iter()
            .map(|photo| GalleryPhoto {
                url: photo.photo_url.clone(),
                order: photo.order,
                is_primary: false,
            })
            .collect();
        others.sort_by_key(|photo| photo.order);

        let mut photos: Vec<GalleryPhoto> = primary.into_iter().collect();
        photos.extend(others);

        Self { photos }
    }

    pub fn photos(&self) -> &[GalleryPhoto] {
        &self.photos
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn next(&self, index: usize) -> usize {
        if self.photos.is_empty() {
            return 0;
        }
        let len = self.photos.len();
        (index % len + 1) % len
    }

    pub fn prev(&self, index: usize) -> usize {
        if self.photos.is_empty() {
            return 0;
        }
        let len = self.photos.len();
        (index % len + len - 1) % len
    }

    /// Out-of-range indexes fall back to the first (primary) photo.
    pub fn photo_at(&self, index: usize) -> Option<&GalleryPhoto> {
        self.photos.get(index).or_else(|| self.photos.first())
    }

    pub fn into_photos(self) -> Vec<GalleryPhoto> {
        self.photos
    }
}
