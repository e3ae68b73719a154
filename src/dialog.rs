use std::path::PathBuf;

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Everything the decoder accepts, for the aggregate filter.
const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "jpe", "jif", "jfif", "gif", "bmp", "webp", "qoi", "tif", "tiff", "ico",
    "cur", "pnm", "pbm", "pgm", "ppm", "tga",
];

/// Show the native open dialog, multi-select. Returns an empty list when the
/// user cancels (or the dialog backend is unavailable); a cancelled pick is
/// not an error, there is just nothing to open.
pub fn pick_images() -> Vec<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Select an image to view")
        .add_filter("All images", IMAGE_EXTENSIONS)
        .add_filter("Portable Network Graphics", &["png"])
        .add_filter("JPEG", &["jpg", "jpeg", "jpe", "jif", "jfif"])
        .add_filter("Graphics Interchange Format", &["gif"])
        .add_filter("Bitmap", &["bmp"])
        .add_filter("WebP", &["webp"])
        .add_filter("Quite OK Image Format", &["qoi"])
        .add_filter("Tagged Image File Format", &["tif", "tiff"])
        .add_filter("Icon", &["ico", "cur"])
        .add_filter("Portable Anymap", &["pnm", "pbm", "pgm", "ppm"])
        .add_filter("Truevision TGA", &["tga"])
        .pick_files()
        .unwrap_or_default()
}
