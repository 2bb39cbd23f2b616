use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
    path::Path,
};

use image::{ImageError, ImageReader};

#[derive(Debug)]
pub enum TextureLoadError {
    Io(io::Error),
    Image(ImageError),
}

impl Display for TextureLoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            TextureLoadError::Io(err) => Display::fmt(&err, f),
            TextureLoadError::Image(err) => Display::fmt(&err, f),
        }
    }
}

impl Error for TextureLoadError {}

impl From<io::Error> for TextureLoadError {
    fn from(value: io::Error) -> Self {
        TextureLoadError::Io(value)
    }
}

impl From<ImageError> for TextureLoadError {
    fn from(value: ImageError) -> Self {
        TextureLoadError::Image(value)
    }
}

/// Decoded RGBA8 pixels, bottom row first.
#[derive(Debug, Clone)]
pub struct TextureAsset {
    pub id: String,
    pub size: (u32, u32),
    pub data: Vec<u8>,
}

pub const PLACEHOLDER_SIZE: u32 = 8;

impl TextureAsset {
    pub fn load(path: &Path) -> Result<Self, TextureLoadError> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        // Texture coordinates start at the bottom-left corner.
        let image = image.flipv().into_rgba8();
        Ok(Self {
            id: path.to_string_lossy().to_string(),
            size: image.dimensions(),
            data: image.into_raw(),
        })
    }

    /// A two-tone checkerboard used when an image cannot be read.
    pub fn placeholder(id: impl Into<String>, dark: [u8; 4], light: [u8; 4]) -> Self {
        let data = (0..PLACEHOLDER_SIZE)
            .flat_map(|y| (0..PLACEHOLDER_SIZE).map(move |x| (x + y) % 2 == 0))
            .flat_map(|is_dark| if is_dark { dark } else { light })
            .collect();
        Self {
            id: id.into(),
            size: (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE),
            data,
        }
    }
}

#[cfg(test)]
mod test {
    use std::{env, fs, path::Path};

    use image::{Rgba, RgbaImage};

    use super::{TextureAsset, TextureLoadError, PLACEHOLDER_SIZE};

    #[test]
    fn test_placeholder_layout() {
        let dark = [10, 20, 30, 255];
        let light = [200, 210, 220, 255];
        let texture = TextureAsset::placeholder("missing", dark, light);
        assert_eq!(texture.size, (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE));
        assert_eq!(
            texture.data.len(),
            (PLACEHOLDER_SIZE * PLACEHOLDER_SIZE * 4) as usize
        );
        assert_eq!(&texture.data[0..4], &dark);
        assert_eq!(&texture.data[4..8], &light);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = TextureAsset::load(Path::new("this/file/does/not/exist.png"));
        assert!(matches!(result, Err(TextureLoadError::Io(_))));
    }

    #[test]
    fn test_load_flips_rows() {
        let dir = env::temp_dir().join("transform-playground-texture-test");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("two_rows.png");

        let mut image = RgbaImage::new(1, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        image.save(&path).unwrap();

        let texture = TextureAsset::load(&path).unwrap();
        assert_eq!(texture.size, (1, 2));
        assert_eq!(texture.data, vec![0, 0, 255, 255, 255, 0, 0, 255]);

        fs::remove_file(&path).unwrap();
    }
}
