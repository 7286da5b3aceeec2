//! Background image loading.
//!
//! Sources are resolved to local files and decoded on a worker thread; the
//! render loop drains finished images without blocking.

use gallery_gpu::TextureError;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum ImageSourceError {
    #[error("invalid url {0}: {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("file url {0} does not name a local path")]
    NotAFilePath(String),
    #[error("remote image {0} is not fetched")]
    Remote(String),
    #[error("unsupported url scheme {0}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Decode(#[from] TextureError),
}

/// Where an image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    File(PathBuf),
    Remote(Url),
}

impl ImageSource {
    /// Accepts plain paths, `file://` urls and `http(s)://` urls.
    pub fn parse(source: &str) -> Result<Self, ImageSourceError> {
        match Url::parse(source) {
            // Drive letters such as `C:` parse as a one-letter scheme.
            Ok(url) if url.scheme().len() == 1 => Ok(Self::File(PathBuf::from(source))),
            Ok(url) => match url.scheme() {
                "file" => url
                    .to_file_path()
                    .map(Self::File)
                    .map_err(|()| ImageSourceError::NotAFilePath(source.to_string())),
                "http" | "https" => Ok(Self::Remote(url)),
                other => Err(ImageSourceError::UnsupportedScheme(other.to_string())),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Self::File(PathBuf::from(source))),
            Err(err) => Err(ImageSourceError::InvalidUrl(source.to_string(), err)),
        }
    }

    pub fn load(&self) -> Result<image::RgbaImage, ImageSourceError> {
        match self {
            Self::File(path) => Ok(gallery_gpu::texture::decode_file(path)?),
            Self::Remote(url) => Err(ImageSourceError::Remote(url.to_string())),
        }
    }
}

/// A finished load for one frame slot.
pub struct LoadedImage {
    pub slot: usize,
    pub result: Result<image::RgbaImage, ImageSourceError>,
}

/// Decodes images on a worker thread.
pub struct ImageLoader {
    receiver: mpsc::Receiver<LoadedImage>,
    pending: usize,
}

impl ImageLoader {
    /// Start loading `(slot, source)` pairs. Decoded images larger than
    /// `max_dimension` on either side are scaled down to fit.
    pub fn spawn(sources: Vec<(usize, String)>, max_dimension: u32) -> Self {
        let (sender, receiver) = mpsc::channel();
        let pending = sources.len();
        thread::spawn(move || {
            for (slot, source) in sources {
                let result = ImageSource::parse(&source)
                    .and_then(|s| s.load())
                    .map(|image| gallery_gpu::texture::fit_to_limit(image, max_dimension));
                debug!(slot, source = %source, ok = result.is_ok(), "image load finished");
                if sender.send(LoadedImage { slot, result }).is_err() {
                    break;
                }
            }
        });
        Self { receiver, pending }
    }

    /// Images finished since the last call. Failures are logged and dropped.
    pub fn poll(&mut self) -> Vec<(usize, image::RgbaImage)> {
        let mut ready = Vec::new();
        while let Ok(loaded) = self.receiver.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            match loaded.result {
                Ok(image) => ready.push((loaded.slot, image)),
                Err(err) => warn!("Frame {} keeps its placeholder: {err}", loaded.slot),
            }
        }
        ready
    }

    pub fn pending(&self) -> usize {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn drain(loader: &mut ImageLoader) -> Vec<(usize, image::RgbaImage)> {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut ready = Vec::new();
        while loader.pending() > 0 && Instant::now() < deadline {
            ready.extend(loader.poll());
            std::thread::sleep(Duration::from_millis(5));
        }
        ready
    }

    #[test]
    fn test_parse_plain_and_file_paths() {
        assert_eq!(
            ImageSource::parse("photos/a.jpg").unwrap(),
            ImageSource::File(PathBuf::from("photos/a.jpg"))
        );
        assert_eq!(
            ImageSource::parse("/tmp/a.jpg").unwrap(),
            ImageSource::File(PathBuf::from("/tmp/a.jpg"))
        );
        #[cfg(unix)]
        assert_eq!(
            ImageSource::parse("file:///tmp/a%20b.jpg").unwrap(),
            ImageSource::File(PathBuf::from("/tmp/a b.jpg"))
        );
    }

    #[test]
    fn test_parse_remote_and_unsupported() {
        assert!(matches!(
            ImageSource::parse("https://example.com/a.jpg").unwrap(),
            ImageSource::Remote(_)
        ));
        assert!(matches!(
            ImageSource::parse("ftp://example.com/a.jpg"),
            Err(ImageSourceError::UnsupportedScheme(s)) if s == "ftp"
        ));
    }

    #[test]
    fn test_remote_load_is_refused() {
        let source = ImageSource::parse("http://example.com/a.jpg").unwrap();
        assert!(matches!(source.load(), Err(ImageSourceError::Remote(_))));
    }

    #[test]
    fn test_loader_decodes_and_reports_failures() {
        let dir = std::env::temp_dir().join(format!("gallery-loader-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("pixel.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let mut loader = ImageLoader::spawn(
            vec![
                (0, path.display().to_string()),
                (1, dir.join("missing.png").display().to_string()),
            ],
            8192,
        );

        let ready = drain(&mut loader);
        assert_eq!(loader.pending(), 0);
        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].0, 0);
        assert_eq!(ready[0].1.dimensions(), (3, 2));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_loader_shrinks_images_beyond_texture_limit() {
        let dir = std::env::temp_dir().join(format!("gallery-limit-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("wide.png");
        image::RgbaImage::from_pixel(64, 4, image::Rgba([0, 255, 0, 255]))
            .save(&path)
            .unwrap();

        let mut loader = ImageLoader::spawn(vec![(2, path.display().to_string())], 16);
        let ready = drain(&mut loader);

        assert_eq!(ready.len(), 1);
        assert_eq!(ready[0].0, 2);
        assert_eq!(ready[0].1.dimensions(), (16, 1));
        std::fs::remove_dir_all(&dir).ok();
    }
}
