use std::f64::consts::{FRAC_PI_2, PI};
use std::fs;
use std::path::{Path, PathBuf};

use gtk4::gdk;
use gtk4::gdk::prelude::GdkCairoContextExt;
use gtk4::gdk_pixbuf::{InterpType, Pixbuf};
use gtk4::glib;
use gtk4::prelude::*;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AssetError;
use crate::game::board::{PAIR_COUNT, TileValue};

pub const MANIFEST_FILE_NAME: &str = "manifest.json";
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[cfg(target_endian = "little")]
const CAIRO_ARGB32_FORMAT: gdk::MemoryFormat = gdk::MemoryFormat::B8g8r8a8Premultiplied;
#[cfg(target_endian = "big")]
const CAIRO_ARGB32_FORMAT: gdk::MemoryFormat = gdk::MemoryFormat::A8r8g8b8Premultiplied;

pub fn is_image_file_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

#[derive(Deserialize)]
struct ManifestFile {
    back: Option<String>,
    faces: Vec<String>,
}

/// Which file backs each face value, plus the face-down art.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetManifest {
    pub back: PathBuf,
    pub faces: Vec<PathBuf>,
}

impl AssetManifest {
    /// A `manifest.json` in `dir` is authoritative; without one the folder is
    /// listed, sorted by name, and the first twelve images are used.
    pub fn discover(dir: &Path, back_name: &str) -> Result<Self, AssetError> {
        if !dir.is_dir() {
            return Err(AssetError::MissingDirectory(dir.to_path_buf()));
        }

        let manifest_path = dir.join(MANIFEST_FILE_NAME);
        let manifest = if manifest_path.is_file() {
            Self::from_manifest_file(dir, &manifest_path, back_name)?
        } else {
            Self::from_listing(dir, back_name)?
        };

        if !manifest.back.is_file() {
            return Err(AssetError::MissingBackImage(manifest.back));
        }
        info!(
            dir = %dir.display(),
            faces = manifest.faces.len(),
            "card images resolved"
        );
        Ok(manifest)
    }

    fn from_listing(dir: &Path, back_name: &str) -> Result<Self, AssetError> {
        let entries = fs::read_dir(dir).map_err(|source| AssetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_image_file_name(name) && name != back_name)
            .collect();
        names.sort();

        if names.len() < PAIR_COUNT {
            return Err(AssetError::NotEnoughImages {
                found: names.len(),
                required: PAIR_COUNT,
            });
        }
        if names.len() > PAIR_COUNT {
            debug!(
                skipped = names.len() - PAIR_COUNT,
                "more images than pairs, using the first ones by name"
            );
        }

        Ok(AssetManifest {
            back: dir.join(back_name),
            faces: names
                .into_iter()
                .take(PAIR_COUNT)
                .map(|name| dir.join(name))
                .collect(),
        })
    }

    fn from_manifest_file(dir: &Path, path: &Path, back_name: &str) -> Result<Self, AssetError> {
        let raw = fs::read_to_string(path).map_err(|source| AssetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ManifestFile = serde_json::from_str(&raw).map_err(|err| AssetError::Manifest {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        if file.faces.len() < PAIR_COUNT {
            return Err(AssetError::NotEnoughImages {
                found: file.faces.len(),
                required: PAIR_COUNT,
            });
        }

        let mut faces: Vec<PathBuf> = Vec::with_capacity(file.faces.len());
        for name in &file.faces {
            let face = dir.join(name);
            if !face.is_file() {
                return Err(AssetError::Manifest {
                    path: path.to_path_buf(),
                    reason: format!("listed image {} does not exist", face.display()),
                });
            }
            if faces.contains(&face) {
                return Err(AssetError::Manifest {
                    path: path.to_path_buf(),
                    reason: format!("image {} is listed twice", face.display()),
                });
            }
            faces.push(face);
        }
        faces.truncate(PAIR_COUNT);

        Ok(AssetManifest {
            back: dir.join(file.back.as_deref().unwrap_or(back_name)),
            faces,
        })
    }
}

/// Decoded, resized and rounded textures, ready to hand to widgets.
#[derive(Clone, Debug)]
pub struct CardArt {
    faces: Vec<gdk::Texture>,
    back: gdk::Texture,
    size: i32,
}

impl CardArt {
    pub fn load(
        manifest: &AssetManifest,
        size: i32,
        corner_radius: i32,
    ) -> Result<Self, AssetError> {
        let back = load_card_texture(&manifest.back, size, corner_radius)?;
        let faces = manifest
            .faces
            .iter()
            .map(|path| load_card_texture(path, size, corner_radius))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CardArt { faces, back, size })
    }

    pub fn face(&self, value: TileValue) -> &gdk::Texture {
        self.faces.get(value as usize).unwrap_or(&self.back)
    }

    pub fn back(&self) -> &gdk::Texture {
        &self.back
    }

    pub fn size(&self) -> i32 {
        self.size
    }
}

fn load_card_texture(
    path: &Path,
    size: i32,
    corner_radius: i32,
) -> Result<gdk::Texture, AssetError> {
    let source = Pixbuf::from_file(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let scaled = source
        .scale_simple(size, size, InterpType::Hyper)
        .ok_or_else(|| AssetError::Render {
            path: path.to_path_buf(),
            reason: "out of memory while resizing".to_string(),
        })?;
    round_corners(&scaled, corner_radius).map_err(|reason| AssetError::Render {
        path: path.to_path_buf(),
        reason,
    })
}

fn rounded_rect_path(cr: &cairo::Context, width: f64, height: f64, radius: f64) {
    let r = radius.min(width / 2.0).min(height / 2.0).max(0.0);
    cr.new_sub_path();
    cr.arc(width - r, r, r, -FRAC_PI_2, 0.0);
    cr.arc(width - r, height - r, r, 0.0, FRAC_PI_2);
    cr.arc(r, height - r, r, FRAC_PI_2, PI);
    cr.arc(r, r, r, PI, 3.0 * FRAC_PI_2);
    cr.close_path();
}

/// Paints the pixbuf through a rounded-rectangle mask; everything outside the
/// corners ends up fully transparent.
fn round_corners(pixbuf: &Pixbuf, radius: i32) -> Result<gdk::Texture, String> {
    let width = pixbuf.width();
    let height = pixbuf.height();
    let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)
        .map_err(|err| err.to_string())?;
    {
        let cr = cairo::Context::new(&surface).map_err(|err| err.to_string())?;
        cr.set_antialias(cairo::Antialias::Best);
        rounded_rect_path(&cr, width as f64, height as f64, radius as f64);
        cr.clip();
        cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
        cr.paint().map_err(|err| err.to_string())?;
    }
    surface.flush();

    let stride = surface.stride() as usize;
    let data = surface.data().map_err(|err| err.to_string())?;
    let bytes = glib::Bytes::from(&*data);
    let texture = gdk::MemoryTexture::new(width, height, CAIRO_ARGB32_FORMAT, &bytes, stride);
    Ok(texture.upcast())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtk4::gdk_pixbuf::Colorspace;
    use temp_dir::TempDir;

    fn write_png(dir: &Path, name: &str, rgba: u32) -> PathBuf {
        let path = dir.join(name);
        let pixbuf = Pixbuf::new(Colorspace::Rgb, false, 8, 40, 30).unwrap();
        pixbuf.fill(rgba);
        pixbuf.savev(&path, "png", &[]).unwrap();
        path
    }

    fn alpha_at(texture: &gdk::Texture, x: usize, y: usize) -> u8 {
        let width = texture.width() as usize;
        let height = texture.height() as usize;
        let stride = width * 4;
        let mut data = vec![0u8; stride * height];
        texture.download(&mut data, stride);
        let offset = y * stride + x * 4;
        let pixel = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        (pixel >> 24) as u8
    }

    #[test]
    fn card_texture_is_square_with_transparent_corners() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "red.png", 0xff0000ff);

        let texture = load_card_texture(&path, 64, 16).unwrap();
        assert_eq!(texture.width(), 64);
        assert_eq!(texture.height(), 64);
        assert_eq!(alpha_at(&texture, 0, 0), 0);
        assert_eq!(alpha_at(&texture, 63, 63), 0);
        assert_eq!(alpha_at(&texture, 32, 32), 255);
        assert_eq!(alpha_at(&texture, 32, 0), 255);
    }

    #[test]
    fn zero_radius_keeps_square_corners() {
        let dir = TempDir::new().unwrap();
        let path = write_png(dir.path(), "blue.png", 0x0000ffff);

        let texture = load_card_texture(&path, 48, 0).unwrap();
        assert_eq!(alpha_at(&texture, 0, 0), 255);
    }

    #[test]
    fn undecodable_image_is_a_decode_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = load_card_texture(&path, 64, 8).unwrap_err();
        assert!(matches!(
            err,
            AssetError::Decode { path: ref failed, .. } if *failed == path
        ));
    }

    #[test]
    fn card_art_loads_every_face_and_the_back() {
        let dir = TempDir::new().unwrap();
        let faces = (0..PAIR_COUNT)
            .map(|i| write_png(dir.path(), &format!("face{i:02}.png"), 0x00ff00ff))
            .collect();
        let back = write_png(dir.path(), "back.png", 0x202020ff);
        let manifest = AssetManifest { back, faces };

        let art = CardArt::load(&manifest, 56, 10).unwrap();
        assert_eq!(art.size(), 56);
        for value in 0..PAIR_COUNT as TileValue {
            assert_eq!(art.face(value).width(), 56);
        }
        assert_eq!(art.back().height(), 56);
    }

    #[test]
    fn card_art_stops_at_the_first_broken_face() {
        let dir = TempDir::new().unwrap();
        let mut faces: Vec<PathBuf> = (0..PAIR_COUNT - 1)
            .map(|i| write_png(dir.path(), &format!("face{i:02}.png"), 0x00ff00ff))
            .collect();
        let broken = dir.path().join("face11.png");
        fs::write(&broken, b"junk").unwrap();
        faces.push(broken);
        let back = write_png(dir.path(), "back.png", 0x202020ff);

        let err = CardArt::load(&AssetManifest { back, faces }, 56, 10).unwrap_err();
        assert!(matches!(err, AssetError::Decode { .. }));
    }

    #[test]
    fn image_extensions_are_case_insensitive() {
        assert!(is_image_file_name("cat.JPG"));
        assert!(is_image_file_name("dog.jpeg"));
        assert!(is_image_file_name("owl.Png"));
        assert!(!is_image_file_name("notes.txt"));
        assert!(!is_image_file_name("png"));
        assert!(!is_image_file_name("archive.png.zip"));
    }
}
