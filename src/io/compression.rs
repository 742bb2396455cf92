//! Transparent compression for input and output files.
//!
//! The codec is picked from the file name (`.gz`, `.zst`, `.bz2`, `.xz`). When
//! reading, a file whose name says nothing is also sniffed for a known magic
//! number, so a gzip stream saved as `data.csv` still decodes. Each codec sits
//! behind its own `compression-*` feature; with none enabled both helpers are
//! plain buffered pass-throughs.

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Compression formats known to the I/O helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Codec {
    Gzip,
    Zstd,
    Bzip2,
    Xz,
}

impl Codec {
    /// Codecs compiled into this build, in detection order.
    #[must_use]
    pub fn enabled() -> Vec<Self> {
        vec![
            #[cfg(feature = "compression-gzip")]
            Self::Gzip,
            #[cfg(feature = "compression-zstd")]
            Self::Zstd,
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2,
            #[cfg(feature = "compression-xz")]
            Self::Xz,
        ]
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
        }
    }

    const fn extensions(self) -> &'static [&'static str] {
        match self {
            Self::Gzip => &[".gz", ".gzip"],
            Self::Zstd => &[".zst", ".zstd"],
            Self::Bzip2 => &[".bz2", ".bzip2"],
            Self::Xz => &[".xz"],
        }
    }

    const fn magic(self) -> &'static [u8] {
        match self {
            Self::Gzip => &[0x1f, 0x8b],
            Self::Zstd => &[0x28, 0xb5, 0x2f, 0xfd],
            Self::Bzip2 => &[0x42, 0x5a, 0x68],
            Self::Xz => &[0xfd, 0x37, 0x7a, 0x58, 0x5a, 0x00],
        }
    }

    /// Match the end of `path` against the enabled codecs (case-insensitive).
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let name = path.as_ref().to_string_lossy().to_lowercase();
        Self::enabled()
            .into_iter()
            .find(|c| c.extensions().iter().any(|ext| name.ends_with(ext)))
    }

    fn from_magic(head: &[u8]) -> Option<Self> {
        Self::enabled()
            .into_iter()
            .find(|c| head.starts_with(c.magic()))
    }

    #[allow(unused_variables, unreachable_code)]
    fn decoder(self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        match self {
            #[cfg(feature = "compression-gzip")]
            Self::Gzip => Ok(Box::new(flate2::read::MultiGzDecoder::new(reader))),
            #[cfg(feature = "compression-zstd")]
            Self::Zstd => Ok(Box::new(zstd::stream::read::Decoder::new(reader)?)),
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2 => Ok(Box::new(bzip2::read::MultiBzDecoder::new(reader))),
            #[cfg(feature = "compression-xz")]
            Self::Xz => Ok(Box::new(xz2::read::XzDecoder::new_multi_decoder(reader))),
            #[allow(unreachable_patterns)]
            other => Err(std::io::Error::other(format!(
                "{} support not compiled in",
                other.name()
            ))),
        }
    }

    #[allow(unused_variables, unreachable_code)]
    fn encoder(self, writer: Box<dyn Write>) -> std::io::Result<Box<dyn Write>> {
        match self {
            #[cfg(feature = "compression-gzip")]
            Self::Gzip => Ok(Box::new(flate2::write::GzEncoder::new(
                writer,
                flate2::Compression::default(),
            ))),
            #[cfg(feature = "compression-zstd")]
            Self::Zstd => Ok(Box::new(
                zstd::stream::write::Encoder::new(writer, 3)?.auto_finish(),
            )),
            #[cfg(feature = "compression-bzip2")]
            Self::Bzip2 => Ok(Box::new(bzip2::write::BzEncoder::new(
                writer,
                bzip2::Compression::default(),
            ))),
            #[cfg(feature = "compression-xz")]
            Self::Xz => Ok(Box::new(xz2::write::XzEncoder::new(writer, 6))),
            #[allow(unreachable_patterns)]
            other => Err(std::io::Error::other(format!(
                "{} support not compiled in",
                other.name()
            ))),
        }
    }
}

/// Wrap `reader` with a decoder chosen from `path_hint`, or from the first
/// bytes of the stream when the name is not conclusive.
///
/// # Errors
/// If the decoder cannot be constructed.
pub fn auto_detect_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read>> {
    if let Some(codec) = Codec::from_path(&path_hint) {
        return codec
            .decoder(Box::new(BufReader::new(reader)))
            .with_context(|| format!("wrap reader with {} codec", codec.name()));
    }

    let mut buffered = BufReader::new(reader);
    let head = buffered.fill_buf().context("peek input header")?;
    if let Some(codec) = Codec::from_magic(head) {
        return codec
            .decoder(Box::new(buffered))
            .with_context(|| format!("wrap reader with {} codec", codec.name()));
    }
    Ok(Box::new(buffered))
}

/// Wrap `writer` with an encoder chosen from `path_hint`; otherwise buffer it.
///
/// # Errors
/// If the encoder cannot be constructed.
pub fn auto_detect_writer<W: Write + 'static>(
    writer: W,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Write>> {
    let buffered: Box<dyn Write> = Box::new(BufWriter::new(writer));
    match Codec::from_path(&path_hint) {
        Some(codec) => codec
            .encoder(buffered)
            .with_context(|| format!("wrap writer with {} codec", codec.name())),
        None => Ok(buffered),
    }
}
