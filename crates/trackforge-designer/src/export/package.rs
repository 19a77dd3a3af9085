//! Export packaging
//!
//! Groups the named solids of a build by part name, encodes one STL per
//! distinct name and records how many copies of each part to print.

use std::collections::BTreeMap;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use trackforge_core::ExportError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::mesh::TriangleMesh;
use crate::layers::{NamedSolid, PartName};

pub const MANIFEST_FILE_NAME: &str = "manifest.txt";

/// One encoded part
#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub part: PartName,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    pub fn file_name(&self) -> String {
        format!("{}.stl", self.part)
    }
}

/// A layer that produced no part, with the reason
#[derive(Debug, Clone, PartialEq)]
pub struct MissingLayer {
    pub layer: String,
    pub reason: String,
}

/// Encoded parts plus print counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportPackage {
    pub files: Vec<ExportFile>,
    pub counts: BTreeMap<PartName, usize>,
    pub missing: Vec<MissingLayer>,
}

impl ExportPackage {
    pub fn count(&self, part: PartName) -> usize {
        self.counts.get(&part).copied().unwrap_or(0)
    }

    pub fn file(&self, part: PartName) -> Option<&ExportFile> {
        self.files.iter().find(|f| f.part == part)
    }

    /// Note a layer whose build failed; it is listed at the end of the manifest
    pub fn record_missing(&mut self, layer: impl Into<String>, reason: impl Into<String>) {
        self.missing.push(MissingLayer {
            layer: layer.into(),
            reason: reason.into(),
        });
    }

    pub fn is_partial(&self) -> bool {
        !self.missing.is_empty()
    }

    /// One line per part: `<name>.stl: print <N> time(s)`, then one
    /// `<layer>: not produced (<reason>)` line per failed layer
    pub fn manifest(&self) -> String {
        let parts = self
            .files
            .iter()
            .map(|f| format!("{}: print {} time(s)\n", f.file_name(), self.count(f.part)));
        let missing = self
            .missing
            .iter()
            .map(|m| format!("{}: not produced ({})\n", m.layer, m.reason));
        parts.chain(missing).collect()
    }

    /// Write every part (and optionally the manifest) into a zip archive
    pub fn write_zip<W: Write + Seek>(
        &self,
        writer: W,
        include_manifest: bool,
    ) -> Result<W, ExportError> {
        let archive = |e: zip::result::ZipError| ExportError::Archive(e.to_string());
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        let mut zip = ZipWriter::new(writer);

        for file in &self.files {
            zip.start_file(file.file_name(), options).map_err(archive)?;
            zip.write_all(&file.bytes)?;
        }
        if include_manifest {
            zip.start_file(MANIFEST_FILE_NAME, options).map_err(archive)?;
            zip.write_all(self.manifest().as_bytes())?;
        }

        zip.finish().map_err(archive)
    }

    pub fn write_to_path(&self, path: &Path, include_manifest: bool) -> Result<(), ExportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = fs::File::create(path)?;
        self.write_zip(file, include_manifest)?;
        tracing::info!("Wrote {} part(s) to {}", self.files.len(), path.display());
        Ok(())
    }

    /// Write loose STL files into a directory; returns the paths written
    pub fn write_directory(
        &self,
        dir: &Path,
        include_manifest: bool,
    ) -> Result<Vec<PathBuf>, ExportError> {
        fs::create_dir_all(dir)?;
        let mut written = Vec::with_capacity(self.files.len() + 1);
        for file in &self.files {
            let path = dir.join(file.file_name());
            fs::write(&path, &file.bytes)?;
            written.push(path);
        }
        if include_manifest {
            let path = dir.join(MANIFEST_FILE_NAME);
            fs::write(&path, self.manifest())?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Encode each distinct part once. The first solid seen for a name is the
/// one serialized; later ones only add to its print count.
pub fn pack(solids: &[NamedSolid]) -> Result<ExportPackage, ExportError> {
    let mut counts: BTreeMap<PartName, usize> = BTreeMap::new();
    let mut first: BTreeMap<PartName, &NamedSolid> = BTreeMap::new();

    for named in solids {
        let Some(part) = named.name else {
            continue;
        };
        *counts.entry(part).or_default() += 1;
        first.entry(part).or_insert(named);
    }

    let mut files = Vec::with_capacity(first.len());
    for part in PartName::ALL {
        let Some(named) = first.get(&part) else {
            continue;
        };
        let mesh = TriangleMesh::from_solid(&named.solid);
        let bytes = mesh.to_stl_bytes(part.as_str())?;
        tracing::debug!(
            "Encoded {} ({} triangles, print {})",
            part,
            mesh.len(),
            counts.get(&part).copied().unwrap_or(0)
        );
        files.push(ExportFile { part, bytes });
    }

    Ok(ExportPackage {
        files,
        counts,
        missing: Vec::new(),
    })
}
