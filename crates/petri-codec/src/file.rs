//! File-level import and export with format dispatch by extension.

use std::fs;
use std::path::Path;

use petri_core::Net;

use crate::dto::NetDto;
use crate::error::CodecError;
use crate::native::{decode_native, encode_native};
use crate::pnml::{decode_pnml, encode_pnml, PnmlOptions};
use crate::warnings::Warnings;

/// A persisted form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NetFormat {
    /// Native JSON (`.json`, `.pnon`).
    Native,
    /// PNML interchange (`.pnml`, `.xml`).
    Pnml,
}

impl NetFormat {
    /// Pick the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "json" | "pnon" => Ok(Self::Native),
            "pnml" | "xml" => Ok(Self::Pnml),
            _ => Err(CodecError::UnsupportedFormat { extension }),
        }
    }
}

/// The outcome of an import: every decoded net plus what was defaulted.
#[derive(Debug, Default)]
pub struct Import {
    /// Decoded nets in document order.
    pub nets: Vec<Net>,
    /// Non-fatal problems, in the order they were found.
    pub warnings: Warnings,
}

impl Import {
    /// The net to load. Any further nets are reported and discarded.
    pub fn into_primary(self) -> (Option<Net>, Warnings) {
        let Import { nets, mut warnings } = self;
        let mut nets = nets.into_iter();
        let primary = nets.next();
        let extra = nets.count();
        if extra > 0 {
            warnings.push(format!(
                "document holds {} nets, only the first is loaded",
                extra + 1
            ));
        }
        (primary, warnings)
    }
}

/// Decode `text` in the given format and rebuild its nets.
pub fn import_str(
    text: &str,
    format: NetFormat,
    options: &PnmlOptions,
) -> Result<Import, CodecError> {
    let (dtos, mut warnings) = match format {
        NetFormat::Native => (vec![decode_native(text)?], Warnings::new()),
        NetFormat::Pnml => decode_pnml(text, options)?,
    };
    let mut nets = Vec::with_capacity(dtos.len());
    for dto in dtos {
        let (net, net_warnings) = dto.into_net();
        warnings.append(net_warnings);
        nets.push(net);
    }
    Ok(Import { nets, warnings })
}

/// Read and decode a file, choosing the format from its extension.
///
/// An unrecognised extension is not an error: the import is empty and
/// carries a warning.
pub fn import_file(path: &Path, options: &PnmlOptions) -> Result<Import, CodecError> {
    let format = match NetFormat::from_path(path) {
        Ok(format) => format,
        Err(e @ CodecError::UnsupportedFormat { .. }) => {
            let mut import = Import::default();
            import.warnings.push(format!("{}: {e}", path.display()));
            return Ok(import);
        }
        Err(e) => return Err(e),
    };
    let text = fs::read_to_string(path)?;
    let import = import_str(&text, format, options)?;
    tracing::debug!(
        path = %path.display(),
        nets = import.nets.len(),
        warnings = import.warnings.len(),
        "imported nets"
    );
    Ok(import)
}

/// Encode `net` in the given format.
pub fn export_str(
    net: &Net,
    format: NetFormat,
    options: &PnmlOptions,
) -> Result<String, CodecError> {
    let dto = NetDto::from_net(net);
    match format {
        NetFormat::Native => encode_native(&dto),
        NetFormat::Pnml => encode_pnml(std::slice::from_ref(&dto), options),
    }
}

/// Encode `net` and write it to `path`, choosing the format from the
/// extension.
pub fn export_file(net: &Net, path: &Path, options: &PnmlOptions) -> Result<(), CodecError> {
    let format = NetFormat::from_path(path)?;
    fs::write(path, export_str(net, format, options)?)?;
    tracing::debug!(path = %path.display(), net = %net.id(), "exported net");
    Ok(())
}
