//! Text mesh format: a label line, vertex lines, then an index section.
//!
//! # Format
//!
//! ```text
//! <label line, ignored>
//! (x, y, z)
//! (x, y, z)
//! ...
//! Indices:
//! i0,i1,i2,...
//! ...
//! ```
//!
//! Blank lines before the `Indices:` marker are skipped. After the marker,
//! every line holds zero or more non-negative integers separated by commas
//! and/or whitespace; all of them are concatenated into one flat list.
//!
//! A line whose tokens stop parsing part way (for example `0,1,x,2`) keeps
//! the indices read so far and drops the rest. The drop is reported as a
//! [`TruncatedLine`] and logged as a warning.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use mesh_types::{MeshData, Vertex};
use tracing::{debug, error, warn};

use crate::error::{IoError, IoResult};
use crate::vector::parse_vector3;

/// Literal line separating the vertex section from the index section.
pub const INDEX_SECTION_MARKER: &str = "Indices:";

/// An index line whose trailing tokens were not consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedLine {
    /// 1-based line number in the source.
    pub line: usize,
    /// The text that was dropped.
    pub remainder: String,
}

impl std::fmt::Display for TruncatedLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "line {}: ignored trailing index text '{}'",
            self.line, self.remainder
        )
    }
}

/// A mesh together with the non-fatal issues found while reading it.
#[derive(Debug, Clone, Default)]
pub struct LoadedMesh {
    /// The parsed mesh.
    pub mesh: MeshData,
    /// Index lines that were only partially consumed.
    pub truncated_lines: Vec<TruncatedLine>,
}

impl LoadedMesh {
    /// Check if every index line was consumed in full.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.truncated_lines.is_empty()
    }
}

/// Load a mesh from a text file, treating an unopenable source as empty.
///
/// If the file cannot be opened the failure is logged at error level and an
/// empty mesh is returned. Use [`try_load_mesh`] to handle that case
/// yourself.
///
/// # Errors
///
/// Returns an error if the file was opened but its content is malformed
/// or could not be read.
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_mesh;
///
/// let loaded = load_mesh("mesh_triangles.txt").unwrap();
/// println!("Loaded {} triangles", loaded.mesh.triangle_count());
/// ```
pub fn load_mesh<P: AsRef<Path>>(path: P) -> IoResult<LoadedMesh> {
    match try_load_mesh(path) {
        Err(IoError::SourceUnavailable { path, source }) => {
            error!(
                path = %path.display(),
                error = %source,
                "Mesh source unavailable, continuing with an empty mesh"
            );
            Ok(LoadedMesh::default())
        }
        other => other,
    }
}

/// Load a mesh from a text file.
///
/// # Errors
///
/// Returns [`IoError::SourceUnavailable`] if the file cannot be opened, and
/// the errors of [`parse_mesh`] otherwise.
pub fn try_load_mesh<P: AsRef<Path>>(path: P) -> IoResult<LoadedMesh> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| IoError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let loaded = parse_mesh(BufReader::new(file))?;
    debug!(
        path = %path.display(),
        vertices = loaded.mesh.vertex_count(),
        triangles = loaded.mesh.triangle_count(),
        "Loaded text mesh"
    );
    Ok(loaded)
}

/// Parse a mesh from an in-memory string.
///
/// # Errors
///
/// See [`parse_mesh`].
///
/// # Example
///
/// ```
/// use mesh_io::parse_mesh_str;
///
/// let text = "triangle\n(0,0,0)\n(1,0,0)\n(0,1,0)\nIndices:\n0,1,2\n";
/// let loaded = parse_mesh_str(text).unwrap();
/// assert_eq!(loaded.mesh.vertex_count(), 3);
/// assert_eq!(loaded.mesh.indices(), &[0, 1, 2]);
/// ```
pub fn parse_mesh_str(text: &str) -> IoResult<LoadedMesh> {
    parse_mesh(text.as_bytes())
}

/// Parse a mesh from a buffered reader.
///
/// # Errors
///
/// Returns an error if:
/// - a vertex line is not a valid vector (see [`parse_vector3`])
/// - an index does not fit in a `u32`
/// - the total index count is not a multiple of 3
/// - reading from `reader` fails
pub fn parse_mesh<R: BufRead>(mut reader: R) -> IoResult<LoadedMesh> {
    // The label line carries no data and is skipped without decoding it.
    let mut label = Vec::new();
    if reader.read_until(b'\n', &mut label)? == 0 {
        return Ok(LoadedMesh::default());
    }
    let lines = reader.lines();

    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let mut truncated_lines = Vec::new();
    let mut in_index_section = false;
    let mut last_line = 1;

    for (offset, line) in lines.enumerate() {
        let number = offset + 2;
        last_line = number;
        let line = line?;
        let trimmed = line.trim();

        if in_index_section {
            if let Some(remainder) = parse_index_line(trimmed, number, &mut indices)? {
                warn!(
                    line = number,
                    remainder = %remainder,
                    "Index line truncated at a non-comma token"
                );
                truncated_lines.push(TruncatedLine {
                    line: number,
                    remainder,
                });
            }
        } else if trimmed == INDEX_SECTION_MARKER {
            in_index_section = true;
        } else if !trimmed.is_empty() {
            let position = parse_vector3(trimmed).map_err(|e| e.at_line(number))?;
            vertices.push(Vertex::from(position));
        }
    }

    let index_count = indices.len();
    let mesh = MeshData::from_parts(vertices, indices).map_err(|e| IoError::Parse {
        line: Some(last_line),
        message: e.to_string(),
    })?;

    if !in_index_section {
        debug!(
            vertices = mesh.vertex_count(),
            "No index section marker found"
        );
    }
    debug!(
        "Parsed {} vertices and {} indices",
        mesh.vertex_count(),
        index_count
    );

    Ok(LoadedMesh {
        mesh,
        truncated_lines,
    })
}

/// Append the indices on one line to `indices`.
///
/// Returns the unconsumed remainder if parsing stopped before the end of the
/// line.
fn parse_index_line(line: &str, number: usize, indices: &mut Vec<u32>) -> IoResult<Option<String>> {
    let mut rest = line;

    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if digits == 0 {
            return Ok(Some(rest.to_string()));
        }

        let token = &rest[..digits];
        let index = token.parse::<u32>().map_err(|e| IoError::Parse {
            line: Some(number),
            message: format!("index '{token}' is out of range: {e}"),
        })?;
        indices.push(index);

        rest = rest[digits..].trim_start();
        if let Some(after_comma) = rest.strip_prefix(',') {
            rest = after_comma.trim_start();
        }
    }

    Ok(None)
}
