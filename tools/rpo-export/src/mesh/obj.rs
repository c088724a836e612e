//! OBJ mesh writing

use super::types::RpoMesh;
use crate::error::ConvertError;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Tool banner written as the first comment line of every OBJ file
pub const OBJ_BANNER: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

/// Write a mesh as Wavefront OBJ text
///
/// Vertex colors are written as `v x y z r g b` (alpha is dropped). Faces use
/// 1-based indices, three per line; a trailing group of one or two indices is
/// written as its own shorter `f` line.
pub fn write_obj<W: Write>(w: &mut W, mesh: &RpoMesh) -> io::Result<()> {
    writeln!(w, "# {OBJ_BANNER}")?;
    writeln!(w)?;
    writeln!(w, "o {}", mesh.name)?;
    writeln!(w)?;

    if mesh.has_colors() {
        for (p, c) in mesh.positions.iter().zip(&mesh.colors) {
            writeln!(w, "v {} {} {} {} {} {}", p[0], p[1], p[2], c[0], c[1], c[2])?;
        }
    } else {
        for p in &mesh.positions {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
        }
    }

    if mesh.has_normals() {
        writeln!(w)?;
        for n in &mesh.normals {
            writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
        }
    }

    if !mesh.indices.is_empty() {
        writeln!(w)?;
        for face in mesh.faces() {
            w.write_all(b"f")?;
            for &index in face {
                write!(w, " {}", u32::from(index) + 1)?;
            }
            writeln!(w)?;
        }
    }

    Ok(())
}

/// Write a mesh to an OBJ file, replacing any existing file
pub fn save_obj(mesh: &RpoMesh, output: &Path) -> Result<(), ConvertError> {
    let write_error = |source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    };

    let file = File::create(output).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, mesh).map_err(write_error)?;
    writer.flush().map_err(write_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpo_common::RpoType;

    fn position_mesh(positions: Vec<[f32; 3]>, indices: Vec<u16>) -> RpoMesh {
        RpoMesh {
            name: "crate".into(),
            rpo_type: RpoType::Position,
            vertex_count: positions.len() as u32,
            index_buffer_size: (indices.len() * 2) as u32,
            index_count: indices.len() as u32,
            positions,
            colors: Vec::new(),
            normals: Vec::new(),
            indices,
        }
    }

    fn to_obj(mesh: &RpoMesh) -> String {
        let mut out = Vec::new();
        write_obj(&mut out, mesh).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn lines_starting_with<'a>(text: &'a str, prefix: &str) -> Vec<&'a str> {
        text.lines()
            .filter(|line| line.split_whitespace().next() == Some(prefix))
            .collect()
    }

    #[test]
    fn test_positions_only_layout() {
        let mesh = position_mesh(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.5, -2.25]],
            vec![0, 1, 2],
        );

        let expected = format!(
            "# {OBJ_BANNER}\n\no crate\n\nv 0 0 0\nv 1 0 0\nv 0 1.5 -2.25\n\nf 1 2 3\n"
        );
        assert_eq!(to_obj(&mesh), expected);
    }

    #[test]
    fn test_partial_face_is_flushed() {
        let mesh = position_mesh(vec![[0.0; 3]; 8], vec![0, 1, 2, 3, 4, 5, 6]);
        let text = to_obj(&mesh);

        let faces = lines_starting_with(&text, "f");
        assert_eq!(faces, vec!["f 1 2 3", "f 4 5 6", "f 7"]);
    }

    #[test]
    fn test_no_indices_no_faces() {
        let mesh = position_mesh(vec![[1.0, 2.0, 3.0]], Vec::new());
        let text = to_obj(&mesh);

        assert!(lines_starting_with(&text, "f").is_empty());
        assert!(text.ends_with("v 1 2 3\n"));
    }

    #[test]
    fn test_colors_and_normals() {
        let mesh = RpoMesh {
            name: "lamp".into(),
            rpo_type: RpoType::PositionColorNormal,
            vertex_count: 2,
            index_buffer_size: 4,
            index_count: 2,
            positions: vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
            colors: vec![[0.1, 0.2, 0.3, 0.4], [1.0, 0.5, 0.25, 0.125]],
            normals: vec![[0.0, 1.0, 0.0], [0.0, 0.0, -1.0]],
            indices: vec![1, 0],
        };
        let text = to_obj(&mesh);

        let vertices = lines_starting_with(&text, "v");
        assert_eq!(vertices, vec!["v 1 2 3 0.1 0.2 0.3", "v 4 5 6 1 0.5 0.25"]);

        let normals = lines_starting_with(&text, "vn");
        assert_eq!(normals, vec!["vn 0 1 0", "vn 0 0 -1"]);

        assert!(text.contains("v 4 5 6 1 0.5 0.25\n\nvn 0 1 0\n"));
        assert!(text.ends_with("vn 0 0 -1\n\nf 2 1\n"));
    }

    #[test]
    fn test_floats_round_trip() {
        let values = [0.1f32, -3.4028235e38, 1.0e-7, 123_456.79, f32::MIN_POSITIVE];
        let mesh = position_mesh(values.iter().map(|&v| [v, -v, v * 0.5]).collect(), Vec::new());
        let text = to_obj(&mesh);

        let parsed: Vec<[f32; 3]> = lines_starting_with(&text, "v")
            .iter()
            .map(|line| {
                let fields: Vec<f32> = line[2..]
                    .split_whitespace()
                    .map(|f| f.parse().unwrap())
                    .collect();
                [fields[0], fields[1], fields[2]]
            })
            .collect();
        assert_eq!(parsed, mesh.positions);
    }

    #[test]
    fn test_max_index_is_one_based() {
        let mesh = position_mesh(vec![[0.0; 3]], vec![u16::MAX]);
        assert!(to_obj(&mesh).ends_with("f 65536\n"));
    }
}
