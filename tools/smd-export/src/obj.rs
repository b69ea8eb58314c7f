//! OBJ loading into flattened per-loop SMD meshes

use anyhow::{Context, Result, bail};
use smd_common::{SmdMaterial, SmdMesh, St, write_smd};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Face corner reference: position, optional UV, optional normal (0-based)
type Corner = (usize, Option<usize>, Option<usize>);

/// Load an OBJ file as one mesh.
///
/// Faces are fan triangulated. Each triangle corner emits one position,
/// one normal and one UV, so all three arrays have the same length. Corners
/// without a normal get the face normal; corners without a UV get `(0, 0)`.
pub fn load_obj(input: &Path, name: &str, material_index: i32, scale: f32) -> Result<SmdMesh> {
    let file = File::open(input).with_context(|| format!("Failed to open OBJ: {:?}", input))?;
    let mesh = parse_obj(BufReader::new(file), name, material_index, scale)
        .with_context(|| format!("Failed to parse OBJ: {:?}", input))?;

    tracing::debug!(
        "Loaded OBJ {:?}: {} triangle corners",
        input,
        mesh.vertices.len()
    );
    Ok(mesh)
}

/// Parse OBJ text from any reader
pub fn parse_obj<R: BufRead>(
    reader: R,
    name: &str,
    material_index: i32,
    scale: f32,
) -> Result<SmdMesh> {
    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut tex_coords: Vec<[f32; 2]> = Vec::new();
    let mut normals_raw: Vec<[f32; 3]> = Vec::new();

    let mut mesh = SmdMesh::new(name, material_index);

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let at = || format!("line {}", line_no + 1);

        match parts[0] {
            "v" if parts.len() >= 4 => {
                let [x, y, z] = parse_floats::<3>(&parts[1..]).with_context(at)?;
                positions.push([x * scale, y * scale, z * scale]);
            }
            // A lone `u` leaves `v` at zero
            "vt" if parts.len() >= 2 => {
                tex_coords.push(parse_floats::<2>(&parts[1..]).with_context(at)?);
            }
            "vn" if parts.len() >= 4 => {
                normals_raw.push(parse_floats::<3>(&parts[1..]).with_context(at)?);
            }
            "f" if parts.len() >= 4 => {
                let corners = parts[1..]
                    .iter()
                    .map(|v| {
                        parse_corner(v, positions.len(), tex_coords.len(), normals_raw.len())
                    })
                    .collect::<Result<Vec<Corner>>>()
                    .with_context(at)?;

                // Fan triangulation for convex polygons
                for i in 1..corners.len() - 1 {
                    let tri = [corners[0], corners[i], corners[i + 1]];
                    let face_normal = triangle_normal(
                        positions[tri[0].0],
                        positions[tri[1].0],
                        positions[tri[2].0],
                    );

                    for (vi, vti, vni) in tri {
                        mesh.vertices.push(positions[vi].into());
                        mesh.st
                            .push(vti.map_or(St::default(), |ti| tex_coords[ti].into()));
                        mesh.normals
                            .push(vni.map_or(face_normal, |ni| normals_raw[ni]).into());
                    }
                }
            }
            _ => {}
        }
    }

    if mesh.vertices.is_empty() {
        bail!("No faces found in OBJ file");
    }

    Ok(mesh)
}

/// Positions may only be scaled by a finite factor greater than zero
pub fn check_scale(scale: f32) -> Result<()> {
    if !(scale.is_finite() && scale > 0.0) {
        bail!("invalid scale {} (must be finite and greater than zero)", scale);
    }
    Ok(())
}

fn parse_floats<const N: usize>(parts: &[&str]) -> Result<[f32; N]> {
    let mut out = [0.0f32; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid number {:?}", part))?;
    }
    Ok(out)
}

/// Parse "v", "v/vt", "v/vt/vn" or "v//vn"; negative indices count from the end
fn parse_corner(s: &str, num_v: usize, num_vt: usize, num_vn: usize) -> Result<Corner> {
    let mut parts = s.split('/');
    let vi = parts
        .next()
        .filter(|p| !p.is_empty())
        .with_context(|| format!("face corner {:?} has no position", s))?;
    let vi = resolve_index(vi, num_v)?;

    let vti = match parts.next().filter(|p| !p.is_empty()) {
        Some(p) => Some(resolve_index(p, num_vt)?),
        None => None,
    };
    let vni = match parts.next().filter(|p| !p.is_empty()) {
        Some(p) => Some(resolve_index(p, num_vn)?),
        None => None,
    };

    Ok((vi, vti, vni))
}

fn resolve_index(s: &str, len: usize) -> Result<usize> {
    let raw: i64 = s
        .parse()
        .with_context(|| format!("invalid index {:?}", s))?;
    let resolved = if raw > 0 {
        raw - 1
    } else {
        len as i64 + raw
    };
    if raw == 0 || resolved < 0 || resolved >= len as i64 {
        bail!("index {} out of range (have {})", raw, len);
    }
    Ok(resolved as usize)
}

fn triangle_normal(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [f32; 3] {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > f32::EPSILON {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 1.0, 0.0]
    }
}

/// Convert one OBJ file into a single-mesh `.smd` with one material
pub fn convert_obj(input: &Path, output: &Path, material: &SmdMaterial, scale: f32) -> Result<()> {
    check_scale(scale)?;
    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("mesh");
    let mesh = load_obj(input, name, 1, scale)?;

    let file =
        File::create(output).with_context(|| format!("Failed to create output: {:?}", output))?;
    let mut writer = BufWriter::new(file);
    write_smd(&mut writer, std::slice::from_ref(&mesh), std::slice::from_ref(material))?;
    writer.flush()?;

    tracing::info!(
        "Converted OBJ mesh {:?}: {} verts, {} normals, {} st",
        mesh.name,
        mesh.vertices.len(),
        mesh.normals.len(),
        mesh.st.len()
    );

    Ok(())
}
