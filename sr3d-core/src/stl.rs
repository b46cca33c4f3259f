/// STL import for binary and ASCII files
///
/// STL carries no color, so every imported triangle gets the same flat color.
use anyhow::{anyhow, bail, Result};
use nom::{
    bytes::complete::tag,
    character::complete::{multispace0, multispace1, not_line_ending},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16, le_u32},
    sequence::{preceded, tuple},
    IResult,
};

use crate::color::Color;
use crate::geometry::{Mesh, Triangle, Vertex};
use crate::vector::Vec3;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

/// One facet as stored on disk: normal, then three corners
type Facet = ([f32; 3], [[f32; 3]; 3]);

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8], color: Color) -> Result<Mesh> {
    if data.len() < HEADER_LEN + 4 {
        bail!(
            "file too small to be a valid STL ({} bytes, need at least {})",
            data.len(),
            HEADER_LEN + 4
        );
    }

    let body = &data[HEADER_LEN..];
    let (body, triangle_count) =
        le_u32::<_, nom::error::Error<&[u8]>>(body).map_err(|e| anyhow!("bad triangle count: {e:?}"))?;
    let triangle_count = triangle_count as usize;

    let available = body.len() / FACET_LEN;
    if available < triangle_count {
        bail!("unexpected end of file: header declares {triangle_count} triangles, found {available}");
    }

    let (_, facets) = count(binary_facet, triangle_count)(body)
        .map_err(|e| anyhow!("malformed binary facet: {e:?}"))?;

    Ok(build_mesh(facets, color))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str, color: Color) -> Result<Mesh> {
    match ascii_solid(input) {
        Ok((_, facets)) => Ok(build_mesh(facets, color)),
        Err(e) => Err(anyhow!("failed to parse ASCII STL: {e:?}")),
    }
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8], color: Color) -> Result<Mesh> {
    // Binary headers may also start with "solid", so fall through on failure
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text, color) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data, color)
}

fn build_mesh(facets: Vec<Facet>, color: Color) -> Mesh {
    let mut mesh = Mesh::with_capacity(facets.len());
    for (normal, corners) in facets {
        let normal = to_vec3(normal);
        let [a, b, c] = corners.map(|p| Vertex::from_position(to_vec3(p)).with_normal(normal));
        mesh.add_triangle(Triangle::with_color(a, b, c, color));
    }
    mesh
}

fn to_vec3([x, y, z]: [f32; 3]) -> Vec3 {
    Vec3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn binary_vec3(input: &[u8]) -> IResult<&[u8], [f32; 3]> {
    let (input, (x, y, z)) = tuple((le_f32, le_f32, le_f32))(input)?;
    Ok((input, [x, y, z]))
}

fn binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, normal) = binary_vec3(input)?;
    let (input, a) = binary_vec3(input)?;
    let (input, b) = binary_vec3(input)?;
    let (input, c) = binary_vec3(input)?;
    // Attribute byte count, unused
    let (input, _) = le_u16(input)?;
    Ok((input, (normal, [a, b, c])))
}

fn ascii_solid(input: &str) -> IResult<&str, Vec<Facet>> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _) = not_line_ending(input)?; // Optional name
    let (input, facets) = many0(ascii_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, facets))
}

fn ascii_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = ascii_vec3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = ascii_vertex(input)?;
    let (input, b) = ascii_vertex(input)?;
    let (input, c) = ascii_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((input, (normal, [a, b, c])))
}

fn ascii_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    ascii_vec3(input)
}

fn ascii_vec3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}
