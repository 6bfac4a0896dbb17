/// Parser for the line-oriented OBJ mesh description subset (`v`, `vn`, `f`)
use log::info;
use nalgebra::Vector3;
use nom::{
    branch::alt,
    bytes::complete::take_till1,
    character::complete::{char, digit1, space0, space1},
    combinator::{all_consuming, eof, map, map_res, opt, peek, verify},
    multi::many0,
    number::complete::double,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::ParseError;
use crate::geometry::{triangulate, Mesh, TriangleIndexPair};

/// One line of a mesh description, classified by its first token
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Vertex(Vector3<f64>),
    Normal(Vector3<f64>),
    Face(Vec<TriangleIndexPair>),
    Ignored,
}

/// Parse already-read lines of a mesh description into a mesh.
///
/// Indices are converted to 0-based but not checked against the lists;
/// see [`Mesh::validate_indices`].
pub fn parse<I, S>(lines: I) -> Result<Mesh, ParseError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut mesh = Mesh::default();

    for (number, line) in lines.into_iter().enumerate() {
        let line = line.as_ref();
        let record = parse_line(line).map_err(|reason| ParseError::new(number + 1, line, reason))?;
        match record {
            Record::Vertex(v) => mesh.vertices.push(v),
            Record::Normal(n) => mesh.normals.push(n),
            Record::Face(corners) => mesh.triangles.extend(triangulate(&corners)),
            Record::Ignored => {}
        }
    }

    info!(
        "parsed mesh: {} vertices, {} normals, {} triangles",
        mesh.vertices.len(),
        mesh.normals.len(),
        mesh.triangles.len()
    );
    Ok(mesh)
}

/// Parse a whole mesh description held in memory
pub fn parse_obj(text: &str) -> Result<Mesh, ParseError> {
    parse(text.lines())
}

/// Classify and parse a single line
pub fn parse_line(line: &str) -> Result<Record, &'static str> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Record::Ignored);
    }

    let (rest, keyword) = keyword(line).map_err(|_| "missing record keyword")?;
    match keyword {
        "v" => parse_vector3(rest)
            .map(|(_, v)| Record::Vertex(v))
            .map_err(|_| "expected three numeric vertex coordinates"),
        "vn" => parse_vector3(rest)
            .map(|(_, n)| Record::Normal(n))
            .map_err(|_| "expected three numeric normal components"),
        "f" => all_consuming(terminated(many0(preceded(space1, parse_corner)), space0))(rest)
            .map(|(_, corners)| Record::Face(corners))
            .map_err(|_| "face corners must be positive vertex[/texture][/normal] indices"),
        _ => Ok(Record::Ignored),
    }
}

fn keyword(input: &str) -> IResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

/// Succeeds without consuming when the current token has ended
fn token_end(input: &str) -> IResult<&str, &str> {
    peek(alt((space1, eof)))(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    terminated(double, token_end)(input)
}

/// Three whitespace-separated numbers; anything after them (e.g. a `w` weight) is ignored
fn parse_vector3(input: &str) -> IResult<&str, Vector3<f64>> {
    map(
        tuple((
            preceded(space1, number),
            preceded(space1, number),
            preceded(space1, number),
        )),
        |(x, y, z)| Vector3::new(x, y, z),
    )(input)
}

/// A 1-based index, returned 0-based
fn index(input: &str) -> IResult<&str, usize> {
    map(
        verify(map_res(digit1, str::parse::<usize>), |i: &usize| *i >= 1),
        |i| i - 1,
    )(input)
}

/// `a`, `a/b`, `a//c` or `a/b/c`; the texture index `b` is dropped
fn parse_corner(input: &str) -> IResult<&str, TriangleIndexPair> {
    let (input, vertex) = index(input)?;
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(index), opt(preceded(char('/'), index))),
    ))(input)?;
    let (input, _) = token_end(input)?;

    let normal = rest.and_then(|(_, normal)| normal);
    Ok((input, TriangleIndexPair { vertex, normal }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUBE: &str = "\
# unit cube
v -0.5 -0.5 -0.5
v 0.5 -0.5 -0.5
v 0.5 0.5 -0.5
v -0.5 0.5 -0.5
v -0.5 -0.5 0.5
v 0.5 -0.5 0.5
v 0.5 0.5 0.5
v -0.5 0.5 0.5
f 5 6 7 8
f 2 1 4 3
f 4 8 7 3
f 1 2 6 5
f 2 3 7 6
f 1 5 8 4
";

    #[test]
    fn test_parse_vertex_and_normal() {
        assert_eq!(
            parse_line("v 1 -2.5 3e1").unwrap(),
            Record::Vertex(Vector3::new(1.0, -2.5, 30.0))
        );
        assert_eq!(
            parse_line("vn  0   1 0").unwrap(),
            Record::Normal(Vector3::new(0.0, 1.0, 0.0))
        );
        // Trailing homogeneous weight is ignored
        assert_eq!(
            parse_line("v 1 2 3 1.0").unwrap(),
            Record::Vertex(Vector3::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_parse_face_corner_forms() {
        let record = parse_line("f 1/2/3 4//5 6/7 8").unwrap();
        assert_eq!(
            record,
            Record::Face(vec![
                TriangleIndexPair::new(0, 2),
                TriangleIndexPair::new(3, 4),
                TriangleIndexPair::without_normal(5),
                TriangleIndexPair::without_normal(7),
            ])
        );
    }

    #[test]
    fn test_unknown_records_are_ignored() {
        for line in ["", "   ", "# comment", "vt 0.5 0.5", "o cube", "usemtl red", "s off"] {
            assert_eq!(parse_line(line).unwrap(), Record::Ignored);
        }
    }

    #[test]
    fn test_malformed_numbers_fail() {
        assert!(parse_line("v 1 two 3").is_err());
        assert!(parse_line("v 1 2").is_err());
        assert!(parse_line("vn 1 2 3abc").is_err());
        assert!(parse_line("f 1/1/1 x/1/1 3/1/1").is_err());
        assert!(parse_line("f 0/1/1 2/1/1 3/1/1").is_err());
    }

    #[test]
    fn test_parse_error_identifies_line() {
        let err = parse(["v 0 0 0", "v 1 1 1", "v 1 oops 1"]).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.content, "v 1 oops 1");
    }

    #[test]
    fn test_quad_fan_preserves_corner_order() {
        let mesh = parse(["f 1/1/1 2/1/2 3/1/3 4/1/4"]).unwrap();
        assert_eq!(mesh.triangles.len(), 2);
        let first: Vec<usize> = mesh.triangles[0].corners.iter().map(|c| c.vertex).collect();
        let second: Vec<usize> = mesh.triangles[1].corners.iter().map(|c| c.vertex).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(second, vec![0, 2, 3]);
        assert_eq!(mesh.triangles[1].corners[2].normal, Some(3));
    }

    #[test]
    fn test_indices_not_bounds_checked_at_parse() {
        let mesh = parse(["v 0 0 0", "f 1/1/1 7/1/1 9/1/1"]).unwrap();
        assert_eq!(mesh.triangles.len(), 1);
        assert!(mesh.validate_indices().is_err());
    }

    #[test]
    fn test_unit_cube_without_normals() {
        let mesh = parse_obj(CUBE).unwrap();
        assert_eq!(mesh.vertices.len(), 8);
        assert_eq!(mesh.normals.len(), 0);
        assert_eq!(mesh.triangles.len(), 12);

        let mesh = mesh.with_face_normals();
        assert_eq!(mesh.normals.len(), 12);
        assert!(mesh.validate_indices().is_ok());
    }

    #[test]
    fn test_unit_cube_with_normals() {
        let text = "\
v -1 -1 1
v 1 -1 1
v 1 1 1
v -1 1 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
vn 0 0 1
f 1/1/1 2/2/2 3/3/3 4/4/4
";
        let mesh = parse_obj(text).unwrap();
        assert_eq!(mesh.normals.len(), 4);
        assert_eq!(mesh.triangles.len(), 2);
        assert!(mesh
            .triangles
            .iter()
            .flat_map(|t| t.corners.iter())
            .all(|c| c.normal == Some(c.vertex)));
    }
}
