//! Line-oriented body records.
//!
//! A file starts with the record count. Each record is one field per line:
//! type tag, name, position `x,y`, mass, static flag `T`/`F`, collision flag
//! `T`/`F`, velocity `x,y`, age, angle in degrees and angular velocity,
//! followed by a per-kind trailer:
//!
//! * `Star`: radius
//! * `Planet`: radius, population, orbited star name
//! * `Moon`: radius, orbited planet name
//! * `Asteroid`: local vertices flattened as `x1,y1,x2,y2,...`
//!
//! An empty orbit line means the body orbits nothing.

use std::{fmt, fs, path::Path, str::FromStr};

use glam::DVec2;
use log::{debug, info};
use thiserror::Error;

use crate::{
    core::{
        body::{BodyError, BodyKind},
        factory::{BodyBlueprint, BodyParams, ShapeSpec},
    },
    world::PhysicsWorld,
};

/// One persisted body; the same shape the factory consumes.
pub type BodyRecord = BodyBlueprint;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: unexpected end of input, expected {expected}")]
    UnexpectedEof { line: usize, expected: &'static str },
    #[error("line {line}: invalid number {value:?}")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: invalid flag {value:?}, expected T or F")]
    InvalidFlag { line: usize, value: String },
    #[error("line {line}: invalid vector {value:?}, expected x,y")]
    InvalidVector { line: usize, value: String },
    #[error("line {line}: unknown body type {value:?}")]
    UnknownBodyType { line: usize, value: String },
    #[error("line {line}: vertex list needs an even number of coordinates, got {count}")]
    InvalidVertexList { line: usize, count: usize },
    #[error("invalid body: {0}")]
    InvalidBody(#[from] BodyError),
}

struct LineReader<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> LineReader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines(),
            line: 0,
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a str, PersistenceError> {
        self.line += 1;
        self.lines.next().ok_or(PersistenceError::UnexpectedEof {
            line: self.line,
            expected,
        })
    }

    fn parse<T: FromStr>(line: usize, raw: &str) -> Result<T, PersistenceError> {
        raw.trim()
            .parse()
            .map_err(|_| PersistenceError::InvalidNumber {
                line,
                value: raw.to_string(),
            })
    }

    fn number<T: FromStr>(&mut self, expected: &'static str) -> Result<T, PersistenceError> {
        let raw = self.next(expected)?;
        Self::parse(self.line, raw)
    }

    fn flag(&mut self, expected: &'static str) -> Result<bool, PersistenceError> {
        match self.next(expected)?.trim() {
            "T" => Ok(true),
            "F" => Ok(false),
            other => Err(PersistenceError::InvalidFlag {
                line: self.line,
                value: other.to_string(),
            }),
        }
    }

    fn vector(&mut self, expected: &'static str) -> Result<DVec2, PersistenceError> {
        let raw = self.next(expected)?;
        let mut parts = raw.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(x), Some(y), None) => Ok(DVec2::new(
                Self::parse(self.line, x)?,
                Self::parse(self.line, y)?,
            )),
            _ => Err(PersistenceError::InvalidVector {
                line: self.line,
                value: raw.to_string(),
            }),
        }
    }

    fn vertices(&mut self) -> Result<Vec<DVec2>, PersistenceError> {
        let raw = self.next("vertex list")?;
        let coords = raw
            .split(',')
            .map(|part| Self::parse::<f64>(self.line, part))
            .collect::<Result<Vec<_>, _>>()?;
        if coords.len() % 2 != 0 {
            return Err(PersistenceError::InvalidVertexList {
                line: self.line,
                count: coords.len(),
            });
        }
        Ok(coords
            .chunks_exact(2)
            .map(|pair| DVec2::new(pair[0], pair[1]))
            .collect())
    }

    fn optional_name(&mut self, expected: &'static str) -> Result<Option<String>, PersistenceError> {
        let raw = self.next(expected)?.trim();
        Ok((!raw.is_empty()).then(|| raw.to_string()))
    }
}

fn parse_record(reader: &mut LineReader<'_>) -> Result<BodyRecord, PersistenceError> {
    let tag = reader.next("body type")?.trim();
    let tag_line = reader.line;
    if !matches!(tag, "Star" | "Planet" | "Moon" | "Asteroid") {
        return Err(PersistenceError::UnknownBodyType {
            line: tag_line,
            value: tag.to_string(),
        });
    }

    let params = BodyParams {
        name: reader.optional_name("name")?,
        position: reader.vector("position")?,
        mass: reader.number("mass")?,
        is_static: reader.flag("static flag")?,
        resolve_collisions: reader.flag("collision flag")?,
        velocity: reader.vector("velocity")?,
        age: reader.number("age")?,
        angle: reader.number("angle")?,
        angular_velocity: reader.number("angular velocity")?,
        material: None,
    };

    let record = match tag {
        "Star" => BodyBlueprint::star(reader.number("radius")?, params),
        "Planet" => {
            let radius = reader.number("radius")?;
            let population = reader.number("population")?;
            let orbit = reader.optional_name("orbited star")?;
            BodyBlueprint::planet(radius, population, orbit, params)
        }
        "Moon" => {
            let radius = reader.number("radius")?;
            let orbit = reader.optional_name("orbited planet")?;
            BodyBlueprint::moon(radius, orbit, params)
        }
        _ => BodyBlueprint::asteroid(reader.vertices()?, params),
    };
    Ok(record)
}

/// Parses a whole document. Any malformed field fails the entire parse.
pub fn parse_records(input: &str) -> Result<Vec<BodyRecord>, PersistenceError> {
    let mut reader = LineReader::new(input);
    let count: usize = reader.number("record count")?;
    (0..count).map(|_| parse_record(&mut reader)).collect()
}

fn flag(value: bool) -> &'static str {
    if value {
        "T"
    } else {
        "F"
    }
}

fn circle_radius(shape: &ShapeSpec) -> f64 {
    match shape {
        ShapeSpec::Circle { radius } => *radius,
        ShapeSpec::Polygon { vertices } => vertices
            .iter()
            .map(|v| v.length())
            .fold(0.0, f64::max),
    }
}

/// Display adapter that renders records in the format [`parse_records`] reads.
pub struct RecordDocument<'a>(pub &'a [BodyRecord]);

impl fmt::Display for RecordDocument<'_> {
    fn fmt(&self, out: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(out, "{}", self.0.len())?;
        for record in self.0 {
            write_record(out, record)?;
        }
        Ok(())
    }
}

fn write_record(out: &mut fmt::Formatter<'_>, record: &BodyRecord) -> fmt::Result {
    let p = &record.params;
    writeln!(out, "{}", record.kind.tag())?;
    writeln!(out, "{}", p.name.as_deref().unwrap_or_default())?;
    writeln!(out, "{},{}", p.position.x, p.position.y)?;
    writeln!(out, "{}", p.mass)?;
    writeln!(out, "{}", flag(p.is_static))?;
    writeln!(out, "{}", flag(p.resolve_collisions))?;
    writeln!(out, "{},{}", p.velocity.x, p.velocity.y)?;
    writeln!(out, "{}", p.age)?;
    writeln!(out, "{}", p.angle)?;
    writeln!(out, "{}", p.angular_velocity)?;

    match &record.kind {
        BodyKind::Star => writeln!(out, "{}", circle_radius(&record.shape)),
        BodyKind::Planet { population, orbit } => {
            writeln!(out, "{}", circle_radius(&record.shape))?;
            writeln!(out, "{population}")?;
            writeln!(out, "{}", orbit.as_deref().unwrap_or_default())
        }
        BodyKind::Moon { orbit } => {
            writeln!(out, "{}", circle_radius(&record.shape))?;
            writeln!(out, "{}", orbit.as_deref().unwrap_or_default())
        }
        BodyKind::Asteroid => {
            let coords: Vec<String> = match &record.shape {
                ShapeSpec::Polygon { vertices } => vertices
                    .iter()
                    .flat_map(|v| [v.x.to_string(), v.y.to_string()])
                    .collect(),
                ShapeSpec::Circle { .. } => Vec::new(),
            };
            writeln!(out, "{}", coords.join(","))
        }
    }
}

/// Serialises records in the format [`parse_records`] reads.
pub fn write_records(records: &[BodyRecord]) -> String {
    RecordDocument(records).to_string()
}

impl PhysicsWorld {
    /// Replaces the population with the records in `input`.
    ///
    /// Everything is parsed and validated before the world is touched.
    pub fn load_from_str(&mut self, input: &str) -> Result<usize, PersistenceError> {
        let records = parse_records(input)?;
        let ids = self.replace_bodies(records)?;
        debug!("loaded {} bodies", ids.len());
        Ok(ids.len())
    }

    /// Live bodies in slot order.
    pub fn save_to_string(&self) -> String {
        let records: Vec<BodyRecord> = self
            .bodies()
            .values()
            .filter(|body| !body.is_destroyed())
            .map(BodyBlueprint::from_body)
            .collect();
        write_records(&records)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize, PersistenceError> {
        let path = path.as_ref();
        let input = fs::read_to_string(path)?;
        let count = self.load_from_str(&input)?;
        info!("loaded {count} bodies from {}", path.display());
        Ok(count)
    }

    /// Writes the live population, replacing any existing file.
    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<(), PersistenceError> {
        let path = path.as_ref();
        fs::write(path, self.save_to_string())?;
        info!("saved {} bodies to {}", self.len(), path.display());
        Ok(())
    }
}
